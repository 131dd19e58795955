//! Mutation root: create/update per entity. A missing referenced entity is
//! reported as `ok: false` with a null node; malformed ids and storage
//! faults surface as GraphQL errors instead.

use crate::model::{ActorPatch, CountryOriginPatch, MoviePatch, NewMovie};
use crate::node_id::{NodeId, NodeType};
use crate::service::{ActorStore, CountryOriginStore, MovieStore};
use async_graphql::{Context, Object, Result as GqlResult, SimpleObject, ID};
use sqlx::PgPool;

use super::inputs::{ActorInput, CountryOriginInput, MovieInput};
use super::types::{debug_info, Actor, CountryOrigin, DebugInfo, Movie};

#[derive(Debug, Clone, SimpleObject)]
pub struct ActorPayload {
    pub ok: bool,
    pub actor: Option<Actor>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct CountryOriginPayload {
    pub ok: bool,
    pub country_origin: Option<CountryOrigin>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct MoviePayload {
    pub ok: bool,
    pub movie: Option<Movie>,
}

impl MoviePayload {
    fn missing() -> Self {
        MoviePayload { ok: false, movie: None }
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_actor(&self, ctx: &Context<'_>, input: ActorInput) -> GqlResult<ActorPayload> {
        let pool = ctx.data::<PgPool>()?;
        let row = ActorStore::create(pool, input.name.as_deref()).await?;
        Ok(ActorPayload { ok: true, actor: Some(row.into()) })
    }

    /// `ok: false` with no write when the id resolves to no actor.
    async fn update_actor(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: ActorInput,
    ) -> GqlResult<ActorPayload> {
        let pool = ctx.data::<PgPool>()?;
        let key = NodeId::decode(&id)?.expect(NodeType::Actor)?;
        let patch = ActorPatch { name: input.name };
        match ActorStore::update(pool, key, &patch).await? {
            Some(row) => Ok(ActorPayload { ok: true, actor: Some(row.into()) }),
            None => Ok(ActorPayload { ok: false, actor: None }),
        }
    }

    async fn create_country_origin(
        &self,
        ctx: &Context<'_>,
        input: CountryOriginInput,
    ) -> GqlResult<CountryOriginPayload> {
        let pool = ctx.data::<PgPool>()?;
        let row = CountryOriginStore::create(pool, input.country.as_deref()).await?;
        Ok(CountryOriginPayload { ok: true, country_origin: Some(row.into()) })
    }

    /// `ok: false` with no write when the id resolves to no country origin.
    async fn update_country_origin(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: CountryOriginInput,
    ) -> GqlResult<CountryOriginPayload> {
        let pool = ctx.data::<PgPool>()?;
        let key = NodeId::decode(&id)?.expect(NodeType::CountryOrigin)?;
        let patch = CountryOriginPatch { country: input.country };
        match CountryOriginStore::update(pool, key, &patch).await? {
            Some(row) => Ok(CountryOriginPayload { ok: true, country_origin: Some(row.into()) }),
            None => Ok(CountryOriginPayload { ok: false, country_origin: None }),
        }
    }

    /// Every referenced actor must exist before anything is written; a single
    /// miss aborts with `ok: false` and no movie row. A missing or dangling
    /// country reference is tolerated and the movie is created without one.
    async fn create_movie(&self, ctx: &Context<'_>, input: MovieInput) -> GqlResult<MoviePayload> {
        let pool = ctx.data::<PgPool>()?;
        let actor_ids = match resolve_actors(pool, input.actors.as_deref()).await? {
            Some(ids) => ids,
            None => return Ok(MoviePayload::missing()),
        };
        let country_origin_id = match &input.country_origin {
            Some(country) => {
                let key = NodeId::decode(&country.id)?.expect(NodeType::CountryOrigin)?;
                CountryOriginStore::get(pool, key).await?.map(|c| c.id)
            }
            None => None,
        };
        let row = MovieStore::create(
            pool,
            &NewMovie {
                title: input.title,
                year: input.year,
                country_origin_id,
                actor_ids,
            },
        )
        .await?;
        Ok(MoviePayload { ok: true, movie: Some(row.into()) })
    }

    /// Partial update. Omitted `actors` keeps the set; a provided set is
    /// replaced in full after every member resolves (any miss aborts).
    /// A dangling country reference leaves the previous one unchanged.
    async fn update_movie(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: MovieInput,
    ) -> GqlResult<MoviePayload> {
        let pool = ctx.data::<PgPool>()?;
        let key = NodeId::decode(&id)?.expect(NodeType::Movie)?;
        if MovieStore::get(pool, key).await?.is_none() {
            return Ok(MoviePayload::missing());
        }
        let actor_ids = match input.actors.as_deref() {
            Some(ids) => match resolve_actors(pool, Some(ids)).await? {
                Some(resolved) => Some(resolved),
                None => return Ok(MoviePayload::missing()),
            },
            None => None,
        };
        let country_origin_id = match &input.country_origin {
            Some(country) => {
                let ref_key = NodeId::decode(&country.id)?.expect(NodeType::CountryOrigin)?;
                CountryOriginStore::get(pool, ref_key).await?.map(|c| c.id)
            }
            None => None,
        };
        let patch = MoviePatch {
            title: input.title,
            year: input.year,
            country_origin_id,
        };
        match MovieStore::update(pool, key, &patch, actor_ids.as_deref()).await? {
            Some(row) => Ok(MoviePayload { ok: true, movie: Some(row.into()) }),
            None => Ok(MoviePayload::missing()),
        }
    }

    #[graphql(name = "_debug")]
    async fn debug(&self, ctx: &Context<'_>) -> GqlResult<DebugInfo> {
        let pool = ctx.data::<PgPool>()?;
        Ok(debug_info(pool))
    }
}

/// Decode and resolve a set of actor global ids. Repeated ids collapse to a
/// single membership (the association is a set). `Ok(None)` means at least
/// one referenced actor does not exist; decoding failures are hard errors.
async fn resolve_actors(
    pool: &PgPool,
    ids: Option<&[ID]>,
) -> GqlResult<Option<Vec<i64>>> {
    let ids = ids.unwrap_or(&[]);
    let mut keys: Vec<i64> = Vec::with_capacity(ids.len());
    for id in ids {
        let key = NodeId::decode(id)?.expect(NodeType::Actor)?;
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    let existing = ActorStore::existing_ids(pool, &keys).await?;
    for key in &keys {
        if !existing.contains(key) {
            return Ok(None);
        }
    }
    Ok(Some(keys))
}
