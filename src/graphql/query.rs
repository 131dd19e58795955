//! Query root: per entity, a singular lookup by global id and a filterable,
//! cursor-paginated collection field.

use crate::model::{ActorFilter, CountryOriginFilter, MovieFilter};
use crate::node_id::{NodeId, NodeType};
use crate::service::{ActorStore, CountryOriginStore, MovieStore, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use async_graphql::connection::{query, Connection, Edge};
use async_graphql::{Context, Object, Result as GqlResult, ID};
use sqlx::PgPool;

use super::types::{debug_info, Actor, CountryOrigin, DebugInfo, Movie, PkCursor};

fn page_limit(first: Option<usize>) -> usize {
    first.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE)
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Fetch an actor by global id; null when absent.
    async fn actor(&self, ctx: &Context<'_>, id: ID) -> GqlResult<Option<Actor>> {
        let pool = ctx.data::<PgPool>()?;
        let key = NodeId::decode(&id)?.expect(NodeType::Actor)?;
        Ok(ActorStore::get(pool, key).await?.map(Actor::from))
    }

    /// Actors filtered by exact field match, paginated forward by pk.
    async fn all_actors(
        &self,
        ctx: &Context<'_>,
        id: Option<ID>,
        name: Option<String>,
        after: Option<String>,
        first: Option<i32>,
    ) -> GqlResult<Connection<PkCursor, Actor>> {
        let pool = ctx.data::<PgPool>()?;
        let filter = ActorFilter {
            id: decode_opt(id, NodeType::Actor)?,
            name,
        };
        query(after, None, first, None, move |after, _, first, _| async move {
            let limit = page_limit(first);
            let has_prev = after.is_some();
            let mut rows =
                ActorStore::list(pool, &filter, after.map(|c: PkCursor| c.0), (limit + 1) as i64)
                    .await?;
            let has_next = rows.len() > limit;
            rows.truncate(limit);
            let mut conn = Connection::new(has_prev, has_next);
            conn.edges
                .extend(rows.into_iter().map(|r| Edge::new(PkCursor(r.id), Actor::from(r))));
            Ok::<_, async_graphql::Error>(conn)
        })
        .await
    }

    /// Fetch a country origin by global id; null when absent.
    async fn country_origin(&self, ctx: &Context<'_>, id: ID) -> GqlResult<Option<CountryOrigin>> {
        let pool = ctx.data::<PgPool>()?;
        let key = NodeId::decode(&id)?.expect(NodeType::CountryOrigin)?;
        Ok(CountryOriginStore::get(pool, key).await?.map(CountryOrigin::from))
    }

    /// Country origins filtered by exact field match, paginated forward by pk.
    async fn all_country_origin(
        &self,
        ctx: &Context<'_>,
        id: Option<ID>,
        country: Option<String>,
        after: Option<String>,
        first: Option<i32>,
    ) -> GqlResult<Connection<PkCursor, CountryOrigin>> {
        let pool = ctx.data::<PgPool>()?;
        let filter = CountryOriginFilter {
            id: decode_opt(id, NodeType::CountryOrigin)?,
            country,
        };
        query(after, None, first, None, move |after, _, first, _| async move {
            let limit = page_limit(first);
            let has_prev = after.is_some();
            let mut rows = CountryOriginStore::list(
                pool,
                &filter,
                after.map(|c: PkCursor| c.0),
                (limit + 1) as i64,
            )
            .await?;
            let has_next = rows.len() > limit;
            rows.truncate(limit);
            let mut conn = Connection::new(has_prev, has_next);
            conn.edges.extend(
                rows.into_iter()
                    .map(|r| Edge::new(PkCursor(r.id), CountryOrigin::from(r))),
            );
            Ok::<_, async_graphql::Error>(conn)
        })
        .await
    }

    /// Fetch a movie by global id; null when absent.
    async fn movie(&self, ctx: &Context<'_>, id: ID) -> GqlResult<Option<Movie>> {
        let pool = ctx.data::<PgPool>()?;
        let key = NodeId::decode(&id)?.expect(NodeType::Movie)?;
        Ok(MovieStore::get(pool, key).await?.map(Movie::from))
    }

    /// Movies filtered by exact field match (actor and countryOrigin take
    /// global ids), paginated forward by pk.
    async fn all_movies(
        &self,
        ctx: &Context<'_>,
        id: Option<ID>,
        title: Option<String>,
        actor: Option<ID>,
        country_origin: Option<ID>,
        after: Option<String>,
        first: Option<i32>,
    ) -> GqlResult<Connection<PkCursor, Movie>> {
        let pool = ctx.data::<PgPool>()?;
        let filter = MovieFilter {
            id: decode_opt(id, NodeType::Movie)?,
            title,
            actor_id: decode_opt(actor, NodeType::Actor)?,
            country_origin_id: decode_opt(country_origin, NodeType::CountryOrigin)?,
        };
        query(after, None, first, None, move |after, _, first, _| async move {
            let limit = page_limit(first);
            let has_prev = after.is_some();
            let mut rows =
                MovieStore::list(pool, &filter, after.map(|c: PkCursor| c.0), (limit + 1) as i64)
                    .await?;
            let has_next = rows.len() > limit;
            rows.truncate(limit);
            let mut conn = Connection::new(has_prev, has_next);
            conn.edges
                .extend(rows.into_iter().map(|r| Edge::new(PkCursor(r.id), Movie::from(r))));
            Ok::<_, async_graphql::Error>(conn)
        })
        .await
    }

    #[graphql(name = "_debug")]
    async fn debug(&self, ctx: &Context<'_>) -> GqlResult<DebugInfo> {
        let pool = ctx.data::<PgPool>()?;
        Ok(debug_info(pool))
    }
}

fn decode_opt(id: Option<ID>, expected: NodeType) -> Result<Option<i64>, crate::error::AppError> {
    id.map(|id| NodeId::decode(&id)?.expect(expected)).transpose()
}
