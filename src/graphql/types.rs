//! GraphQL node objects, connection cursor, and diagnostics type.

use crate::error::AppError;
use crate::model::{ActorRow, CountryOriginRow, MovieRow};
use crate::node_id::{NodeId, NodeType};
use crate::service::{CountryOriginStore, MovieStore};
use async_graphql::connection::CursorType;
use async_graphql::{ComplexObject, Context, Result as GqlResult, SimpleObject, ID};
use sqlx::PgPool;

pub(crate) fn global_id(node_type: NodeType, key: i64) -> ID {
    ID(NodeId::new(node_type, key).encode())
}

#[derive(Debug, Clone, SimpleObject)]
pub struct Actor {
    pub id: ID,
    pub name: String,
}

impl From<ActorRow> for Actor {
    fn from(row: ActorRow) -> Self {
        Actor {
            id: global_id(NodeType::Actor, row.id),
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct CountryOrigin {
    pub id: ID,
    pub country: String,
}

impl From<CountryOriginRow> for CountryOrigin {
    fn from(row: CountryOriginRow) -> Self {
        CountryOrigin {
            id: global_id(NodeType::CountryOrigin, row.id),
            country: row.country,
        }
    }
}

/// Movie node. Relations resolve lazily from the store.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Movie {
    pub id: ID,
    pub title: String,
    pub year: i32,
    #[graphql(skip)]
    pub pk: i64,
    #[graphql(skip)]
    pub country_origin_id: Option<i64>,
}

#[ComplexObject]
impl Movie {
    /// Association members, primary key ascending.
    async fn actors(&self, ctx: &Context<'_>) -> GqlResult<Vec<Actor>> {
        let pool = ctx.data::<PgPool>()?;
        let rows = MovieStore::actors_of(pool, self.pk).await?;
        Ok(rows.into_iter().map(Actor::from).collect())
    }

    async fn country_origin(&self, ctx: &Context<'_>) -> GqlResult<Option<CountryOrigin>> {
        let Some(key) = self.country_origin_id else {
            return Ok(None);
        };
        let pool = ctx.data::<PgPool>()?;
        Ok(CountryOriginStore::get(pool, key).await?.map(CountryOrigin::from))
    }
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: global_id(NodeType::Movie, row.id),
            title: row.title,
            year: row.year,
            pk: row.id,
            country_origin_id: row.country_origin_id,
        }
    }
}

/// Opaque connection cursor over the primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PkCursor(pub i64);

impl CursorType for PkCursor {
    type Error = AppError;

    fn decode_cursor(s: &str) -> Result<Self, Self::Error> {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine as _;
        let invalid = || AppError::InvalidId(format!("bad cursor: {}", s));
        let bytes = STANDARD.decode(s).map_err(|_| invalid())?;
        let text = String::from_utf8(bytes).map_err(|_| invalid())?;
        let key = text
            .strip_prefix("pk:")
            .ok_or_else(invalid)?
            .parse()
            .map_err(|_| invalid())?;
        Ok(PkCursor(key))
    }

    fn encode_cursor(&self) -> String {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine as _;
        STANDARD.encode(format!("pk:{}", self.0))
    }
}

/// Query-execution diagnostics; no business semantics.
#[derive(Debug, Clone, SimpleObject)]
pub struct DebugInfo {
    pub version: String,
    pub pool_size: u32,
    pub pool_idle: u32,
}

pub(crate) fn debug_info(pool: &PgPool) -> DebugInfo {
    DebugInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        pool_size: pool.size(),
        pool_idle: pool.num_idle() as u32,
    }
}
