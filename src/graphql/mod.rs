//! GraphQL schema: query surface, mutation handlers, and the `_debug`
//! diagnostics field on both roots.

mod inputs;
mod mutation;
mod query;
mod types;

pub use inputs::{ActorInput, CountryOriginInput, CountryOriginRef, MovieInput};
pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use types::{Actor, CountryOrigin, DebugInfo, Movie, PkCursor};

use async_graphql::{EmptySubscription, Schema};
use sqlx::PgPool;

pub type CatalogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with the pool attached as schema data.
pub fn build_schema(pool: PgPool) -> CatalogSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(pool)
        .finish()
}
