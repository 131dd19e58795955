//! Shared application state for all routes.

use crate::graphql::CatalogSchema;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub schema: CatalogSchema,
}
