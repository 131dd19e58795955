//! Row structs, list filters, and per-field patch structs.
//!
//! Partial updates are expressed as enumerated patch structs (one `Option`
//! per updatable scalar) rather than dynamic field-by-name dispatch, so the
//! set of updatable fields is checked at compile time. A `None` field means
//! "leave as is"; relation sets are replaced wholesale, never merged.

use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ActorRow {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct CountryOriginRow {
    pub id: i64,
    pub country: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct MovieRow {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub country_origin_id: Option<i64>,
}

/// Fields for a new movie row. `actor_ids` is the full association set,
/// applied in the same transaction as the insert.
#[derive(Debug, Clone, Default)]
pub struct NewMovie {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub country_origin_id: Option<i64>,
    pub actor_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ActorPatch {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CountryOriginPatch {
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub country_origin_id: Option<i64>,
}

/// Equality filters for list queries. `None` means "no constraint".
#[derive(Debug, Clone, Default)]
pub struct ActorFilter {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CountryOriginFilter {
    pub id: Option<i64>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub actor_id: Option<i64>,
    pub country_origin_id: Option<i64>,
}
