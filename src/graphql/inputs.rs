//! Mutation input objects. Create and update share one input type per
//! entity; fields left unset are not applied on update.

use async_graphql::{InputObject, ID};

#[derive(Debug, Clone, InputObject)]
pub struct ActorInput {
    pub name: Option<String>,
}

#[derive(Debug, Clone, InputObject)]
pub struct CountryOriginInput {
    pub country: Option<String>,
}

/// Reference to an existing country origin by global id.
#[derive(Debug, Clone, InputObject)]
pub struct CountryOriginRef {
    pub id: ID,
}

#[derive(Debug, Clone, InputObject)]
pub struct MovieInput {
    pub title: Option<String>,
    pub year: Option<i32>,
    /// Global actor ids; when present the association set is replaced in full.
    pub actors: Option<Vec<ID>>,
    pub country_origin: Option<CountryOriginRef>,
}
