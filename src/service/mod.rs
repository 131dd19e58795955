//! Typed CRUD against PostgreSQL, one module per entity. Every operation
//! takes the pool handle explicitly; no ambient session state.

mod actors;
mod countries;
mod movies;

pub use actors::ActorStore;
pub use countries::CountryOriginStore;
pub use movies::MovieStore;

/// Default page size for list queries.
pub const DEFAULT_PAGE_SIZE: usize = 100;
/// Hard cap on page size.
pub const MAX_PAGE_SIZE: usize = 1000;
