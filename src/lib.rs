//! Cinegraph: GraphQL movie-catalog backend library.

pub mod error;
pub mod graphql;
pub mod model;
pub mod node_id;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use error::AppError;
pub use graphql::{build_schema, CatalogSchema};
pub use node_id::{NodeId, NodeType};
pub use routes::app_router;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables};
