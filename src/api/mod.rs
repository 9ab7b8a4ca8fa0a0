//! HTTP API for the knowledge graph

pub mod handlers;
pub mod node_handlers;
pub mod path_handlers;
pub mod query;
pub mod relationship_handlers;
pub mod routes;
pub mod tool_handlers;

pub use handlers::AppError;
pub use query::*;
pub use routes::create_router;
