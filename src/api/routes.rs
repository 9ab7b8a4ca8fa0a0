//! API route definitions

use super::handlers;
use super::node_handlers;
use super::path_handlers;
use super::relationship_handlers;
use super::tool_handlers;
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // ====================================================================
        // Nodes
        // ====================================================================
        .route("/nodes/listNodeTypes", get(node_handlers::list_node_types))
        .route(
            "/nodes/listNodeTypeProperties/{type}",
            get(node_handlers::list_node_type_properties),
        )
        .route("/nodes/{type}/search", get(node_handlers::search_nodes))
        .route(
            "/nodes/{type}/searchExact",
            get(node_handlers::search_nodes_exact),
        )
        .route(
            "/nodes/{type}/searchContains",
            get(node_handlers::search_nodes_contains),
        )
        .route("/nodes/fetchById/{id}", get(node_handlers::fetch_by_id))
        .route(
            "/nodes/fetchChemicalByDtsxid/{id}",
            get(node_handlers::fetch_chemical_by_dtxsid),
        )
        // ====================================================================
        // Relationships, paths and graphs
        // ====================================================================
        .route(
            "/relationships/listRelationshipTypes",
            get(relationship_handlers::list_relationship_types),
        )
        .route(
            "/relationships/fromStartNodeId/{id}",
            get(relationship_handlers::from_start_node_id),
        )
        .route("/paths/findByIds", get(path_handlers::find_by_ids))
        .route("/graphs/test", get(path_handlers::test_graph))
        // ====================================================================
        // External tools
        // ====================================================================
        .route(
            "/chemicals/structureSearch",
            post(tool_handlers::structure_search),
        )
        .route(
            "/datasets/makeQsarDataset",
            get(tool_handlers::make_qsar_dataset),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
