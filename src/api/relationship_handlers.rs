//! Relationship lookups

use super::handlers::{parse_node_id, AppError};
use crate::neo4j::models::Relationship;
use crate::neo4j::schema::filter_namespace;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

/// List relationship types in the configured namespace
pub async fn list_relationship_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let types = state.neo4j.list_relationship_types().await?;
    Ok(Json(filter_namespace(&types, state.config.namespace.as_deref())))
}

/// Every edge incident to a node, in either direction
pub async fn from_start_node_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Relationship>>, AppError> {
    let id = parse_node_id("id", &id)?;
    let relationships = state.neo4j.find_relationships_by_node(id).await?;
    if relationships.is_empty() {
        return Err(AppError::NotFound(format!(
            "No relationships for node {}",
            id
        )));
    }
    Ok(Json(relationships))
}
