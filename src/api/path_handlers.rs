//! Path and subgraph lookups

use super::handlers::AppError;
use super::query::PathQuery;
use crate::neo4j::cypher::MAX_PATH_LENGTH;
use crate::neo4j::models::{Graph, Path};
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};

/// Demonstration query behind `GET /graphs/test`
pub const TEST_GRAPH_QUERY: &str = "MATCH p=(n)-[r:CHEMICALBINDSGENE]->(m) RETURN p LIMIT 25";

/// One shortest path between two nodes, ignoring edge direction
pub async fn find_by_ids(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<Path>, AppError> {
    let (from, to) = query.ids()?;
    state
        .neo4j
        .shortest_path(from, to, MAX_PATH_LENGTH)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No path of at most {} steps between {} and {}",
                MAX_PATH_LENGTH, from, to
            ))
        })
}

/// Fold the paths of the demonstration query into one graph
pub async fn test_graph(State(state): State<AppState>) -> Result<Json<Graph>, AppError> {
    let graph = state.neo4j.graph_from_paths(TEST_GRAPH_QUERY).await?;
    if graph.nodes.is_empty() && graph.relationships.is_empty() {
        return Err(AppError::NotFound("Query returned no paths".to_string()));
    }
    Ok(Json(graph))
}
