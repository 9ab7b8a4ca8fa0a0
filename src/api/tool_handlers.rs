//! Handlers backed by external tools: structure search and QSAR datasets

use super::handlers::AppError;
use super::query::DatasetQuery;
use crate::tools::Molecule;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use serde_json::Value;

/// Search chemicals by structure; the request body is a MOL document
pub async fn structure_search(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<Molecule>>, AppError> {
    let mol = std::str::from_utf8(&body)
        .map_err(|_| AppError::BadRequest("Request body must be UTF-8 text".to_string()))?;
    let molecules = state.structure_search.run(mol).await?;
    tracing::debug!(matches = molecules.len(), "Structure search finished");
    Ok(Json(molecules))
}

/// Build a QSAR dataset for an assay, optionally limited to a chemical list
pub async fn make_qsar_dataset(
    State(state): State<AppState>,
    Query(query): Query<DatasetQuery>,
) -> Result<Json<Value>, AppError> {
    let assay = query.assay.as_deref().unwrap_or_default();
    let dataset = state.qsar.run(assay, query.chem_list.as_deref()).await?;
    Ok(Json(dataset))
}
