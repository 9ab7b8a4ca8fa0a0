//! Node lookups: schema listing, property search and fetch by id

use super::handlers::{parse_node_id, AppError};
use super::query::SearchQuery;
use crate::neo4j::cypher::{MatchMode, SearchValue};
use crate::neo4j::models::{Node, NodeTypeProperty};
use crate::neo4j::schema::{filter_namespace, has_property_key, resolve_label};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};

/// Node type holding chemicals, resolved through the configured namespace
const CHEMICAL_TYPE: &str = "Chemical";
const DTXSID_FIELD: &str = "xrefDTXSID";

/// Map a requested node type onto an existing label, or 404
pub(crate) async fn resolve_node_type(state: &AppState, requested: &str) -> Result<String, AppError> {
    let labels = state.neo4j.list_labels().await?;
    resolve_label(&labels, requested, state.config.namespace.as_deref())
        .ok_or_else(|| AppError::NotFound(format!("No node type '{}'", requested)))
}

/// Check a property name against the database's property keys, or 404
async fn check_field(state: &AppState, field: &str) -> Result<(), AppError> {
    let keys = state.neo4j.list_property_keys().await?;
    if has_property_key(&keys, field) {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("No node property '{}'", field)))
    }
}

/// Validate the type and field, then search with the given match mode
async fn search(
    state: &AppState,
    node_type: &str,
    field: &str,
    raw_value: &str,
    mode: MatchMode,
) -> Result<Json<Vec<Node>>, AppError> {
    let label = resolve_node_type(state, node_type).await?;
    check_field(state, field).await?;

    let value = SearchValue::parse(raw_value);
    let nodes = state.neo4j.find_nodes(&label, field, &value, mode).await?;
    if nodes.is_empty() {
        return Err(AppError::NotFound(format!(
            "No {} node where {} matches '{}'",
            node_type, field, raw_value
        )));
    }
    Ok(Json(nodes))
}

/// List node types in the configured namespace
pub async fn list_node_types(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let labels = state.neo4j.list_labels().await?;
    Ok(Json(filter_namespace(&labels, state.config.namespace.as_deref())))
}

/// List the properties (and their types) of one node type
pub async fn list_node_type_properties(
    State(state): State<AppState>,
    Path(node_type): Path<String>,
) -> Result<Json<Vec<NodeTypeProperty>>, AppError> {
    let label = resolve_node_type(&state, &node_type).await?;
    let properties = state.neo4j.node_type_properties(&label).await?;
    if properties.is_empty() {
        return Err(AppError::NotFound(format!(
            "No properties recorded for node type '{}'",
            node_type
        )));
    }
    Ok(Json(properties))
}

/// Case-insensitive whole-value search
pub async fn search_nodes(
    State(state): State<AppState>,
    Path(node_type): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Node>>, AppError> {
    let (field, value) = query.parts()?;
    search(&state, &node_type, field, value, MatchMode::CaseInsensitive).await
}

pub async fn search_nodes_exact(
    State(state): State<AppState>,
    Path(node_type): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Node>>, AppError> {
    let (field, value) = query.parts()?;
    search(&state, &node_type, field, value, MatchMode::Exact).await
}

pub async fn search_nodes_contains(
    State(state): State<AppState>,
    Path(node_type): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Node>>, AppError> {
    let (field, value) = query.parts()?;
    search(&state, &node_type, field, value, MatchMode::Contains).await
}

/// Fetch a node by internal id
pub async fn fetch_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Node>, AppError> {
    let id = parse_node_id("id", &id)?;
    state
        .neo4j
        .get_node(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No node with id {}", id)))
}

/// Fetch a chemical by its DSSTox substance id
pub async fn fetch_chemical_by_dtxsid(
    State(state): State<AppState>,
    Path(dtxsid): Path<String>,
) -> Result<Json<Node>, AppError> {
    let label = resolve_node_type(&state, CHEMICAL_TYPE).await?;
    let value = SearchValue::Text(dtxsid.clone());
    state
        .neo4j
        .find_nodes(&label, DTXSID_FIELD, &value, MatchMode::Exact)
        .await?
        .into_iter()
        .next()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No chemical with DTXSID '{}'", dtxsid)))
}
