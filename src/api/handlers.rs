//! API request handlers shared by every route group

use crate::tools::ToolError;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::Value;

/// Greeting returned by `GET /`
pub const WELCOME_MESSAGE: &str = "Welcome to ComptoxAI's web API! Please read the documentation at http://comptox.ai/api/help/ for available operations.";

// ============================================================================
// Root and config
// ============================================================================

pub async fn root() -> Json<&'static str> {
    Json(WELCOME_MESSAGE)
}

/// Static metadata describing the graph, loaded once at startup
pub async fn get_config(State(state): State<AppState>) -> Json<Value> {
    Json(state.data_config.as_ref().clone())
}

// ============================================================================
// Health check
// ============================================================================

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub neo4j: String,
}

/// Health check handler: verifies actual connectivity to Neo4j.
///
/// Returns 200 + `"ok"` when the database answers, 503 + `"unhealthy"` otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let neo4j_ok = state.neo4j.health_check().await.unwrap_or(false);

    let (http_status, status, neo4j) = if neo4j_ok {
        (StatusCode::OK, "ok", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "disconnected")
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            neo4j: neo4j.to_string(),
        }),
    )
}

// ============================================================================
// Error handling
// ============================================================================

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
    NotFound(String),
    BadRequest(String),
    /// An external tool failed or produced unusable output
    BadGateway(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = Json(serde_json::json!({
            "message": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<ToolError> for AppError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::InvalidInput(msg) => AppError::BadRequest(msg),
            other => AppError::BadGateway(other.to_string()),
        }
    }
}

/// Parse an internal node id given as text
pub(crate) fn parse_node_id(name: &str, raw: &str) -> Result<i64, AppError> {
    raw.trim().parse().map_err(|_| {
        AppError::BadRequest(format!(
            "'{}' must be an integer node id, got '{}'",
            name, raw
        ))
    })
}
