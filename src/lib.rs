//! ComptoxAI Graph API
//!
//! A REST API over the ComptoxAI Neo4j knowledge graph:
//! - node, relationship and path lookups mapped to stable JSON views
//! - schema introspection (node types, relationship types, properties)
//! - chemical structure search and QSAR dataset building via external tools

pub mod api;
pub mod neo4j;
pub mod tools;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub neo4j: Neo4jYamlConfig,
    pub graph: GraphYamlConfig,
    pub structure_search: StructureSearchConfig,
    pub qsar: QsarConfig,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub port: u16,
    /// JSON document served verbatim by `GET /config`
    pub data_config_path: String,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            data_config_path: "assets/data.json".into(),
        }
    }
}

/// Neo4j configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "neo4j".into(),
        }
    }
}

/// Graph layout section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphYamlConfig {
    /// Label namespace exposed by the API (`ns0__Chemical` → `Chemical`).
    /// Empty means labels carry no namespace.
    pub namespace: String,
}

impl Default for GraphYamlConfig {
    fn default() -> Self {
        Self {
            namespace: "ns0".into(),
        }
    }
}

/// Structure-search binary settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StructureSearchConfig {
    pub binary: String,
    pub database: String,
    pub max_output_bytes: usize,
}

impl Default for StructureSearchConfig {
    fn default() -> Self {
        Self {
            binary: "jcsearch".into(),
            database: "DB:public.chemicals".into(),
            max_output_bytes: 24 * 1024 * 1024,
        }
    }
}

/// QSAR dataset script settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QsarConfig {
    pub interpreter: String,
    pub script_path: String,
    pub max_output_bytes: usize,
}

impl Default for QsarConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".into(),
            script_path: "../comptox_ai/scripts/make_qsar.py".into(),
            max_output_bytes: 24 * 1024 * 1024,
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub server_port: u16,
    pub data_config_path: PathBuf,
    /// `None` when labels are not namespaced
    pub namespace: Option<String>,
    pub structure_search: StructureSearchConfig,
    pub qsar: QsarConfig,
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        // 1. Load YAML config (or defaults if file not found)
        let yaml = Self::load_yaml(yaml_path);

        let namespace = std::env::var("COMPTOX_AI_NAMESPACE").unwrap_or(yaml.graph.namespace);

        let mut structure_search = yaml.structure_search;
        if let Ok(binary) = std::env::var("COMPTOX_AI_JCSEARCH") {
            structure_search.binary = binary;
        }

        let mut qsar = yaml.qsar;
        if let Ok(script) = std::env::var("COMPTOX_AI_QSAR_SCRIPT") {
            qsar.script_path = script;
        }

        // 2. Build Config with env var overrides
        Ok(Self {
            neo4j_uri: std::env::var("COMPTOX_AI_DATABASE_URL").unwrap_or(yaml.neo4j.uri),
            neo4j_user: std::env::var("COMPTOX_AI_DATABASE_USERNAME").unwrap_or(yaml.neo4j.user),
            neo4j_password: std::env::var("COMPTOX_AI_DATABASE_PASSWORD")
                .unwrap_or(yaml.neo4j.password),
            server_port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.server.port),
            data_config_path: std::env::var("COMPTOX_AI_DATA_CONFIG")
                .unwrap_or(yaml.server.data_config_path)
                .into(),
            namespace: Some(namespace).filter(|ns| !ns.is_empty()),
            structure_search,
            qsar,
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub neo4j: Arc<dyn neo4j::GraphStore>,
    pub structure_search: Arc<tools::StructureSearch>,
    pub qsar: Arc<tools::QsarDatasetBuilder>,
    /// Document served by `GET /config`
    pub data_config: Arc<serde_json::Value>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state with all services initialized
    pub async fn new(config: Config) -> Result<Self> {
        let neo4j = Arc::new(
            neo4j::client::Neo4jClient::new(
                &config.neo4j_uri,
                &config.neo4j_user,
                &config.neo4j_password,
            )
            .await?,
        );

        let data_config = load_data_config(&config.data_config_path)?;

        Ok(Self {
            neo4j,
            structure_search: Arc::new(tools::StructureSearch::new(&config.structure_search)),
            qsar: Arc::new(tools::QsarDatasetBuilder::new(&config.qsar)),
            data_config: Arc::new(data_config),
            config: Arc::new(config),
        })
    }
}

/// Read the JSON document served by `GET /config`.
///
/// A missing file yields an empty object; a malformed one is an error.
pub fn load_data_config(path: &Path) -> Result<serde_json::Value> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON in {}", path.display())),
        Err(_) => {
            tracing::warn!(
                "No data config at {}, serving an empty object",
                path.display()
            );
            Ok(serde_json::json!({}))
        }
    }
}

/// Connect to the database and serve the API until the process is stopped
pub async fn start_server(config: Config) -> Result<()> {
    let port = config.server_port;
    let state = AppState::new(config).await?;
    let router = api::create_router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("ComptoxAI API listening at http://{}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
