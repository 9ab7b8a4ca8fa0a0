//! Neo4j client for reading the ComptoxAI knowledge graph

use super::cypher::{self, MatchMode, SearchValue};
use super::models::*;
use anyhow::{Context, Result};
use neo4rs::{query, BoltType, Query, Row, Txn};
use std::sync::Arc;

/// Client for Neo4j operations
pub struct Neo4jClient {
    graph: Arc<neo4rs::Graph>,
}

/// A read transaction held for the duration of one store operation.
///
/// Opened from the shared connection pool, committed by [`ReadSession::close`]
/// and rolled back by [`ReadSession::abort`]; the pooled connection goes back
/// to the pool either way.
pub(crate) struct ReadSession {
    txn: Txn,
}

impl ReadSession {
    async fn open(graph: &neo4rs::Graph) -> Result<Self> {
        let txn = graph
            .start_txn()
            .await
            .context("Failed to open Neo4j read session")?;
        Ok(Self { txn })
    }

    /// Run a query and collect every row
    async fn rows(&mut self, q: Query) -> Result<Vec<Row>> {
        let mut stream = self.txn.execute(q).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next(self.txn.handle()).await? {
            rows.push(row);
        }
        Ok(rows)
    }

    async fn close(self) -> Result<()> {
        self.txn.commit().await.context("Failed to close Neo4j read session")
    }

    async fn abort(self) {
        if let Err(e) = self.txn.rollback().await {
            tracing::warn!("Failed to roll back Neo4j read session: {}", e);
        }
    }
}

impl Neo4jClient {
    /// Create a new Neo4j client
    pub async fn new(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = neo4rs::Graph::new(uri, user, password)
            .await
            .context("Failed to connect to Neo4j")?;

        tracing::info!("Connected to Neo4j at {}", uri);

        Ok(Self {
            graph: Arc::new(graph),
        })
    }

    /// Execute a query inside its own read session and collect the rows
    pub(crate) async fn read(&self, cypher_text: &str, params: &[(&str, BoltType)]) -> Result<Vec<Row>> {
        tracing::debug!(
            query = %cypher_text.trim(),
            params = %describe_params(params),
            "Running Cypher"
        );

        let q = params
            .iter()
            .fold(query(cypher_text), |q, (key, value)| q.param(key, value.clone()));

        let mut session = ReadSession::open(&self.graph).await?;
        match session.rows(q).await {
            Ok(rows) => {
                session.close().await?;
                Ok(rows)
            }
            Err(e) => {
                session.abort().await;
                Err(e.context("Cypher query failed"))
            }
        }
    }

    /// Read a single string column from every row
    async fn read_strings(&self, cypher_text: &str, column: &str) -> Result<Vec<String>> {
        let rows = self.read(cypher_text, &[]).await?;
        rows.iter()
            .map(|row| row.get::<String>(column).map_err(anyhow::Error::from))
            .collect()
    }

    // ========================================================================
    // Schema introspection
    // ========================================================================

    /// All node labels
    pub async fn list_labels(&self) -> Result<Vec<String>> {
        self.read_strings(cypher::LIST_LABELS, "label").await
    }

    /// All relationship types
    pub async fn list_relationship_types(&self) -> Result<Vec<String>> {
        self.read_strings(cypher::LIST_RELATIONSHIP_TYPES, "relationshipType")
            .await
    }

    /// All property keys
    pub async fn list_property_keys(&self) -> Result<Vec<String>> {
        self.read_strings(cypher::LIST_PROPERTY_KEYS, "propertyKey")
            .await
    }

    /// Properties of a node label, from APOC schema metadata
    pub async fn node_type_properties(&self, label: &str) -> Result<Vec<NodeTypeProperty>> {
        let rows = self
            .read(cypher::NODE_TYPE_PROPERTIES, &[("label", label.into())])
            .await?;

        rows.iter()
            .map(|row| {
                row.get::<NodeTypeProperty>("prop")
                    .with_context(|| format!("Malformed schema entry for label {}", label))
            })
            .collect()
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Nodes of `label` whose `field` matches `value`
    pub async fn find_nodes(
        &self,
        label: &str,
        field: &str,
        value: &SearchValue,
        mode: MatchMode,
    ) -> Result<Vec<Node>> {
        let cypher_text = cypher::find_nodes(label, mode);

        let mut params: Vec<(&str, BoltType)> = vec![("field", field.into())];
        params.push(match value {
            SearchValue::Int(i, _) => ("value", (*i).into()),
            SearchValue::Text(s) => ("value", s.as_str().into()),
        });
        if let Some(pattern) = mode.pattern(value) {
            params.push(("pattern", pattern.into()));
        }

        let rows = self.read(&cypher_text, &params).await?;
        rows_to_nodes(&rows)
    }

    /// A node by internal id
    pub async fn get_node(&self, id: i64) -> Result<Option<Node>> {
        let cypher_text = cypher::node_by_id();
        let rows = self.read(&cypher_text, &[("id", id.into())]).await?;
        Ok(rows_to_nodes(&rows)?.into_iter().next())
    }

    // ========================================================================
    // Relationships and paths
    // ========================================================================

    /// Every edge incident to a node
    pub async fn find_relationships_by_node(&self, id: i64) -> Result<Vec<Relationship>> {
        let cypher_text = cypher::relationships_by_node();
        let rows = self.read(&cypher_text, &[("id", id.into())]).await?;
        let mut relationships = Vec::with_capacity(rows.len());
        for row in rows {
            let n: RawNode = row.get("n")?;
            let r: RawRelationship = row.get("r")?;
            let m: RawNode = row.get("m")?;
            relationships.push(Relationship::from_row(&n, &r, &m));
        }
        Ok(relationships)
    }

    /// One shortest path between two nodes
    pub async fn shortest_path(&self, from: i64, to: i64, max_length: u32) -> Result<Option<Path>> {
        let cypher_text = cypher::shortest_path(max_length);
        let rows = self
            .read(&cypher_text, &[("from", from.into()), ("to", to.into())])
            .await?;
        Ok(rows_to_paths(&rows)?.first().map(Path::from))
    }

    /// Run a path-returning query and fold the paths into a graph
    pub async fn graph_from_paths(&self, path_query: &str) -> Result<Graph> {
        let cypher_text = cypher::paths_from(path_query);
        let rows = self.read(&cypher_text, &[]).await?;
        Ok(Graph::from_paths(&rows_to_paths(&rows)?))
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Whether the database answers a trivial query
    pub async fn health_check(&self) -> Result<bool> {
        match self.read(cypher::PING, &[]).await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Neo4j health check failed: {:#}", e);
                Ok(false)
            }
        }
    }
}

fn rows_to_nodes(rows: &[Row]) -> Result<Vec<Node>> {
    rows.iter()
        .map(|row| {
            let raw: RawNode = row.get("n").context("Malformed node row")?;
            Ok(Node::from(&raw))
        })
        .collect()
}

fn rows_to_paths(rows: &[Row]) -> Result<Vec<RawPath>> {
    rows.iter()
        .map(|row| row.get::<RawPath>("p").context("Malformed path row"))
        .collect()
}

/// Render query parameters for the debug log
fn describe_params(params: &[(&str, BoltType)]) -> String {
    params
        .iter()
        .map(|(key, value)| match value {
            BoltType::String(s) => format!("{}={:?}", key, s.value),
            BoltType::Integer(i) => format!("{}={}", key, i.value),
            other => format!("{}={:?}", key, other),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
