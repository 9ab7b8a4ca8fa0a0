//! `GraphStore` implementation for `Neo4jClient`.
//!
//! Every method simply delegates to the corresponding inherent method on `Neo4jClient`.

use async_trait::async_trait;

use super::client::Neo4jClient;
use super::cypher::{MatchMode, SearchValue};
use super::models::*;
use super::traits::GraphStore;

#[async_trait]
impl GraphStore for Neo4jClient {
    // ========================================================================
    // Schema introspection
    // ========================================================================

    async fn list_labels(&self) -> anyhow::Result<Vec<String>> {
        self.list_labels().await
    }

    async fn list_relationship_types(&self) -> anyhow::Result<Vec<String>> {
        self.list_relationship_types().await
    }

    async fn list_property_keys(&self) -> anyhow::Result<Vec<String>> {
        self.list_property_keys().await
    }

    async fn node_type_properties(&self, label: &str) -> anyhow::Result<Vec<NodeTypeProperty>> {
        self.node_type_properties(label).await
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    async fn find_nodes(
        &self,
        label: &str,
        field: &str,
        value: &SearchValue,
        mode: MatchMode,
    ) -> anyhow::Result<Vec<Node>> {
        self.find_nodes(label, field, value, mode).await
    }

    async fn get_node(&self, id: i64) -> anyhow::Result<Option<Node>> {
        self.get_node(id).await
    }

    // ========================================================================
    // Relationships and paths
    // ========================================================================

    async fn find_relationships_by_node(&self, id: i64) -> anyhow::Result<Vec<Relationship>> {
        self.find_relationships_by_node(id).await
    }

    async fn shortest_path(
        &self,
        from: i64,
        to: i64,
        max_length: u32,
    ) -> anyhow::Result<Option<Path>> {
        self.shortest_path(from, to, max_length).await
    }

    async fn graph_from_paths(&self, path_query: &str) -> anyhow::Result<Graph> {
        self.graph_from_paths(path_query).await
    }

    // ========================================================================
    // Health
    // ========================================================================

    async fn health_check(&self) -> anyhow::Result<bool> {
        self.health_check().await
    }
}
