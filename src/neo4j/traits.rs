//! GraphStore trait definition
//!
//! Defines the abstract interface for the read operations the API needs.
//! `Neo4jClient` implements it against a live database; the in-memory
//! `MockGraphStore` implements it for tests.

use crate::neo4j::cypher::{MatchMode, SearchValue};
use crate::neo4j::models::*;
use anyhow::Result;
use async_trait::async_trait;

/// Abstract interface for all graph database reads.
///
/// Labels passed in must already be resolved against [`GraphStore::list_labels`].
#[async_trait]
pub trait GraphStore: Send + Sync {
    // ========================================================================
    // Schema introspection
    // ========================================================================

    /// All node labels, as stored (namespaced)
    async fn list_labels(&self) -> Result<Vec<String>>;

    /// All relationship types, as stored (namespaced)
    async fn list_relationship_types(&self) -> Result<Vec<String>>;

    /// All property keys in use
    async fn list_property_keys(&self) -> Result<Vec<String>>;

    /// Properties and their types for one node label (empty if unknown)
    async fn node_type_properties(&self, label: &str) -> Result<Vec<NodeTypeProperty>>;

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Nodes of `label` whose `field` matches `value` under `mode`
    async fn find_nodes(
        &self,
        label: &str,
        field: &str,
        value: &SearchValue,
        mode: MatchMode,
    ) -> Result<Vec<Node>>;

    /// A node by internal id
    async fn get_node(&self, id: i64) -> Result<Option<Node>>;

    // ========================================================================
    // Relationships and paths
    // ========================================================================

    /// Every edge incident to a node, in either direction
    async fn find_relationships_by_node(&self, id: i64) -> Result<Vec<Relationship>>;

    /// One shortest path of length `1..=max_length` between two nodes
    async fn shortest_path(&self, from: i64, to: i64, max_length: u32) -> Result<Option<Path>>;

    /// Run a query returning paths in column `p` and fold them into a graph
    async fn graph_from_paths(&self, path_query: &str) -> Result<Graph>;

    // ========================================================================
    // Health
    // ========================================================================

    /// Whether the database answers a trivial query
    async fn health_check(&self) -> Result<bool>;
}
