//! Graph view models for the ComptoxAI knowledge graph
//!
//! Two layers live here:
//! - raw record shapes (`RawNode`, `RawRelationship`, `RawPath`) that the
//!   Cypher layer projects every result into, and
//! - the stable view shapes returned by the API (`Node`, `Relationship`,
//!   `Path`, `Graph`, `NodeType`, `RelationshipType`).
//!
//! Every view is built by one pure function from its raw shape, so none of
//! this depends on driver runtime types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// Properties whose key starts with this prefix are external identifiers.
pub const XREF_PREFIX: &str = "xref";

/// Separator between namespace and type in a label (`ns0__Chemical`).
pub const NAMESPACE_SEPARATOR: &str = "__";

/// Label neosemantics puts on every imported node alongside its typed label
pub const RESOURCE_LABEL: &str = "Resource";

const COMMON_NAME_KEY: &str = "commonName";
const URI_KEY: &str = "uri";

// ============================================================================
// Raw record shapes
// ============================================================================

/// A graph node as projected by Cypher:
/// `{id: id(n), labels: labels(n), properties: properties(n)}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: i64,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

/// A relationship as projected by Cypher:
/// `{id: id(r), start: id(startNode(r)), end: id(endNode(r)), type: type(r)}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRelationship {
    pub id: i64,
    pub start: i64,
    pub end: i64,
    #[serde(rename = "type")]
    pub rel_type: String,
}

/// A path as projected by Cypher:
/// `{nodes: [..RawNode], relationships: [..RawRelationship]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPath {
    pub nodes: Vec<RawNode>,
    pub relationships: Vec<RawRelationship>,
}

impl RawNode {
    /// The `uri` property, if the node has a string one
    pub fn uri(&self) -> Option<&str> {
        self.properties.get(URI_KEY).and_then(Value::as_str)
    }

    /// The label naming the node's type.
    ///
    /// Label order is not stable in Neo4j, so a namespaced label wins, then
    /// any label other than `Resource`, then whatever comes first.
    pub fn type_label(&self) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.contains(NAMESPACE_SEPARATOR))
            .or_else(|| self.labels.iter().find(|l| *l != RESOURCE_LABEL))
            .or_else(|| self.labels.first())
            .map(String::as_str)
    }
}

// ============================================================================
// Label types
// ============================================================================

/// A label split into its namespace and type components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelName {
    pub namespace: Option<String>,
    pub label: String,
}

/// A node label, e.g. `ns0__Chemical` → `{namespace: "ns0", label: "Chemical"}`
pub type NodeType = LabelName;

/// A relationship type, split the same way as node labels
pub type RelationshipType = LabelName;

impl LabelName {
    /// Split a raw label on the namespace separator.
    ///
    /// The label is the last segment; the namespace is the first segment
    /// when there is more than one.
    pub fn parse(raw: &str) -> Self {
        let parts: Vec<&str> = raw.split(NAMESPACE_SEPARATOR).collect();
        let label = parts.last().copied().unwrap_or_default().to_string();
        let namespace = if parts.len() > 1 {
            Some(parts[0].to_string())
        } else {
            None
        };
        Self { namespace, label }
    }
}

// ============================================================================
// Node view
// ============================================================================

/// One non-identifier property of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFeature {
    pub feat_type: String,
    pub feat_value: Value,
}

/// One external identifier (`xref*` property) of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeIdentifier {
    pub id_type: String,
    pub id_value: Value,
}

/// A node as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub node_id: i64,
    pub node_type: Option<String>,
    pub common_name: Option<String>,
    pub node_features: Vec<NodeFeature>,
    pub identifiers: Vec<NodeIdentifier>,
    #[serde(rename = "ontologyIRI")]
    pub ontology_iri: Option<String>,
}

impl From<&RawNode> for Node {
    fn from(raw: &RawNode) -> Self {
        let mut node_features = Vec::new();
        let mut identifiers = Vec::new();

        for (key, value) in &raw.properties {
            if key.starts_with(XREF_PREFIX) {
                identifiers.push(NodeIdentifier {
                    id_type: key.clone(),
                    id_value: value.clone(),
                });
            } else {
                node_features.push(NodeFeature {
                    feat_type: key.clone(),
                    feat_value: value.clone(),
                });
            }
        }

        let common_name = raw.properties.get(COMMON_NAME_KEY).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });

        Self {
            node_id: raw.id,
            node_type: raw.type_label().map(|l| LabelName::parse(l).label),
            common_name,
            node_features,
            identifiers,
            ontology_iri: raw.uri().map(str::to_string),
        }
    }
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        Node::from(&raw)
    }
}

// ============================================================================
// Relationship view
// ============================================================================

/// A directed edge between two nodes returned in the same row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub from_node: Node,
    pub to_node: Node,
    pub from_id: i64,
    pub to_id: i64,
    pub rel_id: i64,
    pub rel_type: String,
}

impl Relationship {
    /// Build from the `n`, `r`, `m` columns of one row.
    ///
    /// `fromNode`/`toNode` follow the edge direction, not the column order,
    /// so an incoming edge of `n` has `n` as its `toNode`.
    pub fn from_row(n: &RawNode, r: &RawRelationship, m: &RawNode) -> Self {
        let (from, to) = if r.start == n.id { (n, m) } else { (m, n) };
        Self {
            from_node: Node::from(from),
            to_node: Node::from(to),
            from_id: r.start,
            to_id: r.end,
            rel_id: r.id,
            rel_type: r.rel_type.clone(),
        }
    }
}

/// An edge inside a path or graph, without the embedded endpoint nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub rel_id: i64,
    pub from_id: i64,
    pub to_id: i64,
    pub rel_type: String,
}

impl From<&RawRelationship> for Edge {
    fn from(raw: &RawRelationship) -> Self {
        Self {
            rel_id: raw.id,
            from_id: raw.start,
            to_id: raw.end,
            rel_type: raw.rel_type.clone(),
        }
    }
}

// ============================================================================
// Path and Graph views
// ============================================================================

/// An ordered path; `relationships[i]` links `nodes[i]` and `nodes[i + 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub nodes: Vec<Node>,
    pub relationships: Vec<Edge>,
    pub length: usize,
}

impl From<&RawPath> for Path {
    fn from(raw: &RawPath) -> Self {
        Self {
            nodes: raw.nodes.iter().map(Node::from).collect(),
            relationships: raw.relationships.iter().map(Edge::from).collect(),
            length: raw.relationships.len(),
        }
    }
}

/// Deduplicated nodes and relationships assembled from a set of paths
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub relationships: Vec<Edge>,
}

/// Identity used to deduplicate graph nodes: the URI when present
#[derive(Hash, PartialEq, Eq)]
enum NodeKey {
    Uri(String),
    Id(i64),
}

impl Graph {
    /// Fold paths into a graph.
    ///
    /// Relationships are unique by id, nodes by `uri` (node id when a node
    /// has no uri). First occurrence wins.
    pub fn from_paths(paths: &[RawPath]) -> Self {
        let mut seen_rels = HashSet::new();
        let mut seen_nodes = HashSet::new();
        let mut graph = Graph::default();

        for path in paths {
            for rel in &path.relationships {
                if seen_rels.insert(rel.id) {
                    graph.relationships.push(Edge::from(rel));
                }
            }
            for node in &path.nodes {
                let key = match node.uri() {
                    Some(uri) => NodeKey::Uri(uri.to_string()),
                    None => NodeKey::Id(node.id),
                };
                if seen_nodes.insert(key) {
                    graph.nodes.push(Node::from(node));
                }
            }
        }

        graph
    }
}

// ============================================================================
// Schema metadata
// ============================================================================

/// One property of a node label as reported by schema introspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTypeProperty {
    pub property: String,
    #[serde(rename = "type")]
    pub property_type: String,
}
