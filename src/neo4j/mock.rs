//! In-memory mock implementation of GraphStore for testing.
//!
//! Holds raw nodes and relationships in `tokio::sync::RwLock` collections and
//! answers every read the way the Cypher in `client.rs` would.
//! Conditionally compiled with `#[cfg(test)]`.

use crate::neo4j::cypher::{MatchMode, SearchValue};
use crate::neo4j::models::*;
use crate::neo4j::traits::GraphStore;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-memory mock implementation of GraphStore for testing.
pub struct MockGraphStore {
    pub nodes: RwLock<BTreeMap<i64, RawNode>>,
    pub relationships: RwLock<Vec<RawRelationship>>,
    /// Paths returned by `graph_from_paths`, whatever the query
    pub paths: RwLock<Vec<RawPath>>,
    /// Every query passed to `graph_from_paths`
    pub path_queries: RwLock<Vec<String>>,
    pub healthy: AtomicBool,
}

impl Default for MockGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGraphStore {
    /// Create a new empty MockGraphStore.
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(BTreeMap::new()),
            relationships: RwLock::new(Vec::new()),
            paths: RwLock::new(Vec::new()),
            path_queries: RwLock::new(Vec::new()),
            healthy: AtomicBool::new(true),
        }
    }

    /// Insert a node; `properties` must be a JSON object
    pub async fn add_node(&self, id: i64, labels: &[&str], properties: Value) {
        let properties = match properties {
            Value::Object(map) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        };
        self.nodes.write().await.insert(
            id,
            RawNode {
                id,
                labels: labels.iter().map(|l| l.to_string()).collect(),
                properties,
            },
        );
    }

    /// Insert a directed relationship
    pub async fn add_relationship(&self, id: i64, start: i64, end: i64, rel_type: &str) {
        self.relationships.write().await.push(RawRelationship {
            id,
            start,
            end,
            rel_type: rel_type.to_string(),
        });
    }

    pub async fn add_path(&self, path: RawPath) {
        self.paths.write().await.push(path);
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

/// Neo4j-style type name of a property value
fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NULL",
        Value::Bool(_) => "BOOLEAN",
        Value::Number(n) if n.is_i64() || n.is_u64() => "INTEGER",
        Value::Number(_) => "FLOAT",
        Value::String(_) => "STRING",
        Value::Array(_) => "LIST",
        Value::Object(_) => "MAP",
    }
}

/// String form of a scalar property, as `toString` renders it; `None` for
/// lists, maps and nulls
fn property_text(prop: &Value) -> Option<String> {
    match prop {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_matches(prop: &Value, value: &SearchValue, mode: MatchMode) -> bool {
    let equal = match value {
        SearchValue::Int(i, _) => prop.as_i64() == Some(*i),
        SearchValue::Text(s) => prop.as_str() == Some(s.as_str()),
    };
    if mode == MatchMode::Exact {
        return equal;
    }
    // Neo4j's `=~` must match the whole string
    let regex_match = mode
        .pattern(value)
        .and_then(|pattern| regex::Regex::new(&format!("^(?:{})$", pattern)).ok())
        .zip(property_text(prop))
        .is_some_and(|(re, text)| re.is_match(&text));
    match mode {
        MatchMode::CaseInsensitive => equal || regex_match,
        _ => regex_match,
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    // ========================================================================
    // Schema introspection
    // ========================================================================

    async fn list_labels(&self) -> Result<Vec<String>> {
        let mut labels: Vec<String> = self
            .nodes
            .read()
            .await
            .values()
            .flat_map(|n| n.labels.iter().cloned())
            .collect();
        labels.sort();
        labels.dedup();
        Ok(labels)
    }

    async fn list_relationship_types(&self) -> Result<Vec<String>> {
        let mut types: Vec<String> = self
            .relationships
            .read()
            .await
            .iter()
            .map(|r| r.rel_type.clone())
            .collect();
        types.sort();
        types.dedup();
        Ok(types)
    }

    async fn list_property_keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self
            .nodes
            .read()
            .await
            .values()
            .flat_map(|n| n.properties.keys().cloned())
            .collect();
        keys.sort();
        keys.dedup();
        Ok(keys)
    }

    async fn node_type_properties(&self, label: &str) -> Result<Vec<NodeTypeProperty>> {
        let nodes = self.nodes.read().await;
        let mut props: BTreeMap<String, &'static str> = BTreeMap::new();
        for node in nodes.values().filter(|n| n.labels.iter().any(|l| l == label)) {
            for (key, value) in &node.properties {
                props.entry(key.clone()).or_insert(value_type_name(value));
            }
        }
        Ok(props
            .into_iter()
            .map(|(property, ty)| NodeTypeProperty {
                property,
                property_type: ty.to_string(),
            })
            .collect())
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
    ) -> Result<Vec<Node>> {
        let nodes = self.nodes.read().await;
        Ok(nodes
            .values()
            .filter(|n| n.labels.iter().any(|l| l == label))
            .filter(|n| {
                n.properties
                    .get(field)
                    .is_some_and(|prop| value_matches(prop, value, mode))
            })
            .map(Node::from)
            .collect())
    }

    async fn get_node(&self, id: i64) -> Result<Option<Node>> {
        Ok(self.nodes.read().await.get(&id).map(Node::from))
    }

    // ========================================================================
    // Relationships and paths
    // ========================================================================

    async fn find_relationships_by_node(&self, id: i64) -> Result<Vec<Relationship>> {
        let nodes = self.nodes.read().await;
        let rels = self.relationships.read().await;

        let Some(n) = nodes.get(&id) else {
            return Ok(Vec::new());
        };

        let mut result = Vec::new();
        for r in rels.iter().filter(|r| r.start == id || r.end == id) {
            let other_id = if r.start == id { r.end } else { r.start };
            if let Some(m) = nodes.get(&other_id) {
                result.push(Relationship::from_row(n, r, m));
            }
        }
        Ok(result)
    }

    async fn shortest_path(&self, from: i64, to: i64, max_length: u32) -> Result<Option<Path>> {
        let nodes = self.nodes.read().await;
        let rels = self.relationships.read().await;

        if from == to || !nodes.contains_key(&from) || !nodes.contains_key(&to) {
            return Ok(None);
        }

        // Undirected breadth-first search, remembering the edge used to reach each node
        let mut reached: HashMap<i64, (i64, usize)> = HashMap::new();
        let mut depth: HashMap<i64, u32> = HashMap::from([(from, 0)]);
        let mut queue = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            if current == to {
                break;
            }
            let d = depth[&current];
            if d >= max_length {
                continue;
            }
            for (idx, r) in rels.iter().enumerate() {
                let next = if r.start == current {
                    r.end
                } else if r.end == current {
                    r.start
                } else {
                    continue;
                };
                if depth.contains_key(&next) {
                    continue;
                }
                depth.insert(next, d + 1);
                reached.insert(next, (current, idx));
                queue.push_back(next);
            }
        }

        if !reached.contains_key(&to) {
            return Ok(None);
        }

        let mut node_ids = vec![to];
        let mut rel_idx = Vec::new();
        let mut cursor = to;
        while let Some(&(prev, idx)) = reached.get(&cursor) {
            rel_idx.push(idx);
            node_ids.push(prev);
            cursor = prev;
        }
        node_ids.reverse();
        rel_idx.reverse();

        let raw = RawPath {
            nodes: node_ids.iter().filter_map(|id| nodes.get(id).cloned()).collect(),
            relationships: rel_idx.iter().map(|&i| rels[i].clone()).collect(),
        };
        Ok(Some(Path::from(&raw)))
    }

    async fn graph_from_paths(&self, path_query: &str) -> Result<Graph> {
        self.path_queries.write().await.push(path_query.to_string());
        Ok(Graph::from_paths(&self.paths.read().await))
    }

    // ========================================================================
    // Health
    // ========================================================================

    async fn health_check(&self) -> Result<bool> {
        Ok(self.healthy.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn chain(len: i64) -> MockGraphStore {
        let store = MockGraphStore::new();
        for id in 0..=len {
            store
                .add_node(id, &["ns0__Gene"], json!({"uri": format!("urn:{}", id)}))
                .await;
        }
        for id in 0..len {
            store.add_relationship(100 + id, id, id + 1, "GENEINTERACTSWITHGENE").await;
        }
        store
    }

    #[tokio::test]
    async fn test_shortest_path_walks_chain() {
        let store = chain(3).await;
        let path = store.shortest_path(0, 3, 10).await.unwrap().unwrap();
        assert_eq!(path.length, 3);
        let ids: Vec<i64> = path.nodes.iter().map(|n| n.node_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_shortest_path_ignores_direction() {
        let store = chain(2).await;
        let path = store.shortest_path(2, 0, 10).await.unwrap().unwrap();
        assert_eq!(path.length, 2);
        assert_eq!(path.relationships[0].rel_id, 101);
    }

    #[tokio::test]
    async fn test_shortest_path_respects_bound() {
        let store = chain(11).await;
        assert!(store.shortest_path(0, 11, 10).await.unwrap().is_none());
        assert!(store.shortest_path(0, 10, 10).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_value_matching_modes() {
        let text = json!("Bisphenol A");
        let num = json!(2099);

        let v = SearchValue::parse("bisphenol a");
        assert!(!value_matches(&text, &v, MatchMode::Exact));
        assert!(value_matches(&text, &v, MatchMode::CaseInsensitive));

        let v = SearchValue::parse("phenol");
        assert!(value_matches(&text, &v, MatchMode::Contains));
        assert!(!value_matches(&text, &v, MatchMode::CaseInsensitive));

        let v = SearchValue::parse("2099");
        assert!(value_matches(&num, &v, MatchMode::Exact));
        assert!(value_matches(&num, &v, MatchMode::CaseInsensitive));
        assert!(!value_matches(&json!("2099"), &v, MatchMode::Exact));
        assert!(value_matches(&json!("2099"), &v, MatchMode::CaseInsensitive));
    }

    #[tokio::test]
    async fn test_regex_modes_use_string_form() {
        // Integers match substrings of their decimal form
        let v = SearchValue::parse("662");
        assert!(value_matches(&json!(6623), &v, MatchMode::Contains));
        assert!(!value_matches(&json!(6623), &v, MatchMode::CaseInsensitive));

        // Leading zeros are kept
        let v = SearchValue::parse("007");
        assert!(value_matches(&json!("Agent 007"), &v, MatchMode::Contains));
        assert!(!value_matches(&json!("Vitamin B7"), &v, MatchMode::Contains));
        assert!(value_matches(&json!("007"), &v, MatchMode::CaseInsensitive));

        // Lists have no string form
        let v = SearchValue::parse("a");
        assert!(!value_matches(&json!(["a"]), &v, MatchMode::Contains));
    }
}
