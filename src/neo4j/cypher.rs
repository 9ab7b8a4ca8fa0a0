//! Cypher text for the read queries
//!
//! Every node, relationship and path is projected into a plain map so rows
//! deserialize straight into the raw record shapes in [`super::models`].
//! Values are always bound as parameters. The only identifier spliced into a
//! query is a node label, and only after it has been validated and quoted
//! (see [`super::schema`]).

use super::schema::quote_identifier;

/// Upper bound on the length of a shortest path search
pub const MAX_PATH_LENGTH: u32 = 10;

pub const LIST_LABELS: &str = "CALL db.labels() YIELD label RETURN label";

pub const LIST_RELATIONSHIP_TYPES: &str =
    "CALL db.relationshipTypes() YIELD relationshipType RETURN relationshipType";

pub const LIST_PROPERTY_KEYS: &str = "CALL db.propertyKeys() YIELD propertyKey RETURN propertyKey";

/// Properties of one node label from APOC schema metadata (`$label`),
/// one `{property, type}` map per row in column `prop`
pub const NODE_TYPE_PROPERTIES: &str = r#"
CALL apoc.meta.schema() YIELD value AS schemaMap
UNWIND keys(schemaMap) AS label
WITH label, schemaMap[label] AS data
WHERE data.type = "node" AND label = $label
UNWIND keys(data.properties) AS property
WITH property, data.properties[property] AS propData
RETURN {property: property, type: propData.type} AS prop
ORDER BY property
"#;

pub const PING: &str = "RETURN 1 AS ping";

/// String form of `n[$field]` for regex matching.
///
/// Scalars go through `toString`; lists, maps and nulls become null so the
/// row is dropped instead of `toString` raising an error.
const FIELD_TEXT: &str = "CASE WHEN apoc.meta.cypher.type(n[$field]) IN ['STRING', 'INTEGER', 'FLOAT', 'BOOLEAN'] THEN toString(n[$field]) END";

/// How a search value is compared with a node property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Equality with the (possibly integer-coerced) value
    Exact,
    /// Whole-value, case-insensitive match on the property's string form;
    /// numbers also match by equality
    CaseInsensitive,
    /// The value appears anywhere in the property's string form (case-sensitive)
    Contains,
}

/// A search value as it is sent to the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchValue {
    /// Integer form for `$value`, and the trimmed text it was parsed from
    Int(i64, String),
    Text(String),
}

impl SearchValue {
    /// Values that parse entirely as a base-10 integer are sent as integers
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(i) => SearchValue::Int(i, trimmed.to_string()),
            Err(_) => SearchValue::Text(raw.to_string()),
        }
    }

    /// The text the user sent, used to build regex patterns.
    ///
    /// Never the re-rendered integer: `007` stays `007`.
    pub fn as_text(&self) -> &str {
        match self {
            SearchValue::Int(_, text) | SearchValue::Text(text) => text,
        }
    }
}

impl MatchMode {
    /// Regex bound to `$pattern`, or `None` for exact matching.
    ///
    /// The user value is escaped so it is matched literally. Neo4j regexes
    /// match the whole string.
    pub fn pattern(&self, value: &SearchValue) -> Option<String> {
        let escaped = regex::escape(value.as_text());
        match self {
            MatchMode::Exact => None,
            MatchMode::CaseInsensitive => Some(format!("(?iu){}", escaped)),
            MatchMode::Contains => Some(format!("(?s).*{}.*", escaped)),
        }
    }

    fn condition(&self) -> String {
        match self {
            MatchMode::Exact => "n[$field] = $value".to_string(),
            MatchMode::CaseInsensitive => {
                format!("n[$field] = $value OR {} =~ $pattern", FIELD_TEXT)
            }
            MatchMode::Contains => format!("{} =~ $pattern", FIELD_TEXT),
        }
    }
}

/// `{id, labels, properties}` map for node variable `var`
pub fn node_projection(var: &str) -> String {
    format!(
        "{{id: id({0}), labels: labels({0}), properties: properties({0})}}",
        var
    )
}

/// `{id, start, end, type}` map for relationship variable `var`
pub fn relationship_projection(var: &str) -> String {
    format!(
        "{{id: id({0}), start: id(startNode({0})), end: id(endNode({0})), type: type({0})}}",
        var
    )
}

/// `{nodes, relationships}` map for path variable `var`
pub fn path_projection(var: &str) -> String {
    format!(
        "{{nodes: [x IN nodes({0}) | {1}], relationships: [y IN relationships({0}) | {2}]}}",
        var,
        node_projection("x"),
        relationship_projection("y")
    )
}

/// Nodes of a validated `label` whose `$field` matches `$value`/`$pattern`
pub fn find_nodes(label: &str, mode: MatchMode) -> String {
    format!(
        "MATCH (n:{}) WHERE {} RETURN {} AS n",
        quote_identifier(label),
        mode.condition(),
        node_projection("n")
    )
}

/// A single node by internal id (`$id`)
pub fn node_by_id() -> String {
    format!("MATCH (n) WHERE id(n) = $id RETURN {} AS n", node_projection("n"))
}

/// Every edge incident to the node with internal id `$id`
pub fn relationships_by_node() -> String {
    format!(
        "MATCH (n)-[r]-(m) WHERE id(n) = $id RETURN {} AS n, {} AS r, {} AS m",
        node_projection("n"),
        relationship_projection("r"),
        node_projection("m")
    )
}

/// One shortest path of length `1..=max_length` between `$from` and `$to`
pub fn shortest_path(max_length: u32) -> String {
    format!(
        "MATCH (n), (m) WHERE id(n) = $from AND id(m) = $to AND id(n) <> id(m) \
         MATCH p = shortestPath((n)-[*1..{}]-(m)) \
         RETURN {} AS p LIMIT 1",
        max_length,
        path_projection("p")
    )
}

/// Wrap a query that returns paths in column `p` so each path is projected
pub fn paths_from(inner: &str) -> String {
    let inner = inner.trim().trim_end_matches(';');
    format!("CALL {{ {} }} RETURN {} AS p", inner, path_projection("p"))
}
