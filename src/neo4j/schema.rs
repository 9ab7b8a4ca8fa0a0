//! Label namespaces and schema validation
//!
//! Labels and property names cannot be bound as Cypher parameters, so any
//! user-supplied one is checked against what the database reports before it
//! is placed in a query.

use super::models::{LabelName, NAMESPACE_SEPARATOR};

/// Keep the labels belonging to `namespace` and return their bare names,
/// sorted and deduplicated.
///
/// `None` keeps only labels that carry no namespace at all.
pub fn filter_namespace(raw_labels: &[String], namespace: Option<&str>) -> Vec<String> {
    let mut labels: Vec<String> = raw_labels
        .iter()
        .map(|raw| LabelName::parse(raw))
        .filter(|l| l.namespace.as_deref() == namespace)
        .map(|l| l.label)
        .collect();
    labels.sort();
    labels.dedup();
    labels
}

/// Map a requested type name onto a label that exists in the database.
///
/// Accepts the label verbatim, or its bare name inside the configured
/// namespace (`Chemical` → `ns0__Chemical`).
pub fn resolve_label(available: &[String], requested: &str, namespace: Option<&str>) -> Option<String> {
    if requested.is_empty() {
        return None;
    }
    if available.iter().any(|l| l == requested) {
        return Some(requested.to_string());
    }
    let ns = namespace?;
    let qualified = format!("{}{}{}", ns, NAMESPACE_SEPARATOR, requested);
    available.iter().find(|l| **l == qualified).cloned()
}

/// Check a property name against the keys the database knows about
pub fn has_property_key(available: &[String], key: &str) -> bool {
    !key.is_empty() && available.iter().any(|k| k == key)
}

/// Backtick-quote an identifier for use as a label in Cypher
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
