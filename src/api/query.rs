//! Query string parameters
//!
//! Every parameter is read as an optional string so a missing or malformed
//! one is reported through `AppError` with the usual JSON body, instead of
//! axum's plain-text extractor rejection.

use super::handlers::{parse_node_id, AppError};
use serde::Deserialize;

/// Take a required parameter, treating an empty value as missing
fn required<'a>(name: &str, value: &'a Option<String>) -> Result<&'a str, AppError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::BadRequest(format!(
            "Query parameter '{}' is required",
            name
        ))),
    }
}

/// `?field=&value=` for node searches
#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    pub field: Option<String>,
    pub value: Option<String>,
}

impl SearchQuery {
    /// The property name and the raw search value
    pub fn parts(&self) -> Result<(&str, &str), AppError> {
        Ok((required("field", &self.field)?, required("value", &self.value)?))
    }
}

/// `?fromId=&toId=` for path lookups
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PathQuery {
    pub from_id: Option<String>,
    pub to_id: Option<String>,
}

impl PathQuery {
    pub fn ids(&self) -> Result<(i64, i64), AppError> {
        let from = parse_node_id("fromId", required("fromId", &self.from_id)?)?;
        let to = parse_node_id("toId", required("toId", &self.to_id)?)?;
        Ok((from, to))
    }
}

/// `?assay=&chemList=` for QSAR dataset building
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DatasetQuery {
    pub assay: Option<String>,
    pub chem_list: Option<String>,
}
