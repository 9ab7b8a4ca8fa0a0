//! QSAR dataset building through the Python dataset script

use super::{run_capped, ToolError};
use crate::QsarConfig;
use serde_json::Value;

/// Runner for the dataset-building script
#[derive(Debug, Clone)]
pub struct QsarDatasetBuilder {
    interpreter: String,
    script_path: String,
    max_output_bytes: usize,
}

impl QsarDatasetBuilder {
    pub fn new(config: &QsarConfig) -> Self {
        Self {
            interpreter: config.interpreter.clone(),
            script_path: config.script_path.clone(),
            max_output_bytes: config.max_output_bytes,
        }
    }

    /// Arguments passed to the interpreter, script path first
    pub fn command_args(&self, assay: &str, chem_list: Option<&str>) -> Vec<String> {
        let mut args = vec![
            self.script_path.clone(),
            "--assay-abbrev".to_string(),
            assay.to_string(),
        ];
        if let Some(list) = chem_list.filter(|l| !l.trim().is_empty()) {
            args.push("--chem-list".to_string());
            args.push(list.to_string());
        }
        args
    }

    /// Build a dataset for an assay, optionally restricted to a chemical list
    pub async fn run(&self, assay: &str, chem_list: Option<&str>) -> Result<Value, ToolError> {
        if assay.trim().is_empty() {
            return Err(ToolError::InvalidInput(
                "Query parameter 'assay' is required".to_string(),
            ));
        }

        let args = self.command_args(assay, chem_list);
        tracing::debug!(interpreter = %self.interpreter, ?args, "Running QSAR dataset script");

        let stdout = run_capped(&self.interpreter, &args, self.max_output_bytes).await?;
        parse_output(&stdout).ok_or_else(|| ToolError::Output {
            program: self.script_path.clone(),
            reason: "no JSON document on stdout".to_string(),
        })
    }
}

/// The first stdout line that parses as JSON.
///
/// The script may print progress text before its result.
pub fn parse_output(stdout: &str) -> Option<Value> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find_map(|line| serde_json::from_str(line).ok())
}
