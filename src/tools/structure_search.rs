//! Chemical structure search through an external CLI binary
//!
//! The query molecule is written to a temporary `.mol` file, the binary is
//! run as `<binary> -q <file> -f cml -t:i <database>`, and the CML it prints
//! is reduced to one `{title: value}` map per matched molecule.

use super::{run_capped, ToolError};
use crate::StructureSearchConfig;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Properties of one matched molecule, keyed by CML property title
pub type Molecule = BTreeMap<String, String>;

/// Runner for the structure-search binary
#[derive(Debug, Clone)]
pub struct StructureSearch {
    binary: String,
    database: String,
    max_output_bytes: usize,
}

impl StructureSearch {
    pub fn new(config: &StructureSearchConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            database: config.database.clone(),
            max_output_bytes: config.max_output_bytes,
        }
    }

    /// Arguments passed to the binary for a query file
    pub fn command_args(&self, query_file: &Path) -> Vec<String> {
        vec![
            "-q".to_string(),
            query_file.display().to_string(),
            "-f".to_string(),
            "cml".to_string(),
            "-t:i".to_string(),
            self.database.clone(),
        ]
    }

    /// Search the database for molecules matching a MOL document
    pub async fn run(&self, mol: &str) -> Result<Vec<Molecule>, ToolError> {
        if mol.trim().is_empty() {
            return Err(ToolError::InvalidInput(
                "Request body must contain a molecule file".to_string(),
            ));
        }

        // Removed when `query_file` is dropped
        let mut query_file = tempfile::Builder::new().suffix(".mol").tempfile()?;
        query_file.write_all(mol.as_bytes())?;
        query_file.flush()?;

        let args = self.command_args(query_file.path());
        tracing::debug!(binary = %self.binary, ?args, "Running structure search");

        let stdout = run_capped(&self.binary, &args, self.max_output_bytes).await?;
        parse_cml(&stdout).map_err(|reason| ToolError::Output {
            program: self.binary.clone(),
            reason,
        })
    }
}

fn title_of(element: &BytesStart<'_>) -> Result<Option<String>, String> {
    match element.try_get_attribute("title").map_err(|e| e.to_string())? {
        Some(attr) => Ok(Some(
            attr.unescape_value().map_err(|e| e.to_string())?.into_owned(),
        )),
        None => Ok(None),
    }
}

/// Reduce a CML document to one property map per `<molecule>`.
///
/// Each `<property title="...">` contributes its first `<scalar>` value.
pub fn parse_cml(xml: &str) -> Result<Vec<Molecule>, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut molecules = Vec::new();
    let mut current: Option<Molecule> = None;
    let mut title: Option<String> = None;
    let mut scalar: Option<String> = None;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"molecule" => current = Some(Molecule::new()),
                b"property" => title = title_of(&e)?,
                b"scalar" => scalar = Some(String::new()),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"molecule" => molecules.push(Molecule::new()),
                b"scalar" => {
                    if let (Some(mol), Some(key)) = (current.as_mut(), title.as_ref()) {
                        mol.entry(key.clone()).or_default();
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                if let Some(text) = scalar.as_mut() {
                    text.push_str(&t.unescape().map_err(|e| e.to_string())?);
                }
            }
            Event::CData(c) => {
                if let Some(text) = scalar.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"molecule" => {
                    if let Some(mol) = current.take() {
                        molecules.push(mol);
                    }
                }
                b"property" => title = None,
                b"scalar" => {
                    let text = scalar.take().unwrap_or_default();
                    if let (Some(mol), Some(key)) = (current.as_mut(), title.as_ref()) {
                        mol.entry(key.clone()).or_insert(text);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(molecules)
}
