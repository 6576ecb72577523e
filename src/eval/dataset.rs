//! CSV dataset loading.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;

use crate::error::TriageError;

/// One labelled issue.
///
/// Missing columns read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EvalRow {
    /// Row identifier.
    pub id: String,
    /// Issue title.
    pub title: String,
    /// Issue body.
    pub body: String,
    /// Expected type tag.
    pub expected_type: String,
    /// Expected priority tag.
    pub expected_priority: String,
    /// Expected labels: a JSON array or a comma-separated list.
    pub expected_labels: String,
}

impl EvalRow {
    /// Parsed expected label set.
    #[must_use]
    pub fn expected_label_set(&self) -> BTreeSet<String> {
        parse_expected_labels(&self.expected_labels)
    }
}

/// Reads a dataset from `path`.
///
/// # Errors
///
/// Returns [`TriageError::Io`] when the file cannot be opened and
/// [`TriageError::Dataset`] when it is not valid CSV.
pub fn load_dataset(path: &Path) -> Result<Vec<EvalRow>, TriageError> {
    let file =
        File::open(path).map_err(|source| TriageError::Io { path: path.to_path_buf(), source })?;
    parse_dataset(file)
}

/// Reads a dataset from any reader. The first record is the header.
///
/// # Errors
///
/// Returns [`TriageError::Dataset`] for malformed CSV.
pub fn parse_dataset<R: Read>(reader: R) -> Result<Vec<EvalRow>, TriageError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).flexible(true).from_reader(reader);
    let mut rows = Vec::new();
    for record in reader.deserialize::<EvalRow>() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Parses an expected-labels cell.
///
/// Accepts a JSON array (non-string items are stringified) and falls back
/// to a comma-separated list. Blank items are dropped.
#[must_use]
pub fn parse_expected_labels(cell: &str) -> BTreeSet<String> {
    let cell = cell.trim();
    if cell.is_empty() {
        return BTreeSet::new();
    }
    match serde_json::from_str::<serde_json::Value>(cell) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Ok(_) => BTreeSet::new(),
        Err(_) => {
            cell.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
        }
    }
}
