//! Local evaluation of a backend against a labelled dataset.
//!
//! Not a replacement for a proper evaluation harness; it exists to sanity
//! check rule changes and keep a deterministic baseline.

pub mod dataset;
pub mod metrics;
pub mod report;

pub use dataset::{load_dataset, parse_dataset, parse_expected_labels, EvalRow};
pub use metrics::{compute_metrics, Metrics};
pub use report::render_report;

use tracing::debug;

use crate::error::TriageError;
use crate::ports::triager::Triager;
use crate::schema::TriageOutput;

/// One dataset row paired with the backend's verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalResult {
    /// The input row, including expectations.
    pub row: EvalRow,
    /// What the backend produced.
    pub predicted: TriageOutput,
}

impl EvalResult {
    /// Returns `true` when type and priority both match expectations.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.predicted.issue_type().as_str() == self.row.expected_type
            && self.predicted.priority().as_str() == self.row.expected_priority
    }
}

/// Triages every row in order.
///
/// # Errors
///
/// Stops at the first backend failure and returns it unchanged.
pub async fn evaluate(
    triager: &dyn Triager,
    rows: Vec<EvalRow>,
) -> Result<Vec<EvalResult>, TriageError> {
    let mut results = Vec::with_capacity(rows.len());
    for row in rows {
        debug!(id = %row.id, backend = triager.name(), "triaging dataset row");
        let predicted = triager.triage(&row.title, &row.body).await?;
        results.push(EvalResult { row, predicted });
    }
    Ok(results)
}
