//! `triage eval` command.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::context::ServiceContext;
use crate::error::TriageError;
use crate::eval::{compute_metrics, evaluate, load_dataset, render_report};
use crate::selector::Backend;

/// Evaluates `provider` on `dataset` and returns the summary line.
///
/// When `report` is set, the Markdown report is written there, creating
/// parent directories as needed.
///
/// # Errors
///
/// Returns [`TriageError::Io`] or [`TriageError::Dataset`] for file problems
/// and propagates backend failures.
pub async fn run(
    ctx: &ServiceContext,
    dataset: &Path,
    provider: &str,
    report: Option<&Path>,
) -> Result<String, TriageError> {
    let rows = load_dataset(dataset)?;
    let backend = Backend::from_settings(&ctx.settings_for(provider), ctx.transport.clone())?;
    info!(rows = rows.len(), dataset = %dataset.display(), "evaluating");

    let results = evaluate(&backend, rows).await?;
    let metrics = compute_metrics(&results);

    let mut output = metrics.summary();
    if let Some(path) = report {
        let text = render_report(dataset, &metrics, &results, ctx.clock.now());
        write_report(path, &text)?;
        info!(path = %path.display(), "wrote evaluation report");
        output.push_str(&format!("\nWrote report: {}", path.display()));
    }

    Ok(output)
}

fn write_report(path: &Path, text: &str) -> Result<(), TriageError> {
    let io_err = |source| TriageError::Io { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, text).map_err(io_err)
}
