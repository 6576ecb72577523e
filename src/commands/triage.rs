//! `triage triage` command.

use std::path::Path;

use tracing::debug;

use crate::context::ServiceContext;
use crate::error::TriageError;
use crate::ports::triager::Triager;
use crate::selector::Backend;

/// Reads an issue body from disk.
///
/// # Errors
///
/// Returns [`TriageError::Io`] when the file cannot be read.
pub fn read_body(path: &Path) -> Result<String, TriageError> {
    std::fs::read_to_string(path)
        .map_err(|source| TriageError::Io { path: path.to_path_buf(), source })
}

/// Triages one issue and returns the JSON verdict.
///
/// # Errors
///
/// Propagates selection, configuration and backend errors.
pub async fn run(
    ctx: &ServiceContext,
    title: &str,
    body: &str,
    provider: &str,
    pretty: bool,
) -> Result<String, TriageError> {
    let settings = ctx.settings_for(provider);
    let backend = Backend::from_settings(&settings, ctx.transport.clone())?;
    debug!(backend = backend.name(), title_chars = title.len(), body_chars = body.len(), "triaging");
    let output = backend.triage(title, body).await?;
    Ok(output.to_json(pretty))
}
