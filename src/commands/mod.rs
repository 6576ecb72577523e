//! Command dispatch and handlers.
//!
//! Handlers return the text destined for stdout; the caller prints it.

pub mod eval;
pub mod schema;
pub mod triage;

use crate::cli::Command;
use crate::context::ServiceContext;
use crate::error::TriageError;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns whatever the selected handler fails with.
pub async fn dispatch(command: &Command, ctx: &ServiceContext) -> Result<String, TriageError> {
    match command {
        Command::Triage { title, body, body_file, provider, pretty } => {
            let body = match body_file {
                Some(path) => triage::read_body(path)?,
                None => body.clone(),
            };
            triage::run(ctx, title, &body, provider, *pretty).await
        }
        Command::Schema { compact } => Ok(schema::run(*compact)),
        Command::Eval { dataset, provider, report } => {
            eval::run(ctx, dataset, provider, report.as_deref()).await
        }
    }
}
