//! Triage port: the single classify operation every backend exposes.

use std::future::Future;
use std::pin::Pin;

use crate::error::TriageError;
use crate::schema::TriageOutput;

/// Boxed future type alias used by [`Triager`] to keep the trait dyn-compatible.
pub type TriageFuture<'a> =
    Pin<Box<dyn Future<Output = Result<TriageOutput, TriageError>> + Send + 'a>>;

/// Produces a contract-valid verdict for one issue.
pub trait Triager: Send + Sync {
    /// Short name of the backend, used in logs and reports.
    fn name(&self) -> &'static str;

    /// Triages a single issue.
    ///
    /// # Errors
    ///
    /// Remote backends return a classified [`TriageError`]; the heuristic
    /// backend never fails.
    fn triage<'a>(&'a self, title: &'a str, body: &'a str) -> TriageFuture<'a>;
}
