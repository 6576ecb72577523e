//! Error taxonomy shared by every triage backend.
//!
//! Remote adapters classify their failures into one of these kinds so the
//! CLI and evaluator only handle a single error surface. No variant ever
//! carries a credential, an authorization header, or a raw response body.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while selecting a backend, triaging an issue, or running
/// the CLI around it.
#[derive(Error, Debug)]
pub enum TriageError {
    /// A required configuration value is missing for the selected provider.
    #[error("{provider} is missing required configuration: {}", .missing.join(", "))]
    Configuration {
        /// Display name of the provider being configured.
        provider: &'static str,
        /// Names of the missing values (never their contents).
        missing: Vec<String>,
    },

    /// The explicit provider override names no known backend.
    #[error(
        "Unsupported TRIAGE_PROVIDER. Use one of: github, foundry, openai, dummy. Got: '{0}'"
    )]
    UnsupportedProvider(String),

    /// The provider could not be reached (DNS, connection, timeout).
    #[error("{provider} request failed due to a network error. {message}")]
    Transport {
        /// Display name of the provider.
        provider: &'static str,
        /// Secret-free description of the failure.
        message: String,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("{provider} request failed: HTTP {status}{}. {hint}", reason_suffix(.reason))]
    ProviderStatus {
        /// Display name of the provider.
        provider: &'static str,
        /// Numeric HTTP status.
        status: u16,
        /// Canonical reason phrase, when known.
        reason: Option<String>,
        /// Actionable hint keyed off the status class.
        hint: String,
    },

    /// The provider answered successfully but the body was not usable.
    #[error("{provider} returned an unexpected response: {message}")]
    ResponseShape {
        /// Display name of the provider.
        provider: &'static str,
        /// What was wrong with the response.
        message: String,
    },

    /// JSON was recovered but does not satisfy the output contract.
    #[error("output failed schema validation: {0}")]
    SchemaValidation(String),

    /// The evaluation dataset could not be read or parsed.
    #[error("dataset error: {0}")]
    Dataset(String),

    /// A local file could not be read or written.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The command line could not be parsed.
    #[error("{0}")]
    Usage(String),
}

impl TriageError {
    /// Process exit code for this error.
    ///
    /// Local file and dataset problems exit with `1`; usage, configuration
    /// and backend failures exit with `2`.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Io { .. } | Self::Dataset(_) => 1,
            _ => 2,
        }
    }

    /// Returns `true` for configuration problems, including an unsupported
    /// provider override.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::UnsupportedProvider(_))
    }
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason.as_deref().map(|r| format!(" ({r})")).unwrap_or_default()
}

impl From<csv::Error> for TriageError {
    fn from(err: csv::Error) -> Self {
        TriageError::Dataset(err.to_string())
    }
}
