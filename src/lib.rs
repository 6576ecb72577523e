//! Core library entry for the `triage` CLI.
//!
//! Classifies issue reports into a type, a priority, a label set and a short
//! rationale, using either a deterministic offline rule engine or a hosted
//! chat-completion model.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod eval;
pub mod ports;
pub mod schema;
pub mod selector;
pub mod telemetry;

use clap::Parser;

use crate::context::ServiceContext;
use crate::error::TriageError;

/// Run the CLI with the provided arguments.
///
/// `--help` and `--version` print and return `Ok`.
///
/// # Errors
///
/// Returns [`TriageError::Usage`] when argument parsing fails and otherwise
/// whatever the command fails with.
pub fn run<I, T>(args: I) -> Result<(), TriageError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(TriageError::Usage(err.to_string().trim_end().to_string())),
    };

    telemetry::init_tracing(cli.log_json, telemetry::level_for_verbosity(cli.verbose));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| TriageError::Usage(format!("failed to start async runtime: {e}")))?;

    let ctx = ServiceContext::live();
    let output = runtime.block_on(commands::dispatch(&cli.command, &ctx))?;
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::error::TriageError;

    #[test]
    fn run_prints_schema() {
        assert!(run(["triage", "schema"]).is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let err = run(["triage", "unknown"]).unwrap_err();
        assert!(matches!(err, TriageError::Usage(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn help_is_not_an_error() {
        assert!(run(["triage", "--help"]).is_ok());
    }
}
