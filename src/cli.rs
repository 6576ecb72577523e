//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Top-level CLI parser for `triage`.
#[derive(Debug, Parser)]
#[command(name = "triage", version, about = "Classify issues into type, priority and labels")]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Triage a single issue and print the JSON verdict.
    Triage {
        /// Issue title.
        #[arg(long)]
        title: String,
        /// Issue body text.
        #[arg(long, default_value = "", conflicts_with = "body_file")]
        body: String,
        /// Read the issue body from a file instead.
        #[arg(long)]
        body_file: Option<PathBuf>,
        /// Backend to use: auto, github, foundry, openai or dummy.
        #[arg(long, default_value = "auto")]
        provider: String,
        /// Pretty-print the JSON.
        #[arg(long)]
        pretty: bool,
    },
    /// Print the JSON Schema of the triage output.
    Schema {
        /// Print on one line.
        #[arg(long)]
        compact: bool,
    },
    /// Score a backend against a labelled CSV dataset.
    Eval {
        /// Dataset path.
        #[arg(long, default_value = "datasets/triage_dataset.csv")]
        dataset: PathBuf,
        /// Backend to evaluate.
        #[arg(long, default_value = "dummy")]
        provider: String,
        /// Write a Markdown report to this path.
        #[arg(long)]
        report: Option<PathBuf>,
    },
}
