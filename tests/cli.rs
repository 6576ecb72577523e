//! Integration tests for top-level CLI behavior.

use std::process::Command;

use triage::schema::{IssueType, Priority, TriageOutput};

/// Runs the binary with an empty environment so no provider credentials
/// leak in from the host.
fn run_triage(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_triage");
    Command::new(bin).args(args).env_clear().output().expect("failed to run triage binary")
}

#[test]
fn dummy_provider_prints_contract_json() {
    let output = run_triage(&[
        "triage",
        "--title",
        "App crashes when saving",
        "--body",
        "Steps to reproduce:\n1. Save\nversion 1.0",
        "--provider",
        "dummy",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let verdict = TriageOutput::parse(stdout.trim()).unwrap();
    assert_eq!(verdict.issue_type(), IssueType::Bug);
    assert_eq!(verdict.priority(), Priority::P1);
    assert_eq!(verdict.labels(), ["bug", "p1"]);
}

#[test]
fn auto_without_credentials_uses_offline_rules() {
    let output = run_triage(&["triage", "--title", "Typo in README", "--pretty"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.starts_with("{\n  \"type\": \"docs\""));
}

#[test]
fn provider_env_var_is_honored() {
    let bin = env!("CARGO_BIN_EXE_triage");
    let output = Command::new(bin)
        .args(["triage", "--title", "x"])
        .env_clear()
        .env("TRIAGE_PROVIDER", "openai")
        .output()
        .expect("failed to run triage binary");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("TRIAGE_OPENAI_API_KEY"));
    assert!(output.stdout.is_empty());
}

#[test]
fn unsupported_provider_exits_with_two() {
    let output = run_triage(&["triage", "--title", "x", "--provider", "anthropic"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("Unsupported TRIAGE_PROVIDER"));
    assert!(stderr.contains("'anthropic'"));
}

#[test]
fn schema_prints_object_schema() {
    let output = run_triage(&["schema"]);
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["properties"]["priority"]["enum"], serde_json::json!(["p0", "p1", "p2"]));
}

#[test]
fn eval_on_bundled_dataset_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("out/report.md");
    let output = run_triage(&["eval", "--report", report.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("type_accuracy="));
    assert!(stdout.contains("(n=12)"));

    let text = std::fs::read_to_string(report).unwrap();
    assert!(text.starts_with("# Local Evaluation Report"));
}

#[test]
fn eval_missing_dataset_exits_with_one() {
    let output = run_triage(&["eval", "--dataset", "does/not/exist.csv"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn missing_title_is_usage_error() {
    let output = run_triage(&["triage"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("--title"));
}

#[test]
fn help_lists_subcommands() {
    let output = run_triage(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("triage"));
    assert!(stdout.contains("schema"));
    assert!(stdout.contains("eval"));
}

#[test]
fn oversized_timeout_falls_back_instead_of_crashing() {
    let bin = env!("CARGO_BIN_EXE_triage");
    let output = Command::new(bin)
        .args(["triage", "--title", "Add export", "--provider", "dummy"])
        .env_clear()
        .env("TRIAGE_TIMEOUT_SECS", "1e20")
        .output()
        .expect("failed to run triage binary");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(TriageOutput::parse(stdout.trim()).unwrap().issue_type(), IssueType::Feature);
}
