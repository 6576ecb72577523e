//! Markdown evaluation report.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

use super::{EvalResult, Metrics};

/// How many failing rows are listed.
const MAX_FAILURES: usize = 5;

/// Renders the report for `results`.
#[must_use]
pub fn render_report(
    dataset: &Path,
    metrics: &Metrics,
    results: &[EvalResult],
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Local Evaluation Report\n");
    let _ = writeln!(out, "- Dataset: `{}`", dataset.display());
    let _ = writeln!(out, "- Generated: {}", generated_at.to_rfc3339_opts(SecondsFormat::Secs, true));
    let _ = writeln!(out, "- Samples: {}\n", metrics.n);

    let _ = writeln!(out, "## Metrics\n");
    let _ = writeln!(out, "- Type accuracy: {:.3}", metrics.type_accuracy);
    let _ = writeln!(out, "- Priority accuracy: {:.3}", metrics.priority_accuracy);
    let _ = writeln!(out, "- Label F1: {:.3}\n", metrics.label_f1);

    let _ = writeln!(out, "## Example failures (first {MAX_FAILURES})\n");
    let failures: Vec<&EvalResult> =
        results.iter().filter(|r| !r.is_correct()).take(MAX_FAILURES).collect();
    if failures.is_empty() {
        let _ = writeln!(out, "No failures found.");
    }
    for failure in failures {
        let row = &failure.row;
        let predicted = &failure.predicted;
        let id = if row.id.is_empty() { "(no id)" } else { row.id.as_str() };
        let _ = writeln!(out, "### {id}: {}\n", row.title.trim());
        let _ = writeln!(
            out,
            "- Expected: type={}, priority={}, labels={}",
            row.expected_type, row.expected_priority, row.expected_labels
        );
        let _ = writeln!(
            out,
            "- Predicted: type={}, priority={}, labels={}",
            predicted.issue_type(),
            predicted.priority(),
            predicted.labels().join(", ")
        );
        let _ = writeln!(out, "- Rationale: {}\n", predicted.rationale());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{compute_metrics, EvalRow};
    use crate::schema::{IssueType, Priority, TriageOutput};

    fn at() -> DateTime<Utc> {
        "2025-03-15T14:30:00Z".parse().unwrap()
    }

    fn result(id: &str, expected_type: &str, predicted: IssueType) -> EvalResult {
        EvalResult {
            row: EvalRow {
                id: id.into(),
                title: format!("Issue {id}"),
                expected_type: expected_type.into(),
                expected_priority: "p2".into(),
                ..EvalRow::default()
            },
            predicted: TriageOutput::new(predicted, Priority::P2, ["x"], "Because.").unwrap(),
        }
    }

    #[test]
    fn lists_failures_with_expected_and_predicted() {
        let results = vec![
            result("a", "docs", IssueType::Docs),
            result("b", "bug", IssueType::Feature),
        ];
        let text = render_report(Path::new("data.csv"), &compute_metrics(&results), &results, at());

        assert!(text.starts_with("# Local Evaluation Report\n"));
        assert!(text.contains("- Dataset: `data.csv`"));
        assert!(text.contains("- Generated: 2025-03-15T14:30:00Z"));
        assert!(text.contains("- Samples: 2"));
        assert!(text.contains("- Type accuracy: 0.500"));
        assert!(text.contains("### b: Issue b"));
        assert!(text.contains("- Predicted: type=feature, priority=p2, labels=x"));
        assert!(!text.contains("### a:"));
        assert!(!text.contains("No failures found."));
    }

    #[test]
    fn caps_failures_at_five() {
        let results: Vec<EvalResult> =
            (0..8).map(|i| result(&i.to_string(), "bug", IssueType::Docs)).collect();
        let text = render_report(Path::new("d.csv"), &compute_metrics(&results), &results, at());
        assert_eq!(text.matches("\n### ").count(), 5);
        assert!(text.contains("### 4:"));
        assert!(!text.contains("### 5:"));
    }

    #[test]
    fn says_so_when_everything_passes() {
        let results = vec![result("", "docs", IssueType::Docs)];
        let text = render_report(Path::new("d.csv"), &compute_metrics(&results), &results, at());
        assert!(text.contains("No failures found."));
    }
}
