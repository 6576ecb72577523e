//! Deterministic, keyword-driven triage backend.
//!
//! Works offline and always returns the same verdict for the same input.
//! Rules are plain substring checks over case-folded text, evaluated in a
//! fixed precedence order.

use std::sync::OnceLock;

use regex::Regex;

use crate::ports::triager::{TriageFuture, Triager};
use crate::schema::{fold_case, IssueType, Priority, TriageOutput};

const BUG_HINTS: &[&str] = &[
    "bug",
    "crash",
    "crashes",
    "exception",
    "traceback",
    "stack trace",
    "segfault",
    "panic",
    "error",
    "fails",
    "failure",
    "broken",
    "doesn't work",
    "does not work",
    "regression",
];

const DOCS_HINTS: &[&str] =
    &["docs", "documentation", "readme", "typo", "spelling", "grammar", "example is wrong"];

const QUESTION_HINTS: &[&str] =
    &["how do i", "how to", "is it possible", "can i", "question", "help"];

const SEVERITY_P0_HINTS: &[&str] = &[
    "security",
    "vulnerability",
    "data loss",
    "lost data",
    "rce",
    "remote code execution",
    "crash on startup",
    "cannot start",
    "unusable",
    "blocks",
    "blocking",
    "urgent",
    "p0",
];

const REPRO_MARKERS: &[&str] =
    &["steps to reproduce", "reproduce", "repro", "minimal reproduction", "mre"];

const GOOD_FIRST_ISSUE_HINTS: &[&str] = &["typo", "spelling", "grammar"];

const ENHANCEMENT_HINTS: &[&str] = &["support", "add", "implement"];

const ENV_INFO_HINTS: &[&str] = &["version", "commit"];

/// Questions with a shorter body than this get `needs-info`.
const MIN_QUESTION_BODY_CHARS: usize = 120;

fn numbered_step() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n\s*\d+\.").expect("numbered step pattern is valid"))
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// Case-folded views of one issue.
struct Folded {
    title: String,
    body: String,
    joint: String,
}

impl Folded {
    fn new(title: &str, body: &str) -> Self {
        let title = fold_case(title.trim());
        let body = fold_case(body.trim());
        let joint = format!("{title}\n{body}");
        Self { title, body, joint }
    }

    fn either_contains(&self, needles: &[&str]) -> bool {
        contains_any(&self.title, needles) || contains_any(&self.body, needles)
    }
}

/// The offline rule-based triager.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTriager;

impl HeuristicTriager {
    /// Creates the triager.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Classifies one issue. Never fails; blank inputs yield `feature`/`p2`.
    #[must_use]
    pub fn classify(&self, title: &str, body: &str) -> TriageOutput {
        let text = Folded::new(title, body);

        let issue_type = classify_type(&text);
        let priority = classify_priority(issue_type, &text.joint);
        let has_repro = has_repro_steps(&text.body);
        let labels = suggest_labels(issue_type, priority, has_repro, &text, body.trim());
        let rationale = build_rationale(issue_type, priority, has_repro);

        TriageOutput::with_fixed_rationale(issue_type, priority, labels, rationale)
    }
}

impl Triager for HeuristicTriager {
    fn name(&self) -> &'static str {
        "dummy"
    }

    fn triage<'a>(&'a self, title: &'a str, body: &'a str) -> TriageFuture<'a> {
        let output = self.classify(title, body);
        Box::pin(async move { Ok(output) })
    }
}

fn classify_type(text: &Folded) -> IssueType {
    // Docs reports often mention unrelated words, so they are checked first.
    if text.either_contains(DOCS_HINTS) {
        return IssueType::Docs;
    }
    if text.either_contains(QUESTION_HINTS) {
        // An explicit bug cue overrides question phrasing.
        if text.either_contains(BUG_HINTS) {
            return IssueType::Bug;
        }
        return IssueType::Question;
    }
    if text.either_contains(BUG_HINTS) {
        return IssueType::Bug;
    }
    IssueType::Feature
}

fn classify_priority(issue_type: IssueType, joint: &str) -> Priority {
    if contains_any(joint, SEVERITY_P0_HINTS) {
        return Priority::P0;
    }
    if issue_type == IssueType::Bug {
        return Priority::P1;
    }
    Priority::P2
}

fn has_repro_steps(body: &str) -> bool {
    contains_any(body, REPRO_MARKERS) || numbered_step().is_match(body)
}

fn suggest_labels(
    issue_type: IssueType,
    priority: Priority,
    has_repro: bool,
    text: &Folded,
    trimmed_body: &str,
) -> Vec<&'static str> {
    let mut labels = vec![issue_type.as_str(), priority.as_str()];

    match issue_type {
        IssueType::Bug => {
            if !has_repro {
                labels.push("needs-repro");
            }
            if !contains_any(&text.body, ENV_INFO_HINTS) {
                labels.push("needs-env-info");
            }
        }
        IssueType::Question => {
            if trimmed_body.chars().count() < MIN_QUESTION_BODY_CHARS {
                labels.push("needs-info");
            }
        }
        IssueType::Docs => {
            if contains_any(&text.body, GOOD_FIRST_ISSUE_HINTS) {
                labels.push("good-first-issue");
            }
        }
        IssueType::Feature => {
            if priority == Priority::P2 && contains_any(&text.title, ENHANCEMENT_HINTS) {
                labels.push("enhancement");
            }
        }
    }

    labels
}

fn build_rationale(issue_type: IssueType, priority: Priority, has_repro: bool) -> String {
    let mut parts = vec![format!("Classified as '{issue_type}' based on the title/body wording.")];
    parts.push(
        match priority {
            Priority::P0 => "Marked p0 due to severe/urgent keywords.",
            Priority::P1 => "Marked p1 because bug reports are typically high priority.",
            Priority::P2 => "Marked p2 as default for non-urgent items.",
        }
        .to_string(),
    );
    if issue_type == IssueType::Bug && !has_repro {
        parts.push("No clear reproduction steps were detected.".to_string());
    }
    parts.join(" ")
}
