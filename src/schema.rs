//! The triage output contract.
//!
//! [`TriageOutput`] is the single result shape every backend must produce.
//! Both constructors (`TriageOutput::new` and `Deserialize`) run label
//! normalization and rationale validation, so a value that exists is always
//! valid.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::TriageError;

/// High-level classification of an issue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    /// Something is broken.
    Bug,
    /// A request for new behavior.
    #[default]
    Feature,
    /// Documentation problem.
    Docs,
    /// A usage question.
    Question,
}

impl IssueType {
    /// All variants, in declaration order.
    pub const ALL: [IssueType; 4] =
        [IssueType::Bug, IssueType::Feature, IssueType::Docs, IssueType::Question];

    /// The wire tag for this type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IssueType::Bug => "bug",
            IssueType::Feature => "feature",
            IssueType::Docs => "docs",
            IssueType::Question => "question",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage priority. `P0` is the most urgent tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Urgent, blocking or severe.
    P0,
    /// Important but not immediately blocking.
    P1,
    /// Backlog.
    #[default]
    P2,
}

impl Priority {
    /// All variants, most urgent first.
    pub const ALL: [Priority; 3] = [Priority::P0, Priority::P1, Priority::P2];

    /// The wire tag for this priority.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::P0 => "p0",
            Priority::P1 => "p1",
            Priority::P2 => "p2",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated triage verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTriageOutput")]
pub struct TriageOutput {
    #[serde(rename = "type")]
    issue_type: IssueType,
    priority: Priority,
    labels: Vec<String>,
    rationale: String,
}

/// Unvalidated wire form; converted through [`TriageOutput::new`].
#[derive(Deserialize)]
struct RawTriageOutput {
    #[serde(rename = "type")]
    issue_type: IssueType,
    priority: Priority,
    #[serde(default)]
    labels: Vec<String>,
    rationale: String,
}

impl TryFrom<RawTriageOutput> for TriageOutput {
    type Error = TriageError;

    fn try_from(raw: RawTriageOutput) -> Result<Self, Self::Error> {
        TriageOutput::new(raw.issue_type, raw.priority, raw.labels, raw.rationale)
    }
}

impl TriageOutput {
    /// Builds a verdict, normalizing `labels`.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::SchemaValidation`] when `rationale` is blank.
    pub fn new<I, S>(
        issue_type: IssueType,
        priority: Priority,
        labels: I,
        rationale: impl Into<String>,
    ) -> Result<Self, TriageError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rationale = rationale.into();
        if rationale.trim().is_empty() {
            return Err(TriageError::SchemaValidation("rationale must not be empty".into()));
        }
        Ok(Self { issue_type, priority, labels: normalize_labels(labels), rationale })
    }

    /// Builds a verdict whose rationale is known to be non-blank.
    pub(crate) fn with_fixed_rationale<I, S>(
        issue_type: IssueType,
        priority: Priority,
        labels: I,
        rationale: String,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        debug_assert!(!rationale.trim().is_empty());
        Self { issue_type, priority, labels: normalize_labels(labels), rationale }
    }

    /// Primary classification.
    #[must_use]
    pub fn issue_type(&self) -> IssueType {
        self.issue_type
    }

    /// Triage priority.
    #[must_use]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Normalized labels, in first-occurrence order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns `true` if `label` is present (exact match).
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Short explanation of the verdict.
    #[must_use]
    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    /// Serializes to JSON text; `pretty` uses two-space indentation.
    #[must_use]
    pub fn to_json(&self, pretty: bool) -> String {
        let result =
            if pretty { serde_json::to_string_pretty(self) } else { serde_json::to_string(self) };
        // Only strings and unit enums are serialized; this cannot fail.
        result.unwrap_or_default()
    }

    /// Parses and validates JSON text against the contract.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::SchemaValidation`] for malformed JSON, missing
    /// required fields, values outside the enumerations, or a blank rationale.
    pub fn parse(text: &str) -> Result<Self, TriageError> {
        serde_json::from_str(text).map_err(|e| TriageError::SchemaValidation(e.to_string()))
    }
}

/// Full case folding: `"Straße"` and `"STRASSE"` both fold to `"strasse"`.
///
/// Upper-casing first applies the multi-character mappings (`ß` to `SS`,
/// ligatures) that plain lowercasing leaves alone.
#[must_use]
pub fn fold_case(text: &str) -> String {
    text.to_uppercase().to_lowercase()
}

/// Trims labels, drops blanks and removes duplicates under [`fold_case`].
///
/// The first occurrence of each label wins and keeps its (trimmed) casing;
/// relative order is preserved. Idempotent.
pub fn normalize_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for label in labels {
        let trimmed = label.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(fold_case(trimmed)) {
            out.push(trimmed.to_string());
        }
    }
    out
}

/// JSON Schema document describing [`TriageOutput`].
#[must_use]
pub fn json_schema() -> serde_json::Value {
    let types: Vec<&str> = IssueType::ALL.iter().map(|t| t.as_str()).collect();
    let priorities: Vec<&str> = Priority::ALL.iter().map(|p| p.as_str()).collect();
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "TriageOutput",
        "description": "The schema contract for triage results.",
        "type": "object",
        "properties": {
            "type": {
                "description": "Primary classification.",
                "type": "string",
                "enum": types,
            },
            "priority": {
                "description": "Triage priority.",
                "type": "string",
                "enum": priorities,
            },
            "labels": {
                "description": "Recommended labels. Must be stable and human-readable.",
                "type": "array",
                "items": { "type": "string" },
            },
            "rationale": {
                "description": "Short explanation for why the issue was classified this way.",
                "type": "string",
                "minLength": 1,
            },
        },
        "required": ["type", "priority", "rationale"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TriageOutput {
        TriageOutput::new(
            IssueType::Feature,
            Priority::P2,
            ["feature", "p2"],
            "A new capability request.",
        )
        .unwrap()
    }

    #[test]
    fn normalize_dedups_case_insensitively() {
        assert_eq!(
            normalize_labels(["bug", "BUG", "needs-repro", "Needs-Repro"]),
            vec!["bug", "needs-repro"]
        );
    }

    #[test]
    fn normalize_trims_and_drops_blanks() {
        assert_eq!(
            normalize_labels([" bug ", "BUG", "", "   ", "needs-repro"]),
            vec!["bug", "needs-repro"]
        );
    }

    #[test]
    fn normalize_keeps_first_occurrence_casing() {
        assert_eq!(
            normalize_labels(["Needs-Repro", "needs-repro", "P1", "bug"]),
            vec!["Needs-Repro", "P1", "bug"]
        );
    }

    #[test]
    fn normalize_folds_full_case_mappings() {
        assert_eq!(normalize_labels(["Straße", "STRASSE", "strasse"]), vec!["Straße"]);
        assert_eq!(normalize_labels(["ﬁx", "FIX"]), vec!["ﬁx"]);
        assert_eq!(fold_case("ΣΊΣΥΦΟΣ"), fold_case("σίσυφος"));
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_labels([" a", "A ", "b", "", "B", "c"]);
        let twice = normalize_labels(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn constructor_normalizes_labels() {
        let out = TriageOutput::new(
            IssueType::Bug,
            Priority::P1,
            [" bug ", "BUG", "", "needs-repro", "Needs-Repro"],
            "Because.",
        )
        .unwrap();
        assert_eq!(out.labels(), ["bug", "needs-repro"]);
    }

    #[test]
    fn blank_rationale_is_rejected() {
        let err = TriageOutput::new(IssueType::Bug, Priority::P1, ["bug"], "   ").unwrap_err();
        assert!(matches!(err, TriageError::SchemaValidation(_)));
    }

    #[test]
    fn compact_json_has_stable_key_order() {
        assert_eq!(
            sample().to_json(false),
            r#"{"type":"feature","priority":"p2","labels":["feature","p2"],"rationale":"A new capability request."}"#
        );
    }

    #[test]
    fn pretty_json_uses_two_space_indent() {
        let text = sample().to_json(true);
        assert!(text.starts_with("{\n  \"type\": \"feature\",\n  \"priority\": \"p2\""));
        assert!(text.contains("\n  \"labels\": [\n    \"feature\","));
    }

    #[test]
    fn json_round_trip() {
        let out = sample();
        assert_eq!(TriageOutput::parse(&out.to_json(false)).unwrap(), out);
        assert_eq!(TriageOutput::parse(&out.to_json(true)).unwrap(), out);
    }

    #[test]
    fn parse_normalizes_labels() {
        let out = TriageOutput::parse(
            r#"{"type":"bug","priority":"p0","labels":["Bug","bug"," "],"rationale":"x"}"#,
        )
        .unwrap();
        assert_eq!(out.labels(), ["Bug"]);
    }

    #[test]
    fn parse_defaults_missing_labels_to_empty() {
        let out =
            TriageOutput::parse(r#"{"type":"docs","priority":"p2","rationale":"typo"}"#).unwrap();
        assert!(out.labels().is_empty());
    }

    #[test]
    fn parse_ignores_unknown_keys() {
        let out = TriageOutput::parse(
            r#"{"type":"docs","priority":"p2","labels":[],"rationale":"typo","confidence":0.4}"#,
        )
        .unwrap();
        assert_eq!(out.issue_type(), IssueType::Docs);
    }

    #[test]
    fn parse_rejects_invalid_documents() {
        let cases = [
            "not json",
            r#"{"priority":"p2","rationale":"x"}"#,
            r#"{"type":"bug","rationale":"x"}"#,
            r#"{"type":"bug","priority":"p2"}"#,
            r#"{"type":"enhancement","priority":"p2","rationale":"x"}"#,
            r#"{"type":"bug","priority":"p3","rationale":"x"}"#,
            r#"{"type":"bug","priority":"p2","rationale":"  "}"#,
            r#"{"type":"bug","priority":"p2","labels":[1,2],"rationale":"x"}"#,
        ];
        for case in cases {
            let err = TriageOutput::parse(case).unwrap_err();
            assert!(matches!(err, TriageError::SchemaValidation(_)), "accepted: {case}");
        }
    }

    #[test]
    fn schema_lists_required_fields_and_enums() {
        let schema = json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["type", "priority", "rationale"]));
        assert_eq!(schema["properties"]["type"]["enum"], json!(["bug", "feature", "docs", "question"]));
        assert_eq!(schema["properties"]["priority"]["enum"], json!(["p0", "p1", "p2"]));
        assert!(schema["properties"]["labels"].is_object());
    }

    #[test]
    fn priority_orders_by_urgency() {
        assert!(Priority::P0 < Priority::P1);
        assert!(Priority::P1 < Priority::P2);
        assert_eq!(Priority::default(), Priority::P2);
        assert_eq!(IssueType::default(), IssueType::Feature);
    }
}
