//! `triage schema` command.

use crate::schema::json_schema;

/// Renders the output JSON Schema; pretty unless `compact`.
#[must_use]
pub fn run(compact: bool) -> String {
    let schema = json_schema();
    if compact {
        schema.to_string()
    } else {
        serde_json::to_string_pretty(&schema).unwrap_or_else(|_| schema.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn pretty_by_default() {
        let text = run(false);
        assert!(text.contains("\n  \"$schema\""));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "object");
    }

    #[test]
    fn compact_is_one_line() {
        let text = run(true);
        assert!(!text.contains('\n'));
        assert!(text.contains(r#""required":["type","priority","rationale"]"#));
    }
}
