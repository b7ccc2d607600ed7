//! Defensive extraction of violations from free-text model replies.

use serde::Deserialize;

use crate::analyze::{RuleId, Violation};

/// The object shape the model is asked to emit. Every field except the
/// rule is optional so a sloppy reply degrades gracefully.
#[derive(Debug, Deserialize)]
struct RawFinding {
    rule: String,
    #[serde(default)]
    line: u64,
    #[serde(default)]
    description: String,
    #[serde(default)]
    suggestion: String,
}

/// Locate the single JSON array substring inside `reply` and decode it.
///
/// Returns `None` when no bracketed substring decodes. Findings citing
/// rules outside `covered`, unknown rules, or non-positive lines are
/// dropped rather than trusted - extraction is from free text and the
/// model's confidence is not ours.
pub fn extract_violations(reply: &str, file: &str, covered: &[String]) -> Option<Vec<Violation>> {
    let array = extract_json_array(reply)?;
    let findings: Vec<RawFinding> = serde_json::from_str(array).ok()?;

    Some(
        findings
            .into_iter()
            .filter_map(|raw| {
                let rule = RuleId::parse(&raw.rule)?;
                if !covered.iter().any(|name| name == rule.as_str()) {
                    return None;
                }
                if raw.line == 0 || raw.line > u32::MAX as u64 {
                    return None;
                }
                Some(Violation {
                    rule,
                    file: file.to_string(),
                    line: raw.line as u32,
                    description: non_empty_or(raw.description, rule.description()),
                    suggestion: non_empty_or(raw.suggestion, rule.suggestion()),
                })
            })
            .collect(),
    )
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

/// First `[` through last `]`, or `None` when the brackets are missing
/// or inverted.
fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covered() -> Vec<String> {
        vec!["G2".to_string(), "G9".to_string()]
    }

    #[test]
    fn test_extracts_array_with_surrounding_prose() {
        let reply = r#"Sure! Here are the issues I found:
[{"rule": "G2", "line": 14, "description": "Loop over orders", "suggestion": "orders.stream()"}]
Let me know if you need more detail."#;

        let violations = extract_violations(reply, "Orders.java", &covered()).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, RuleId::PreferStreams);
        assert_eq!(violations[0].line, 14);
        assert_eq!(violations[0].file, "Orders.java");
        assert_eq!(violations[0].description, "Loop over orders");
    }

    #[test]
    fn test_no_array_yields_none() {
        assert!(extract_violations("I found no issues.", "A.java", &covered()).is_none());
        assert!(extract_violations("", "A.java", &covered()).is_none());
    }

    #[test]
    fn test_inverted_brackets_yield_none() {
        assert!(extract_violations("] nothing here [", "A.java", &covered()).is_none());
    }

    #[test]
    fn test_undecodable_array_yields_none() {
        assert!(extract_violations("[{not json}]", "A.java", &covered()).is_none());
    }

    #[test]
    fn test_empty_array_yields_empty_findings() {
        let violations = extract_violations("[]", "A.java", &covered()).unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn test_uncovered_rule_is_dropped() {
        let reply = r#"[{"rule": "G3", "line": 5}, {"rule": "G9", "line": 6}]"#;
        let violations = extract_violations(reply, "A.java", &covered()).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, RuleId::UnnecessaryInterface);
    }

    #[test]
    fn test_unknown_rule_and_bad_line_are_dropped() {
        let reply = r#"[{"rule": "G999", "line": 5}, {"rule": "G2", "line": 0}]"#;
        let violations = extract_violations(reply, "A.java", &covered()).unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn test_missing_text_fields_fall_back_to_rule_defaults() {
        let reply = r#"[{"rule": "G9", "line": 3}]"#;
        let violations = extract_violations(reply, "A.java", &covered()).unwrap();
        assert_eq!(
            violations[0].description,
            RuleId::UnnecessaryInterface.description()
        );
        assert_eq!(
            violations[0].suggestion,
            RuleId::UnnecessaryInterface.suggestion()
        );
    }
}
