//! Static rule engine: deterministic pattern detectors over file content.
//!
//! Each detector is a pure function from one file's text to zero or more
//! violations. Detectors share no state and tolerate content that is not
//! valid Java - an unparseable file simply yields no matches. The scan is
//! regex over raw text rather than a full parse: false negatives on
//! obfuscated code are acceptable, false positives are not.

mod equals_hashcode;
mod mutable_fields;
mod null_returns;
mod types;

pub use equals_hashcode::detect_equals_without_hashcode;
pub use mutable_fields::detect_unprotected_fields;
pub use null_returns::detect_null_returns;
pub use types::{RuleId, Violation};

/// Run every static detector over one file's content.
///
/// Output order is stable: ascending line number, ties broken by rule id.
pub fn run_static_rules(file: &str, content: &str) -> Vec<Violation> {
    let mut violations = Vec::new();
    violations.extend(detect_null_returns(file, content));
    violations.extend(detect_unprotected_fields(file, content));
    violations.extend(detect_equals_without_hashcode(file, content));
    violations.sort_by_key(|v| (v.line, v.rule));
    violations
}

/// 1-based line number of a byte offset into `content`.
pub(crate) fn line_at(content: &str, offset: usize) -> u32 {
    content[..offset].bytes().filter(|&b| b == b'\n').count() as u32 + 1
}
