//! Detection of `equals` overrides without a matching `hashCode` (G10).

use super::{line_at, RuleId, Violation};

const EQUALS_DECL: &str = "public boolean equals(";
const HASHCODE_DECL: &str = "public int hashCode(";

/// Flag a type that defines value equality without a consistent hash.
///
/// Fires at most once per file, anchored at the first `equals`
/// declaration, no matter how many overloads the file defines.
pub fn detect_equals_without_hashcode(file: &str, content: &str) -> Vec<Violation> {
    let Some(idx) = content.find(EQUALS_DECL) else {
        return Vec::new();
    };
    if content.contains(HASHCODE_DECL) {
        return Vec::new();
    }
    vec![Violation::new(
        RuleId::EqualsWithoutHashCode,
        file,
        line_at(content, idx),
    )]
}
