//! Detection of bare `return null;` in public method bodies (G3).

use lazy_static::lazy_static;
use regex::Regex;

use super::{line_at, RuleId, Violation};

lazy_static! {
    /// A public method body containing a bare null return. The body match
    /// stops at the first `}` so a null return in a later method is
    /// attributed to its own declaration, not an earlier one.
    static ref NULL_RETURN: Regex =
        Regex::new(r"public\s+\w+\s+\w+\s*\([^)]*\)\s*\{[^}]*return\s+null\s*;").unwrap();
}

/// Flag public methods that return a bare `null`.
pub fn detect_null_returns(file: &str, content: &str) -> Vec<Violation> {
    NULL_RETURN
        .find_iter(content)
        .map(|m| Violation::new(RuleId::NullReturn, file, line_at(content, m.start())))
        .collect()
}
