//! Detection of unprotected mutable field assignment (G4).

use lazy_static::lazy_static;
use regex::Regex;

use super::{line_at, RuleId, Violation};

lazy_static! {
    /// A field assigned straight from an identifier (typically a
    /// constructor or setter parameter) with no defensive copy. The
    /// right-hand side must be a bare identifier: `new ArrayList<>(x)`,
    /// literals, and `this.other` do not match.
    static ref DIRECT_ASSIGN: Regex =
        Regex::new(r"this\.\w+\s*=\s*[A-Za-z_]\w*\s*;").unwrap();
}

/// Flag direct field assignments that skip defensive copying.
pub fn detect_unprotected_fields(file: &str, content: &str) -> Vec<Violation> {
    DIRECT_ASSIGN
        .find_iter(content)
        .map(|m| {
            Violation::new(
                RuleId::UnprotectedMutableField,
                file,
                line_at(content, m.start()),
            )
        })
        .collect()
}
