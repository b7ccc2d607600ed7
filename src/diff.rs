//! Changed-file extraction from unified diffs.
//!
//! Best-effort: a malformed diff yields fewer matches, never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Extension of the target source language.
pub const TARGET_EXTENSION: &str = ".java";

static NEW_FILE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\+\+\+ b/(\S+)").unwrap());

/// Extract the changed Java file paths from a unified diff.
///
/// Order follows first appearance in the diff; duplicate headers collapse
/// to one entry. Deleted files (`+++ /dev/null`) never match the header
/// pattern and are skipped implicitly.
pub fn changed_java_files(diff: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for cap in NEW_FILE_HEADER.captures_iter(diff) {
        let path = &cap[1];
        if !path.ends_with(TARGET_EXTENSION) {
            continue;
        }
        if seen.insert(path.to_string()) {
            files.push(path.to_string());
        }
    }

    files
}
