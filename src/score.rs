//! Compliance scoring.
//!
//! Converts violations plus a rule-weight snapshot into a 0-10 score per
//! file and an unweighted mean per submission. The formula is shared with
//! the dashboard that trends these scores, so every clamp here is
//! load-bearing for reproducibility.

use std::collections::HashMap;

use crate::analyze::Violation;
use crate::config::DEFAULT_WEIGHT;

/// Maximum (fully compliant) score.
pub const MAX_SCORE: f64 = 10.0;

/// Severity is amortized over blocks of this many lines.
pub const LINES_PER_BLOCK: f64 = 50.0;

/// Line count as the scorer sees it: newline-separated segments.
pub fn line_count(content: &str) -> usize {
    content.split('\n').count()
}

/// Compliance score for one file.
///
/// `severity` sums the weight of each violation (unknown rules score at
/// the fixed mid-severity default, never zero), amortized over 50-line
/// blocks with a floor of one block, capped at 10 before subtraction.
pub fn file_score(
    violations: &[Violation],
    line_count: usize,
    weights: &HashMap<String, f64>,
) -> f64 {
    if line_count == 0 {
        return MAX_SCORE;
    }

    let severity: f64 = violations
        .iter()
        .map(|v| {
            weights
                .get(v.rule.as_str())
                .copied()
                .unwrap_or(DEFAULT_WEIGHT)
        })
        .sum();

    let blocks = (line_count as f64 / LINES_PER_BLOCK).max(1.0);
    let normalized = (severity / blocks).min(MAX_SCORE);
    (MAX_SCORE - normalized).max(0.0)
}

/// Submission score: arithmetic mean of the file scores, or a vacuous
/// pass when nothing was scored.
pub fn submission_score(file_scores: &[f64]) -> f64 {
    if file_scores.is_empty() {
        return MAX_SCORE;
    }
    file_scores.iter().sum::<f64>() / file_scores.len() as f64
}
