//! Review rendering.
//!
//! Two audiences: the hosting provider gets markdown (per-violation
//! comment bodies plus a submission summary), the CLI gets colored
//! terminal output or a JSON report for programmatic consumption.

use colored::*;
use serde::{Deserialize, Serialize};

use crate::analyze::Violation;
use crate::pipeline::{FileReport, ReviewOutcome};

/// Verdict banner tiers over the 0-10 submission score.
pub const PASS_THRESHOLD: f64 = 8.0;
pub const WARN_THRESHOLD: f64 = 5.0;

pub fn verdict(score: f64) -> &'static str {
    if score >= PASS_THRESHOLD {
        "✅ Compliant - meets the guideline bar"
    } else if score >= WARN_THRESHOLD {
        "⚠️ Needs attention - guideline debt is accumulating"
    } else {
        "❌ Blocking - significant guideline violations"
    }
}

/// Markdown body for one review comment.
pub fn format_comment(violation: &Violation) -> String {
    format!(
        "**{rule}: {description}**\n\n\
         Suggested fix:\n```java\n{suggestion}\n```\n\n\
         _Reply `resolve`, `dismiss`, or `override` to tune this rule (ref `{key}`)._",
        rule = violation.rule,
        description = violation.description,
        suggestion = violation.suggestion,
        key = violation.key(),
    )
}

/// Markdown summary posted alongside the comments.
pub fn render_summary(submission_score: f64, files: &[FileReport]) -> String {
    let total_violations: usize = files.iter().map(|f| f.violations.len()).sum();

    let mut summary = String::new();
    summary.push_str(&format!(
        "## Guideline compliance: {:.2}/10\n\n{}\n\n",
        submission_score,
        verdict(submission_score)
    ));
    summary.push_str(&format!(
        "{} violation(s) across {} file(s).\n\n",
        total_violations,
        files.len()
    ));

    if !files.is_empty() {
        summary.push_str("| File | Score | Violations |\n|---|---|---|\n");
        for file in files {
            summary.push_str(&format!(
                "| `{}` | {:.2} | {} |\n",
                file.path,
                file.score,
                file.violations.len()
            ));
        }
        summary.push('\n');
    }

    summary.push_str(
        "Reply `resolve` on a comment when you fix it, `dismiss` when it is \
         noise, or `override` to ship anyway. Your replies tune how heavily \
         each rule weighs on future reviews.\n",
    );
    summary
}

/// Colored terminal report.
pub fn print_pretty(outcome: &ReviewOutcome) {
    let score_line = format!("{:.2}/10", outcome.submission_score);
    let banner = if outcome.submission_score >= PASS_THRESHOLD {
        score_line.green().bold()
    } else if outcome.submission_score >= WARN_THRESHOLD {
        score_line.yellow().bold()
    } else {
        score_line.red().bold()
    };
    println!("Compliance: {}", banner);
    println!();

    if outcome.files.is_empty() {
        println!("No Java files changed.");
        return;
    }

    for file in &outcome.files {
        println!(
            "{}  {:.2}  {} violation(s)",
            file.path.bold(),
            file.score,
            file.violations.len()
        );
        for violation in &file.violations {
            println!(
                "  {}:{}  {}  {}",
                file.path,
                violation.line,
                violation.rule.to_string().cyan(),
                violation.description
            );
        }
    }
    println!();
    println!("{} total violation(s)", outcome.total_violations());
}

// =============================================================================
// JSON format
// =============================================================================

#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub submission_score: f64,
    pub verdict: String,
    pub total_violations: usize,
    pub files: Vec<JsonFileReport>,
}

#[derive(Serialize, Deserialize)]
pub struct JsonFileReport {
    pub path: String,
    pub score: f64,
    pub line_count: usize,
    pub violations: Vec<JsonViolation>,
}

#[derive(Serialize, Deserialize)]
pub struct JsonViolation {
    pub rule: String,
    pub line: u32,
    pub description: String,
    pub suggestion: String,
    /// Stable reference for feedback (`rule:file:line`).
    pub key: String,
}

/// Write the outcome as pretty-printed JSON to stdout.
pub fn write_json(outcome: &ReviewOutcome) -> anyhow::Result<()> {
    let files = outcome
        .files
        .iter()
        .map(|f| JsonFileReport {
            path: f.path.clone(),
            score: f.score,
            line_count: f.line_count,
            violations: f.violations.iter().map(violation_to_json).collect(),
        })
        .collect();

    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        submission_score: outcome.submission_score,
        verdict: verdict(outcome.submission_score).to_string(),
        total_violations: outcome.total_violations(),
        files,
    };

    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

fn violation_to_json(v: &Violation) -> JsonViolation {
    JsonViolation {
        rule: v.rule.as_str().to_string(),
        line: v.line,
        description: v.description.clone(),
        suggestion: v.suggestion.clone(),
        key: v.key(),
    }
}
