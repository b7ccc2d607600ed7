//! Command-line interface for guidecheck.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::feedback::{FeedbackAction, FeedbackAdapter};
use crate::host::{LocalHost, Submission, TriggerAction};
use crate::pipeline::Pipeline;
use crate::report;
use crate::semantic::SemanticAnalyzer;
use crate::weights::WeightStore;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Starter configuration written by `init`.
const DEFAULT_CONFIG: &str = include_str!("templates/rules.yaml");

/// Adaptive code-review gate for Java pull requests.
///
/// Guidecheck reviews a unified diff against the team's style guide:
/// deterministic pattern detectors plus an optional language-model pass,
/// scored 0-10 with rule weights that adapt to reviewer feedback.
#[derive(Parser)]
#[command(name = "guidecheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Review a diff against the guideline rules
    Review(ReviewArgs),
    /// Record a human disposition of a prior finding
    Feedback(FeedbackArgs),
    /// Create a starter rules.yaml
    Init(InitArgs),
}

/// Arguments for the review command.
#[derive(Parser)]
pub struct ReviewArgs {
    /// Unified diff file to review
    pub diff: PathBuf,

    /// Root directory the diff's paths resolve against
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// Path to the rules configuration
    #[arg(short, long, default_value = "rules.yaml")]
    pub config: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Exit non-zero when the submission score falls below this value
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Skip the language-model pass
    #[arg(long)]
    pub no_semantic: bool,
}

/// Arguments for the feedback command.
#[derive(Parser)]
pub struct FeedbackArgs {
    /// Violation reference from the review comment (rule:file:line)
    pub violation_ref: String,

    /// Disposition: resolve, dismiss, or override
    pub action: String,

    /// Path to the rules configuration
    #[arg(short, long, default_value = "rules.yaml")]
    pub config: PathBuf,

    /// Path to the append-only audit log
    #[arg(short, long, default_value = "feedback_log.jsonl")]
    pub log: PathBuf,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "rules.yaml")]
    pub output: PathBuf,
}

/// Run the review pipeline against a local diff and checkout.
pub async fn run_review(args: &ReviewArgs) -> anyhow::Result<i32> {
    let mut config = if args.config.exists() {
        Config::parse_file(&args.config)?
    } else {
        Config::default()
    };
    if args.no_semantic {
        config.semantic.enabled = false;
    }

    let semantic = SemanticAnalyzer::new(config.semantic.clone());
    let weights = Arc::new(WeightStore::in_memory(config));
    let host = LocalHost::new(&args.diff, &args.root);
    let pipeline = Pipeline::new(host, semantic, weights);

    let submission = Submission {
        repo: "local".to_string(),
        number: 0,
        head_sha: "WORKTREE".to_string(),
        diff_url: args.diff.display().to_string(),
        action: TriggerAction::Opened,
    };

    let outcome = pipeline.review(&submission).await?;

    match args.format.as_str() {
        "json" => report::write_json(&outcome)?,
        "pretty" => report::print_pretty(&outcome),
        other => anyhow::bail!("unknown format: {} (expected pretty or json)", other),
    }

    if let Some(threshold) = args.threshold {
        if outcome.submission_score < threshold {
            return Ok(EXIT_FAILED);
        }
    }
    Ok(EXIT_SUCCESS)
}

/// Record one feedback event against the durable stores.
pub fn run_feedback(args: &FeedbackArgs) -> anyhow::Result<i32> {
    let action: FeedbackAction = args
        .action
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let rule_id = args
        .violation_ref
        .split(':')
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow::anyhow!("violation ref must look like rule:file:line"))?
        .to_string();

    if !args.config.exists() {
        anyhow::bail!(
            "no rules file at {} (run `guidecheck init` first)",
            args.config.display()
        );
    }
    let store = Arc::new(WeightStore::load(&args.config)?);
    let deltas = store.feedback_deltas();
    let adapter = FeedbackAdapter::new(store, &args.log, deltas);

    let outcome = adapter.record(&args.violation_ref, &rule_id, action)?;
    match outcome.new_weight {
        Some(weight) => println!(
            "{} {} on {} (weight now {:.2})",
            "recorded".green(),
            action,
            rule_id,
            weight
        ),
        None => println!("{} {} on {} (weight unchanged)", "recorded".green(), action, rule_id),
    }
    Ok(EXIT_SUCCESS)
}

/// Write the starter configuration.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() {
        anyhow::bail!("{} already exists", args.output.display());
    }
    std::fs::write(&args.output, DEFAULT_CONFIG)?;
    println!("{} {}", "wrote".green(), args.output.display());
    Ok(EXIT_SUCCESS)
}
