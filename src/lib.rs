//! Guidecheck - adaptive code-review gate for Java pull requests.
//!
//! Guidecheck reviews submitted code changes by combining deterministic
//! pattern detectors with a language-model-based semantic pass, scoring
//! each file and the submission on a 0-10 compliance scale, and adapting
//! each rule's severity weight from reviewer feedback on prior findings.
//!
//! # Architecture
//!
//! - `diff`: changed-file extraction from unified diffs
//! - `analyze`: static rule engine (pattern detectors, violation schema)
//! - `semantic`: language-model rule engine (bounded input, best-effort)
//! - `score`: compliance scoring
//! - `weights`: persisted rule-weight store (the shared mutable state)
//! - `feedback`: audit log + weight adaptation
//! - `host`: version-control host collaborators (GitHub, local)
//! - `pipeline`: per-submission orchestration
//! - `report`: comment/summary rendering, terminal and JSON output
//!
//! The weight store is the only state shared across submissions; every
//! mutation serializes through it, and each pipeline run scores against
//! one snapshot taken at the start of the run.

pub mod analyze;
pub mod cli;
pub mod config;
pub mod diff;
pub mod feedback;
pub mod host;
pub mod pipeline;
pub mod report;
pub mod score;
pub mod semantic;
pub mod weights;

pub use analyze::{run_static_rules, RuleId, Violation};
pub use config::Config;
pub use feedback::{FeedbackAction, FeedbackAdapter, FeedbackEvent};
pub use host::{GithubHost, HostProvider, LocalHost, ReviewComment, Submission, TriggerAction};
pub use pipeline::{dispatch, FileReport, Pipeline, ReviewOutcome};
pub use semantic::{SemanticAnalyzer, SemanticOutcome};
pub use weights::WeightStore;
