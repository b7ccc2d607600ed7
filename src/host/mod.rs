//! Hosting-provider collaborators.
//!
//! The pipeline talks to the version-control host through
//! [`HostProvider`]: fetch the submission diff, fetch file content at a
//! commit, publish the assembled review. Fetch failures are recoverable
//! by contract (the affected file is skipped); publish failure is
//! surfaced because the review is the externally visible deliverable.

mod github;
mod local;

pub use github::GithubHost;
pub use local::LocalHost;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from host collaborator calls.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("host returned HTTP {0}")]
    Status(u16),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trigger action attached to a submission event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerAction {
    Opened,
    Synchronize,
    /// Anything else: acknowledged and ignored.
    #[serde(other)]
    Other,
}

impl TriggerAction {
    pub fn starts_pipeline(&self) -> bool {
        matches!(self, TriggerAction::Opened | TriggerAction::Synchronize)
    }
}

/// One pull request under review. Transient: owned by a single pipeline
/// run and discarded with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// `owner/name` repository slug.
    pub repo: String,
    pub number: u64,
    pub head_sha: String,
    pub diff_url: String,
    pub action: TriggerAction,
}

/// A rendered review comment anchored to a file and line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewComment {
    pub path: String,
    pub line: u32,
    pub body: String,
}

/// The version-control host, seen from the pipeline.
#[async_trait]
pub trait HostProvider: Send + Sync {
    /// Fetch the unified diff for a submission.
    async fn fetch_diff(&self, submission: &Submission) -> Result<String, HostError>;

    /// Fetch full file content at the submission's head commit.
    async fn fetch_content(&self, submission: &Submission, path: &str)
        -> Result<String, HostError>;

    /// Publish the review: one atomic call carrying every comment plus
    /// the summary, not one call per comment.
    async fn publish_review(
        &self,
        submission: &Submission,
        comments: &[ReviewComment],
        summary: &str,
    ) -> Result<(), HostError>;
}
