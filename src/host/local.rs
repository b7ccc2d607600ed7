//! Local-directory collaborator for offline runs.
//!
//! Serves the diff from a file on disk and content from a checkout root.
//! Used by the `review` CLI command and by integration tests; publishing
//! is a no-op because the terminal report is the deliverable there.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{HostError, HostProvider, ReviewComment, Submission};

pub struct LocalHost {
    diff_path: PathBuf,
    content_root: PathBuf,
}

impl LocalHost {
    pub fn new(diff_path: impl Into<PathBuf>, content_root: impl Into<PathBuf>) -> Self {
        Self {
            diff_path: diff_path.into(),
            content_root: content_root.into(),
        }
    }
}

#[async_trait]
impl HostProvider for LocalHost {
    async fn fetch_diff(&self, _submission: &Submission) -> Result<String, HostError> {
        Ok(std::fs::read_to_string(&self.diff_path)?)
    }

    async fn fetch_content(
        &self,
        _submission: &Submission,
        path: &str,
    ) -> Result<String, HostError> {
        match std::fs::read_to_string(self.content_root.join(path)) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(HostError::NotFound(path.to_string()))
            }
            Err(e) => Err(HostError::Io(e)),
        }
    }

    async fn publish_review(
        &self,
        _submission: &Submission,
        _comments: &[ReviewComment],
        _summary: &str,
    ) -> Result<(), HostError> {
        Ok(())
    }
}
