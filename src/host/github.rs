//! GitHub REST collaborator.
//!
//! Content fetch: GET /repos/{repo}/contents/{path}?ref={sha} with the
//! raw media type. Review publish: POST /repos/{repo}/pulls/{n}/reviews,
//! one call per submission.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use super::{HostError, HostProvider, ReviewComment, Submission};

const API_ROOT: &str = "https://api.github.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

pub struct GithubHost {
    http: reqwest::Client,
    token: String,
    timeout: Duration,
}

impl GithubHost {
    pub fn new(token: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("guidecheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn send_error(e: reqwest::Error) -> HostError {
    if e.is_timeout() {
        HostError::Timeout
    } else {
        HostError::Network(e)
    }
}

#[async_trait]
impl HostProvider for GithubHost {
    async fn fetch_diff(&self, submission: &Submission) -> Result<String, HostError> {
        let response = self
            .http
            .get(&submission.diff_url)
            .timeout(self.timeout)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github.v3.diff")
            .send()
            .await
            .map_err(send_error)?;

        match response.status().as_u16() {
            200 => response.text().await.map_err(HostError::Network),
            404 => Err(HostError::NotFound(submission.diff_url.clone())),
            status => Err(HostError::Status(status)),
        }
    }

    async fn fetch_content(
        &self,
        submission: &Submission,
        path: &str,
    ) -> Result<String, HostError> {
        let url = format!(
            "{}/repos/{}/contents/{}?ref={}",
            API_ROOT, submission.repo, path, submission.head_sha
        );
        let response = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github.raw+json")
            .send()
            .await
            .map_err(send_error)?;

        match response.status().as_u16() {
            200 => response.text().await.map_err(HostError::Network),
            404 => Err(HostError::NotFound(path.to_string())),
            status => Err(HostError::Status(status)),
        }
    }

    async fn publish_review(
        &self,
        submission: &Submission,
        comments: &[ReviewComment],
        summary: &str,
    ) -> Result<(), HostError> {
        let url = format!(
            "{}/repos/{}/pulls/{}/reviews",
            API_ROOT, submission.repo, submission.number
        );
        let comment_payloads: Vec<_> = comments
            .iter()
            .map(|c| json!({ "path": c.path, "line": c.line, "body": c.body }))
            .collect();
        let payload = json!({
            "commit_id": submission.head_sha,
            "event": "COMMENT",
            "body": summary,
            "comments": comment_payloads,
        });

        let response = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .json(&payload)
            .send()
            .await
            .map_err(send_error)?;

        match response.status().as_u16() {
            200 | 201 => Ok(()),
            status => Err(HostError::Status(status)),
        }
    }
}
