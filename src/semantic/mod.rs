//! Semantic rule engine backed by a hosted language model.
//!
//! Best-effort and failure-tolerant by contract: any transport failure,
//! non-success status, or unparseable reply degrades to zero findings,
//! never an error to the caller. A per-request timeout keeps a hung
//! endpoint from stalling the pipeline.

mod parse;

pub use parse::extract_violations;

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::analyze::{RuleId, Violation};
use crate::config::SemanticConfig;

/// Errors internal to one model call. These never cross the engine
/// boundary; they are folded into [`SemanticOutcome::Degraded`].
#[derive(Error, Debug)]
pub enum SemanticError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("model endpoint returned HTTP {0}")]
    Status(u16),
    #[error("unexpected response shape")]
    MalformedResponse,
}

/// Outcome of one semantic pass over a file.
#[derive(Debug, Clone)]
pub enum SemanticOutcome {
    Findings(Vec<Violation>),
    /// The engine produced nothing usable. The reason is retained for
    /// observability; for scoring this counts as zero findings.
    Degraded(String),
}

impl SemanticOutcome {
    pub fn into_violations(self) -> Vec<Violation> {
        match self {
            SemanticOutcome::Findings(violations) => violations,
            SemanticOutcome::Degraded(_) => Vec::new(),
        }
    }
}

/// Text-generation response entry (Hugging Face inference protocol).
#[derive(Deserialize)]
struct GeneratedText {
    #[serde(default)]
    generated_text: String,
}

pub struct SemanticAnalyzer {
    http: reqwest::Client,
    config: SemanticConfig,
    token: Option<String>,
}

impl SemanticAnalyzer {
    /// Create an analyzer. The bearer token is read from the environment
    /// variable named by the config; a missing token sends no auth header.
    pub fn new(config: SemanticConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("guidecheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create HTTP client");
        let token = std::env::var(&config.token_env).ok();

        Self {
            http,
            config,
            token,
        }
    }

    /// Size gate: files at or above the configured byte bound are
    /// analyzed statically only.
    pub fn should_analyze(&self, content: &str) -> bool {
        self.config.enabled && content.len() < self.config.max_file_bytes
    }

    /// Run the model over a bounded excerpt of `content`.
    pub async fn analyze(&self, file: &str, content: &str) -> SemanticOutcome {
        let prompt = self.build_prompt(content);

        let reply = match self.request(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(file, error = %e, "semantic analysis degraded");
                return SemanticOutcome::Degraded(e.to_string());
            }
        };

        match extract_violations(&reply, file, &self.config.rules) {
            Some(violations) => {
                debug!(file, count = violations.len(), "semantic findings");
                SemanticOutcome::Findings(violations)
            }
            None => {
                let reason = "no parseable violation array in model reply";
                warn!(file, "{}", reason);
                SemanticOutcome::Degraded(reason.to_string())
            }
        }
    }

    fn build_prompt(&self, content: &str) -> String {
        let excerpt = truncate_chars(content, self.config.max_prompt_chars);

        let mut rules = String::new();
        for name in &self.config.rules {
            if let Some(rule) = RuleId::parse(name) {
                rules.push_str(&format!("- {}: {}\n", rule, rule.description()));
            }
        }

        format!(
            "[INST] <<SYS>>\n\
             You are a Java code reviewer. Identify only violations of these rules:\n\
             {rules}\
             Output JSON: [{{\"rule\": str, \"line\": number, \"description\": str, \"suggestion\": str}}]\n\
             <</SYS>>\n\
             Code:\n{excerpt}\n\
             [/INST]"
        )
    }

    async fn request(&self, prompt: &str) -> Result<String, SemanticError> {
        let payload = json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": self.config.max_new_tokens,
                "return_full_text": false,
            }
        });

        let mut request = self
            .http
            .post(&self.config.endpoint)
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SemanticError::Timeout
            } else {
                SemanticError::Network(e)
            }
        })?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(SemanticError::Status(status));
        }

        let entries: Vec<GeneratedText> = response
            .json()
            .await
            .map_err(|_| SemanticError::MalformedResponse)?;
        entries
            .into_iter()
            .next()
            .map(|entry| entry.generated_text)
            .ok_or(SemanticError::MalformedResponse)
    }
}

/// Cut `s` to at most `max` characters, respecting char boundaries.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
