//! Runtime configuration loaded from `rules.yaml`.
//!
//! The file is human-editable and doubles as the durable home of the
//! adaptive rule weights: the weight store writes the whole document back
//! after every mutation so operator edits to other sections survive.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Hard bounds on any rule weight. Invariants, not defaults: weights are
/// clamped here at load time and after every feedback mutation.
pub const MIN_WEIGHT: f64 = 0.1;
pub const MAX_WEIGHT: f64 = 2.0;

/// Weight used when a violation references a rule the store does not know.
pub const DEFAULT_WEIGHT: f64 = 0.5;

pub fn clamp_weight(weight: f64) -> f64 {
    weight.clamp(MIN_WEIGHT, MAX_WEIGHT)
}

/// Top-level configuration document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Severity weight per rule id. Keys stay free-form strings so the
    /// file may reference rules this binary does not implement yet.
    #[serde(default = "default_rule_weights")]
    pub rule_weights: HashMap<String, f64>,
    #[serde(default)]
    pub semantic: SemanticConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rule_weights: default_rule_weights(),
            semantic: SemanticConfig::default(),
            feedback: FeedbackConfig::default(),
        }
    }
}

impl Config {
    /// Parse a configuration from a YAML file, clamping every weight into
    /// the legal range.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;
        for weight in config.rule_weights.values_mut() {
            *weight = clamp_weight(*weight);
        }
        Ok(config)
    }

    /// Serialize back to YAML for durable storage.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn default_rule_weights() -> HashMap<String, f64> {
    ["G2", "G3", "G4", "G9", "G10"]
        .into_iter()
        .map(|rule| (rule.to_string(), DEFAULT_WEIGHT))
        .collect()
}

/// Settings for the semantic (language-model) rule engine.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SemanticConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Inference endpoint expected to speak the Hugging Face text
    /// generation protocol.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Environment variable holding the bearer token for the endpoint.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Rules the model is asked to cover. Replies citing other rules are
    /// dropped during validation.
    #[serde(default = "default_semantic_rules")]
    pub rules: Vec<String>,
    /// Content prefix length (chars) embedded in the prompt.
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,
    /// Files at or above this size are analyzed statically only.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            token_env: default_token_env(),
            rules: default_semantic_rules(),
            max_prompt_chars: default_max_prompt_chars(),
            max_file_bytes: default_max_file_bytes(),
            timeout_ms: default_timeout_ms(),
            max_new_tokens: default_max_new_tokens(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://api-inference.huggingface.co/models/codellama/CodeLlama-7b-Instruct-hf".to_string()
}

fn default_token_env() -> String {
    "HUGGINGFACE_TOKEN".to_string()
}

fn default_semantic_rules() -> Vec<String> {
    vec!["G2".to_string(), "G9".to_string()]
}

fn default_max_prompt_chars() -> usize {
    1500
}

fn default_max_file_bytes() -> usize {
    20_000
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_new_tokens() -> u32 {
    300
}

/// Weight deltas applied per feedback action. Business rules taken as
/// given; kept as configuration rather than call-site arithmetic.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct FeedbackConfig {
    #[serde(default = "default_resolve_delta")]
    pub resolve_delta: f64,
    #[serde(default = "default_dismiss_delta")]
    pub dismiss_delta: f64,
    #[serde(default = "default_override_delta")]
    pub override_delta: f64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            resolve_delta: default_resolve_delta(),
            dismiss_delta: default_dismiss_delta(),
            override_delta: default_override_delta(),
        }
    }
}

fn default_resolve_delta() -> f64 {
    0.05
}

fn default_dismiss_delta() -> f64 {
    -0.10
}

fn default_override_delta() -> f64 {
    0.0
}
