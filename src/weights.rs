//! Persisted rule-weight store.
//!
//! The one piece of long-lived shared mutable state in the system. Every
//! mutation is a read-modify-write-persist sequence executed under the
//! store lock, so concurrent feedback events serialize and none is lost.
//! Scoring never reads weights piecemeal: callers take a [`snapshot`]
//! once per submission run.
//!
//! [`snapshot`]: WeightStore::snapshot

use anyhow::Context;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::config::{clamp_weight, Config};

pub struct WeightStore {
    /// Durable backing file; `None` keeps the store memory-only.
    path: Option<PathBuf>,
    /// The full config document is held so write-back preserves the
    /// operator-edited sections alongside the weights.
    config: Mutex<Config>,
}

impl WeightStore {
    /// Load a store from a `rules.yaml` file. Weights are clamped into
    /// range as part of parsing.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let config = Config::parse_file(path)
            .with_context(|| format!("loading rule weights from {}", path.display()))?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            config: Mutex::new(config),
        })
    }

    /// A store without durable backing, seeded from `config`.
    pub fn in_memory(config: Config) -> Self {
        Self {
            path: None,
            config: Mutex::new(config),
        }
    }

    /// One consistent view of every weight, taken under the lock.
    pub fn snapshot(&self) -> HashMap<String, f64> {
        self.lock().rule_weights.clone()
    }

    /// Current weight for a rule, if the store knows it.
    pub fn get(&self, rule_id: &str) -> Option<f64> {
        self.lock().rule_weights.get(rule_id).copied()
    }

    /// Feedback deltas carried in the same config document.
    pub fn feedback_deltas(&self) -> crate::config::FeedbackConfig {
        self.lock().feedback
    }

    /// Apply `delta` to a rule's weight, clamp, and persist synchronously
    /// before releasing the lock.
    ///
    /// Returns the new weight, or `None` when the rule is unknown - the
    /// caller decides whether that is worth reporting.
    pub fn adjust(&self, rule_id: &str, delta: f64) -> anyhow::Result<Option<f64>> {
        let mut config = self.lock();

        let Some(weight) = config.rule_weights.get_mut(rule_id) else {
            return Ok(None);
        };
        *weight = clamp_weight(*weight + delta);
        let new_weight = *weight;

        if let Some(path) = &self.path {
            let yaml = config.to_yaml()?;
            fs::write(path, yaml)
                .with_context(|| format!("persisting rule weights to {}", path.display()))?;
        }

        Ok(Some(new_weight))
    }

    fn lock(&self) -> MutexGuard<'_, Config> {
        self.config
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
