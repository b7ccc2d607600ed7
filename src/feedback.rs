//! Feedback intake: audit logging and rule-weight adaptation.
//!
//! A human disposition (resolve/dismiss/override) of a prior finding is
//! appended to a JSON-lines audit log and then applied to the weight
//! store. The log is the trail of record and is written first: an event
//! is durable before its weight effect, and an event referencing a rule
//! the store does not know still lands in the log.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::config::FeedbackConfig;
use crate::weights::WeightStore;

/// Human disposition of a reported violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackAction {
    /// The finding was acted on; the rule earned trust.
    Resolve,
    /// The finding was noise; the rule loses weight.
    Dismiss,
    /// A maintainer overrode the gate; recorded for audit only.
    Override,
}

impl std::fmt::Display for FeedbackAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackAction::Resolve => write!(f, "resolve"),
            FeedbackAction::Dismiss => write!(f, "dismiss"),
            FeedbackAction::Override => write!(f, "override"),
        }
    }
}

impl std::str::FromStr for FeedbackAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "resolve" => Ok(FeedbackAction::Resolve),
            "dismiss" => Ok(FeedbackAction::Dismiss),
            "override" => Ok(FeedbackAction::Override),
            _ => Err(format!("unknown feedback action: {}", s)),
        }
    }
}

/// One audit-log record. Append-only; never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEvent {
    /// `rule:file:line` key of the violation being disposed.
    pub violation_ref: String,
    pub rule_id: String,
    pub action: FeedbackAction,
    pub timestamp: DateTime<Utc>,
}

/// What one `record` call did.
#[derive(Debug)]
pub struct FeedbackOutcome {
    pub event: FeedbackEvent,
    /// Weight after adjustment; `None` when the action carries no delta
    /// or the rule is unknown to the store.
    pub new_weight: Option<f64>,
}

/// Records feedback events and adjusts the shared weight store.
pub struct FeedbackAdapter {
    store: Arc<WeightStore>,
    deltas: FeedbackConfig,
    log_path: PathBuf,
    log_lock: Mutex<()>,
}

impl FeedbackAdapter {
    pub fn new(store: Arc<WeightStore>, log_path: impl Into<PathBuf>, deltas: FeedbackConfig) -> Self {
        Self {
            store,
            deltas,
            log_path: log_path.into(),
            log_lock: Mutex::new(()),
        }
    }

    /// Record one disposition: append to the audit log, then apply the
    /// action's weight delta (clamped) to the referenced rule.
    pub fn record(
        &self,
        violation_ref: &str,
        rule_id: &str,
        action: FeedbackAction,
    ) -> anyhow::Result<FeedbackOutcome> {
        let event = FeedbackEvent {
            violation_ref: violation_ref.to_string(),
            rule_id: rule_id.to_string(),
            action,
            timestamp: Utc::now(),
        };
        self.append(&event)?;

        let delta = self.delta_for(action);
        let new_weight = if delta == 0.0 {
            info!(rule = rule_id, %action, "feedback logged, no weight change");
            None
        } else {
            match self.store.adjust(rule_id, delta)? {
                Some(weight) => {
                    info!(rule = rule_id, %action, weight, "rule weight adjusted");
                    Some(weight)
                }
                None => {
                    warn!(rule = rule_id, "feedback references unknown rule, weight untouched");
                    None
                }
            }
        };

        Ok(FeedbackOutcome { event, new_weight })
    }

    fn delta_for(&self, action: FeedbackAction) -> f64 {
        match action {
            FeedbackAction::Resolve => self.deltas.resolve_delta,
            FeedbackAction::Dismiss => self.deltas.dismiss_delta,
            FeedbackAction::Override => self.deltas.override_delta,
        }
    }

    fn append(&self, event: &FeedbackEvent) -> anyhow::Result<()> {
        let line = serde_json::to_string(event)?;
        let _guard = self
            .log_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("opening audit log {}", self.log_path.display()))?;
        writeln!(file, "{}", line)?;
        file.sync_all()?;
        Ok(())
    }
}

/// Read every event from an audit log. Lines that fail to decode are
/// skipped: the log may span versions of the record shape.
pub fn read_audit_log<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<FeedbackEvent>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    Ok(content
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect())
}
