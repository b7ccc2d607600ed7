//! Pipeline orchestrator: one submission end-to-end.
//!
//! diff -> changed files -> [per file: fetch + static + semantic + score]
//! -> summary -> publish. Files are analyzed concurrently, each in its
//! own task so a fault in one cannot take down the run, and results are
//! assembled in diff order so concurrency never leaks into output order.
//! The weight store is read once per run; a feedback event landing
//! mid-run affects the next submission, not this one.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::analyze::{run_static_rules, Violation};
use crate::diff;
use crate::host::{HostError, HostProvider, ReviewComment, Submission};
use crate::report;
use crate::score;
use crate::semantic::SemanticAnalyzer;
use crate::weights::WeightStore;

/// Per-file analysis product.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: String,
    pub line_count: usize,
    /// Sorted ascending by line, ties by rule id.
    pub violations: Vec<Violation>,
    pub score: f64,
}

/// Everything one pipeline run produced, handed to the publisher.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// Per-file reports in diff first-appearance order.
    pub files: Vec<FileReport>,
    /// Rendered comments sorted by path, line, rule.
    pub comments: Vec<ReviewComment>,
    pub submission_score: f64,
    pub summary: String,
}

impl ReviewOutcome {
    pub fn total_violations(&self) -> usize {
        self.files.iter().map(|f| f.violations.len()).sum()
    }
}

pub struct Pipeline<H: HostProvider> {
    host: Arc<H>,
    semantic: Arc<SemanticAnalyzer>,
    weights: Arc<WeightStore>,
}

impl<H: HostProvider + 'static> Pipeline<H> {
    pub fn new(host: H, semantic: SemanticAnalyzer, weights: Arc<WeightStore>) -> Self {
        Self {
            host: Arc::new(host),
            semantic: Arc::new(semantic),
            weights,
        }
    }

    /// Run one submission end-to-end and publish the result.
    ///
    /// Partial failures shrink the result instead of aborting it; the
    /// publish call is the only error surfaced to the caller.
    pub async fn review(&self, submission: &Submission) -> Result<ReviewOutcome, HostError> {
        let diff_text = match self.host.fetch_diff(submission).await {
            Ok(diff_text) => diff_text,
            Err(e) => {
                warn!(repo = %submission.repo, error = %e, "diff unavailable, reviewing nothing");
                String::new()
            }
        };
        let changed = diff::changed_java_files(&diff_text);
        info!(
            repo = %submission.repo,
            number = submission.number,
            files = changed.len(),
            "review started"
        );

        // One consistent weight snapshot for the whole run.
        let weights = Arc::new(self.weights.snapshot());

        let handles: Vec<_> = changed
            .into_iter()
            .map(|path| {
                let host = Arc::clone(&self.host);
                let semantic = Arc::clone(&self.semantic);
                let weights = Arc::clone(&weights);
                let submission = submission.clone();
                tokio::spawn(analyze_file(host, semantic, submission, path, weights))
            })
            .collect();

        // Collecting in spawn order keeps assembly deterministic no
        // matter how the tasks interleave.
        let mut files = Vec::new();
        for joined in futures::future::join_all(handles).await {
            match joined {
                Ok(Some(file_report)) => files.push(file_report),
                Ok(None) => {}
                Err(e) => error!(error = %e, "file analysis task failed"),
            }
        }

        let scores: Vec<f64> = files.iter().map(|f| f.score).collect();
        let submission_score = score::submission_score(&scores);

        let mut comments: Vec<ReviewComment> = files
            .iter()
            .flat_map(|f| f.violations.iter())
            .map(|v| ReviewComment {
                path: v.file.clone(),
                line: v.line,
                body: report::format_comment(v),
            })
            .collect();
        comments.sort_by(|a, b| (&a.path, a.line).cmp(&(&b.path, b.line)));

        let summary = report::render_summary(submission_score, &files);

        self.host
            .publish_review(submission, &comments, &summary)
            .await?;
        info!(
            repo = %submission.repo,
            number = submission.number,
            score = submission_score,
            violations = comments.len(),
            "review published"
        );

        Ok(ReviewOutcome {
            files,
            comments,
            submission_score,
            summary,
        })
    }
}

/// Analyze one changed file. `None` means the file was skipped, which is
/// never fatal to the run.
async fn analyze_file<H: HostProvider>(
    host: Arc<H>,
    semantic: Arc<SemanticAnalyzer>,
    submission: Submission,
    path: String,
    weights: Arc<HashMap<String, f64>>,
) -> Option<FileReport> {
    let content = match host.fetch_content(&submission, &path).await {
        Ok(content) => content,
        Err(e) => {
            warn!(file = %path, error = %e, "content unavailable, file skipped");
            return None;
        }
    };
    if content.trim().is_empty() {
        debug!(file = %path, "empty content, file skipped");
        return None;
    }

    let mut violations = run_static_rules(&path, &content);
    if semantic.should_analyze(&content) {
        violations.extend(semantic.analyze(&path, &content).await.into_violations());
    }
    violations.sort_by_key(|v| (v.line, v.rule));

    let line_count = score::line_count(&content);
    let file_score = score::file_score(&violations, line_count, &weights);

    Some(FileReport {
        path,
        line_count,
        violations,
        score: file_score,
    })
}

/// Start a submission pipeline as an independent unit of work and return
/// immediately. The trigger gate lives here: anything other than an
/// opened/synchronize action is acknowledged and dropped. Completion is
/// observed through the publish call, not by joining the task.
pub fn dispatch<H: HostProvider + 'static>(
    pipeline: Arc<Pipeline<H>>,
    submission: Submission,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if !submission.action.starts_pipeline() {
            info!(repo = %submission.repo, action = ?submission.action, "trigger ignored");
            return;
        }
        if let Err(e) = pipeline.review(&submission).await {
            error!(
                repo = %submission.repo,
                number = submission.number,
                error = %e,
                "review publish failed"
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, SemanticConfig};
    use crate::host::TriggerAction;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeHost {
        diff: String,
        contents: HashMap<String, String>,
        published: Mutex<Option<(Vec<ReviewComment>, String)>>,
    }

    #[async_trait]
    impl HostProvider for FakeHost {
        async fn fetch_diff(&self, _submission: &Submission) -> Result<String, HostError> {
            Ok(self.diff.clone())
        }

        async fn fetch_content(
            &self,
            _submission: &Submission,
            path: &str,
        ) -> Result<String, HostError> {
            self.contents
                .get(path)
                .cloned()
                .ok_or_else(|| HostError::NotFound(path.to_string()))
        }

        async fn publish_review(
            &self,
            _submission: &Submission,
            comments: &[ReviewComment],
            summary: &str,
        ) -> Result<(), HostError> {
            *self.published.lock().unwrap() = Some((comments.to_vec(), summary.to_string()));
            Ok(())
        }
    }

    fn offline_semantic() -> SemanticAnalyzer {
        let config = SemanticConfig {
            enabled: false,
            ..SemanticConfig::default()
        };
        SemanticAnalyzer::new(config)
    }

    fn submission() -> Submission {
        Submission {
            repo: "acme/shop".to_string(),
            number: 7,
            head_sha: "abc123".to_string(),
            diff_url: "https://example.invalid/7.diff".to_string(),
            action: TriggerAction::Opened,
        }
    }

    #[tokio::test]
    async fn test_skips_unfetchable_files_and_scores_the_rest() {
        let mut contents = HashMap::new();
        contents.insert(
            "src/A.java".to_string(),
            "public class A {\n    public String x() {\n        return null;\n    }\n}\n"
                .to_string(),
        );
        let host = FakeHost {
            diff: "+++ b/src/A.java\n+++ b/src/Gone.java\n".to_string(),
            contents,
            published: Mutex::new(None),
        };

        let weights = Arc::new(WeightStore::in_memory(Config::default()));
        let pipeline = Pipeline::new(host, offline_semantic(), weights);

        let outcome = pipeline.review(&submission()).await.unwrap();
        assert_eq!(outcome.files.len(), 1);
        assert_eq!(outcome.files[0].path, "src/A.java");
        assert_eq!(outcome.total_violations(), 1);
        assert!(outcome.submission_score < 10.0);
    }

    #[tokio::test]
    async fn test_no_java_files_is_vacuous_pass() {
        let host = FakeHost {
            diff: "+++ b/readme.md\n".to_string(),
            contents: HashMap::new(),
            published: Mutex::new(None),
        };
        let weights = Arc::new(WeightStore::in_memory(Config::default()));
        let pipeline = Pipeline::new(host, offline_semantic(), weights);

        let outcome = pipeline.review(&submission()).await.unwrap();
        assert_eq!(outcome.submission_score, 10.0);
        assert!(outcome.comments.is_empty());
    }

    #[tokio::test]
    async fn test_comments_sorted_by_path_then_line() {
        let mut contents = HashMap::new();
        contents.insert(
            "src/B.java".to_string(),
            "this.b = b;\n".to_string(),
        );
        contents.insert(
            "src/A.java".to_string(),
            "this.x = x;\nthis.a = a;\n".to_string(),
        );
        let host = FakeHost {
            // B first in the diff; the comment list still sorts A first.
            diff: "+++ b/src/B.java\n+++ b/src/A.java\n".to_string(),
            contents,
            published: Mutex::new(None),
        };
        let weights = Arc::new(WeightStore::in_memory(Config::default()));
        let pipeline = Pipeline::new(host, offline_semantic(), weights);

        let outcome = pipeline.review(&submission()).await.unwrap();
        assert_eq!(outcome.files[0].path, "src/B.java");
        let paths: Vec<_> = outcome.comments.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["src/A.java", "src/A.java", "src/B.java"]);
        assert_eq!(outcome.comments[0].line, 1);
        assert_eq!(outcome.comments[1].line, 2);
    }

    #[tokio::test]
    async fn test_dispatch_ignores_non_trigger_actions() {
        let host = FakeHost {
            diff: "+++ b/src/A.java\n".to_string(),
            contents: HashMap::new(),
            published: Mutex::new(None),
        };
        let weights = Arc::new(WeightStore::in_memory(Config::default()));
        let pipeline = Arc::new(Pipeline::new(host, offline_semantic(), weights));

        let mut ignored = submission();
        ignored.action = TriggerAction::Other;
        dispatch(Arc::clone(&pipeline), ignored).await.unwrap();
        assert!(pipeline.host.published.lock().unwrap().is_none());
    }
}
