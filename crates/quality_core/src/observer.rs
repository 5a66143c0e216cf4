//! Observer extension points for validation runs.
//!
//! Validation logic never prints; callers supply an observer (or rely on the
//! tracing-backed default) for progress and summary output.

use crate::issue::QualityIssue;
use crate::stats::QualityStatistics;

/// Callbacks invoked by the batch validator at well-defined points.
///
/// All methods have no-op defaults so implementors override only what they
/// need.
pub trait ValidationObserver: Send + Sync {
    /// Called once per record that produced at least one issue.
    fn record_issues(&self, record_key: &str, issues: &[QualityIssue]) {
        let _ = (record_key, issues);
    }

    /// Called once after the whole batch has been validated.
    fn run_complete(&self, stats: &QualityStatistics) {
        let _ = stats;
    }
}

/// Observer that forwards to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ValidationObserver for TracingObserver {
    fn record_issues(&self, record_key: &str, issues: &[QualityIssue]) {
        tracing::debug!(record = record_key, issues = issues.len(), "record flagged");
    }

    fn run_complete(&self, stats: &QualityStatistics) {
        tracing::info!(
            records = stats.total_records,
            flagged = stats.records_with_issues,
            score = stats.quality_score,
            rating = %stats.rating,
            "validation run complete"
        );
    }
}
