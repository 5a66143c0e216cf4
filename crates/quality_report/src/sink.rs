//! Sink boundary for report persistence.
//!
//! Sinks are excluded collaborators (document stores, object stores); the
//! core hands them finished documents and treats every write as
//! fire-and-forget. A sink failure is logged and never rolls back or
//! invalidates the in-memory result.

use crate::documents::{GroupReport, RecordReport, SummaryReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a sink adapter may surface.
#[derive(Debug, Error)]
pub enum SinkError {
    /// I/O failure in the backing store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend-specific failure
    #[error("{0}")]
    Backend(String),
}

/// Destination for the three report tiers.
///
/// Writes are expected to be idempotent upserts keyed by `doc_id`, so
/// reruns do not duplicate documents.
pub trait ReportSink {
    fn write_record_report(&mut self, report: &RecordReport) -> Result<(), SinkError>;

    fn write_group_report(&mut self, report: &GroupReport) -> Result<(), SinkError>;

    fn write_summary(&mut self, report: &SummaryReport) -> Result<(), SinkError>;
}

/// Append-only changelog entry, emitted only when a tracked field of an
/// existing record-level document changed between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub doc_id: String,
    pub field: String,
    pub old_value: String,
    pub new_value: String,
    pub run_id: String,
    pub changed_at: DateTime<Utc>,
}

/// Persists all three tiers, best effort.
///
/// Failures are logged per document and swallowed; the return value is the
/// number of failed writes, for callers that want to surface a tally.
pub fn persist_reports(
    sink: &mut dyn ReportSink,
    records: &[RecordReport],
    groups: &[GroupReport],
    summary: &SummaryReport,
) -> usize {
    let mut failures = 0;

    for report in records {
        if let Err(err) = sink.write_record_report(report) {
            tracing::error!(doc_id = %report.doc_id, error = %err, "record report write failed");
            failures += 1;
        }
    }
    for report in groups {
        if let Err(err) = sink.write_group_report(report) {
            tracing::error!(doc_id = %report.doc_id, error = %err, "group report write failed");
            failures += 1;
        }
    }
    if let Err(err) = sink.write_summary(summary) {
        tracing::error!(doc_id = %summary.doc_id, error = %err, "summary write failed");
        failures += 1;
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::Reporter;
    use pretty_assertions::assert_eq;
    use quality_core::RuleConfig;
    use quality_core::config::fields;
    use quality_validator::{BatchValidator, Record, RecordSet, RecordValidator};

    /// Sink that fails every write, for the fire-and-forget contract.
    struct FailingSink;

    impl ReportSink for FailingSink {
        fn write_record_report(&mut self, _: &RecordReport) -> Result<(), SinkError> {
            Err(SinkError::Backend("unavailable".to_string()))
        }
        fn write_group_report(&mut self, _: &GroupReport) -> Result<(), SinkError> {
            Err(SinkError::Backend("unavailable".to_string()))
        }
        fn write_summary(&mut self, _: &SummaryReport) -> Result<(), SinkError> {
            Err(SinkError::Backend("unavailable".to_string()))
        }
    }

    #[derive(Default)]
    struct MemorySink {
        records: Vec<RecordReport>,
        groups: Vec<GroupReport>,
        summaries: Vec<SummaryReport>,
    }

    impl ReportSink for MemorySink {
        fn write_record_report(&mut self, report: &RecordReport) -> Result<(), SinkError> {
            self.records.push(report.clone());
            Ok(())
        }
        fn write_group_report(&mut self, report: &GroupReport) -> Result<(), SinkError> {
            self.groups.push(report.clone());
            Ok(())
        }
        fn write_summary(&mut self, report: &SummaryReport) -> Result<(), SinkError> {
            self.summaries.push(report.clone());
            Ok(())
        }
    }

    fn sample_reports() -> (Vec<RecordReport>, Vec<GroupReport>, SummaryReport) {
        let records = RecordSet::from_records(vec![
            Record::new()
                .with(fields::PROJECT_ID, "OBR-1")
                .with(fields::STATUS, "Terminado")
                .with(fields::PROGRESS, 60i64),
        ]);
        let result =
            BatchValidator::new(RecordValidator::new(RuleConfig::default())).validate_all(&records);
        let reporter = Reporter::for_result(&result);
        (
            reporter.record_level_report(&result),
            reporter.group_level_report(&result, fields::MANAGING_UNIT),
            reporter.summary_report(&result, fields::MANAGING_UNIT),
        )
    }

    #[test]
    fn test_persist_best_effort_counts_failures() {
        let (records, groups, summary) = sample_reports();
        let expected = records.len() + groups.len() + 1;

        let failures = persist_reports(&mut FailingSink, &records, &groups, &summary);
        assert_eq!(failures, expected);
    }

    #[test]
    fn test_persist_writes_all_tiers() {
        let (records, groups, summary) = sample_reports();
        let mut sink = MemorySink::default();

        let failures = persist_reports(&mut sink, &records, &groups, &summary);
        assert_eq!(failures, 0);
        assert_eq!(sink.records.len(), records.len());
        assert_eq!(sink.groups.len(), groups.len());
        assert_eq!(sink.summaries.len(), 1);
    }
}
