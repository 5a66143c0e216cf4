//! JSON-directory report sink.
//!
//! One document per file, keyed by the stable doc id, so reruns overwrite in
//! place. When a tracked field of an existing document changed, an
//! append-only entry goes to `changelog.jsonl` before the overwrite.

use chrono::Utc;
use quality_report::{ChangelogEntry, GroupReport, RecordReport, ReportSink, SinkError, SummaryReport};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Fields whose transitions are worth a changelog entry.
const RECORD_TRACKED: &[&str] = &["priority", "worst_severity", "issue_count"];
const GROUP_TRACKED: &[&str] = &["quality_score", "status", "error_rate"];

pub struct JsonDirSink {
    root: PathBuf,
}

impl JsonDirSink {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let root = root.into();
        fs::create_dir_all(root.join("records"))?;
        fs::create_dir_all(root.join("groups"))?;
        Ok(Self { root })
    }

    fn upsert(
        &self,
        path: &Path,
        document: Value,
        tracked: &[&str],
        doc_id: &str,
        run_id: &str,
    ) -> Result<(), SinkError> {
        if let Ok(existing) = fs::read_to_string(path) {
            if let Ok(old) = serde_json::from_str::<Value>(&existing) {
                let changes = tracked_changes(&old, &document, tracked, doc_id, run_id);
                if !changes.is_empty() {
                    self.append_changelog(&changes)?;
                }
            }
        }

        fs::write(path, serde_json::to_string_pretty(&document)?)?;
        Ok(())
    }

    fn append_changelog(&self, entries: &[ChangelogEntry]) -> Result<(), SinkError> {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.root.join("changelog.jsonl"))?;
        for entry in entries {
            writeln!(file, "{}", serde_json::to_string(entry)?)?;
        }
        Ok(())
    }
}

fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Diffs the tracked fields of two document versions.
fn tracked_changes(
    old: &Value,
    new: &Value,
    tracked: &[&str],
    doc_id: &str,
    run_id: &str,
) -> Vec<ChangelogEntry> {
    tracked
        .iter()
        .filter(|field| old.get(**field) != new.get(**field))
        .map(|field| ChangelogEntry {
            doc_id: doc_id.to_string(),
            field: field.to_string(),
            old_value: render(old.get(*field)),
            new_value: render(new.get(*field)),
            run_id: run_id.to_string(),
            changed_at: Utc::now(),
        })
        .collect()
}

impl ReportSink for JsonDirSink {
    fn write_record_report(&mut self, report: &RecordReport) -> Result<(), SinkError> {
        let path = self.root.join("records").join(format!("{}.json", report.doc_id));
        self.upsert(
            &path,
            serde_json::to_value(report)?,
            RECORD_TRACKED,
            &report.doc_id,
            &report.run_id,
        )
    }

    fn write_group_report(&mut self, report: &GroupReport) -> Result<(), SinkError> {
        let path = self.root.join("groups").join(format!("{}.json", report.doc_id));
        self.upsert(
            &path,
            serde_json::to_value(report)?,
            GROUP_TRACKED,
            &report.doc_id,
            &report.run_id,
        )
    }

    fn write_summary(&mut self, report: &SummaryReport) -> Result<(), SinkError> {
        let path = self.root.join("summary.json");
        fs::write(&path, serde_json::to_string_pretty(report)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quality_core::RuleConfig;
    use quality_core::config::fields;
    use quality_report::{Reporter, persist_reports};
    use quality_validator::{BatchValidator, Record, RecordSet, RecordValidator};

    fn run_batch(records: Vec<Record>, dir: &Path) -> usize {
        let result = BatchValidator::new(RecordValidator::new(RuleConfig::default()))
            .validate_all(&RecordSet::from_records(records));
        let reporter = Reporter::for_result(&result);
        let record_reports = reporter.record_level_report(&result);
        let group_reports = reporter.group_level_report(&result, fields::MANAGING_UNIT);
        let summary = reporter.summary_report(&result, fields::MANAGING_UNIT);

        let mut sink = JsonDirSink::new(dir).unwrap();
        persist_reports(&mut sink, &record_reports, &group_reports, &summary)
    }

    fn bad_record(progress: i64) -> Record {
        Record::new()
            .with(fields::PROJECT_ID, "OBR-1")
            .with(fields::STATUS, "Terminado")
            .with(fields::PROGRESS, progress)
    }

    #[test]
    fn test_documents_written_per_tier() {
        let dir = tempfile::tempdir().unwrap();
        let failures = run_batch(vec![bad_record(60)], dir.path());
        assert_eq!(failures, 0);

        assert!(dir.path().join("summary.json").exists());
        assert!(dir.path().join("records/record-obr-1.json").exists());
        assert!(dir.path().join("groups/group-unassigned.json").exists());
        // First run: nothing changed, so no changelog
        assert!(!dir.path().join("changelog.jsonl").exists());
    }

    #[test]
    fn test_rerun_without_changes_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        run_batch(vec![bad_record(60)], dir.path());
        run_batch(vec![bad_record(60)], dir.path());

        // Same tracked values: the changelog stays absent
        assert!(!dir.path().join("changelog.jsonl").exists());
    }

    #[test]
    fn test_changed_tracked_field_appends_changelog() {
        let dir = tempfile::tempdir().unwrap();
        run_batch(vec![bad_record(60)], dir.path());
        // The record gains issues (progress now also out of range)
        run_batch(vec![bad_record(130)], dir.path());

        let changelog = fs::read_to_string(dir.path().join("changelog.jsonl")).unwrap();
        assert!(changelog.lines().count() >= 1);
        assert!(changelog.contains("issue_count"));
    }
}
