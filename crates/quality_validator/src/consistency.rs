//! Logical-consistency rules (LC001–LC007).
//!
//! LC008 (full-record duplication) is a batch-level rule and lives with the
//! duplicate scan in the engine.

use crate::record::Record;
use geo::Validation;
use quality_core::config::fields;
use quality_core::{QualityIssue, RuleCatalog, RuleConfig, ids};

/// Validates the logical-consistency rule group on one record.
pub struct ConsistencyChecks;

impl ConsistencyChecks {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(
        &self,
        catalog: &RuleCatalog,
        config: &RuleConfig,
        record: &Record,
        key: &str,
    ) -> Vec<QualityIssue> {
        let mut issues = Vec::new();

        // LC003: permissive coercion failed on a field expected to be numeric.
        // One issue per record, naming every offending field, so that a
        // coercion failure is distinguishable from "valid but out of range".
        let non_numeric: Vec<&str> = config
            .numeric_fields()
            .into_iter()
            .filter(|f| {
                record
                    .value(f)
                    .is_some_and(|v| v.as_number().is_none())
            })
            .collect();
        if let Some(first) = non_numeric.first() {
            let current = record
                .value(first)
                .map(|v| v.display())
                .unwrap_or_default();
            if let Some(issue) = QualityIssue::for_rule(
                catalog,
                ids::LC003,
                key,
                first,
                format!(
                    "Non-numeric value in numeric field(s): {}",
                    non_numeric.join(", ")
                ),
            ) {
                issues.push(issue.with_current(current).with_expected("numeric value"));
            }
        }

        // LC002: progress outside [0, 100]. Raised independently of any
        // LC001 carve-out.
        if let Some(progress) = record.number(fields::PROGRESS) {
            if !(0.0..=100.0).contains(&progress) {
                if let Some(issue) = QualityIssue::for_rule(
                    catalog,
                    ids::LC002,
                    key,
                    fields::PROGRESS,
                    format!("Progress {progress} is outside the valid percentage range"),
                ) {
                    issues.push(
                        issue
                            .with_current(progress.to_string())
                            .with_expected("0..=100"),
                    );
                }
            }
        }

        // LC001: status/progress congruence.
        if let Some(status) = record.text(fields::STATUS) {
            if let Some(progress) = record.number(fields::PROGRESS) {
                if let Some(issue) = self.congruence(catalog, config, key, status, progress) {
                    issues.push(issue);
                }
            }
        }

        // LC004: negative money amounts.
        let negative_money: Vec<&str> = config
            .money_fields
            .iter()
            .map(String::as_str)
            .filter(|f| record.number(f).is_some_and(|n| n < 0.0))
            .collect();
        if let Some(first) = negative_money.first() {
            if let Some(issue) = QualityIssue::for_rule(
                catalog,
                ids::LC004,
                key,
                first,
                format!("Negative amount in: {}", negative_money.join(", ")),
            ) {
                issues.push(issue.with_expected(">= 0"));
            }
        }

        // LC005: non-positive quantities.
        let bad_quantities: Vec<&str> = config
            .quantity_fields
            .iter()
            .map(String::as_str)
            .filter(|f| record.number(f).is_some_and(|n| n <= 0.0))
            .collect();
        if let Some(first) = bad_quantities.first() {
            if let Some(issue) = QualityIssue::for_rule(
                catalog,
                ids::LC005,
                key,
                first,
                format!("Non-positive quantity in: {}", bad_quantities.join(", ")),
            ) {
                issues.push(issue.with_expected("> 0"));
            }
        }

        // LC007: fiscal year outside the configured window.
        if let Some(year) = record.number(fields::YEAR) {
            if year < config.earliest_year as f64 || year > config.latest_year as f64 {
                if let Some(issue) = QualityIssue::for_rule(
                    catalog,
                    ids::LC007,
                    key,
                    fields::YEAR,
                    format!(
                        "Year {year} is outside {}..={}",
                        config.earliest_year, config.latest_year
                    ),
                ) {
                    issues.push(issue.with_current(year.to_string()));
                }
            }
        }

        // LC006: geometry self-validity.
        if let Some(geometry) = record.geometry() {
            if !geometry.is_valid() {
                if let Some(issue) = QualityIssue::for_rule(
                    catalog,
                    ids::LC006,
                    key,
                    "geometry",
                    "Geometry is invalid (unclosed ring or self-intersection)",
                ) {
                    issues.push(issue);
                }
            }
        }

        issues
    }

    /// The LC001 congruence rule.
    ///
    /// The exempt set is checked first, as an explicit carve-out. The
    /// branches are mutually exclusive, so a record gets at most one LC001
    /// issue.
    fn congruence(
        &self,
        catalog: &RuleCatalog,
        config: &RuleConfig,
        key: &str,
        status: &str,
        progress: f64,
    ) -> Option<QualityIssue> {
        let policy = &config.status_policy;

        if policy.is_exempt(status) {
            return None;
        }

        if policy.is_inaugurated(status) {
            if progress != 100.0 {
                return QualityIssue::for_rule(
                    catalog,
                    ids::LC001,
                    key,
                    fields::PROGRESS,
                    format!("Status '{status}' requires exactly 100% progress, found {progress}"),
                )
                .map(|i| i.with_current(progress.to_string()).with_expected("100"));
            }
            return None;
        }

        if policy.is_terminal(status) {
            if progress != 100.0 {
                return QualityIssue::for_rule(
                    catalog,
                    ids::LC001,
                    key,
                    fields::PROGRESS,
                    format!("Status '{status}' is terminal but progress is {progress}"),
                )
                .map(|i| {
                    i.with_current(progress.to_string())
                        .with_expected("100")
                        .with_suggestion(format!(
                            "Set progress to 100 or status to '{}'",
                            policy.in_progress_suggestion
                        ))
                });
            }
            return None;
        }

        if policy.is_start(status) {
            if progress != 0.0 {
                return QualityIssue::for_rule(
                    catalog,
                    ids::LC001,
                    key,
                    fields::PROGRESS,
                    format!("Status '{status}' means work has not begun, but progress is {progress}"),
                )
                .map(|i| i.with_current(progress.to_string()).with_expected("0"));
            }
            return None;
        }

        // Active statuses: only a claimed 100% is incongruent.
        if progress == 100.0 {
            return QualityIssue::for_rule(
                catalog,
                ids::LC001,
                key,
                fields::STATUS,
                format!("Progress is 100% but status '{status}' is not terminal"),
            )
            .map(|i| {
                i.with_current(status.to_string())
                    .with_suggestion("Mark the project as finished or correct the progress")
            });
        }

        None
    }
}

impl Default for ConsistencyChecks {
    fn default() -> Self {
        Self::new()
    }
}
