//! Temporal-quality rules (TQ001–TQ005).

use crate::record::Record;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use quality_core::config::fields;
use quality_core::{QualityIssue, RuleCatalog, RuleConfig, ids};

/// Date formats accepted from spreadsheet and API exports.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Parses a date in any accepted format; ISO timestamps keep the date part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Validates the temporal-quality rule group on one record.
pub struct TemporalChecks;

impl TemporalChecks {
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

        // TQ002: parse both date attributes; unparseable ones collapse into
        // one "garbage data" issue so downstream can tell format noise from
        // valid-but-wrong dates.
        let mut unparseable: Vec<&str> = Vec::new();
        let mut parse = |field: &'static str| -> Option<NaiveDate> {
            let raw = record.text(field)?;
            match parse_date(raw) {
                Some(date) => Some(date),
                None => {
                    unparseable.push(field);
                    None
                }
            }
        };
        let start = parse(fields::START_DATE);
        let end = parse(fields::END_DATE);

        if let Some(first) = unparseable.first() {
            let current = record.text(first).unwrap_or_default();
            if let Some(issue) = QualityIssue::for_rule(
                catalog,
                ids::TQ002,
                key,
                first,
                format!("Unparseable date(s) in: {}", unparseable.join(", ")),
            ) {
                issues.push(
                    issue
                        .with_current(current.to_string())
                        .with_expected(DATE_FORMATS.join(" | ")),
                );
            }
        }

        // TQ001: ordering.
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                if let Some(issue) = QualityIssue::for_rule(
                    catalog,
                    ids::TQ001,
                    key,
                    fields::START_DATE,
                    format!("Start date {start} is after end date {end}"),
                ) {
                    issues.push(issue);
                }
            } else {
                // TQ005: duration bound (only meaningful once ordered).
                let duration = (end - start).num_days();
                if duration > config.max_duration_days {
                    if let Some(issue) = QualityIssue::for_rule(
                        catalog,
                        ids::TQ005,
                        key,
                        fields::END_DATE,
                        format!(
                            "Duration of {duration} days exceeds the {} day bound",
                            config.max_duration_days
                        ),
                    ) {
                        issues.push(issue);
                    }
                }
            }
        }

        // TQ003: dates inside the configured year window.
        let out_of_window: Vec<&str> = [
            (fields::START_DATE, start),
            (fields::END_DATE, end),
        ]
        .into_iter()
        .filter_map(|(field, date)| {
            let year = date?.year();
            (year < config.earliest_year || year > config.latest_year).then_some(field)
        })
        .collect();
        if let Some(first) = out_of_window.first() {
            if let Some(issue) = QualityIssue::for_rule(
                catalog,
                ids::TQ003,
                key,
                first,
                format!(
                    "Date(s) outside {}..={}: {}",
                    config.earliest_year,
                    config.latest_year,
                    out_of_window.join(", ")
                ),
            ) {
                issues.push(issue);
            }
        }

        // TQ004: a finished project cannot end in the future.
        if let Some(status) = record.text(fields::STATUS) {
            if config.status_policy.is_terminal(status) {
                if let Some(end) = end {
                    let today = Utc::now().date_naive();
                    if end > today {
                        if let Some(issue) = QualityIssue::for_rule(
                            catalog,
                            ids::TQ004,
                            key,
                            fields::END_DATE,
                            format!("Status '{status}' is terminal but the end date {end} is in the future"),
                        ) {
                            issues.push(issue.with_current(end.to_string()));
                        }
                    }
                }
            }
        }

        issues
    }
}

impl Default for TemporalChecks {
    fn default() -> Self {
        Self::new()
    }
}
