//! The three-tier reporting pipeline.
//!
//! Stateless transforms of a [`BatchValidationResult`]; the only carried
//! state is the run stamp applied to every emitted document.

use crate::documents::{
    CategoricalMetadata, GroupReport, GroupScore, GroupStatus, IssueEntry, NumericRange,
    Priority, RecordReport, SummaryReport,
};
use crate::run::RunStamp;
use quality_core::{QualityIssue, Severity, weighted_score};
use quality_validator::{BatchValidationResult, RecordSnapshot};
use std::collections::{BTreeMap, HashMap};

/// Sentinel group for records whose grouping attribute is absent.
pub const UNASSIGNED_GROUP: &str = "Unassigned";

/// Entries kept in the per-group "top offenders" listings.
const TOP_N: usize = 5;

/// Builds the record, group, and summary projections of one batch result.
pub struct Reporter {
    run: RunStamp,
}

impl Reporter {
    /// Creates a reporter stamped for `result`.
    pub fn for_result(result: &BatchValidationResult) -> Self {
        Self {
            run: RunStamp::for_result(result),
        }
    }

    /// The opaque run identifier stamped onto every document.
    pub fn run_id(&self) -> &str {
        &self.run.run_id
    }

    /// Record-level view: one document per record with issues, sorted most
    /// urgent first (worst severity, then issue count descending).
    pub fn record_level_report(&self, result: &BatchValidationResult) -> Vec<RecordReport> {
        let groups: HashMap<&str, &str> = result
            .snapshots
            .iter()
            .map(|s| (s.key.as_str(), s.group.as_str()))
            .collect();

        let mut by_record: BTreeMap<&str, Vec<&QualityIssue>> = BTreeMap::new();
        for issue in &result.issues {
            by_record.entry(issue.record_key.as_str()).or_default().push(issue);
        }

        let mut reports: Vec<RecordReport> = by_record
            .into_iter()
            .map(|(key, issues)| {
                let tally = |severity: Severity| {
                    issues.iter().filter(|i| i.rule.severity == severity).count()
                };
                let worst = issues
                    .iter()
                    .map(|i| i.rule.severity)
                    .max()
                    .unwrap_or(Severity::Info);

                RecordReport {
                    doc_id: doc_id("record", key),
                    run_id: self.run.run_id.clone(),
                    generated_at: self.run.generated_at,
                    record_key: key.to_string(),
                    group: groups.get(key).copied().unwrap_or(UNASSIGNED_GROUP).to_string(),
                    worst_severity: worst,
                    issue_count: issues.len(),
                    priority: Priority::classify(
                        tally(Severity::Critical),
                        tally(Severity::High),
                        tally(Severity::Medium),
                    ),
                    issues: issues
                        .iter()
                        .map(|i| IssueEntry {
                            rule_id: i.rule.id.clone(),
                            dimension: i.rule.dimension,
                            severity: i.rule.severity,
                            field_name: i.field_name.clone(),
                            details: i.details.clone(),
                            suggestion: i.suggestion.clone(),
                        })
                        .collect(),
                }
            })
            .collect();

        reports.sort_by(|a, b| {
            b.worst_severity
                .cmp(&a.worst_severity)
                .then_with(|| b.issue_count.cmp(&a.issue_count))
                .then_with(|| a.record_key.cmp(&b.record_key))
        });
        reports
    }

    /// Group-level view aggregated by `grouping_key` (any snapshot
    /// attribute), sorted worst score first.
    pub fn group_level_report(
        &self,
        result: &BatchValidationResult,
        grouping_key: &str,
    ) -> Vec<GroupReport> {
        let group_of = |snapshot: &RecordSnapshot| -> String {
            snapshot
                .attrs
                .get(grouping_key)
                .cloned()
                .unwrap_or_else(|| UNASSIGNED_GROUP.to_string())
        };

        // Denominators and the record→group mapping come from the snapshots.
        let mut totals: BTreeMap<String, usize> = BTreeMap::new();
        let mut record_group: HashMap<&str, String> = HashMap::new();
        for snapshot in &result.snapshots {
            let group = group_of(snapshot);
            *totals.entry(group.clone()).or_insert(0) += 1;
            record_group.insert(snapshot.key.as_str(), group);
        }

        let mut issues_by_group: BTreeMap<&str, Vec<&QualityIssue>> = BTreeMap::new();
        for issue in &result.issues {
            if let Some(group) = record_group.get(issue.record_key.as_str()) {
                issues_by_group.entry(group.as_str()).or_default().push(issue);
            }
        }

        let mut reports: Vec<GroupReport> = totals
            .iter()
            .map(|(group, &total)| {
                let issues = issues_by_group.get(group.as_str()).cloned().unwrap_or_default();

                let mut worst: HashMap<&str, Severity> = HashMap::new();
                let mut by_severity: BTreeMap<Severity, usize> = BTreeMap::new();
                let mut field_counts: HashMap<&str, usize> = HashMap::new();
                let mut rule_counts: HashMap<&str, usize> = HashMap::new();
                for issue in &issues {
                    *by_severity.entry(issue.rule.severity).or_insert(0) += 1;
                    *field_counts.entry(issue.field_name.as_str()).or_insert(0) += 1;
                    *rule_counts.entry(issue.rule.id.as_str()).or_insert(0) += 1;
                    worst
                        .entry(issue.record_key.as_str())
                        .and_modify(|s| *s = (*s).max(issue.rule.severity))
                        .or_insert(issue.rule.severity);
                }

                let worst_severities: Vec<Severity> = worst.values().copied().collect();
                let quality_score = weighted_score(total, &worst_severities);
                let records_with_issues = worst.len();
                let error_rate = if total == 0 {
                    0.0
                } else {
                    records_with_issues as f64 / total as f64
                };

                GroupReport {
                    doc_id: doc_id("group", group),
                    run_id: self.run.run_id.clone(),
                    generated_at: self.run.generated_at,
                    group: group.clone(),
                    total_records: total,
                    records_with_issues,
                    error_rate,
                    quality_score,
                    status: GroupStatus::classify(quality_score, error_rate),
                    issue_count: issues.len(),
                    by_severity,
                    top_fields: top_counts(field_counts),
                    top_rules: top_counts(rule_counts),
                }
            })
            .collect();

        reports.sort_by(|a, b| {
            a.quality_score
                .total_cmp(&b.quality_score)
                .then_with(|| a.group.cmp(&b.group))
        });
        reports
    }

    /// Global roll-up: histograms, group leaderboards, and generated
    /// recommendations.
    pub fn summary_report(
        &self,
        result: &BatchValidationResult,
        grouping_key: &str,
    ) -> SummaryReport {
        let groups = self.group_level_report(result, grouping_key);

        let score_of = |g: &GroupReport| GroupScore {
            group: g.group.clone(),
            quality_score: g.quality_score,
        };
        // group_level_report sorts worst-first
        let bottom_groups: Vec<GroupScore> = groups.iter().take(TOP_N).map(score_of).collect();
        let top_groups: Vec<GroupScore> = groups.iter().rev().take(TOP_N).map(score_of).collect();

        SummaryReport {
            doc_id: "summary".to_string(),
            run_id: self.run.run_id.clone(),
            generated_at: self.run.generated_at,
            total_records: result.total_records,
            records_with_issues: result.stats.records_with_issues,
            total_issues: result.issues.len(),
            quality_score: result.stats.quality_score,
            rating: result.stats.rating,
            severity_histogram: result.stats.by_severity.clone(),
            dimension_histogram: result.stats.by_dimension.clone(),
            duplicate_group_count: result.duplicate_groups.len(),
            top_groups,
            recommendations: recommendations(result, &groups),
            bottom_groups,
        }
    }

    /// Distinct categorical values and numeric ranges for UI filters.
    pub fn categorical_metadata(
        &self,
        result: &BatchValidationResult,
        grouping_key: &str,
    ) -> CategoricalMetadata {
        let records = self.record_level_report(result);
        let groups = self.group_level_report(result, grouping_key);

        let mut severities: Vec<Severity> = dedup(result.issues.iter().map(|i| i.rule.severity));
        severities.sort_by(|a, b| b.cmp(a));
        let mut dimensions = dedup(result.issues.iter().map(|i| i.rule.dimension));
        dimensions.sort();
        let mut rule_ids = dedup(result.issues.iter().map(|i| i.rule.id.clone()));
        rule_ids.sort();
        let mut priorities = dedup(records.iter().map(|r| r.priority));
        priorities.sort();

        let scores: Vec<f64> = groups.iter().map(|g| g.quality_score).collect();
        let error_rates: Vec<f64> = groups.iter().map(|g| g.error_rate).collect();

        CategoricalMetadata {
            run_id: self.run.run_id.clone(),
            severities,
            dimensions,
            rule_ids,
            groups: groups.iter().map(|g| g.group.clone()).collect(),
            priorities,
            score_range: NumericRange::from_values(&scores),
            error_rate_range: NumericRange::from_values(&error_rates),
        }
    }
}

/// Stable document id: kind prefix plus the sanitized entity identifier.
fn doc_id(kind: &str, entity: &str) -> String {
    let slug: String = entity
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    format!("{kind}-{}", slug.trim_matches('-'))
}

fn top_counts(counts: HashMap<&str, usize>) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(TOP_N);
    entries
}

fn dedup<T: Ord>(items: impl Iterator<Item = T>) -> Vec<T> {
    let set: std::collections::BTreeSet<T> = items.collect();
    set.into_iter().collect()
}

/// Small rule-based recommendation generator for the summary.
fn recommendations(result: &BatchValidationResult, groups: &[GroupReport]) -> Vec<String> {
    let mut out = Vec::new();

    let critical = result
        .stats
        .by_severity
        .get(&Severity::Critical)
        .copied()
        .unwrap_or(0);
    if critical > 0 {
        out.push(format!(
            "Address the {critical} CRITICAL issue(s) immediately; affected records are unreliable for planning"
        ));
    }

    if let Some((dimension, count)) = result
        .stats
        .by_dimension
        .iter()
        .max_by_key(|(_, count)| **count)
    {
        if *count > 0 {
            out.push(format!(
                "Most issues ({count}) concern {}; prioritize that dimension in the next cleanup",
                dimension.label()
            ));
        }
    }

    let struggling = groups.iter().filter(|g| g.quality_score < 60.0).count();
    if struggling > 0 {
        out.push(format!(
            "{struggling} organizational unit(s) score below 60; schedule data-entry training with them"
        ));
    }

    if !result.duplicate_groups.is_empty() {
        out.push(format!(
            "Merge or retire the {} duplicate group(s) detected",
            result.duplicate_groups.len()
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quality_core::config::fields;
    use quality_core::{RuleConfig, ids};
    use quality_validator::{BatchValidator, Record, RecordSet, RecordValidator};

    fn clean(id: &str, unit: &str) -> Record {
        Record::new()
            .with(fields::PROJECT_ID, id)
            .with(fields::NAME, format!("Obra {id}"))
            .with(fields::STATUS, "En ejecución")
            .with(fields::PROGRESS, 40i64)
            .with(fields::MANAGING_UNIT, unit)
            .with(fields::START_DATE, "2024-01-15")
            .with(fields::CONTRACT_REF, format!("CT-{id}"))
            .with(fields::ADDRESS, "Calle 10 # 43-12")
            .with_geometry(geo::Geometry::Point(geo::Point::new(-75.5, 6.2)))
    }

    fn validate(records: Vec<Record>) -> BatchValidationResult {
        let validator = RecordValidator::new(RuleConfig::default());
        BatchValidator::new(validator).validate_all(&RecordSet::from_records(records))
    }

    #[test]
    fn test_record_reports_sorted_worst_first() {
        // OBR-2 carries a CRITICAL (no identifier is impossible here, so use
        // degenerate coordinates); OBR-1 only a LOW address issue.
        let result = validate(vec![
            clean("OBR-1", "Secretaría de Salud").with(fields::ADDRESS, ""),
            clean("OBR-2", "Secretaría de Salud")
                .with_geometry(geo::Geometry::Point(geo::Point::new(0.0, 0.0))),
        ]);

        let reporter = Reporter::for_result(&result);
        let reports = reporter.record_level_report(&result);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].record_key, "OBR-2");
        assert_eq!(reports[0].worst_severity, Severity::Critical);
        assert_eq!(reports[0].priority, Priority::P1);
        assert!(reports[0].doc_id.starts_with("record-obr-2"));
        assert_eq!(reports[1].priority, Priority::P3);
    }

    #[test]
    fn test_exactly_one_critical_is_p1_not_p0() {
        let result = validate(vec![clean("OBR-1", "Secretaría de Salud")
            .with_geometry(geo::Geometry::Point(geo::Point::new(0.0, 0.0)))]);
        let reporter = Reporter::for_result(&result);
        let reports = reporter.record_level_report(&result);
        let critical_count = reports[0]
            .issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count();
        assert_eq!(critical_count, 1);
        assert_eq!(reports[0].priority, Priority::P1);
    }

    #[test]
    fn test_group_report_clean_group_is_excellent() {
        // A unit with 40 records and not a single issue.
        let records: Vec<Record> = (0..40)
            .map(|i| clean(&format!("OBR-{i}"), "Secretaría de Educación"))
            .collect();
        let result = validate(records);

        let reporter = Reporter::for_result(&result);
        let groups = reporter.group_level_report(&result, fields::MANAGING_UNIT);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group, "Secretaría de Educación");
        assert_eq!(groups[0].total_records, 40);
        assert_eq!(groups[0].error_rate, 0.0);
        assert_eq!(groups[0].quality_score, 100.0);
        assert_eq!(groups[0].status, GroupStatus::Excellent);
    }

    #[test]
    fn test_group_report_scoped_scores() {
        let mut records = vec![
            // Salud: 1 of 2 records critical
            clean("OBR-1", "Secretaría de Salud")
                .with_geometry(geo::Geometry::Point(geo::Point::new(0.0, 0.0))),
            clean("OBR-2", "Secretaría de Salud"),
        ];
        // Educación: 4 clean records
        for i in 3..7 {
            records.push(clean(&format!("OBR-{i}"), "Secretaría de Educación"));
        }
        let result = validate(records);

        let reporter = Reporter::for_result(&result);
        let groups = reporter.group_level_report(&result, fields::MANAGING_UNIT);
        assert_eq!(groups.len(), 2);
        // Worst first: Salud scores 100 × (1 − 1.0/2) = 50
        assert_eq!(groups[0].group, "Secretaría de Salud");
        assert_eq!(groups[0].quality_score, 50.0);
        assert_eq!(groups[0].error_rate, 0.5);
        assert_eq!(groups[1].group, "Secretaría de Educación");
        assert_eq!(groups[1].quality_score, 100.0);
    }

    #[test]
    fn test_missing_group_attribute_uses_sentinel() {
        let record = Record::new()
            .with(fields::PROJECT_ID, "OBR-1")
            .with(fields::NAME, "Obra")
            .with(fields::STATUS, "Sin iniciar")
            .with(fields::PROGRESS, 0i64);
        let result = validate(vec![record]);

        let reporter = Reporter::for_result(&result);
        let groups = reporter.group_level_report(&result, fields::MANAGING_UNIT);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group, UNASSIGNED_GROUP);
    }

    #[test]
    fn test_summary_recommendations() {
        let twin = clean("OBR-1", "Secretaría de Salud")
            .with_geometry(geo::Geometry::Point(geo::Point::new(0.0, 0.0)));
        let result = validate(vec![twin.clone(), twin]);

        let reporter = Reporter::for_result(&result);
        let summary = reporter.summary_report(&result, fields::MANAGING_UNIT);

        assert_eq!(summary.duplicate_group_count, 1);
        assert!(summary
            .recommendations
            .iter()
            .any(|r| r.contains("CRITICAL")));
        assert!(summary.recommendations.iter().any(|r| r.contains("duplicate")));
        assert!(summary
            .recommendations
            .iter()
            .any(|r| r.contains("below 60")));
    }

    #[test]
    fn test_summary_clean_run_has_no_recommendations() {
        let result = validate(vec![clean("OBR-1", "Secretaría de Salud")]);
        let reporter = Reporter::for_result(&result);
        let summary = reporter.summary_report(&result, fields::MANAGING_UNIT);
        assert_eq!(summary.quality_score, 100.0);
        assert!(summary.recommendations.is_empty());
    }

    #[test]
    fn test_categorical_metadata() {
        let result = validate(vec![
            clean("OBR-1", "Secretaría de Salud").with(fields::ADDRESS, ""),
            clean("OBR-2", "Secretaría de Educación")
                .with_geometry(geo::Geometry::Point(geo::Point::new(0.0, 0.0))),
        ]);

        let reporter = Reporter::for_result(&result);
        let meta = reporter.categorical_metadata(&result, fields::MANAGING_UNIT);

        assert!(meta.severities.contains(&Severity::Critical));
        assert!(meta.rule_ids.contains(&ids::PA003.to_string()));
        assert_eq!(meta.groups.len(), 2);
        assert!(meta.score_range.is_some());
        // Salud's only record carries a LOW issue: 100 × (1 − 0.1) = 90
        let range = meta.score_range.unwrap();
        assert_eq!(range.max, 90.0);
        assert_eq!(range.min, 0.0);
    }
}
