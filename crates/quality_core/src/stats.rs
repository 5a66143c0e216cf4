//! Aggregate statistics for a validation run.

use crate::issue::QualityIssue;
use crate::severity::{Dimension, Rating, Severity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Snapshot of a batch validation run.
///
/// Histograms use `BTreeMap` so that serialized output is deterministic
/// regardless of input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityStatistics {
    /// Number of records in the batch
    pub total_records: usize,

    /// Distinct records with at least one issue
    pub records_with_issues: usize,

    /// `records_with_issues / total_records` (0 when the batch is empty)
    pub affected_fraction: f64,

    /// Issue counts per severity tier
    pub by_severity: BTreeMap<Severity, usize>,

    /// Issue counts per quality dimension
    pub by_dimension: BTreeMap<Dimension, usize>,

    /// Issue counts per rule id
    pub by_rule: BTreeMap<String, usize>,

    /// Issue counts per offending field
    pub by_field: BTreeMap<String, usize>,

    /// Most frequent rules, count-descending
    pub top_rules: Vec<(String, usize)>,

    /// Weighted quality score in [0, 100]
    pub quality_score: f64,

    /// Qualitative band for the score
    pub rating: Rating,
}

/// Worst-issue-per-record weighted score.
///
/// Each affected record contributes the penalty of its single worst issue;
/// the score is `100 × (1 − Σ penalties / total)`, floored at 0. A record
/// with twenty LOW issues weighs exactly as much as one with a single LOW
/// issue: the metric rewards fewer bad records, not fewer total issues.
pub fn weighted_score(total_records: usize, worst_per_record: &[Severity]) -> f64 {
    if total_records == 0 {
        return 100.0;
    }
    let penalty: f64 = worst_per_record.iter().map(|s| s.penalty()).sum();
    (100.0 * (1.0 - penalty / total_records as f64)).clamp(0.0, 100.0)
}

impl QualityStatistics {
    /// Aggregates a flat issue list into the run snapshot.
    pub fn from_issues(total_records: usize, issues: &[QualityIssue], top_n: usize) -> Self {
        let mut by_severity = BTreeMap::new();
        let mut by_dimension = BTreeMap::new();
        let mut by_rule: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_field: BTreeMap<String, usize> = BTreeMap::new();
        let mut worst: HashMap<&str, Severity> = HashMap::new();

        for issue in issues {
            *by_severity.entry(issue.rule.severity).or_insert(0) += 1;
            *by_dimension.entry(issue.rule.dimension).or_insert(0) += 1;
            *by_rule.entry(issue.rule.id.clone()).or_insert(0) += 1;
            *by_field.entry(issue.field_name.clone()).or_insert(0) += 1;

            worst
                .entry(issue.record_key.as_str())
                .and_modify(|s| *s = (*s).max(issue.rule.severity))
                .or_insert(issue.rule.severity);
        }

        let mut top_rules: Vec<(String, usize)> =
            by_rule.iter().map(|(id, n)| (id.clone(), *n)).collect();
        // Count-descending, id-ascending for a stable listing
        top_rules.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_rules.truncate(top_n);

        let worst_severities: Vec<Severity> = worst.values().copied().collect();
        let quality_score = weighted_score(total_records, &worst_severities);
        let records_with_issues = worst.len();
        let affected_fraction = if total_records == 0 {
            0.0
        } else {
            records_with_issues as f64 / total_records as f64
        };

        Self {
            total_records,
            records_with_issues,
            affected_fraction,
            by_severity,
            by_dimension,
            by_rule,
            by_field,
            top_rules,
            quality_score,
            rating: Rating::from_score(quality_score),
        }
    }
}
