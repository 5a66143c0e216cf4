//! Report document shapes.
//!
//! Three write-once projections of a batch result (record, group, summary)
//! plus the UI-facing categorical metadata. Every document carries the run
//! stamp; document ids are stable per record/group so sink upserts stay
//! idempotent across reruns.

use chrono::{DateTime, Utc};
use quality_core::{Dimension, Rating, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Urgency tier of one record, combining worst severity and issue volume.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Priority {
    P0,
    P1,
    P2,
    P3,
}

impl Priority {
    /// Fixed classification thresholds.
    ///
    /// P0: ≥5 critical. P1: any critical, or ≥10 high. P2: any high, or
    /// ≥15 medium. P3: everything else.
    pub fn classify(critical: usize, high: usize, medium: usize) -> Self {
        if critical >= 5 {
            Priority::P0
        } else if critical >= 1 || high >= 10 {
            Priority::P1
        } else if high >= 1 || medium >= 15 {
            Priority::P2
        } else {
            Priority::P3
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::P0 => "P0",
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
        };
        f.write_str(label)
    }
}

/// One issue as embedded in a record document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueEntry {
    pub rule_id: String,
    pub dimension: Dimension,
    pub severity: Severity,
    pub field_name: String,
    pub details: String,
    pub suggestion: Option<String>,
}

/// Record-level document: one per record with issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordReport {
    /// Stable document id derived from the record key
    pub doc_id: String,
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub record_key: String,

    /// Organizational unit of the record (default grouping)
    pub group: String,
    pub worst_severity: Severity,
    pub issue_count: usize,
    pub priority: Priority,
    pub issues: Vec<IssueEntry>,
}

/// Status band of an organizational unit, from score plus error rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupStatus {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl GroupStatus {
    /// Combined score/error-rate thresholds.
    pub fn classify(score: f64, error_rate: f64) -> Self {
        if score >= 90.0 && error_rate <= 0.10 {
            GroupStatus::Excellent
        } else if score >= 75.0 && error_rate <= 0.25 {
            GroupStatus::Good
        } else if score >= 60.0 && error_rate <= 0.40 {
            GroupStatus::Fair
        } else if score >= 40.0 {
            GroupStatus::Poor
        } else {
            GroupStatus::Critical
        }
    }
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GroupStatus::Excellent => "EXCELLENT",
            GroupStatus::Good => "GOOD",
            GroupStatus::Fair => "FAIR",
            GroupStatus::Poor => "POOR",
            GroupStatus::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

/// Group-level document: one per organizational unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupReport {
    /// Stable document id derived from the group name
    pub doc_id: String,
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub group: String,
    pub total_records: usize,
    pub records_with_issues: usize,

    /// `records_with_issues / total_records`
    pub error_rate: f64,

    /// Weighted score scoped to this group's records
    pub quality_score: f64,
    pub status: GroupStatus,
    pub issue_count: usize,
    pub by_severity: BTreeMap<Severity, usize>,

    /// Most frequently offending fields, count-descending
    pub top_fields: Vec<(String, usize)>,

    /// Most frequently violated rules, count-descending
    pub top_rules: Vec<(String, usize)>,
}

/// A group name with its score, for the summary leaderboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupScore {
    pub group: String,
    pub quality_score: f64,
}

/// Global summary document: one per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub doc_id: String,
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub total_records: usize,
    pub records_with_issues: usize,
    pub total_issues: usize,
    pub quality_score: f64,
    pub rating: Rating,
    pub severity_histogram: BTreeMap<Severity, usize>,
    pub dimension_histogram: BTreeMap<Dimension, usize>,
    pub duplicate_group_count: usize,
    pub top_groups: Vec<GroupScore>,
    pub bottom_groups: Vec<GroupScore>,
    pub recommendations: Vec<String>,
}

/// Min/max/mean/median of a numeric axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl NumericRange {
    /// Computes the range over raw values; `None` for an empty axis.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            min,
            max,
            mean,
            median,
        })
    }
}

/// Distinct values per categorical axis plus numeric ranges, for UI filter
/// and sort population. No business logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalMetadata {
    pub run_id: String,
    pub severities: Vec<Severity>,
    pub dimensions: Vec<Dimension>,
    pub rule_ids: Vec<String>,
    pub groups: Vec<String>,
    pub priorities: Vec<Priority>,
    pub score_range: Option<NumericRange>,
    pub error_rate_range: Option<NumericRange>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_priority_thresholds() {
        assert_eq!(Priority::classify(5, 0, 0), Priority::P0);
        assert_eq!(Priority::classify(6, 20, 0), Priority::P0);
        // Exactly one critical is P1, never P0
        assert_eq!(Priority::classify(1, 0, 0), Priority::P1);
        assert_eq!(Priority::classify(4, 0, 0), Priority::P1);
        assert_eq!(Priority::classify(0, 10, 0), Priority::P1);
        assert_eq!(Priority::classify(0, 1, 0), Priority::P2);
        assert_eq!(Priority::classify(0, 0, 15), Priority::P2);
        assert_eq!(Priority::classify(0, 0, 14), Priority::P3);
        assert_eq!(Priority::classify(0, 0, 0), Priority::P3);
    }

    #[test]
    fn test_priority_orders_worst_first() {
        assert!(Priority::P0 < Priority::P1);
        assert!(Priority::P2 < Priority::P3);
    }

    #[test]
    fn test_group_status_bands() {
        assert_eq!(GroupStatus::classify(100.0, 0.0), GroupStatus::Excellent);
        assert_eq!(GroupStatus::classify(92.0, 0.2), GroupStatus::Good);
        assert_eq!(GroupStatus::classify(80.0, 0.05), GroupStatus::Good);
        assert_eq!(GroupStatus::classify(65.0, 0.35), GroupStatus::Fair);
        assert_eq!(GroupStatus::classify(50.0, 0.8), GroupStatus::Poor);
        assert_eq!(GroupStatus::classify(20.0, 0.9), GroupStatus::Critical);
    }

    #[test]
    fn test_numeric_range() {
        let range = NumericRange::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(range.min, 1.0);
        assert_eq!(range.max, 4.0);
        assert_eq!(range.mean, 2.5);
        assert_eq!(range.median, 2.5);

        let range = NumericRange::from_values(&[5.0, 1.0, 3.0]).unwrap();
        assert_eq!(range.median, 3.0);

        assert!(NumericRange::from_values(&[]).is_none());
    }
}
