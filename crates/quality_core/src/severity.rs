//! Severity tiers, quality dimensions, and rating bands.
//!
//! Severity and priority were string comparisons in earlier incarnations of
//! this pipeline; here they are proper ordered enums so that "worst issue"
//! logic is a plain `max()`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Impact tier of a single quality issue.
///
/// Totally ordered: `Info < Low < Medium < High < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Informational finding, no penalty
    Info,
    /// Cosmetic or low-impact defect
    Low,
    /// Defect that degrades usability of the record
    Medium,
    /// Defect that makes the record unreliable
    High,
    /// Defect that makes the record unusable or misleading
    Critical,
}

impl Severity {
    /// Per-record penalty weight used by the quality score.
    ///
    /// A record is weighted by its single worst issue, so these weights are
    /// per record, not per issue.
    pub fn penalty(self) -> f64 {
        match self {
            Severity::Critical => 1.0,
            Severity::High => 0.7,
            Severity::Medium => 0.3,
            Severity::Low => 0.1,
            Severity::Info => 0.0,
        }
    }

    /// All tiers, worst first.
    pub fn all() -> [Severity; 5] {
        [
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
            Severity::Info,
        ]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Info => "INFO",
        };
        f.write_str(label)
    }
}

/// ISO-19157-inspired quality dimension graded by a rule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Internal congruence of attribute values and geometry
    LogicalConsistency,
    /// Presence of required attributes and geometry
    Completeness,
    /// Coordinate plausibility and administrative containment
    PositionalAccuracy,
    /// Categorical values drawn from the official catalogs
    ThematicAccuracy,
    /// Date parseability, ordering, and plausibility
    TemporalQuality,
}

impl Dimension {
    /// Human-readable label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::LogicalConsistency => "Logical Consistency",
            Dimension::Completeness => "Completeness",
            Dimension::PositionalAccuracy => "Positional Accuracy",
            Dimension::ThematicAccuracy => "Thematic Accuracy",
            Dimension::TemporalQuality => "Temporal Quality",
        }
    }

    /// All five dimensions.
    pub fn all() -> [Dimension; 5] {
        [
            Dimension::LogicalConsistency,
            Dimension::Completeness,
            Dimension::PositionalAccuracy,
            Dimension::ThematicAccuracy,
            Dimension::TemporalQuality,
        ]
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Qualitative rating band derived from a quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    Excellent,
    Good,
    Acceptable,
    NeedsImprovement,
    Critical,
}

impl Rating {
    /// Maps a score in [0, 100] to its rating band.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Rating::Excellent
        } else if score >= 75.0 {
            Rating::Good
        } else if score >= 60.0 {
            Rating::Acceptable
        } else if score >= 40.0 {
            Rating::NeedsImprovement
        } else {
            Rating::Critical
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rating::Excellent => "EXCELLENT",
            Rating::Good => "GOOD",
            Rating::Acceptable => "ACCEPTABLE",
            Rating::NeedsImprovement => "NEEDS-IMPROVEMENT",
            Rating::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}
