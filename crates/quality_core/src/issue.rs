//! Quality issues: one detected violation of a catalog rule.
//!
//! Issues are data, not errors. Business-rule violations never surface as
//! `Err` values; they travel as `QualityIssue`s all the way into the reports.

use crate::catalog::{RuleCatalog, ValidationRule};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One detected violation of a validation rule.
///
/// Immutable after creation; owned by the batch result until the reporter
/// consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityIssue {
    /// The violated rule (copied from the catalog, never mutated)
    pub rule: ValidationRule,

    /// Identifying key of the offending record
    pub record_key: String,

    /// The offending field
    pub field_name: String,

    /// The value found, rendered as text
    pub current_value: Option<String>,

    /// The value (or shape) that was expected
    pub expected_value: Option<String>,

    /// Free-text explanation of the violation
    pub details: String,

    /// Optional remediation hint ("did you mean ...")
    pub suggestion: Option<String>,

    /// When the issue was detected
    pub detected_at: DateTime<Utc>,
}

impl QualityIssue {
    /// Creates an issue for `rule` on `field_name` of record `record_key`.
    pub fn new(
        rule: ValidationRule,
        record_key: impl Into<String>,
        field_name: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            rule,
            record_key: record_key.into(),
            field_name: field_name.into(),
            current_value: None,
            expected_value: None,
            details: details.into(),
            suggestion: None,
            detected_at: Utc::now(),
        }
    }

    /// Builds an issue for catalog rule `id`.
    ///
    /// Returns `None` when the catalog does not define the rule; callers
    /// treat that as "rule not applicable" rather than an error.
    pub fn for_rule(
        catalog: &RuleCatalog,
        id: &str,
        record_key: &str,
        field_name: &str,
        details: impl Into<String>,
    ) -> Option<Self> {
        catalog
            .get(id)
            .map(|rule| Self::new(rule.clone(), record_key, field_name, details))
    }

    /// Attaches the observed value.
    pub fn with_current(mut self, value: impl Into<String>) -> Self {
        self.current_value = Some(value.into());
        self
    }

    /// Attaches the expected value.
    pub fn with_expected(mut self, value: impl Into<String>) -> Self {
        self.expected_value = Some(value.into());
        self
    }

    /// Attaches a remediation suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}
