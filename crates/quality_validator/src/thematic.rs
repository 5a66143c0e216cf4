//! Thematic-accuracy rules (TA001–TA009).
//!
//! Categorical fields are checked against the configured catalogs; a value
//! that narrowly misses its catalog gets a nearest-match suggestion. A field
//! without a configured catalog is silently skipped.

use crate::record::Record;
use crate::similarity::{DiceScorer, SimilarityScorer, best_match};
use quality_core::config::fields;
use quality_core::{QualityIssue, RuleCatalog, RuleConfig, ids};
use validator::ValidateUrl;

/// The categorical fields and the rule id guarding each.
const CATALOG_FIELDS: &[(&str, &str)] = &[
    (ids::TA001, fields::STATUS),
    (ids::TA002, fields::INTERVENTION_TYPE),
    (ids::TA003, fields::PROCUREMENT_PLATFORM),
    (ids::TA004, fields::UNIT_OF_MEASURE),
    (ids::TA005, fields::ASSET_CLASS),
    (ids::TA006, fields::FACILITY_TYPE),
    (ids::TA007, fields::FUNDING_SOURCE),
    (ids::TA008, fields::MANAGING_UNIT),
];

/// Validates the thematic-accuracy rule group on one record.
pub struct ThematicChecks {
    scorer: Box<dyn SimilarityScorer>,
}

impl ThematicChecks {
    pub fn new() -> Self {
        Self {
            scorer: Box::new(DiceScorer),
        }
    }

    /// Swaps the similarity strategy used for suggestions.
    pub fn with_scorer(scorer: Box<dyn SimilarityScorer>) -> Self {
        Self { scorer }
    }

    pub fn validate(
        &self,
        catalog: &RuleCatalog,
        config: &RuleConfig,
        record: &Record,
        key: &str,
    ) -> Vec<QualityIssue> {
        let mut issues = Vec::new();

        for (rule_id, field) in CATALOG_FIELDS {
            let Some(allowed) = config.whitelists.get(field) else {
                continue;
            };
            let Some(value) = record.text(field) else {
                continue;
            };
            if allowed.iter().any(|a| a == value) {
                continue;
            }

            let suggestion = match best_match(self.scorer.as_ref(), value, allowed) {
                Some((candidate, score)) if score >= config.similarity_threshold => {
                    format!("Did you mean '{candidate}'?")
                }
                _ => format!("Allowed values: [{}]", allowed.join(", ")),
            };

            if let Some(issue) = QualityIssue::for_rule(
                catalog,
                rule_id,
                key,
                field,
                format!("Value '{value}' is not in the official catalog for '{field}'"),
            ) {
                issues.push(
                    issue
                        .with_current(value.to_string())
                        .with_suggestion(suggestion),
                );
            }
        }

        // TA009: link well-formedness.
        if let Some(url) = record.text(fields::URL) {
            if !url.validate_url() {
                if let Some(issue) = QualityIssue::for_rule(
                    catalog,
                    ids::TA009,
                    key,
                    fields::URL,
                    format!("'{url}' is not a well-formed URL"),
                ) {
                    issues.push(issue.with_current(url.to_string()));
                }
            }
        }

        issues
    }
}

impl Default for ThematicChecks {
    fn default() -> Self {
        Self::new()
    }
}
