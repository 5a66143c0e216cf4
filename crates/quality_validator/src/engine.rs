//! The validation engines.
//!
//! [`RecordValidator`] grades one record against the full catalog;
//! [`BatchValidator`] runs a whole collection, adds the duplicate scan, and
//! aggregates the statistics. Both are pure over their inputs: "every record
//! is bad" is a well-formed outcome, never an error.

use crate::completeness::CompletenessChecks;
use crate::consistency::ConsistencyChecks;
use crate::duplicates::{DuplicateGroup, find_duplicate_groups};
use crate::positional::PositionalChecks;
use crate::record::{Record, RecordSet};
use crate::similarity::SimilarityScorer;
use crate::temporal::TemporalChecks;
use crate::thematic::ThematicChecks;
use quality_core::{
    AdminBoundaries, QualityIssue, QualityStatistics, RuleCatalog, RuleConfig,
    ValidationObserver, ids,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Grades a single record against every applicable catalog rule.
///
/// # Example
///
/// ```rust
/// use quality_core::RuleConfig;
/// use quality_validator::{Record, RecordValidator};
///
/// let validator = RecordValidator::new(RuleConfig::default());
/// let record = Record::new()
///     .with("status", "Terminado")
///     .with("progress", 60i64);
///
/// let issues = validator.validate(&record);
/// assert!(issues.iter().any(|i| i.rule.id == "LC001"));
/// ```
pub struct RecordValidator {
    catalog: RuleCatalog,
    config: RuleConfig,
    boundaries: AdminBoundaries,
    consistency: ConsistencyChecks,
    completeness: CompletenessChecks,
    positional: PositionalChecks,
    thematic: ThematicChecks,
    temporal: TemporalChecks,
}

impl RecordValidator {
    /// Creates a validator with the standard catalog and no boundary layers.
    pub fn new(config: RuleConfig) -> Self {
        Self {
            catalog: RuleCatalog::standard(),
            config,
            boundaries: AdminBoundaries::none(),
            consistency: ConsistencyChecks::new(),
            completeness: CompletenessChecks::new(),
            positional: PositionalChecks::new(),
            thematic: ThematicChecks::new(),
            temporal: TemporalChecks::new(),
        }
    }

    /// Supplies the administrative boundary layers (enables PA004/PA005).
    pub fn with_boundaries(mut self, boundaries: AdminBoundaries) -> Self {
        self.boundaries = boundaries;
        self
    }

    /// Swaps the similarity strategy used for thematic suggestions.
    pub fn with_scorer(mut self, scorer: Box<dyn SimilarityScorer>) -> Self {
        self.thematic = ThematicChecks::with_scorer(scorer);
        self
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Applies every rule group to one record.
    ///
    /// Inapplicable rules are skipped, never scored. Malformed input surfaces
    /// as issues; this method does not fail.
    pub fn validate(&self, record: &Record) -> Vec<QualityIssue> {
        let key = record
            .key(&self.config)
            .unwrap_or_else(|| "unidentified".to_string());
        self.validate_keyed(record, &key)
    }

    pub(crate) fn validate_keyed(&self, record: &Record, key: &str) -> Vec<QualityIssue> {
        let mut issues = Vec::new();
        issues.extend(
            self.consistency
                .validate(&self.catalog, &self.config, record, key),
        );
        issues.extend(
            self.completeness
                .validate(&self.catalog, &self.config, record, key),
        );
        issues.extend(self.positional.validate(
            &self.catalog,
            &self.config,
            &self.boundaries,
            record,
            key,
        ));
        issues.extend(
            self.thematic
                .validate(&self.catalog, &self.config, record, key),
        );
        issues.extend(
            self.temporal
                .validate(&self.catalog, &self.config, record, key),
        );
        issues
    }
}

/// Identifying attributes retained per record for the reporting tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSnapshot {
    /// Record key (first identifier, or a positional fallback)
    pub key: String,

    /// Default grouping value, with the sentinel already substituted
    pub group: String,

    /// Scalar attributes flattened to strings
    pub attrs: BTreeMap<String, String>,
}

/// Aggregate outcome of one batch validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchValidationResult {
    /// Number of records in the batch
    pub total_records: usize,

    /// Every detected issue, in record order
    pub issues: Vec<QualityIssue>,

    /// Duplicate groups (size ≥ 2), sorted by fingerprint
    pub duplicate_groups: Vec<DuplicateGroup>,

    /// Per-record identifying attributes for the reporter
    pub snapshots: Vec<RecordSnapshot>,

    /// Aggregate statistics
    pub stats: QualityStatistics,
}

/// Validates a whole record collection.
pub struct BatchValidator {
    validator: RecordValidator,
    observer: Option<Box<dyn ValidationObserver>>,
}

impl BatchValidator {
    pub fn new(validator: RecordValidator) -> Self {
        Self {
            validator,
            observer: None,
        }
    }

    /// Supplies an observer invoked per flagged record and at run end.
    pub fn with_observer(mut self, observer: Box<dyn ValidationObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Validates every record, scans for duplicates, and aggregates.
    ///
    /// Input order affects only the ordering of the issue list, never its
    /// content; downstream consumers must not rely on issue ordering.
    pub fn validate_all(&self, records: &RecordSet) -> BatchValidationResult {
        let config = self.validator.config();
        let mut issues = Vec::new();
        let mut keys = Vec::with_capacity(records.len());
        let mut snapshots = Vec::with_capacity(records.len());
        let mut without_geometry = 0usize;
        let mut without_group = 0usize;

        for (idx, record) in records.iter().enumerate() {
            let key = record
                .key(config)
                .unwrap_or_else(|| format!("record-{}", idx + 1));

            if record.geometry().is_none() {
                without_geometry += 1;
            }
            let group = record.group(config);
            if group == config.group_fallback {
                without_group += 1;
            }

            let record_issues = self.validator.validate_keyed(record, &key);
            if !record_issues.is_empty() {
                if let Some(observer) = &self.observer {
                    observer.record_issues(&key, &record_issues);
                }
            }

            snapshots.push(RecordSnapshot {
                key: key.clone(),
                group,
                attrs: record.flatten(),
            });
            keys.push(key);
            issues.extend(record_issues);
        }

        // Degradations are logged once per run, not per record.
        if without_geometry > 0 {
            tracing::warn!(
                records = without_geometry,
                "records without geometry: geometry rules skipped for them"
            );
        }
        if without_group > 0 {
            tracing::warn!(
                records = without_group,
                group_field = %config.group_field,
                fallback = %config.group_fallback,
                "records without a grouping value"
            );
        }

        let duplicate_groups = find_duplicate_groups(records, config, &keys);
        for group in &duplicate_groups {
            for key in &group.record_keys {
                if let Some(issue) = QualityIssue::for_rule(
                    self.validator.catalog(),
                    ids::LC008,
                    key,
                    "record",
                    format!(
                        "{} records share identical non-volatile content",
                        group.record_keys.len()
                    ),
                ) {
                    issues.push(issue.with_current(group.fingerprint.clone()));
                }
            }
        }

        let stats = QualityStatistics::from_issues(records.len(), &issues, config.top_n);
        if let Some(observer) = &self.observer {
            observer.run_complete(&stats);
        }
        tracing::info!(
            records = stats.total_records,
            issues = issues.len(),
            score = stats.quality_score,
            rating = %stats.rating,
            "batch validation complete"
        );

        BatchValidationResult {
            total_records: records.len(),
            issues,
            duplicate_groups,
            snapshots,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quality_core::config::fields;
    use std::collections::BTreeSet;

    fn clean_record(id: &str) -> Record {
        Record::new()
            .with(fields::PROJECT_ID, id)
            .with(fields::NAME, format!("Obra {id}"))
            .with(fields::STATUS, "En ejecución")
            .with(fields::PROGRESS, 40i64)
            .with(fields::MANAGING_UNIT, "Secretaría de Infraestructura")
            .with(fields::START_DATE, "2024-01-15")
            .with(fields::CONTRACT_REF, format!("CT-{id}"))
            .with(fields::ADDRESS, "Calle 10 # 43-12")
            .with_geometry(geo::Geometry::Point(geo::Point::new(-75.5, 6.2)))
    }

    #[test]
    fn test_clean_batch() {
        let validator = RecordValidator::new(RuleConfig::default());
        let records = RecordSet::from_records(vec![
            clean_record("OBR-1"),
            clean_record("OBR-2"),
        ]);

        let result = BatchValidator::new(validator).validate_all(&records);
        assert_eq!(result.total_records, 2);
        assert_eq!(result.issues.len(), 0);
        assert_eq!(result.stats.quality_score, 100.0);
        assert!(result.duplicate_groups.is_empty());
    }

    #[test]
    fn test_at_most_one_issue_per_record_and_rule() {
        let validator = RecordValidator::new(RuleConfig::default());
        // A record violating many rules at once
        let record = Record::new()
            .with(fields::PROGRESS, "mucho")
            .with(fields::BUDGET, "bastante")
            .with(fields::START_DATE, "pronto")
            .with(fields::END_DATE, "luego");
        let records = RecordSet::from_records(vec![record]);

        let result = BatchValidator::new(validator).validate_all(&records);
        let mut seen = BTreeSet::new();
        for issue in &result.issues {
            assert!(
                seen.insert((issue.record_key.clone(), issue.rule.id.clone())),
                "duplicate ({}, {})",
                issue.record_key,
                issue.rule.id
            );
        }
    }

    #[test]
    fn test_duplicates_raise_lc008_per_member() {
        let validator = RecordValidator::new(RuleConfig::default());
        let twin = clean_record("OBR-1");
        let records = RecordSet::from_records(vec![
            twin.clone(),
            twin.with("updated_at", "2025-01-01"),
            clean_record("OBR-3"),
        ]);

        let result = BatchValidator::new(validator).validate_all(&records);
        assert_eq!(result.duplicate_groups.len(), 1);
        let lc008: Vec<_> = result
            .issues
            .iter()
            .filter(|i| i.rule.id == ids::LC008)
            .collect();
        assert_eq!(lc008.len(), 2);
    }

    #[test]
    fn test_missing_identifier_falls_back_to_position() {
        let validator = RecordValidator::new(RuleConfig::default());
        let records = RecordSet::from_records(vec![Record::new().with(fields::NAME, "x")]);

        let result = BatchValidator::new(validator).validate_all(&records);
        assert_eq!(result.snapshots[0].key, "record-1");
        assert!(result.issues.iter().all(|i| i.record_key == "record-1"));
    }

    #[test]
    fn test_idempotent_issue_set() {
        let validator = RecordValidator::new(RuleConfig::default());
        let records = RecordSet::from_records(vec![
            clean_record("OBR-1").with(fields::PROGRESS, 100i64),
            Record::new().with(fields::PROJECT_ID, "OBR-2"),
        ]);

        let batch = BatchValidator::new(validator);
        let first = batch.validate_all(&records);
        let second = batch.validate_all(&records);

        let digest = |result: &BatchValidationResult| {
            let mut pairs: Vec<(String, String, String)> = result
                .issues
                .iter()
                .map(|i| {
                    (
                        i.record_key.clone(),
                        i.rule.id.clone(),
                        i.field_name.clone(),
                    )
                })
                .collect();
            pairs.sort();
            pairs
        };
        assert_eq!(digest(&first), digest(&second));
        assert_eq!(first.stats.quality_score, second.stats.quality_score);
    }

    #[test]
    fn test_attribute_only_record_skips_geometry_rules() {
        let validator = RecordValidator::new(RuleConfig::default());
        let record = clean_record("OBR-1");
        let without_geom = Record::from_attrs(record.attrs().clone());
        let records = RecordSet::from_records(vec![without_geom]);

        let result = BatchValidator::new(validator).validate_all(&records);
        // Geometry-dependent positional rules stay silent; only the
        // completeness rule about the missing geometry may fire.
        assert!(result.issues.iter().all(|i| i.rule.id != ids::PA001));
        assert!(result.issues.iter().any(|i| i.rule.id == ids::CP002));
    }
}
