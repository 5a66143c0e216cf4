//! Completeness rules (CP001–CP006).

use crate::record::Record;
use quality_core::config::fields;
use quality_core::{QualityIssue, RuleCatalog, RuleConfig, ids};

/// Validates the completeness rule group on one record.
pub struct CompletenessChecks;

impl CompletenessChecks {
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

        // CP001: required attributes present and non-blank. One issue per
        // record naming everything that is missing.
        let missing: Vec<&str> = config
            .required_fields
            .iter()
            .map(String::as_str)
            .filter(|f| !record.has(f))
            .collect();
        if let Some(first) = missing.first() {
            if let Some(issue) = QualityIssue::for_rule(
                catalog,
                ids::CP001,
                key,
                first,
                format!("Required attribute(s) missing or blank: {}", missing.join(", ")),
            ) {
                issues.push(issue.with_expected("non-blank value"));
            }
        }

        // CP003: at least one identifier.
        if !config.identifier_fields.iter().any(|f| record.has(f)) {
            if let Some(issue) = QualityIssue::for_rule(
                catalog,
                ids::CP003,
                key,
                "identifier",
                format!(
                    "None of the identifying attributes are present: {}",
                    config.identifier_fields.join(", ")
                ),
            ) {
                issues.push(issue);
            }
        }

        // CP004 / CP005: conditioned on status.
        if let Some(status) = record.text(fields::STATUS) {
            let policy = &config.status_policy;
            let underway = !policy.is_start(status) && !policy.is_exempt(status);

            if underway {
                let mut missing_dates: Vec<&str> = Vec::new();
                if !record.has(fields::START_DATE) {
                    missing_dates.push(fields::START_DATE);
                }
                if policy.is_terminal(status) && !record.has(fields::END_DATE) {
                    missing_dates.push(fields::END_DATE);
                }
                if let Some(first) = missing_dates.first() {
                    if let Some(issue) = QualityIssue::for_rule(
                        catalog,
                        ids::CP004,
                        key,
                        first,
                        format!(
                            "Status '{status}' requires date(s): {}",
                            missing_dates.join(", ")
                        ),
                    ) {
                        issues.push(issue);
                    }
                }

                if !record.has(fields::CONTRACT_REF) {
                    if let Some(issue) = QualityIssue::for_rule(
                        catalog,
                        ids::CP005,
                        key,
                        fields::CONTRACT_REF,
                        format!(
                            "Status '{status}' implies a contracting process, but no reference is recorded"
                        ),
                    ) {
                        issues.push(issue);
                    }
                }
            }
        }

        // CP002: an addressed record should also be mappable.
        if record.has(fields::ADDRESS) && record.geometry().is_none() {
            if let Some(issue) = QualityIssue::for_rule(
                catalog,
                ids::CP002,
                key,
                "geometry",
                "Record has an address but no geometry",
            ) {
                issues.push(issue);
            }
        }

        // CP006: address presence.
        if !record.has(fields::ADDRESS) {
            if let Some(issue) = QualityIssue::for_rule(
                catalog,
                ids::CP006,
                key,
                fields::ADDRESS,
                "Record has no street address",
            ) {
                issues.push(issue);
            }
        }

        issues
    }
}

impl Default for CompletenessChecks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Geometry, Point};
    use pretty_assertions::assert_eq;

    fn run(record: &Record) -> Vec<QualityIssue> {
        let catalog = RuleCatalog::standard();
        let config = RuleConfig::default();
        CompletenessChecks::new().validate(&catalog, &config, record, "t")
    }

    fn rule_ids(issues: &[QualityIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.rule.id.as_str()).collect()
    }

    fn complete_record() -> Record {
        Record::new()
            .with(fields::PROJECT_ID, "OBR-1")
            .with(fields::NAME, "Parque central")
            .with(fields::STATUS, "En ejecución")
            .with(fields::MANAGING_UNIT, "Secretaría de Infraestructura")
            .with(fields::START_DATE, "2024-01-15")
            .with(fields::CONTRACT_REF, "CT-2024-010")
            .with(fields::ADDRESS, "Calle 10 # 43-12")
            .with_geometry(Geometry::Point(Point::new(-75.5, 6.2)))
    }

    #[test]
    fn test_complete_record_is_clean() {
        assert_eq!(run(&complete_record()).len(), 0);
    }

    #[test]
    fn test_missing_required_fields_single_issue() {
        let record = Record::new()
            .with(fields::PROJECT_ID, "OBR-1")
            .with(fields::ADDRESS, "Calle 10")
            .with_geometry(Geometry::Point(Point::new(-75.5, 6.2)));
        let issues = run(&record);
        let cp001: Vec<_> = issues.iter().filter(|i| i.rule.id == ids::CP001).collect();
        assert_eq!(cp001.len(), 1);
        assert!(cp001[0].details.contains(fields::NAME));
        assert!(cp001[0].details.contains(fields::STATUS));
        assert!(cp001[0].details.contains(fields::MANAGING_UNIT));
    }

    #[test]
    fn test_no_identifier() {
        let record = Record::new().with(fields::NAME, "x");
        assert!(rule_ids(&run(&record)).contains(&ids::CP003));

        let record = Record::new().with(fields::CONTRACT_REF, "CT-1");
        assert!(!rule_ids(&run(&record)).contains(&ids::CP003));
    }

    #[test]
    fn test_terminal_status_needs_both_dates() {
        let mut record = complete_record().with(fields::STATUS, "Terminado");
        record = record.with(fields::END_DATE, "");
        let issues = run(&record);
        let cp004: Vec<_> = issues.iter().filter(|i| i.rule.id == ids::CP004).collect();
        assert_eq!(cp004.len(), 1);
        assert!(cp004[0].details.contains(fields::END_DATE));
    }

    #[test]
    fn test_not_started_needs_no_dates() {
        let record = Record::new()
            .with(fields::PROJECT_ID, "OBR-1")
            .with(fields::STATUS, "Sin iniciar");
        let issue_ids = rule_ids(&run(&record));
        assert!(!issue_ids.contains(&ids::CP004));
        assert!(!issue_ids.contains(&ids::CP005));
    }

    #[test]
    fn test_underway_needs_contract_ref() {
        let record = Record::new()
            .with(fields::PROJECT_ID, "OBR-1")
            .with(fields::STATUS, "En ejecución")
            .with(fields::START_DATE, "2024-01-15");
        assert!(rule_ids(&run(&record)).contains(&ids::CP005));
    }

    #[test]
    fn test_address_without_geometry() {
        let record = Record::new()
            .with(fields::PROJECT_ID, "OBR-1")
            .with(fields::ADDRESS, "Calle 10 # 43-12");
        assert!(rule_ids(&run(&record)).contains(&ids::CP002));
    }

    #[test]
    fn test_missing_address() {
        let record = Record::new().with(fields::PROJECT_ID, "OBR-1");
        assert!(rule_ids(&run(&record)).contains(&ids::CP006));
    }
}
