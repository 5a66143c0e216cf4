//! Integration tests for the validation engine.
//!
//! These exercise end-to-end scenarios over realistic municipal project
//! batches: congruence carve-outs, numeric coercion, duplicate grouping, and
//! the weighted quality score.

use geo::{Geometry, Point};
use quality_core::config::fields;
use quality_core::{RuleConfig, Severity, ids};
use quality_validator::{BatchValidator, Record, RecordSet, RecordValidator};

fn project(id: &str, status: &str, progress: i64) -> Record {
    Record::new()
        .with(fields::PROJECT_ID, id)
        .with(fields::NAME, format!("Obra {id}"))
        .with(fields::STATUS, status)
        .with(fields::PROGRESS, progress)
        .with(fields::MANAGING_UNIT, "Secretaría de Infraestructura")
        .with(fields::START_DATE, "2023-02-01")
        .with(fields::CONTRACT_REF, format!("CT-{id}"))
        .with(fields::ADDRESS, "Carrera 52 # 44-10")
        .with_geometry(Geometry::Point(Point::new(-75.5, 6.2)))
}

fn validate(records: Vec<Record>) -> quality_validator::BatchValidationResult {
    let validator = RecordValidator::new(RuleConfig::default());
    BatchValidator::new(validator).validate_all(&RecordSet::from_records(records))
}

#[test]
fn scenario_terminated_projects_and_lc001() {
    // Terminado at 100%: congruent.
    let done = project("OBR-1", "Terminado", 100).with(fields::END_DATE, "2024-06-30");
    let result = validate(vec![done]);
    assert!(result.issues.iter().all(|i| i.rule.id != ids::LC001));

    // Terminado at 60%: exactly one CRITICAL LC001 with the dual suggestion.
    let stalled = project("OBR-2", "Terminado", 60).with(fields::END_DATE, "2024-06-30");
    let result = validate(vec![stalled]);
    let lc001: Vec<_> = result
        .issues
        .iter()
        .filter(|i| i.rule.id == ids::LC001)
        .collect();
    assert_eq!(lc001.len(), 1);
    assert_eq!(lc001[0].rule.severity, Severity::Critical);
    let suggestion = lc001[0].suggestion.as_deref().unwrap();
    assert!(suggestion.contains("100"));
    assert!(suggestion.contains("En ejecución"));
}

#[test]
fn scenario_string_progress_parses_and_duplicates_group() {
    let a = project("OBR-7", "En ejecución", 85);
    let b = project("OBR-7", "En ejecución", 85).with(fields::PROGRESS, "85");

    let result = validate(vec![a, b]);

    // Both coerce cleanly: no "not numeric" issues.
    assert!(result.issues.iter().all(|i| i.rule.id != ids::LC003));

    // The differing representation does not defeat duplicate detection.
    assert_eq!(result.duplicate_groups.len(), 1);
    assert_eq!(result.duplicate_groups[0].record_keys.len(), 2);
}

#[test]
fn scenario_weighted_score_over_mixed_batch() {
    // 50 records carrying a CRITICAL issue (no identifier at all) plus 950
    // clean ones: score = 100 × (1 − 50×1.0/1000) = 95.0.
    let mut records: Vec<Record> = (0..950)
        .map(|i| project(&format!("OBR-{i}"), "En ejecución", 40))
        .collect();
    for i in 0..50 {
        records.push(
            Record::new()
                .with(fields::NAME, format!("Obra sin identificador {i}"))
                .with(fields::STATUS, "En ejecución")
                .with(fields::PROGRESS, 40i64)
                .with(fields::MANAGING_UNIT, "Secretaría de Salud")
                .with(fields::START_DATE, "2023-02-01")
                .with(fields::CONTRACT_REF, "")
                .with(fields::ADDRESS, format!("Calle {i}"))
                .with_geometry(Geometry::Point(Point::new(-75.5, 6.2))),
        );
    }

    let result = validate(records);
    assert_eq!(result.stats.quality_score, 95.0);
    assert_eq!(result.stats.records_with_issues, 50);
}

#[test]
fn scenario_paused_carveout_never_raises_lc001() {
    let records = vec![
        project("OBR-1", "Suspendido", 0),
        project("OBR-2", "Suspendido", 35),
        project("OBR-3", "Suspendido", 100),
    ];
    let result = validate(records);
    assert!(result.issues.iter().all(|i| i.rule.id != ids::LC001));
}

#[test]
fn scenario_inaugurated_requires_exactly_100() {
    let result = validate(vec![
        project("OBR-1", "Inaugurado", 99).with(fields::END_DATE, "2024-06-30"),
    ]);
    assert_eq!(
        result
            .issues
            .iter()
            .filter(|i| i.rule.id == ids::LC001)
            .count(),
        1
    );
}

#[test]
fn scenario_order_insensitive_content() {
    let forward = vec![
        project("OBR-1", "Terminado", 60).with(fields::END_DATE, "2024-06-30"),
        project("OBR-2", "En ejecución", 40),
        project("OBR-3", "Sin iniciar", 20),
    ];
    let backward: Vec<Record> = forward.iter().rev().cloned().collect();

    let digest = |result: &quality_validator::BatchValidationResult| {
        let mut pairs: Vec<(String, String)> = result
            .issues
            .iter()
            .map(|i| (i.record_key.clone(), i.rule.id.clone()))
            .collect();
        pairs.sort();
        pairs
    };

    let a = validate(forward);
    let b = validate(backward);
    assert_eq!(digest(&a), digest(&b));
    assert_eq!(a.stats.quality_score, b.stats.quality_score);
    assert_eq!(a.duplicate_groups, b.duplicate_groups);
}

#[test]
fn scenario_empty_batch_is_wellformed() {
    let result = validate(vec![]);
    assert_eq!(result.total_records, 0);
    assert_eq!(result.stats.quality_score, 100.0);
    assert!(result.issues.is_empty());
}
