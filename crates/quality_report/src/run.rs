//! Run stamping for idempotent reruns and audit trails.

use chrono::{DateTime, Utc};
use quality_validator::BatchValidationResult;
use sha2::{Digest, Sha256};

/// Opaque identifier of one reporting run: timestamp plus a content hash of
/// the issue set. Stamped onto every emitted document.
#[derive(Debug, Clone)]
pub struct RunStamp {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
}

impl RunStamp {
    /// Derives the stamp from a batch result.
    ///
    /// The content hash is computed over the sorted issue triples, so two
    /// runs over identical data carry the same hash suffix even though the
    /// timestamp differs.
    pub fn for_result(result: &BatchValidationResult) -> Self {
        let mut triples: Vec<String> = result
            .issues
            .iter()
            .map(|i| format!("{}|{}|{}", i.record_key, i.rule.id, i.field_name))
            .collect();
        triples.sort();

        let mut hasher = Sha256::new();
        hasher.update(result.total_records.to_le_bytes());
        for triple in &triples {
            hasher.update(triple.as_bytes());
            hasher.update([0u8]);
        }
        let digest = hasher.finalize();
        let content_hash: String = digest.iter().take(6).map(|b| format!("{b:02x}")).collect();

        let generated_at = Utc::now();
        Self {
            run_id: format!("{}-{}", generated_at.format("%Y%m%dT%H%M%SZ"), content_hash),
            generated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quality_core::RuleConfig;
    use quality_validator::{BatchValidator, Record, RecordSet, RecordValidator};

    #[test]
    fn test_same_content_same_hash_suffix() {
        let records = RecordSet::from_records(vec![
            Record::new().with("project_id", "OBR-1").with("status", "???"),
        ]);
        let batch = BatchValidator::new(RecordValidator::new(RuleConfig::default()));

        let a = RunStamp::for_result(&batch.validate_all(&records));
        let b = RunStamp::for_result(&batch.validate_all(&records));

        let suffix = |stamp: &RunStamp| stamp.run_id.rsplit('-').next().unwrap().to_string();
        assert_eq!(suffix(&a), suffix(&b));
    }
}
