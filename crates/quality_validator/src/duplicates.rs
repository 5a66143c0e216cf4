//! Full-record duplicate detection.
//!
//! Records are fingerprinted over their canonicalized non-volatile content
//! (attributes plus geometry). Which fields count as volatile bookkeeping is
//! explicit configuration, not a hardcoded list; see
//! [`quality_core::RuleConfig::volatile_fields`].

use crate::record::{Record, RecordSet};
use geo::Geometry;
use quality_core::RuleConfig;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// A set of ≥2 records sharing identical non-volatile content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Canonical content hash shared by the members
    pub fingerprint: String,

    /// Keys of the member records, sorted
    pub record_keys: Vec<String>,
}

/// Canonical content hash of one record.
///
/// Attribute order, numeric representation (`85` vs `"85"` vs `"85.0"`) and
/// surrounding whitespace do not affect the fingerprint; volatile fields are
/// excluded entirely.
pub fn fingerprint(record: &Record, config: &RuleConfig) -> String {
    let mut canonical = String::new();
    let parts: BTreeMap<&str, String> = record
        .attrs()
        .iter()
        .filter(|(name, value)| {
            !value.is_blank() && !config.volatile_fields.iter().any(|v| v == *name)
        })
        .map(|(name, value)| (name.as_str(), value.canonical()))
        .collect();

    for (name, value) in parts {
        canonical.push_str(name);
        canonical.push('=');
        canonical.push_str(&value);
        canonical.push(';');
    }
    if let Some(geometry) = record.geometry() {
        canonical.push_str("geom=");
        canonical.push_str(&geometry_signature(geometry));
    }

    let digest = Sha256::digest(canonical.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn coords_signature<'a>(coords: impl Iterator<Item = &'a geo::Coord<f64>>) -> String {
    coords
        .map(|c| format!("{},{}", c.x, c.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn geometry_signature(geometry: &Geometry<f64>) -> String {
    match geometry {
        Geometry::Point(p) => format!("point({},{})", p.x(), p.y()),
        Geometry::Line(l) => format!("line({},{} {},{})", l.start.x, l.start.y, l.end.x, l.end.y),
        Geometry::LineString(l) => format!("linestring({})", coords_signature(l.coords())),
        Geometry::Polygon(p) => format!("polygon({})", coords_signature(p.exterior().coords())),
        other => format!("{other:?}"),
    }
}

/// Groups records by fingerprint; singletons are not reported.
///
/// `keys` must be positionally aligned with `records`. The output is sorted
/// by fingerprint and member keys, so input order never changes the result.
pub fn find_duplicate_groups(
    records: &RecordSet,
    config: &RuleConfig,
    keys: &[String],
) -> Vec<DuplicateGroup> {
    let mut by_fingerprint: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (record, key) in records.iter().zip(keys) {
        by_fingerprint
            .entry(fingerprint(record, config))
            .or_default()
            .push(key.clone());
    }

    by_fingerprint
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(fingerprint, mut record_keys)| {
            record_keys.sort();
            DuplicateGroup {
                fingerprint,
                record_keys,
            }
        })
        .collect()
}
