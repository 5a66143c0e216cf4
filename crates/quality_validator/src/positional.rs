//! Positional-accuracy rules (PA001–PA005).
//!
//! All five rules operate on the record's representative point (the
//! centroid). Records without geometry are skipped entirely; an unknown
//! declared area name is never scored as a containment failure.

use crate::record::Record;
use geo::{Centroid, Point};
use quality_core::config::fields;
use quality_core::{AdminBoundaries, QualityIssue, RuleCatalog, RuleConfig, ids};
use regex::Regex;

/// Spellings that all mean the geographic WGS84 system.
const WGS84_ALIASES: &[&str] = &["EPSG4326", "WGS84", "4326", "CRS84"];

/// Validates the positional-accuracy rule group on one record.
pub struct PositionalChecks {
    non_alnum: Regex,
}

impl PositionalChecks {
    pub fn new() -> Self {
        Self {
            // Infallible: the pattern is a literal character class.
            non_alnum: Regex::new(r"[^0-9A-Z]").unwrap_or_else(|_| unreachable!()),
        }
    }

    pub fn validate(
        &self,
        catalog: &RuleCatalog,
        config: &RuleConfig,
        boundaries: &AdminBoundaries,
        record: &Record,
        key: &str,
    ) -> Vec<QualityIssue> {
        let mut issues = Vec::new();

        let Some(geometry) = record.geometry() else {
            return issues;
        };
        let Some(point) = geometry.centroid() else {
            return issues;
        };

        // PA002: declared CRS must agree with the configured one.
        if let Some(declared) = record.text(fields::CRS) {
            if !self.crs_matches(&config.expected_crs, declared) {
                if let Some(issue) = QualityIssue::for_rule(
                    catalog,
                    ids::PA002,
                    key,
                    fields::CRS,
                    format!("Declared CRS '{declared}' differs from '{}'", config.expected_crs),
                ) {
                    issues.push(
                        issue
                            .with_current(declared.to_string())
                            .with_expected(config.expected_crs.clone()),
                    );
                }
            }
        }

        // PA003: degenerate coordinates. When the point is garbage, the
        // remaining containment checks are meaningless and are skipped.
        if self.is_degenerate(&point) {
            if let Some(issue) = QualityIssue::for_rule(
                catalog,
                ids::PA003,
                key,
                "geometry",
                format!("Degenerate coordinates ({}, {})", point.x(), point.y()),
            ) {
                issues.push(issue.with_expected("lon in [-180, 180], lat in [-90, 90], not (0, 0)"));
            }
            return issues;
        }

        // PA001: inside the configured bounding box.
        if !config.bounding_box.contains(point.x(), point.y()) {
            if let Some(issue) = QualityIssue::for_rule(
                catalog,
                ids::PA001,
                key,
                "geometry",
                format!(
                    "Representative point ({}, {}) is outside the configured bounding box",
                    point.x(),
                    point.y()
                ),
            ) {
                issues.push(issue);
            }
        }

        // PA004 / PA005: containment in the declared administrative areas.
        // Disabled per layer when that layer is absent.
        if let Some(layer) = &boundaries.districts {
            if let Some(name) = record.text(fields::DISTRICT) {
                if layer.contains(name, &point) == Some(false) {
                    if let Some(issue) = QualityIssue::for_rule(
                        catalog,
                        ids::PA004,
                        key,
                        fields::DISTRICT,
                        format!("Point is not inside the declared district '{name}'"),
                    ) {
                        let located = layer.locate(&point).map(str::to_string);
                        let issue = issue.with_current(name.to_string());
                        issues.push(match located {
                            Some(actual) => issue.with_suggestion(format!(
                                "The point falls inside '{actual}'"
                            )),
                            None => issue,
                        });
                    }
                }
            }
        }

        if let Some(layer) = &boundaries.neighborhoods {
            if let Some(name) = record.text(fields::NEIGHBORHOOD) {
                if layer.contains(name, &point) == Some(false) {
                    if let Some(issue) = QualityIssue::for_rule(
                        catalog,
                        ids::PA005,
                        key,
                        fields::NEIGHBORHOOD,
                        format!("Point is not inside the declared neighborhood '{name}'"),
                    ) {
                        issues.push(issue.with_current(name.to_string()));
                    }
                }
            }
        }

        issues
    }

    fn is_degenerate(&self, point: &Point<f64>) -> bool {
        let (lon, lat) = (point.x(), point.y());
        (lon == 0.0 && lat == 0.0) || !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat)
    }

    /// Tolerant CRS comparison: case and punctuation are ignored, and the
    /// common WGS84 spellings are treated as one system.
    fn crs_matches(&self, expected: &str, declared: &str) -> bool {
        let normalize =
            |s: &str| self.non_alnum.replace_all(&s.to_uppercase(), "").into_owned();
        let expected = normalize(expected);
        let declared = normalize(declared);
        if expected == declared {
            return true;
        }
        WGS84_ALIASES.contains(&expected.as_str()) && WGS84_ALIASES.contains(&declared.as_str())
    }
}

impl Default for PositionalChecks {
    fn default() -> Self {
        Self::new()
    }
}
