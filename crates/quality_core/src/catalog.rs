//! The rule catalog: the fixed set of validation rules.
//!
//! Rule identifiers are stable keys used downstream for deduplication,
//! filtering, and UI display. An id, once assigned, is never reused for a
//! different definition; retired rules leave a gap.

use crate::severity::{Dimension, Severity};
use serde::{Deserialize, Serialize};

/// Stable rule identifiers.
pub mod ids {
    pub const LC001: &str = "LC001";
    pub const LC002: &str = "LC002";
    pub const LC003: &str = "LC003";
    pub const LC004: &str = "LC004";
    pub const LC005: &str = "LC005";
    pub const LC006: &str = "LC006";
    pub const LC007: &str = "LC007";
    pub const LC008: &str = "LC008";

    pub const CP001: &str = "CP001";
    pub const CP002: &str = "CP002";
    pub const CP003: &str = "CP003";
    pub const CP004: &str = "CP004";
    pub const CP005: &str = "CP005";
    pub const CP006: &str = "CP006";

    pub const PA001: &str = "PA001";
    pub const PA002: &str = "PA002";
    pub const PA003: &str = "PA003";
    pub const PA004: &str = "PA004";
    pub const PA005: &str = "PA005";

    pub const TA001: &str = "TA001";
    pub const TA002: &str = "TA002";
    pub const TA003: &str = "TA003";
    pub const TA004: &str = "TA004";
    pub const TA005: &str = "TA005";
    pub const TA006: &str = "TA006";
    pub const TA007: &str = "TA007";
    pub const TA008: &str = "TA008";
    pub const TA009: &str = "TA009";

    pub const TQ001: &str = "TQ001";
    pub const TQ002: &str = "TQ002";
    pub const TQ003: &str = "TQ003";
    pub const TQ004: &str = "TQ004";
    pub const TQ005: &str = "TQ005";
}

/// Immutable definition of a single validation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Stable identifier (e.g. "LC001")
    pub id: String,

    /// Short human-readable name
    pub name: String,

    /// Quality dimension this rule grades
    pub dimension: Dimension,

    /// Impact tier of a violation
    pub severity: Severity,

    /// What the rule checks
    pub description: String,

    /// Whether the rule inspects the record geometry
    pub checks_geometry: bool,

    /// Whether the rule inspects attribute values
    pub checks_attributes: bool,
}

/// The fixed, read-only table of validation rules.
///
/// Built once at validator construction and shared by reference afterwards.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<ValidationRule>,
}

fn rule(
    id: &str,
    name: &str,
    dimension: Dimension,
    severity: Severity,
    description: &str,
    checks_geometry: bool,
    checks_attributes: bool,
) -> ValidationRule {
    ValidationRule {
        id: id.to_string(),
        name: name.to_string(),
        dimension,
        severity,
        description: description.to_string(),
        checks_geometry,
        checks_attributes,
    }
}

impl RuleCatalog {
    /// Builds the standard catalog covering all five dimensions.
    pub fn standard() -> Self {
        use Dimension::*;
        use Severity::*;

        let attr = |id, name, dim, sev, desc| rule(id, name, dim, sev, desc, false, true);
        let geo = |id, name, dim, sev, desc| rule(id, name, dim, sev, desc, true, true);
        let theme = |id, name, sev: Severity, field: &str| ValidationRule {
            id: String::from(id),
            name: String::from(name),
            dimension: ThematicAccuracy,
            severity: sev,
            description: format!("Value of '{field}' must belong to the official catalog"),
            checks_geometry: false,
            checks_attributes: true,
        };

        let rules = vec![
            // Logical consistency
            attr(
                ids::LC001,
                "Status/progress congruence",
                LogicalConsistency,
                Critical,
                "Progress percentage must agree with the project status",
            ),
            attr(
                ids::LC002,
                "Progress within range",
                LogicalConsistency,
                High,
                "Progress percentage must be between 0 and 100",
            ),
            attr(
                ids::LC003,
                "Numeric field not numeric",
                LogicalConsistency,
                High,
                "A field expected to be numeric could not be parsed as a number",
            ),
            attr(
                ids::LC004,
                "Negative money amount",
                LogicalConsistency,
                High,
                "Budget and contract amounts must be non-negative",
            ),
            attr(
                ids::LC005,
                "Non-positive quantity",
                LogicalConsistency,
                Medium,
                "Physical quantities must be strictly positive",
            ),
            rule(
                ids::LC006,
                "Invalid geometry",
                LogicalConsistency,
                High,
                "Geometry must be valid (closed rings, no self-intersection)",
                true,
                false,
            ),
            attr(
                ids::LC007,
                "Year out of range",
                LogicalConsistency,
                Medium,
                "The fiscal year must fall inside the configured window",
            ),
            attr(
                ids::LC008,
                "Duplicate record",
                LogicalConsistency,
                High,
                "Two or more records share identical non-volatile content",
            ),
            // Completeness
            attr(
                ids::CP001,
                "Required field missing",
                Completeness,
                High,
                "A mandatory attribute is absent or blank",
            ),
            geo(
                ids::CP002,
                "Geometry expected",
                Completeness,
                Medium,
                "A record with an address should carry a geometry",
            ),
            attr(
                ids::CP003,
                "No identifier",
                Completeness,
                Critical,
                "At least one identifying attribute must be present",
            ),
            attr(
                ids::CP004,
                "Dates incomplete for status",
                Completeness,
                High,
                "Started projects need a start date; finished projects need an end date",
            ),
            attr(
                ids::CP005,
                "Contract reference missing",
                Completeness,
                Medium,
                "Projects past contracting must reference their contracting process",
            ),
            attr(
                ids::CP006,
                "Address missing",
                Completeness,
                Low,
                "Records should carry a street address",
            ),
            // Positional accuracy
            geo(
                ids::PA001,
                "Outside municipal bounding box",
                PositionalAccuracy,
                Critical,
                "The representative point must fall inside the configured bounding box",
            ),
            geo(
                ids::PA002,
                "Inconsistent CRS",
                PositionalAccuracy,
                High,
                "The declared coordinate reference system must match the expected one",
            ),
            geo(
                ids::PA003,
                "Degenerate coordinates",
                PositionalAccuracy,
                Critical,
                "Coordinates must not be (0, 0) or outside the lat/lon domain",
            ),
            geo(
                ids::PA004,
                "Point outside declared district",
                PositionalAccuracy,
                High,
                "The representative point must fall inside the declared district polygon",
            ),
            geo(
                ids::PA005,
                "Point outside declared neighborhood",
                PositionalAccuracy,
                Medium,
                "The representative point must fall inside the declared neighborhood polygon",
            ),
            // Thematic accuracy
            theme(ids::TA001, "Unknown status", High, "status"),
            theme(
                ids::TA002,
                "Unknown intervention type",
                Medium,
                "intervention_type",
            ),
            theme(
                ids::TA003,
                "Unknown procurement platform",
                Low,
                "procurement_platform",
            ),
            theme(ids::TA004, "Unknown unit of measure", Low, "unit_of_measure"),
            theme(ids::TA005, "Unknown asset class", Medium, "asset_class"),
            theme(ids::TA006, "Unknown facility type", Low, "facility_type"),
            theme(ids::TA007, "Unknown funding source", Medium, "funding_source"),
            theme(ids::TA008, "Unknown managing unit", High, "managing_unit"),
            attr(
                ids::TA009,
                "Malformed URL",
                ThematicAccuracy,
                Low,
                "Link attributes must be well-formed http(s) URLs",
            ),
            // Temporal quality
            attr(
                ids::TQ001,
                "Start after end",
                TemporalQuality,
                High,
                "The start date must not be later than the end date",
            ),
            attr(
                ids::TQ002,
                "Unparseable date",
                TemporalQuality,
                High,
                "Date attributes must use one of the accepted formats",
            ),
            attr(
                ids::TQ003,
                "Date outside window",
                TemporalQuality,
                Medium,
                "Dates must fall inside the configured year window",
            ),
            attr(
                ids::TQ004,
                "End date in the future",
                TemporalQuality,
                Medium,
                "Finished projects must have an end date in the past",
            ),
            attr(
                ids::TQ005,
                "Implausible duration",
                TemporalQuality,
                Medium,
                "The project duration must stay inside the configured bound",
            ),
        ];

        Self { rules }
    }

    /// Looks up a rule by id.
    pub fn get(&self, id: &str) -> Option<&ValidationRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// All rules of one dimension, in catalog order.
    pub fn for_dimension(&self, dimension: Dimension) -> impl Iterator<Item = &ValidationRule> {
        self.rules.iter().filter(move |r| r.dimension == dimension)
    }

    /// Iterates over the whole catalog.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationRule> {
        self.rules.iter()
    }

    /// Number of rules in the catalog.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the catalog holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
