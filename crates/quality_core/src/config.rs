//! Rule configuration: whitelists, status policy, and tunable thresholds.
//!
//! Everything the validator needs beyond the rule catalog itself lives here,
//! injected at construction instead of read from module-level globals. All
//! fields have built-in defaults so a partial override file only needs to
//! name what it changes.

use crate::error::QualityError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known attribute names shared by the rule groups.
pub mod fields {
    pub const PROJECT_ID: &str = "project_id";
    pub const NAME: &str = "name";
    pub const STATUS: &str = "status";
    pub const PROGRESS: &str = "progress";
    pub const ADDRESS: &str = "address";
    pub const DISTRICT: &str = "district";
    pub const NEIGHBORHOOD: &str = "neighborhood";
    pub const CRS: &str = "crs";
    pub const START_DATE: &str = "start_date";
    pub const END_DATE: &str = "end_date";
    pub const YEAR: &str = "year";
    pub const CONTRACT_REF: &str = "contract_ref";
    pub const MANAGING_UNIT: &str = "managing_unit";
    pub const URL: &str = "url";
    pub const INTERVENTION_TYPE: &str = "intervention_type";
    pub const PROCUREMENT_PLATFORM: &str = "procurement_platform";
    pub const UNIT_OF_MEASURE: &str = "unit_of_measure";
    pub const ASSET_CLASS: &str = "asset_class";
    pub const FACILITY_TYPE: &str = "facility_type";
    pub const FUNDING_SOURCE: &str = "funding_source";
    pub const BUDGET: &str = "budget";
    pub const CONTRACT_VALUE: &str = "contract_value";
    pub const QUANTITY: &str = "quantity";
}

/// Allowed-value catalogs per thematic field.
///
/// A field with no catalog entry (or an empty one) degrades its membership
/// check to a no-op; it is never scored as passing or failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Whitelists(HashMap<String, Vec<String>>);

impl Whitelists {
    /// An empty set of catalogs (disables all thematic membership checks).
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// The built-in catalogs for a municipal public-works inventory.
    pub fn builtin() -> Self {
        let mut map = HashMap::new();
        let mut insert = |field: &str, values: &[&str]| {
            map.insert(
                field.to_string(),
                values.iter().map(|v| v.to_string()).collect(),
            );
        };

        insert(
            fields::STATUS,
            &[
                "Sin iniciar",
                "En ejecución",
                "Suspendido",
                "Terminado",
                "Inaugurado",
                "Cancelado",
            ],
        );
        insert(
            fields::INTERVENTION_TYPE,
            &[
                "Construcción",
                "Mejoramiento",
                "Mantenimiento",
                "Ampliación",
                "Estudios y diseños",
                "Dotación",
            ],
        );
        insert(
            fields::PROCUREMENT_PLATFORM,
            &["SECOP I", "SECOP II", "Tienda Virtual del Estado"],
        );
        insert(fields::UNIT_OF_MEASURE, &["m2", "ml", "und", "km", "ha"]);
        insert(
            fields::ASSET_CLASS,
            &[
                "Vía",
                "Parque",
                "Edificación",
                "Puente",
                "Espacio público",
                "Red de servicios",
            ],
        );
        insert(
            fields::FACILITY_TYPE,
            &[
                "Institución educativa",
                "Centro de salud",
                "Escenario deportivo",
                "Sede comunitaria",
                "Biblioteca",
            ],
        );
        insert(
            fields::FUNDING_SOURCE,
            &[
                "Recursos propios",
                "SGP",
                "Regalías",
                "Crédito",
                "Cofinanciación nacional",
            ],
        );
        insert(
            fields::MANAGING_UNIT,
            &[
                "Secretaría de Infraestructura",
                "Secretaría de Educación",
                "Secretaría de Salud",
                "Secretaría de Medio Ambiente",
                "Empresa de Desarrollo Urbano",
            ],
        );

        Self(map)
    }

    /// Catalog for one field, if configured and non-empty.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0
            .get(field)
            .map(|v| v.as_slice())
            .filter(|v| !v.is_empty())
    }

    /// Replaces the catalog for one field.
    pub fn set(&mut self, field: impl Into<String>, values: Vec<String>) {
        self.0.insert(field.into(), values);
    }

    /// True when no catalog is configured at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty() || self.0.values().all(|v| v.is_empty())
    }
}

/// Status-value policy for the congruence and date-completeness rules.
///
/// The exempt set is checked before the generic congruence rule; it is an
/// explicit carve-out, not a fallthrough default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusPolicy {
    /// Statuses meaning work has not begun (progress must be 0)
    pub start: Vec<String>,

    /// Statuses meaning work is finished (progress must be 100)
    pub terminal: Vec<String>,

    /// Statuses exempt from the congruence rule entirely
    pub exempt: Vec<String>,

    /// Statuses meaning officially inaugurated (progress must be exactly 100)
    pub inaugurated: Vec<String>,

    /// Status suggested when progress and a terminal status disagree
    pub in_progress_suggestion: String,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self {
            start: vec!["Sin iniciar".to_string()],
            terminal: vec!["Terminado".to_string(), "Inaugurado".to_string()],
            exempt: vec!["Suspendido".to_string(), "Cancelado".to_string()],
            inaugurated: vec!["Inaugurado".to_string()],
            in_progress_suggestion: "En ejecución".to_string(),
        }
    }
}

impl StatusPolicy {
    fn matches(list: &[String], status: &str) -> bool {
        let status = status.trim();
        list.iter().any(|s| s == status)
    }

    pub fn is_start(&self, status: &str) -> bool {
        Self::matches(&self.start, status)
    }

    pub fn is_terminal(&self, status: &str) -> bool {
        Self::matches(&self.terminal, status)
    }

    pub fn is_exempt(&self, status: &str) -> bool {
        Self::matches(&self.exempt, status)
    }

    pub fn is_inaugurated(&self, status: &str) -> bool {
        Self::matches(&self.inaugurated, status)
    }
}

/// Geographic bounding box in lon/lat order (EPSG:4326 axis convention).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }
}

impl Default for BoundingBox {
    /// A metropolitan-valley-sized default; deployments override this per
    /// municipality.
    fn default() -> Self {
        Self::new(-75.75, 5.95, -75.15, 6.55)
    }
}

/// Full rule configuration, injected at validator construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Allowed-value catalogs per thematic field
    pub whitelists: Whitelists,

    /// Status semantics for LC001 / CP004 / CP005 / TQ004
    pub status_policy: StatusPolicy,

    /// Attributes that must be present and non-blank (CP001)
    pub required_fields: Vec<String>,

    /// Attributes that identify a record; at least one must be present
    /// (CP003) and the first one found becomes the record key
    pub identifier_fields: Vec<String>,

    /// Money attributes checked for non-negativity (LC004)
    pub money_fields: Vec<String>,

    /// Quantity attributes checked for strict positivity (LC005)
    pub quantity_fields: Vec<String>,

    /// Bookkeeping attributes excluded from the duplicate fingerprint.
    ///
    /// There is no structural way to tell volatile from substantive fields;
    /// when upstream introduces a new auto-generated field it must be added
    /// here.
    pub volatile_fields: Vec<String>,

    /// Bounding box for PA001
    pub bounding_box: BoundingBox,

    /// Expected coordinate reference system (PA002)
    pub expected_crs: String,

    /// Earliest acceptable year for LC007 / TQ003
    pub earliest_year: i32,

    /// Latest acceptable year for LC007 / TQ003
    pub latest_year: i32,

    /// Upper bound on project duration in days (TQ005)
    pub max_duration_days: i64,

    /// Minimum similarity for a nearest-match suggestion (TA rules)
    pub similarity_threshold: f64,

    /// Attribute used as the organizational grouping key
    pub group_field: String,

    /// Sentinel substituted when the grouping attribute is absent
    pub group_fallback: String,

    /// How many entries "top rules / top fields" listings keep
    pub top_n: usize,
}

impl Default for RuleConfig {
    fn default() -> Self {
        let owned = |values: &[&str]| values.iter().map(|v| v.to_string()).collect();
        Self {
            whitelists: Whitelists::builtin(),
            status_policy: StatusPolicy::default(),
            required_fields: owned(&[
                fields::PROJECT_ID,
                fields::NAME,
                fields::STATUS,
                fields::MANAGING_UNIT,
            ]),
            identifier_fields: owned(&[fields::PROJECT_ID, fields::CONTRACT_REF]),
            money_fields: owned(&[fields::BUDGET, fields::CONTRACT_VALUE]),
            quantity_fields: owned(&[fields::QUANTITY]),
            volatile_fields: owned(&["created_at", "updated_at", "imported_at", "row_hash"]),
            bounding_box: BoundingBox::default(),
            expected_crs: "EPSG:4326".to_string(),
            earliest_year: 2000,
            latest_year: 2040,
            max_duration_days: 3650,
            similarity_threshold: 0.6,
            group_field: fields::MANAGING_UNIT.to_string(),
            group_fallback: "Unassigned".to_string(),
            top_n: 5,
        }
    }
}

impl RuleConfig {
    /// The default configuration with every thematic catalog removed.
    ///
    /// Used when the external whitelist source is unreadable: thematic
    /// coverage degrades instead of the whole validator failing.
    pub fn with_empty_whitelists() -> Self {
        Self {
            whitelists: Whitelists::empty(),
            ..Self::default()
        }
    }

    /// All fields the validator coerces to numbers (LC003).
    pub fn numeric_fields(&self) -> Vec<&str> {
        let mut out: Vec<&str> = vec![fields::PROGRESS, fields::YEAR];
        out.extend(self.money_fields.iter().map(String::as_str));
        out.extend(self.quantity_fields.iter().map(String::as_str));
        out
    }

    /// Checks internal consistency of the thresholds.
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(QualityError::Config(format!(
                "similarity_threshold {} must be within [0, 1]",
                self.similarity_threshold
            )));
        }
        if self.earliest_year > self.latest_year {
            return Err(QualityError::Config(format!(
                "year window {}..={} is reversed",
                self.earliest_year, self.latest_year
            )));
        }
        if self.max_duration_days <= 0 {
            return Err(QualityError::Config(format!(
                "max_duration_days {} must be positive",
                self.max_duration_days
            )));
        }
        let bbox = &self.bounding_box;
        if bbox.min_lon >= bbox.max_lon || bbox.min_lat >= bbox.max_lat {
            return Err(QualityError::Config(
                "bounding box extents are reversed or empty".to_string(),
            ));
        }
        Ok(())
    }
}
