//! # Quality Validator
//!
//! Validation engine for the Geodata Quality Engine. This crate grades
//! municipal project records against the rule catalog:
//!
//! - Logical consistency (status/progress congruence, ranges, geometry
//!   validity, duplicates)
//! - Completeness (required fields, identifiers, status-conditioned dates)
//! - Positional accuracy (bounding box, CRS, administrative containment)
//! - Thematic accuracy (catalog membership with fuzzy suggestions, URLs)
//! - Temporal quality (date formats, ordering, plausibility)
//!
//! ## Example
//!
//! ```rust
//! use quality_core::RuleConfig;
//! use quality_validator::{BatchValidator, Record, RecordSet, RecordValidator};
//!
//! let validator = RecordValidator::new(RuleConfig::default());
//! let records = RecordSet::from_records(vec![
//!     Record::new()
//!         .with("project_id", "OBR-1")
//!         .with("status", "Terminado")
//!         .with("progress", 100i64),
//! ]);
//!
//! let result = BatchValidator::new(validator).validate_all(&records);
//! assert_eq!(result.total_records, 1);
//! ```

mod completeness;
mod consistency;
mod duplicates;
mod engine;
mod positional;
mod record;
mod similarity;
mod temporal;
mod thematic;

pub use completeness::*;
pub use consistency::*;
pub use duplicates::*;
pub use engine::*;
pub use positional::*;
pub use record::*;
pub use similarity::*;
pub use temporal::*;
pub use thematic::*;
