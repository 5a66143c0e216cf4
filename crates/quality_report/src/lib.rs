//! # Quality Report
//!
//! Three-tier reporting pipeline for the Geodata Quality Engine: the flat
//! issue list of a validation run becomes record-level documents (with
//! P0–P3 priorities), group-level documents (per organizational unit), and
//! a single global summary, plus UI-facing categorical metadata.
//!
//! The reporter is a stateless transform; its only carried state is the run
//! stamp (timestamp + content hash) applied to every emitted document.
//!
//! ## Example
//!
//! ```rust
//! use quality_core::RuleConfig;
//! use quality_report::Reporter;
//! use quality_validator::{BatchValidator, Record, RecordSet, RecordValidator};
//!
//! let records = RecordSet::from_records(vec![
//!     Record::new().with("project_id", "OBR-1").with("status", "???"),
//! ]);
//! let result =
//!     BatchValidator::new(RecordValidator::new(RuleConfig::default())).validate_all(&records);
//!
//! let reporter = Reporter::for_result(&result);
//! let record_reports = reporter.record_level_report(&result);
//! let summary = reporter.summary_report(&result, "managing_unit");
//! assert_eq!(summary.total_records, 1);
//! ```

mod documents;
mod reporter;
mod run;
mod sink;

pub use documents::*;
pub use reporter::*;
pub use run::*;
pub use sink::*;
