//! # Quality Core
//!
//! Core types for the Geodata Quality Engine.
//!
//! This crate provides the building blocks shared by the validator, the
//! reporter, and the CLI: the rule catalog, severity and dimension enums,
//! quality issues, the injected rule configuration, administrative boundary
//! layers, and the observer extension points.
//!
//! ## Key Concepts
//!
//! - **RuleCatalog**: the fixed, read-only table of validation rules
//! - **QualityIssue**: one detected violation, carried as data (never as an
//!   error) into the reports
//! - **RuleConfig**: whitelists, status policy, and thresholds, injected at
//!   validator construction
//! - **QualityStatistics**: the aggregate snapshot of a validation run
//!
//! ## Example
//!
//! ```rust
//! use quality_core::{RuleCatalog, Severity, ids};
//!
//! let catalog = RuleCatalog::standard();
//! let rule = catalog.get(ids::LC001).unwrap();
//! assert_eq!(rule.severity, Severity::Critical);
//! ```

pub mod boundary;
pub mod builder;
pub mod catalog;
pub mod config;
pub mod error;
pub mod issue;
pub mod observer;
pub mod severity;
pub mod stats;

pub use boundary::*;
pub use builder::*;
pub use catalog::*;
pub use config::*;
pub use error::*;
pub use issue::*;
pub use observer::*;
pub use severity::*;
pub use stats::*;
