//! Error types shared across the engine.
//!
//! Business-rule violations are *not* errors (see [`crate::issue`]); this
//! module covers the few genuinely exceptional conditions, all of which
//! surface at construction or serialization boundaries.

use thiserror::Error;

/// Result type for quality-engine operations.
pub type Result<T> = std::result::Result<T, QualityError>;

/// Exceptional conditions of the quality engine.
#[derive(Error, Debug)]
pub enum QualityError {
    /// Rule configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
