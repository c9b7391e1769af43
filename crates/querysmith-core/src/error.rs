//! Error types for Querysmith core operations.
//!
//! The composition engine itself never fails: every `Composer` operation is
//! total. These errors cover the collaborators around it (catalog building,
//! configuration, the key-value store) where callers may want to react
//! differently, e.g. falling back to defaults on a corrupt state file.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using QuerysmithError
pub type Result<T> = std::result::Result<T, QuerysmithError>;

/// Core error types for Querysmith.
#[derive(Error, Debug)]
pub enum QuerysmithError {
    // === Catalog Errors ===
    /// Two operators in a catalog share the same id
    #[error("duplicate operator id in catalog: {id}")]
    DuplicateOperator { id: String },

    /// An operator id was requested that the catalog does not contain
    #[error("unknown operator: {id}")]
    UnknownOperator { id: String },

    /// A preset id was requested that no template defines
    #[error("unknown preset: {id}")]
    UnknownPreset { id: String },

    // === Storage Errors ===
    /// The state file exists but could not be understood
    #[error("state file {path} is corrupted: {reason}")]
    StateCorrupted { path: PathBuf, reason: String },

    // === Configuration Errors ===
    /// Configuration file parsing failed
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    // === I/O Errors ===
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// Serialization/deserialization failed
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl QuerysmithError {
    /// Returns true if the error means stored state should be discarded and
    /// replaced by defaults.
    pub fn is_corrupt_state(&self) -> bool {
        matches!(
            self,
            QuerysmithError::StateCorrupted { .. } | QuerysmithError::Serialization(_)
        )
    }

    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        QuerysmithError::ConfigError {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for QuerysmithError {
    fn from(err: serde_json::Error) -> Self {
        QuerysmithError::Serialization(err.to_string())
    }
}
