//! Custom error types for cuotas-cli
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for cuotas-cli operations
#[derive(Error, Debug)]
pub enum CuotasError {
    /// Settings file problems (unreadable, unparsable)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Owner table or pool eligibility is malformed. Fatal at load time.
    #[error("Invalid community configuration: {0}")]
    Configuration(String),

    /// A single input row could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// An expense item is unusable (negative or non-finite amount)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Nothing to compute: no row of the input produced a valid expense
    #[error("No valid data: no expense rows could be read ({skipped} skipped)")]
    NoValidData { skipped: usize },

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Validation errors for user supplied values
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Authentication failures (no session, bad credentials)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Operation refused by the shared setup secret check
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CuotasError {
    /// Create a "not found" error for owners
    pub fn owner_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Owner",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is the "nothing to compute" signal
    pub fn is_no_valid_data(&self) -> bool {
        matches!(self, Self::NoValidData { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for CuotasError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CuotasError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for CuotasError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

impl From<csv::Error> for CuotasError {
    fn from(err: csv::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type alias for cuotas-cli operations
pub type CuotasResult<T> = Result<T, CuotasError>;
