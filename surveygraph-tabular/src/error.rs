//! Error types for tabular operations.

use thiserror::Error;

/// Errors from reading tables and schema descriptors.
#[derive(Debug, Error)]
pub enum TabularError {
    /// Schema or structural error (duplicate fields, bad descriptor shape, etc.)
    #[error("Schema error: {0}")]
    Schema(String),

    /// The CSV source could not be decoded
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON schema descriptor
    #[error("Descriptor error: {0}")]
    Descriptor(#[from] serde_json::Error),
}

/// Result type for tabular operations.
pub type Result<T> = std::result::Result<T, TabularError>;
