//! Validation error types
//!
//! These are configuration failures only. Data-quality problems never
//! surface as errors; they are entries in a `ValidationReport`.

use surveygraph_tabular::TabularError;
use thiserror::Error;

/// Result type for validation setup
pub type Result<T> = std::result::Result<T, ValidateError>;

/// Check configuration and setup errors
#[derive(Debug, Error)]
pub enum ValidateError {
    /// A check was configured with arguments it cannot work with
    #[error("Invalid configuration for check '{check}': {message}")]
    InvalidCheck { check: String, message: String },

    /// Invalid regex in a field `pattern` constraint
    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Row constraint expression could not be parsed
    #[error("Expression syntax error at offset {offset}: {message}")]
    ExpressionSyntax { offset: usize, message: String },

    /// The resource could not be read
    #[error("Tabular error: {0}")]
    Tabular(#[from] TabularError),
}

impl ValidateError {
    pub(crate) fn invalid_check(check: &str, message: impl Into<String>) -> Self {
        ValidateError::InvalidCheck {
            check: check.to_string(),
            message: message.into(),
        }
    }
}
