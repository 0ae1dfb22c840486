//! Error types for vocabulary resolution and registration.

use thiserror::Error;

/// Result type for vocabulary operations.
pub type Result<T> = std::result::Result<T, VocabularyError>;

/// Errors from building or resolving against a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VocabularyError {
    /// A restricted vocabulary has no term for the value
    #[error("Unrecognised value {value:?} for vocabulary {vocabulary}")]
    Unrecognised { vocabulary: String, value: String },

    /// A blank value was given and the vocabulary has no default
    #[error("No value given for vocabulary {vocabulary} and it has no default")]
    Blank { vocabulary: String },

    /// Two terms share a label once sanitized
    #[error("Vocabulary {vocabulary} has more than one term labelled {label:?}")]
    DuplicateLabel { vocabulary: String, label: String },

    /// A vocabulary definition is incomplete or inconsistent
    #[error("Invalid definition for vocabulary {vocabulary}: {message}")]
    Definition { vocabulary: String, message: String },
}

/// Errors from assembling a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two vocabularies registered under one id
    #[error("Vocabulary {0} is registered more than once")]
    DuplicateId(String),

    /// Two vocabularies bound to the same template field
    #[error("Field {field} of template {template} already has a vocabulary")]
    DuplicateField { template: String, field: String },

    /// A field binding names a vocabulary that is not registered
    #[error("Unknown vocabulary {0}")]
    UnknownVocabulary(String),

    /// A vocabulary could not be built
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),

    /// A JSON definition could not be parsed
    #[error("Invalid vocabulary JSON: {0}")]
    Json(#[from] serde_json::Error),
}
