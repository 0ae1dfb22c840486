//! Mapping error types

use thiserror::Error;

use surveygraph_tabular::TabularError;
use surveygraph_terms::{CatalogError, VocabularyError};
use surveygraph_validate::ValidateError;

use crate::geometry::GeometryError;

/// Errors from validating or mapping a survey file.
///
/// Data-quality problems never appear here; they go in the
/// `ValidationReport`. A `MappingError` means the run could not proceed.
#[derive(Debug, Error)]
pub enum MappingError {
    /// No template registered under this id
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// Template registered twice
    #[error("Template {0} is registered more than once")]
    DuplicateTemplate(String),

    /// A value could not be resolved against a vocabulary
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),

    /// A field names a vocabulary the catalog does not hold
    #[error("No vocabulary bound to field {field} of template {template}")]
    MissingVocabulary { template: String, field: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Tabular(#[from] TabularError),

    #[error(transparent)]
    Validate(#[from] ValidateError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The file header does not line up with the template schema
    #[error("Header does not match template {template}: {message}")]
    Header { template: String, message: String },

    /// A value that should have been caught by validation
    #[error("Row {row}, field {field}: {message}")]
    InvalidValue {
        row: usize,
        field: String,
        message: String,
    },

    /// An identifier could not be derived
    #[error("Identity error: {0}")]
    Identity(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for mapping operations
pub type Result<T> = std::result::Result<T, MappingError>;
