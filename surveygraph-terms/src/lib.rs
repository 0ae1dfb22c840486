//! Controlled vocabularies for survey data.
//!
//! Free-text values from survey files are resolved to concept IRIs through
//! vocabularies. Labels are compared after sanitization (uppercase, letters
//! and digits only), so `"Dried and pressed"` and `"DRIED-AND-PRESSED"` are
//! the same label.
//!
//! # Design
//!
//! - **Restricted** vocabularies reject unknown values with a `VocabularyError`
//! - **Flexible** vocabularies mint a `skos:Concept` for unknown values into
//!   the output graph, with a UUIDv5 identifier derived from the value
//! - **Catalog** holds vocabularies by id and by `(template, field)`;
//!   `Catalog::shared()` builds the built-in set once per process

pub mod builtin;
pub mod catalog;
pub mod error;
pub mod sanitize;
pub mod vocabulary;

pub use builtin::ids;
pub use catalog::{Catalog, CatalogBuilder};
pub use error::{CatalogError, Result, VocabularyError};
pub use sanitize::sanitize;
pub use vocabulary::{
    FlexibleVocabulary, RestrictedVocabulary, Term, Vocabulary, VocabularyDefinition,
    VocabularyKind,
};
