//! Validation engine for survey tables
//!
//! This crate checks tabular survey data before it is mapped to a graph.
//! Data-quality problems are never raised; they are collected into a
//! `ValidationReport` in a single pass over the rows.
//!
//! # Overview
//!
//! Validation works by:
//! 1. Checking the header for blank and duplicate labels
//! 2. Merging the header into the template schema and applying the schema
//!    extension rules (fixed columns first, keys on fixed columns only)
//! 3. Starting every check against the merged schema; a check whose
//!    configuration does not fit is reported as `check-error` and disabled
//! 4. Running the baseline field constraints and every active check on
//!    each row
//!
//! # Supported checks
//!
//! - Baseline: cell layout, type coercion, `required`, `enum`, `pattern`,
//!   `minimum`/`maximum`, `unique`, primary key
//! - Chronological order of date/time fields
//! - Mutual exclusion, mutual inclusion and any-of over field sets
//! - Required fields with whitelisted exemptions
//! - Lookup match between two fields
//! - Unique together, with configurable null handling
//! - Side-input row constraints in a sandboxed expression language
//! - Related keys from another resource
//!
//! # Example
//!
//! ```ignore
//! use surveygraph_validate::{checks::UniqueTogether, NullHandling, Validator};
//!
//! let report = Validator::new(schema)?
//!     .with_check(UniqueTogether::new(["siteID", "siteIDSource"], NullHandling::Skip)?)
//!     .validate(file)?;
//!
//! if !report.valid {
//!     for error in &report.errors {
//!         println!("{:?} row {:?}: {}", error.kind, error.row, error.note);
//!     }
//! }
//! ```

pub mod checks;
pub mod error;
pub mod expr;
pub mod extension;
pub mod report;
pub mod validator;

pub use checks::{
    is_chronological, ChronologicalOrder, Check, EnhancedRequired, FieldConstraints,
    LogicalCheck, LogicalRule, LookupMatch, NullHandling, RelatedKey, SideInputConstraint,
    UniqueTogether,
};
pub use error::{Result, ValidateError};
pub use expr::{EvalError, ExprValue, Expression, Namespace};
pub use extension::{merge_and_validate, validate_extension};
pub use report::{ReportError, ValidationReport};
pub use validator::Validator;

/// Report kind codes (re-exported from surveygraph-ns)
pub use surveygraph_ns::kinds;
