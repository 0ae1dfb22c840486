//! Tabular input for survey templates.
//!
//! This crate reads CSV files against a table schema and produces typed rows
//! one at a time. It knows nothing about RDF or templates; validation and
//! mapping layers sit on top.
//!
//! # Design
//!
//! - **Row-at-a-time**: `TableReader` is an iterator, memory is bounded by one record
//! - **Errors as data**: coercion and shape problems are kept on the `Row`, not raised
//! - **Header merge**: `Schema::merge_header` keeps template fields and flags extras

pub mod error;
pub mod reader;
pub mod row;
pub mod schema;
pub mod value;

pub use error::{Result, TabularError};
pub use reader::TableReader;
pub use row::{CellError, Row};
pub use schema::{Constraints, Field, FieldType, ForeignKey, ForeignKeyReference, Schema};
pub use value::{Timestamp, Value, LIST_SEPARATOR};
