//! Typed rows produced by the table reader.

use std::sync::Arc;

use crate::schema::Schema;
use crate::value::{Timestamp, Value};

/// Structural or coercion problem found while building a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellError {
    /// A cell could not be coerced to its field type.
    Type { field: String, message: String },
    /// The record has more cells than the header.
    Extra { position: usize, raw: String },
    /// The record has fewer cells than the header.
    Missing { field: String },
}

/// One data row, coerced against the resource schema.
///
/// Blank cells are stored as `None`. A cell that failed coercion is also
/// `None`, with the failure recorded in `errors`.
#[derive(Debug, Clone)]
pub struct Row {
    number: usize,
    schema: Arc<Schema>,
    cells: Vec<Option<Value>>,
    raw: Vec<String>,
    errors: Vec<CellError>,
}

impl Row {
    /// Build a row from raw record cells.
    ///
    /// `number` is the 1-based data row number.
    pub fn from_record<'a, I>(number: usize, schema: Arc<Schema>, record: I) -> Row
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut raw: Vec<String> = record.into_iter().map(str::to_string).collect();
        let mut errors = Vec::new();

        for (position, extra) in raw.iter().enumerate().skip(schema.len()) {
            errors.push(CellError::Extra {
                position: position + 1,
                raw: extra.clone(),
            });
        }
        raw.truncate(schema.len());

        let mut cells = Vec::with_capacity(schema.len());
        for (i, field) in schema.fields.iter().enumerate() {
            let Some(cell) = raw.get(i) else {
                errors.push(CellError::Missing {
                    field: field.name.clone(),
                });
                cells.push(None);
                continue;
            };
            if schema.is_missing(cell) {
                cells.push(None);
                continue;
            }
            match Value::coerce(cell, field.field_type) {
                Ok(v) => cells.push(Some(v)),
                Err(message) => {
                    errors.push(CellError::Type {
                        field: field.name.clone(),
                        message,
                    });
                    cells.push(None);
                }
            }
        }

        Row {
            number,
            schema,
            cells,
            raw,
            errors,
        }
    }

    /// 1-based data row number.
    #[inline]
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Coerced value of a field; `None` when blank, invalid or unknown.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.schema
            .index_of(field)
            .and_then(|i| self.cells.get(i))
            .and_then(Option::as_ref)
    }

    /// String payload of a field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Timestamp view of a date/time field.
    pub fn get_timestamp(&self, field: &str) -> Option<Timestamp> {
        self.get(field).and_then(Value::as_timestamp)
    }

    /// Trimmed raw text of a field, if non-blank.
    pub fn raw(&self, field: &str) -> Option<&str> {
        let i = self.schema.index_of(field)?;
        let cell = self.raw.get(i)?;
        (!self.schema.is_missing(cell)).then(|| cell.trim())
    }

    /// Whether the field has no usable raw text (unknown fields are blank).
    pub fn is_blank(&self, field: &str) -> bool {
        self.raw(field).is_none()
    }

    /// `(field name, coerced value)` pairs in column order.
    pub fn values(&self) -> impl Iterator<Item = (&str, Option<&Value>)> + '_ {
        self.schema
            .fields
            .iter()
            .zip(&self.cells)
            .map(|(f, v)| (f.name.as_str(), v.as_ref()))
    }

    /// Non-blank raw values of the columns flagged `extra`.
    pub fn extra_values(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.schema
            .extra_fields()
            .filter_map(|f| self.raw(&f.name).map(|v| (f.name.as_str(), v)))
    }

    /// Problems found while reading this row.
    pub fn errors(&self) -> &[CellError] {
        &self.errors
    }
}
