//! Row and table checks
//!
//! A check is configuration plus per-pass state. The runner calls `on_start`
//! once with the resource schema, then `on_row` for every data row in file
//! order. Checks never fail on bad data: problems come back as report
//! entries. A check instance belongs to exactly one pass; callers build a
//! fresh set per run.

pub mod baseline;
pub mod chronological;
pub mod logical;
pub mod lookup;
pub mod related_key;
pub mod required;
pub mod side_input;
pub mod unique;

pub use baseline::FieldConstraints;
pub use chronological::{is_chronological, ChronologicalOrder};
pub use logical::{LogicalCheck, LogicalRule};
pub use lookup::LookupMatch;
pub use related_key::RelatedKey;
pub use required::EnhancedRequired;
pub use side_input::SideInputConstraint;
pub use unique::{NullHandling, UniqueTogether};

use surveygraph_tabular::{Row, Schema};

use crate::error::{Result, ValidateError};
use crate::report::ReportError;

/// A validation rule applied row by row.
pub trait Check: Send {
    /// Name used in `check-error` entries and logs.
    fn name(&self) -> &str;

    /// Called once before the first row.
    ///
    /// Returning `Err` disables this check for the pass.
    fn on_start(&mut self, _schema: &Schema) -> Result<()> {
        Ok(())
    }

    /// Called for every data row.
    fn on_row(&mut self, row: &Row) -> Vec<ReportError>;
}

/// Reject an empty field list at construction.
pub(crate) fn non_empty(check: &str, fields: &[String]) -> Result<()> {
    if fields.is_empty() {
        return Err(ValidateError::invalid_check(check, "no fields given"));
    }
    Ok(())
}

/// Every named field must exist in the resource schema.
pub(crate) fn require_fields<'a, I>(check: &str, schema: &Schema, fields: I) -> Result<()>
where
    I: IntoIterator<Item = &'a String>,
{
    let missing: Vec<&str> = fields
        .into_iter()
        .filter(|f| !schema.has_field(f))
        .map(String::as_str)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::invalid_check(
            check,
            format!("unknown field(s): {}", missing.join(", ")),
        ))
    }
}

pub(crate) fn to_strings<I, S>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fields.into_iter().map(Into::into).collect()
}
