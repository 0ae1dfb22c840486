//! Logical relations between a set of fields

use surveygraph_ns::kinds;
use surveygraph_tabular::{Row, Schema};

use super::{non_empty, require_fields, to_strings, Check};
use crate::error::Result;
use crate::report::ReportError;

/// How many of the fields may be filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalRule {
    /// Exactly one field is non-blank.
    MutuallyExclusive,
    /// Either every field is non-blank or none is.
    MutuallyInclusive,
    /// At least one field is non-blank.
    AnyOf,
}

/// Applies a `LogicalRule` to a set of fields.
#[derive(Debug)]
pub struct LogicalCheck {
    rule: LogicalRule,
    fields: Vec<String>,
}

impl LogicalCheck {
    pub fn new<I, S>(rule: LogicalRule, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = to_strings(fields);
        let check = Self { rule, fields };
        non_empty(check.name(), &check.fields)?;
        Ok(check)
    }

    pub fn mutually_exclusive<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(LogicalRule::MutuallyExclusive, fields)
    }

    pub fn mutually_inclusive<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(LogicalRule::MutuallyInclusive, fields)
    }

    pub fn any_of<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(LogicalRule::AnyOf, fields)
    }
}

impl Check for LogicalCheck {
    fn name(&self) -> &str {
        match self.rule {
            LogicalRule::MutuallyExclusive => "mutually-exclusive",
            LogicalRule::MutuallyInclusive => "mutually-inclusive",
            LogicalRule::AnyOf => "any-of",
        }
    }

    fn on_start(&mut self, schema: &Schema) -> Result<()> {
        require_fields(self.name(), schema, &self.fields)
    }

    fn on_row(&mut self, row: &Row) -> Vec<ReportError> {
        let (filled, blank): (Vec<&str>, Vec<&str>) = {
            let (f, b): (Vec<&String>, Vec<&String>) =
                self.fields.iter().partition(|f| !row.is_blank(f));
            (
                f.into_iter().map(String::as_str).collect(),
                b.into_iter().map(String::as_str).collect(),
            )
        };

        let note = match self.rule {
            LogicalRule::MutuallyExclusive if filled.len() > 1 => format!(
                "The following fields are mutually exclusive and must not be provided together: {}",
                filled.join(", ")
            ),
            LogicalRule::MutuallyExclusive if filled.is_empty() => format!(
                "Exactly one of the following fields must be provided: {}",
                self.fields.join(", ")
            ),
            LogicalRule::MutuallyInclusive if !filled.is_empty() && !blank.is_empty() => format!(
                "The following fields must be provided together, missing: {}",
                blank.join(", ")
            ),
            LogicalRule::AnyOf if filled.is_empty() => format!(
                "At least one of the following fields must be provided: {}",
                self.fields.join(", ")
            ),
            _ => return Vec::new(),
        };
        vec![ReportError::new(kinds::ROW_CONSTRAINT, note).at_row(row.number())]
    }
}
