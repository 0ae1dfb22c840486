//! Required fields with whitelisted exemptions

use std::collections::HashMap;

use surveygraph_ns::kinds;
use surveygraph_tabular::{Row, Schema};

use super::{non_empty, require_fields, to_strings, Check};
use crate::error::Result;
use crate::report::ReportError;

/// A set of fields that must be non-blank.
///
/// A field may be excused on a row when another field of that row holds one
/// of a configured set of values, e.g. `organismQuantity` is not required
/// when `occurrenceStatus` is `absent`.
#[derive(Debug)]
pub struct EnhancedRequired {
    fields: Vec<String>,
    /// field -> (other field -> values that excuse `field`)
    whitelist: HashMap<String, HashMap<String, Vec<String>>>,
}

impl EnhancedRequired {
    pub fn new<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = to_strings(fields);
        non_empty("enhanced-required", &fields)?;
        Ok(Self {
            fields,
            whitelist: HashMap::new(),
        })
    }

    /// Excuse `field` when `other` holds any of `values`.
    pub fn with_whitelist<I, S>(
        mut self,
        field: impl Into<String>,
        other: impl Into<String>,
        values: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist
            .entry(field.into())
            .or_default()
            .entry(other.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    fn excused(&self, row: &Row, field: &str) -> bool {
        self.whitelist.get(field).is_some_and(|bypass| {
            bypass.iter().any(|(other, values)| {
                row.raw(other)
                    .is_some_and(|v| values.iter().any(|allowed| allowed == v))
            })
        })
    }
}

impl Check for EnhancedRequired {
    fn name(&self) -> &str {
        "enhanced-required"
    }

    fn on_start(&mut self, schema: &Schema) -> Result<()> {
        require_fields(self.name(), schema, &self.fields)?;
        require_fields(self.name(), schema, self.whitelist.keys())?;
        require_fields(
            self.name(),
            schema,
            self.whitelist.values().flat_map(|m| m.keys()),
        )
    }

    fn on_row(&mut self, row: &Row) -> Vec<ReportError> {
        self.fields
            .iter()
            .filter(|f| row.is_blank(f) && !self.excused(row, f))
            .map(|f| {
                ReportError::new(kinds::CONSTRAINT_ERROR, format!("'{f}' is a required field"))
                    .at_row(row.number())
                    .on_field(f.as_str())
            })
            .collect()
    }
}
