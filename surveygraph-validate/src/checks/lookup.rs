//! Lookup match between two fields

use std::collections::HashMap;

use surveygraph_ns::kinds;
use surveygraph_tabular::{Row, Schema};

use super::{require_fields, Check};
use crate::error::Result;
use crate::report::ReportError;

/// `value(target) == map[value(key)]` on every row.
///
/// A blank key bypasses the check. A key missing from the map is reported
/// separately from a mismatching target value.
#[derive(Debug)]
pub struct LookupMatch {
    key_field: String,
    target_field: String,
    map: HashMap<String, String>,
}

impl LookupMatch {
    pub fn new(
        key_field: impl Into<String>,
        target_field: impl Into<String>,
        map: HashMap<String, String>,
    ) -> Self {
        Self {
            key_field: key_field.into(),
            target_field: target_field.into(),
            map,
        }
    }
}

impl Check for LookupMatch {
    fn name(&self) -> &str {
        "lookup-match"
    }

    fn on_start(&mut self, schema: &Schema) -> Result<()> {
        require_fields(self.name(), schema, [&self.key_field, &self.target_field])
    }

    fn on_row(&mut self, row: &Row) -> Vec<ReportError> {
        let Some(key) = row.raw(&self.key_field) else {
            return Vec::new();
        };
        let error = match self.map.get(key) {
            None => ReportError::new(
                kinds::ROW_CONSTRAINT,
                format!("'{}' has no known mapping for {key:?}", self.key_field),
            )
            .on_field(self.key_field.as_str()),
            Some(expected) => {
                let actual = row.raw(&self.target_field);
                if actual == Some(expected.as_str()) {
                    return Vec::new();
                }
                ReportError::new(
                    kinds::ROW_CONSTRAINT,
                    format!(
                        "Expected '{}' to be {expected:?} for {} {key:?}, found {:?}",
                        self.target_field,
                        self.key_field,
                        actual.unwrap_or("")
                    ),
                )
                .on_field(self.target_field.as_str())
            }
        };
        vec![error.at_row(row.number())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testutil::{rows, schema};

    #[test]
    fn distinguishes_unknown_key_from_mismatch() {
        let schema = schema(&["kingdom", "nomenclaturalCode"]);
        let map = HashMap::from([
            ("Animalia".to_string(), "ICZN".to_string()),
            ("Plantae".to_string(), "ICN".to_string()),
        ]);
        let mut check = LookupMatch::new("kingdom", "nomenclaturalCode", map);
        check.on_start(&schema).unwrap();

        let data = rows(
            &schema,
            &[
                &["Animalia", "ICZN"],
                &["Plantae", "ICZN"],
                &["Fungi", "ICN"],
                &["", "anything"],
            ],
        );
        let errors: Vec<ReportError> = data.iter().flat_map(|r| check.on_row(r)).collect();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].row, Some(2));
        assert_eq!(errors[0].field.as_deref(), Some("nomenclaturalCode"));
        assert_eq!(errors[1].row, Some(3));
        assert_eq!(errors[1].field.as_deref(), Some("kingdom"));
    }
}
