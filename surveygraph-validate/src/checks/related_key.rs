//! Keys that must exist in a related resource

use std::collections::HashSet;
use std::sync::Arc;

use surveygraph_ns::kinds;
use surveygraph_tabular::{Row, Schema};

use super::{require_fields, to_strings, Check};
use crate::error::{Result, ValidateError};
use crate::report::ReportError;

/// The values of one or more fields, taken together, must be one of a
/// caller-supplied key set.
///
/// Typical use: every `(siteID, siteIDSource)` of a visit file must name a
/// site in the accompanying site file, unless the row carries its own
/// coordinates. Rows where any key field is blank bypass the check, as do
/// rows where any fallback field is filled in.
#[derive(Debug)]
pub struct RelatedKey {
    fields: Vec<String>,
    keys: Arc<HashSet<Vec<String>>>,
    fallbacks: Vec<String>,
}

impl RelatedKey {
    /// Each key in `keys` lists one value per field, in `fields` order.
    pub fn new<I, S>(fields: I, keys: Arc<HashSet<Vec<String>>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = to_strings(fields);
        if fields.is_empty() {
            return Err(ValidateError::invalid_check("related-key", "no key fields"));
        }
        Ok(Self {
            fields,
            keys,
            fallbacks: Vec::new(),
        })
    }

    /// Skip rows where any of these fields is non-blank.
    pub fn with_fallbacks<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallbacks = to_strings(fields);
        self
    }
}

impl Check for RelatedKey {
    fn name(&self) -> &str {
        "related-key"
    }

    fn on_start(&mut self, schema: &Schema) -> Result<()> {
        require_fields(self.name(), schema, self.fields.iter().chain(&self.fallbacks))
    }

    fn on_row(&mut self, row: &Row) -> Vec<ReportError> {
        let Some(key) = self
            .fields
            .iter()
            .map(|f| row.raw(f).map(str::to_string))
            .collect::<Option<Vec<_>>>()
        else {
            return Vec::new();
        };
        if self.keys.contains(&key) || self.fallbacks.iter().any(|f| !row.is_blank(f)) {
            return Vec::new();
        }
        vec![ReportError::new(
            kinds::CONSTRAINT_ERROR,
            format!(
                "{} {:?} has no match in the related resource",
                self.fields.join("/"),
                key.join("/")
            ),
        )
        .at_row(row.number())
        .on_field(self.fields[0].as_str())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testutil::{rows, schema};
    use pretty_assertions::assert_eq;

    fn keys(pairs: &[(&str, &str)]) -> Arc<HashSet<Vec<String>>> {
        Arc::new(
            pairs
                .iter()
                .map(|(a, b)| vec![a.to_string(), b.to_string()])
                .collect(),
        )
    }

    #[test]
    fn unknown_keys_fail_unless_fallback_present() {
        let schema = schema(&["siteID", "siteIDSource", "decimalLatitude"]);
        let mut check = RelatedKey::new(["siteID", "siteIDSource"], keys(&[("S1", "TERN")]))
            .unwrap()
            .with_fallbacks(["decimalLatitude"]);
        check.on_start(&schema).unwrap();

        let data = rows(
            &schema,
            &[
                &["S1", "TERN", ""],
                &["S2", "TERN", ""],
                &["S3", "TERN", "-27.5"],
                &["", "TERN", ""],
            ],
        );
        let errors: Vec<ReportError> = data.iter().flat_map(|r| check.on_row(r)).collect();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, Some(2));
        assert_eq!(errors[0].field.as_deref(), Some("siteID"));
    }

    #[test]
    fn every_key_field_must_match() {
        let schema = schema(&["siteID", "siteIDSource"]);
        let mut check = RelatedKey::new(
            ["siteID", "siteIDSource"],
            keys(&[("S1", "ORG-A"), ("S1", "ORG-B")]),
        )
        .unwrap();
        check.on_start(&schema).unwrap();

        let data = rows(
            &schema,
            &[&["S1", "ORG-A"], &["S1", "ORG-B"], &["S1", "ORG-C"]],
        );
        let errors: Vec<ReportError> = data.iter().flat_map(|r| check.on_row(r)).collect();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, Some(3));
        assert!(errors[0].note.contains("S1/ORG-C"));
    }

    #[test]
    fn bad_configuration() {
        assert!(RelatedKey::new(Vec::<String>::new(), keys(&[])).is_err());

        let schema = schema(&["siteID"]);
        let mut check = RelatedKey::new(["siteID", "siteIDSource"], keys(&[])).unwrap();
        assert!(check.on_start(&schema).is_err());
    }
}
