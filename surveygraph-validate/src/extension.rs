//! Schema extension rules
//!
//! A file may append columns to a template's fixed schema but may not
//! reorder, rename or drop the fixed ones. Keys must keep pointing at fixed
//! fields, so extra columns can never become part of a template's identity.

use std::collections::HashSet;

use surveygraph_ns::kinds;
use surveygraph_tabular::Schema;

use crate::report::ReportError;

/// Check a candidate (file) schema against the template's original schema.
///
/// Returns one `schema-error` entry per problem; an empty vector means the
/// candidate is a valid extension.
pub fn validate_extension(candidate: &Schema, original: &Schema) -> Vec<ReportError> {
    let mut errors = Vec::new();
    let original_names: HashSet<&str> = original.field_names().collect();

    for (i, expected) in original.fields.iter().enumerate() {
        let actual = candidate.fields.get(i).map(|f| f.name.as_str());
        if actual != Some(expected.name.as_str()) {
            errors.push(ReportError::new(
                kinds::SCHEMA_ERROR,
                format!(
                    "Column {} should be '{}' but found {}",
                    i + 1,
                    expected.name,
                    actual.map_or_else(|| "nothing".to_string(), |a| format!("'{a}'")),
                ),
            ));
        }
    }

    let mut must_be_original = |context: &str, field: &str| {
        if !original_names.contains(field) {
            errors.push(ReportError::new(
                kinds::SCHEMA_ERROR,
                format!("{context} refers to '{field}', which is not a template field"),
            ));
        }
    };
    for field in &candidate.primary_key {
        must_be_original("Primary key", field);
    }
    for fk in &candidate.foreign_keys {
        for field in &fk.fields {
            must_be_original("Foreign key", field);
        }
        if fk.reference.resource.is_empty() {
            for field in &fk.reference.fields {
                must_be_original("Foreign key reference", field);
            }
        }
    }

    for fk in &candidate.foreign_keys {
        if fk.fields.len() != fk.reference.fields.len() {
            errors.push(ReportError::new(
                kinds::SCHEMA_ERROR,
                format!(
                    "Foreign key ({}) has {} field(s) but its reference has {}",
                    fk.fields.join(", "),
                    fk.fields.len(),
                    fk.reference.fields.len()
                ),
            ));
        }
    }

    errors
}

/// Merge a file header into the template schema and validate the result.
pub fn merge_and_validate(original: &Schema, header: &[String]) -> (Schema, Vec<ReportError>) {
    let candidate = original.merge_header(header);
    let errors = validate_extension(&candidate, original);
    (candidate, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use surveygraph_tabular::{Field, ForeignKey, ForeignKeyReference};

    fn original() -> Schema {
        Schema::new(vec![
            Field::string("siteID"),
            Field::string("siteIDSource"),
            Field::string("siteName"),
        ])
        .with_primary_key(["siteID"])
    }

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn appended_columns_are_accepted() {
        let (merged, errors) =
            merge_and_validate(&original(), &header(&["siteID", "siteIDSource", "siteName", "notes"]));
        assert!(errors.is_empty());
        assert!(merged.field("notes").unwrap().extra);
    }

    #[test]
    fn inserted_column_is_a_positional_mismatch() {
        let (_, errors) = merge_and_validate(
            &original(),
            &header(&["siteID", "notes", "siteIDSource", "siteName"]),
        );
        let notes: Vec<&str> = errors.iter().map(|e| e.note.as_str()).collect();
        assert_eq!(
            notes,
            vec![
                "Column 2 should be 'siteIDSource' but found 'notes'",
                "Column 3 should be 'siteName' but found 'siteIDSource'",
            ]
        );
        assert!(errors.iter().all(|e| e.kind == kinds::SCHEMA_ERROR));
    }

    #[test]
    fn missing_columns_are_reported() {
        let (_, errors) = merge_and_validate(&original(), &header(&["siteID", "siteIDSource"]));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].note, "Column 3 should be 'siteName' but found nothing");
    }

    #[test]
    fn keys_must_use_original_fields() {
        let mut candidate = original().merge_header(&header(&[
            "siteID",
            "siteIDSource",
            "siteName",
            "parentSite",
        ]));
        candidate.primary_key = vec!["siteID".into(), "parentSite".into()];
        candidate.foreign_keys.push(ForeignKey {
            fields: vec!["siteIDSource".into(), "siteName".into()],
            reference: ForeignKeyReference {
                resource: String::new(),
                fields: vec!["siteID".into()],
            },
        });

        let errors = validate_extension(&candidate, &original());
        assert_eq!(errors.len(), 2);
        assert!(errors[0].note.contains("'parentSite'"));
        assert!(errors[1].note.contains("has 2 field(s) but its reference has 1"));
    }
}
