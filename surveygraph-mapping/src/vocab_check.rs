//! Validation of vocabulary-controlled fields.

use std::sync::Arc;

use surveygraph_ns::kinds;
use surveygraph_tabular::{Row, Schema};
use surveygraph_terms::Vocabulary;
use surveygraph_validate::{Check, ReportError, ValidateError};

/// Non-blank values of `field` must name a term of a restricted
/// vocabulary. Flexible vocabularies accept anything, so they pass.
///
/// Running this before mapping keeps unresolvable values out of the mapper,
/// where they would abort the run.
#[derive(Debug)]
pub struct VocabularyCheck {
    field: String,
    vocabulary: Arc<Vocabulary>,
}

impl VocabularyCheck {
    pub fn new(field: impl Into<String>, vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            field: field.into(),
            vocabulary,
        }
    }
}

impl Check for VocabularyCheck {
    fn name(&self) -> &str {
        "vocabulary"
    }

    fn on_start(&mut self, schema: &Schema) -> Result<(), ValidateError> {
        if schema.has_field(&self.field) {
            Ok(())
        } else {
            Err(ValidateError::InvalidCheck {
                check: self.name().to_string(),
                message: format!("field '{}' is not in the schema", self.field),
            })
        }
    }

    fn on_row(&mut self, row: &Row) -> Vec<ReportError> {
        let Vocabulary::Restricted(vocabulary) = self.vocabulary.as_ref() else {
            return Vec::new();
        };
        let Some(value) = row.raw(&self.field) else {
            return Vec::new();
        };
        match vocabulary.resolve(value) {
            Ok(_) => Vec::new(),
            Err(_) => vec![ReportError::new(
                kinds::CONSTRAINT_ERROR,
                format!(
                    "The value '{value}' is not in vocabulary {}",
                    vocabulary.id()
                ),
            )
            .at_row(row.number())
            .on_field(self.field.as_str())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surveygraph_tabular::Field;
    use surveygraph_terms::{ids, Catalog};

    fn rows(values: &[&str]) -> Vec<Row> {
        let schema = Arc::new(Schema::new(vec![Field::string("datum")]));
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Row::from_record(i + 1, Arc::clone(&schema), [*v]))
            .collect()
    }

    fn check(id: &str) -> VocabularyCheck {
        let catalog = Catalog::shared().unwrap();
        VocabularyCheck::new("datum", catalog.lookup("t", "datum", id).unwrap())
    }

    #[test]
    fn test_restricted_values() {
        let mut check = check(ids::GEODETIC_DATUM);
        let errors: Vec<ReportError> = rows(&["GDA2020", "", "wgs-84", "MARS"])
            .iter()
            .flat_map(|r| check.on_row(r))
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, Some(4));
        assert_eq!(errors[0].kind, kinds::CONSTRAINT_ERROR);
    }

    #[test]
    fn test_flexible_accepts_anything() {
        let mut check = check(ids::HABITAT);
        assert!(rows(&["somewhere new"]).iter().all(|r| check.on_row(r).is_empty()));
    }

    #[test]
    fn test_unknown_field_fails_at_start() {
        let mut check = check(ids::GEODETIC_DATUM);
        let schema = Schema::new(vec![Field::string("other")]);
        assert!(check.on_start(&schema).is_err());
    }
}
