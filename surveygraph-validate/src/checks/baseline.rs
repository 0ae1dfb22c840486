//! Per-field schema constraints
//!
//! The always-on runtime checks for a tabular resource: cell layout, type
//! coercion, and the constraints declared on schema fields (`required`,
//! `enum`, `pattern`, `minimum`/`maximum`, `unique`) plus primary key
//! uniqueness.

use std::collections::HashMap;

use regex::Regex;
use surveygraph_ns::kinds;
use surveygraph_tabular::{CellError, Field, Row, Schema, Value};

use super::Check;
use crate::error::{Result, ValidateError};
use crate::report::ReportError;

/// Constraints declared by the resource schema itself.
#[derive(Debug, Default)]
pub struct FieldConstraints {
    patterns: HashMap<String, Regex>,
    unique_seen: HashMap<String, HashMap<String, usize>>,
    primary_key: Vec<String>,
    primary_key_seen: HashMap<Vec<String>, usize>,
}

impl FieldConstraints {
    /// Compile the `pattern` constraints declared by `schema`.
    pub fn new(schema: &Schema) -> Result<Self> {
        let mut check = Self::default();
        check.compile_patterns(schema)?;
        Ok(check)
    }

    fn compile_patterns(&mut self, schema: &Schema) -> Result<()> {
        for field in &schema.fields {
            let Some(pattern) = &field.constraints.pattern else {
                continue;
            };
            if self.patterns.contains_key(&field.name) {
                continue;
            }
            let re = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
                ValidateError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                }
            })?;
            self.patterns.insert(field.name.clone(), re);
        }
        Ok(())
    }

    fn cell_errors(row: &Row) -> impl Iterator<Item = ReportError> + '_ {
        row.errors().iter().map(move |e| match e {
            CellError::Type { field, message } => {
                ReportError::new(kinds::TYPE_ERROR, message.clone()).on_field(field.as_str())
            }
            CellError::Extra { position, raw } => ReportError::new(
                kinds::EXTRA_CELL,
                format!("Row has an extra value {raw:?} in column {position}"),
            ),
            CellError::Missing { field } => ReportError::new(
                kinds::MISSING_CELL,
                format!("Row has no value for column '{field}'"),
            )
            .on_field(field.as_str()),
        }
        .at_row(row.number()))
    }

    fn check_field(&mut self, row: &Row, field: &Field, out: &mut Vec<ReportError>) {
        let c = &field.constraints;
        let name = field.name.as_str();
        let error = |note: String| {
            ReportError::new(kinds::CONSTRAINT_ERROR, note)
                .at_row(row.number())
                .on_field(name)
        };

        let Some(raw) = row.raw(name) else {
            if c.required {
                out.push(error(format!("'{name}' is a required field")));
            }
            return;
        };
        // Cells that failed coercion are already reported as type errors.
        let Some(value) = row.get(name) else {
            return;
        };

        if let Some(allowed) = &c.enum_values {
            let items: Vec<&str> = match value {
                Value::List(items) => items.iter().map(String::as_str).collect(),
                _ => vec![raw],
            };
            for item in items.into_iter().filter(|i| !allowed.iter().any(|a| a == i)) {
                out.push(error(format!(
                    "{item:?} is not one of the allowed values: {}",
                    allowed.join(", ")
                )));
            }
        }
        if let Some(re) = self.patterns.get(name) {
            if !re.is_match(raw) {
                out.push(error(format!("{raw:?} does not match the pattern {}", re.as_str())));
            }
        }
        if let Some(n) = value.as_f64() {
            if let Some(min) = c.minimum.filter(|min| n < *min) {
                out.push(error(format!("{n} is less than the minimum of {min}")));
            }
            if let Some(max) = c.maximum.filter(|max| n > *max) {
                out.push(error(format!("{n} is greater than the maximum of {max}")));
            }
        }
        if c.unique {
            let seen = self.unique_seen.entry(field.name.clone()).or_default();
            match seen.get(raw) {
                Some(first) => out.push(
                    ReportError::new(
                        kinds::UNIQUE_ERROR,
                        format!("{raw:?} is not unique: first seen in row {first}"),
                    )
                    .at_row(row.number())
                    .on_field(name),
                ),
                None => {
                    seen.insert(raw.to_string(), row.number());
                }
            }
        }
    }

    fn check_primary_key(&mut self, row: &Row, out: &mut Vec<ReportError>) {
        if self.primary_key.is_empty() {
            return;
        }
        let mut key = Vec::with_capacity(self.primary_key.len());
        for field in &self.primary_key {
            match row.raw(field) {
                Some(v) => key.push(v.to_string()),
                None => {
                    let already = row.schema().field(field).is_some_and(|f| f.constraints.required);
                    if !already {
                        out.push(
                            ReportError::new(
                                kinds::CONSTRAINT_ERROR,
                                format!("'{field}' is part of the primary key and is required"),
                            )
                            .at_row(row.number())
                            .on_field(field.as_str()),
                        );
                    }
                    return;
                }
            }
        }
        match self.primary_key_seen.get(&key) {
            Some(first) => out.push(
                ReportError::new(
                    kinds::PRIMARY_KEY,
                    format!(
                        "Primary key ({}) repeats: first seen in row {first}",
                        self.primary_key.join(", ")
                    ),
                )
                .at_row(row.number()),
            ),
            None => {
                self.primary_key_seen.insert(key, row.number());
            }
        }
    }
}

impl Check for FieldConstraints {
    fn name(&self) -> &str {
        "field-constraints"
    }

    fn on_start(&mut self, schema: &Schema) -> Result<()> {
        self.unique_seen.clear();
        self.primary_key_seen.clear();
        self.primary_key = schema.primary_key.clone();
        self.compile_patterns(schema)
    }

    fn on_row(&mut self, row: &Row) -> Vec<ReportError> {
        let mut out: Vec<ReportError> = Self::cell_errors(row).collect();
        let schema = std::sync::Arc::clone(row.schema());
        for field in &schema.fields {
            self.check_field(row, field, &mut out);
        }
        self.check_primary_key(row, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use pretty_assertions::assert_eq;
    use surveygraph_tabular::FieldType;

    fn schema() -> Arc<Schema> {
        let mut code = Field::string("code");
        code.constraints.pattern = Some("[A-Z]{2}[0-9]+".to_string());
        let mut lat = Field::new("lat", FieldType::Number);
        lat.constraints.minimum = Some(-90.0);
        lat.constraints.maximum = Some(90.0);
        Arc::new(
            Schema::new(vec![
                Field::string("id").unique(),
                code,
                lat,
                Field::string("datum").required().one_of(["WGS84", "GDA2020"]),
            ])
            .with_primary_key(["id"]),
        )
    }

    fn run(data: &[&[&str]]) -> Vec<ReportError> {
        let schema = schema();
        let mut check = FieldConstraints::new(&schema).unwrap();
        check.on_start(&schema).unwrap();
        data.iter()
            .enumerate()
            .flat_map(|(i, cells)| {
                check.on_row(&Row::from_record(i + 1, Arc::clone(&schema), cells.iter().copied()))
            })
            .collect()
    }

    fn kinds_of(errors: &[ReportError]) -> Vec<(&str, Option<usize>)> {
        errors.iter().map(|e| (e.kind.as_str(), e.row)).collect()
    }

    #[test]
    fn clean_rows_pass() {
        assert!(run(&[&["1", "AB12", "-27.4", "WGS84"], &["2", "", "", "GDA2020"]]).is_empty());
    }

    #[test]
    fn reports_each_constraint() {
        let errors = run(&[
            &["1", "ab", "-91", ""],
            &["1", "AB1", "abc", "AGD66"],
        ]);
        assert_eq!(
            kinds_of(&errors),
            vec![
                (kinds::CONSTRAINT_ERROR, Some(1)),
                (kinds::CONSTRAINT_ERROR, Some(1)),
                (kinds::CONSTRAINT_ERROR, Some(1)),
                (kinds::TYPE_ERROR, Some(2)),
                (kinds::UNIQUE_ERROR, Some(2)),
                (kinds::CONSTRAINT_ERROR, Some(2)),
                (kinds::PRIMARY_KEY, Some(2)),
            ]
        );
        assert_eq!(errors[0].field.as_deref(), Some("code"));
        assert_eq!(errors[1].field.as_deref(), Some("lat"));
        assert_eq!(errors[2].field.as_deref(), Some("datum"));
    }

    #[test]
    fn layout_errors() {
        let errors = run(&[&["1", "AB1"], &["2", "AB1", "0", "WGS84", "extra"]]);
        let kinds: Vec<&str> = errors.iter().map(|e| e.kind.as_str()).collect();
        assert_eq!(
            kinds,
            vec![
                kinds::MISSING_CELL,
                kinds::MISSING_CELL,
                kinds::CONSTRAINT_ERROR,
                kinds::EXTRA_CELL,
            ]
        );
    }

    #[test]
    fn invalid_pattern_fails_construction() {
        let mut field = Field::string("x");
        field.constraints.pattern = Some("(".to_string());
        let schema = Schema::new(vec![field]);
        assert!(matches!(
            FieldConstraints::new(&schema),
            Err(ValidateError::InvalidPattern { .. })
        ));

        // A resource schema seen only at start is still checked there.
        let mut check = FieldConstraints::new(&Schema::new(Vec::new())).unwrap();
        assert!(matches!(
            check.on_start(&schema),
            Err(ValidateError::InvalidPattern { .. })
        ));
    }
}
