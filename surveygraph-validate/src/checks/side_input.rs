//! Row constraint expressions with caller-supplied side inputs

use surveygraph_ns::kinds;
use surveygraph_tabular::{Row, Schema};

use super::{require_fields, to_strings, Check};
use crate::error::{Result, ValidateError};
use crate::expr::{ExprValue, Expression, Namespace};
use crate::report::ReportError;

/// A boolean expression evaluated once per row.
///
/// The expression sees the row's fields (all of them, or a chosen subset)
/// plus a fixed set of side inputs such as values from another file. A side
/// input may not shadow a field. A row whose evaluation errors fails the
/// constraint; the pass carries on.
#[derive(Debug)]
pub struct SideInputConstraint {
    expression: Expression,
    fields: Option<Vec<String>>,
    side_inputs: Namespace,
    visible: Vec<String>,
}

impl SideInputConstraint {
    /// Parse `expression`; syntax errors are returned immediately.
    pub fn new(expression: &str, side_inputs: Namespace) -> Result<Self> {
        Ok(Self {
            expression: Expression::parse(expression)?,
            fields: None,
            side_inputs,
            visible: Vec::new(),
        })
    }

    /// Only expose these fields to the expression.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(to_strings(fields));
        self
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    fn namespace(&self, row: &Row) -> Namespace {
        let mut ns = self.side_inputs.clone();
        for field in &self.visible {
            ns.insert(field.clone(), ExprValue::from(row.get(field)));
        }
        ns
    }
}

impl Check for SideInputConstraint {
    fn name(&self) -> &str {
        "side-input-constraint"
    }

    fn on_start(&mut self, schema: &Schema) -> Result<()> {
        self.visible = match &self.fields {
            Some(fields) => {
                require_fields(self.name(), schema, fields)?;
                fields.clone()
            }
            None => schema.field_names().map(str::to_string).collect(),
        };

        let clashes: Vec<&str> = self
            .side_inputs
            .keys()
            .filter(|k| self.visible.contains(k))
            .map(String::as_str)
            .collect();
        if !clashes.is_empty() {
            return Err(ValidateError::invalid_check(
                self.name(),
                format!("side input names clash with fields: {}", clashes.join(", ")),
            ));
        }
        Ok(())
    }

    fn on_row(&mut self, row: &Row) -> Vec<ReportError> {
        let note = match self.expression.test(&self.namespace(row)) {
            Ok(true) => return Vec::new(),
            Ok(false) => format!(
                "The row constraint \"{}\" is not met",
                self.expression.source()
            ),
            Err(e) => format!(
                "The row constraint \"{}\" could not be evaluated: {e}",
                self.expression.source()
            ),
        };
        vec![ReportError::new(kinds::ROW_CONSTRAINT, note).at_row(row.number())]
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use surveygraph_tabular::{Field, FieldType};

    fn schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::string("siteID"),
            Field::new("individualCount", FieldType::Integer),
        ]))
    }

    fn side_inputs() -> Namespace {
        Namespace::from([(
            "known_sites".to_string(),
            ExprValue::List(vec![ExprValue::from("S1"), ExprValue::from("S2")]),
        )])
    }

    fn run(check: &mut SideInputConstraint, data: &[&[&str]]) -> Vec<ReportError> {
        let schema = schema();
        check.on_start(&schema).unwrap();
        data.iter()
            .enumerate()
            .flat_map(|(i, cells)| {
                check.on_row(&Row::from_record(i + 1, Arc::clone(&schema), cells.iter().copied()))
            })
            .collect()
    }

    #[test]
    fn evaluates_against_fields_and_side_inputs() {
        let mut check = SideInputConstraint::new(
            "siteID in known_sites and individualCount > 0",
            side_inputs(),
        )
        .unwrap();
        let errors = run(&mut check, &[&["S1", "3"], &["S9", "3"], &["S2", "0"]]);
        assert_eq!(errors.iter().map(|e| e.row).collect::<Vec<_>>(), vec![Some(2), Some(3)]);
    }

    #[test]
    fn evaluation_failure_fails_only_that_row() {
        let mut check = SideInputConstraint::new("individualCount > 0", side_inputs()).unwrap();
        let errors = run(&mut check, &[&["S1", ""], &["S1", "2"]]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, Some(1));
        assert!(errors[0].note.contains("could not be evaluated"));
    }

    #[test]
    fn subset_hides_other_fields() {
        let mut check = SideInputConstraint::new("individualCount > 0", side_inputs())
            .unwrap()
            .with_fields(["siteID"]);
        let errors = run(&mut check, &[&["S1", "2"]]);
        assert!(errors[0].note.contains("not defined"));
    }

    #[test]
    fn configuration_errors() {
        assert!(matches!(
            SideInputConstraint::new("siteID ==", Namespace::new()),
            Err(ValidateError::ExpressionSyntax { .. })
        ));

        let clash = Namespace::from([("siteID".to_string(), ExprValue::from("S1"))]);
        let mut check = SideInputConstraint::new("siteID == 'S1'", clash).unwrap();
        assert!(check.on_start(&schema()).is_err());
    }
}
