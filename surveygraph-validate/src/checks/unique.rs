//! Uniqueness of a combination of fields across rows

use rustc_hash::FxHashMap;
use surveygraph_ns::kinds;
use surveygraph_tabular::{Row, Schema};

use super::{non_empty, require_fields, to_strings, Check};
use crate::error::Result;
use crate::report::ReportError;

/// How blank values take part in the uniqueness key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullHandling {
    /// Rows with any blank key field are exempt.
    #[default]
    Skip,
    /// Blank is a value like any other; two blanks collide.
    Include,
}

/// The tuple of `fields` must not repeat within the resource.
///
/// The first row to use a tuple owns it for the rest of the pass.
#[derive(Debug)]
pub struct UniqueTogether {
    fields: Vec<String>,
    null_handling: NullHandling,
    seen: FxHashMap<Vec<Option<String>>, usize>,
}

impl UniqueTogether {
    pub fn new<I, S>(fields: I, null_handling: NullHandling) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = to_strings(fields);
        non_empty("unique-together", &fields)?;
        Ok(Self {
            fields,
            null_handling,
            seen: FxHashMap::default(),
        })
    }
}

impl Check for UniqueTogether {
    fn name(&self) -> &str {
        "unique-together"
    }

    fn on_start(&mut self, schema: &Schema) -> Result<()> {
        self.seen.clear();
        require_fields(self.name(), schema, &self.fields)
    }

    fn on_row(&mut self, row: &Row) -> Vec<ReportError> {
        let key: Vec<Option<String>> = self
            .fields
            .iter()
            .map(|f| row.raw(f).map(str::to_string))
            .collect();
        if self.null_handling == NullHandling::Skip && key.iter().any(Option::is_none) {
            return Vec::new();
        }

        match self.seen.get(&key) {
            Some(first) => vec![ReportError::new(
                kinds::ROW_CONSTRAINT,
                format!(
                    "Duplicate values for the unique combination of {}: first seen in row {first}",
                    self.fields.join(", ")
                ),
            )
            .at_row(row.number())],
            None => {
                self.seen.insert(key, row.number());
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testutil::{rows, schema};

    fn run(null_handling: NullHandling, data: &[&[&str]]) -> Vec<ReportError> {
        let schema = schema(&["site", "n"]);
        let mut check = UniqueTogether::new(["site", "n"], null_handling).unwrap();
        check.on_start(&schema).unwrap();
        rows(&schema, data).iter().flat_map(|r| check.on_row(r)).collect()
    }

    #[test]
    fn skip_exempts_rows_with_blanks() {
        let errors = run(NullHandling::Skip, &[&["A", "1"], &["A", ""], &["A", "1"]]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, Some(3));
        assert!(errors[0].note.ends_with("first seen in row 1"));
    }

    #[test]
    fn include_treats_blanks_as_equal() {
        let errors = run(NullHandling::Include, &[&["A", ""], &["A", ""]]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, Some(2));
        assert!(errors[0].note.ends_with("first seen in row 1"));
    }

    #[test]
    fn first_row_keeps_ownership() {
        let errors = run(NullHandling::Skip, &[&["A", "1"], &["A", "1"], &["A", "1"]]);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.note.ends_with("row 1")));
    }
}
