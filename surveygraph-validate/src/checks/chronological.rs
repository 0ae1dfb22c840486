//! Chronological ordering of date/time fields

use surveygraph_ns::kinds;
use surveygraph_tabular::{Row, Schema, Timestamp};

use super::{non_empty, require_fields, to_strings, Check};
use crate::error::Result;
use crate::report::ReportError;

/// Whether the present values are non-decreasing left to right.
///
/// Absent values are skipped; zero or one present value is trivially ordered.
pub fn is_chronological(values: &[Option<Timestamp>]) -> bool {
    let present: Vec<&Timestamp> = values.iter().flatten().collect();
    present.windows(2).all(|w| w[0].is_not_after(w[1]))
}

/// Fields holding timestamps must be in chronological order.
#[derive(Debug)]
pub struct ChronologicalOrder {
    fields: Vec<String>,
}

impl ChronologicalOrder {
    pub fn new<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = to_strings(fields);
        non_empty("chronological-order", &fields)?;
        Ok(Self { fields })
    }

    fn value(row: &Row, field: &str) -> Option<Timestamp> {
        row.get_timestamp(field)
            .or_else(|| row.raw(field).and_then(|raw| Timestamp::parse(raw).ok()))
    }
}

impl Check for ChronologicalOrder {
    fn name(&self) -> &str {
        "chronological-order"
    }

    fn on_start(&mut self, schema: &Schema) -> Result<()> {
        require_fields(self.name(), schema, &self.fields)
    }

    fn on_row(&mut self, row: &Row) -> Vec<ReportError> {
        let values: Vec<Option<Timestamp>> =
            self.fields.iter().map(|f| Self::value(row, f)).collect();
        if is_chronological(&values) {
            return Vec::new();
        }
        vec![ReportError::new(
            kinds::ROW_CONSTRAINT,
            format!(
                "The following dates are not in chronological order: {}",
                self.fields.join(" -> ")
            ),
        )
        .at_row(row.number())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testutil::{rows, schema};

    fn ts(raw: &str) -> Option<Timestamp> {
        Some(Timestamp::parse(raw).unwrap())
    }

    #[test]
    fn ordering_of_value_lists() {
        assert!(is_chronological(&[]));
        assert!(is_chronological(&[ts("2020-01-01")]));
        assert!(!is_chronological(&[ts("2020-01-01"), ts("2019-01-01")]));
        assert!(is_chronological(&[None, ts("2020-01-01"), ts("2021-01-01")]));
        assert!(is_chronological(&[ts("2021-01-01"), None, None]));
    }

    #[test]
    fn reports_out_of_order_rows() {
        let schema = schema(&["start", "end"]);
        let data = rows(
            &schema,
            &[
                &["2020-01-01", "2020-02-01"],
                &["2020-03-01", "2020-02-01"],
                &["", "2020-02-01"],
            ],
        );
        let mut check = ChronologicalOrder::new(["start", "end"]).unwrap();
        check.on_start(&schema).unwrap();

        let errors: Vec<ReportError> = data.iter().flat_map(|r| check.on_row(r)).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, Some(2));
        assert_eq!(errors[0].kind, kinds::ROW_CONSTRAINT);
    }

    #[test]
    fn configuration_errors() {
        assert!(ChronologicalOrder::new(Vec::<String>::new()).is_err());
        let mut check = ChronologicalOrder::new(["start", "finish"]).unwrap();
        assert!(check.on_start(&schema(&["start", "end"])).is_err());
    }
}
