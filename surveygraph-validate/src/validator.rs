//! Validation runner
//!
//! Drives one pass over a resource: header checks, schema extension rules,
//! then every active check on every row. Problems accumulate in a single
//! `ValidationReport`; nothing short of an unreadable header stops a pass
//! early, except an optional error limit.

use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use surveygraph_ns::kinds;
use surveygraph_tabular::{Schema, TableReader};

use crate::checks::{Check, FieldConstraints};
use crate::error::Result;
use crate::extension::merge_and_validate;
use crate::report::{ReportError, ValidationReport};

/// Validates CSV data against a template schema and a set of checks.
///
/// A validator is consumed by `validate`: check state belongs to one pass.
pub struct Validator {
    schema: Arc<Schema>,
    baseline: FieldConstraints,
    checks: Vec<Box<dyn Check>>,
    error_limit: Option<usize>,
}

impl Validator {
    /// Create a validator for `schema` with only the baseline checks.
    ///
    /// Fails when a field's `pattern` is not a valid regex.
    pub fn new(schema: Arc<Schema>) -> Result<Self> {
        Ok(Self {
            baseline: FieldConstraints::new(&schema)?,
            schema,
            checks: Vec::new(),
            error_limit: None,
        })
    }

    /// Add a check.
    pub fn with_check(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Add several boxed checks.
    pub fn with_checks(mut self, checks: impl IntoIterator<Item = Box<dyn Check>>) -> Self {
        self.checks.extend(checks);
        self
    }

    /// Stop recording after `limit` errors.
    pub fn with_error_limit(mut self, limit: Option<usize>) -> Self {
        self.error_limit = limit.filter(|l| *l > 0);
        self
    }

    /// Validate a CSV byte stream.
    ///
    /// `Err` only when the header cannot be read; every other problem is
    /// in the report.
    pub fn validate<R: Read>(self, data: R) -> Result<ValidationReport> {
        let reader = TableReader::open(data)?;
        Ok(self.validate_reader(reader))
    }

    /// Validate rows from an already opened reader.
    pub fn validate_reader<R: Read>(self, reader: TableReader<R>) -> ValidationReport {
        let _span = tracing::debug_span!("validate", fields = self.schema.len()).entered();
        let mut sink = Sink::new(self.error_limit);

        check_header(reader.header(), &mut sink);
        let (merged, schema_errors) = merge_and_validate(&self.schema, reader.header());
        if !schema_errors.is_empty() {
            for e in schema_errors {
                sink.push(e);
            }
            let report = sink.finish();
            tracing::info!(
                errors = report.error_count(),
                "Header does not match the template schema; rows not checked"
            );
            return report;
        }
        let merged = Arc::new(merged);

        let mut active: Vec<Box<dyn Check>> = Vec::with_capacity(self.checks.len() + 1);
        let baseline: Box<dyn Check> = Box::new(self.baseline);
        for mut check in std::iter::once(baseline).chain(self.checks) {
            match check.on_start(&merged) {
                Ok(()) => active.push(check),
                Err(e) => {
                    tracing::error!(check = check.name(), error = %e, "Check disabled");
                    sink.push(ReportError::new(
                        kinds::CHECK_ERROR,
                        format!("Check '{}' could not start: {e}", check.name()),
                    ));
                }
            }
        }

        let mut rows = 0usize;
        for result in reader.with_schema(Arc::clone(&merged)) {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    sink.push(
                        ReportError::new(kinds::SOURCE_ERROR, e.to_string()).at_row(rows + 1),
                    );
                    break;
                }
            };
            rows += 1;
            for check in active.iter_mut() {
                for e in check.on_row(&row) {
                    sink.push(e);
                }
            }
            if sink.full() {
                break;
            }
        }

        let report = sink.finish();
        tracing::info!(
            rows,
            errors = report.error_count(),
            valid = report.valid,
            "Validation complete"
        );
        report
    }
}

/// Reports blank and duplicate header labels.
fn check_header(header: &[String], sink: &mut Sink) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (i, label) in header.iter().enumerate() {
        let position = i + 1;
        if label.is_empty() {
            sink.push(ReportError::new(
                kinds::BLANK_HEADER,
                format!("Header in column {position} is blank"),
            ));
            continue;
        }
        if let Some(first) = seen.insert(label, position) {
            sink.push(
                ReportError::new(
                    kinds::DUPLICATE_LABEL,
                    format!("Header '{label}' in column {position} repeats column {first}"),
                )
                .on_field(label.as_str()),
            );
        }
    }
}

/// Report under construction, honouring the error limit.
struct Sink {
    report: ValidationReport,
    limit: Option<usize>,
    truncated: bool,
}

impl Sink {
    fn new(limit: Option<usize>) -> Self {
        Self {
            report: ValidationReport::valid(),
            limit,
            truncated: false,
        }
    }

    fn full(&self) -> bool {
        self.truncated
    }

    fn push(&mut self, error: ReportError) {
        if self.truncated {
            return;
        }
        if self.limit.is_some_and(|l| self.report.error_count() >= l) {
            self.truncated = true;
            self.report.push(ReportError::new(
                kinds::ERROR_LIMIT,
                format!(
                    "Stopped after {} errors; later rows were not checked",
                    self.report.error_count()
                ),
            ));
            return;
        }
        self.report.push(error);
    }

    fn finish(self) -> ValidationReport {
        self.report
    }
}
