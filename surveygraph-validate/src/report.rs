//! Validation report
//!
//! A report is always produced, whatever the state of the data. Each entry
//! carries a stable `kind` code (see `surveygraph_ns::kinds`), a human
//! readable note, and optionally the 1-based data row and field it concerns.

use serde::{Deserialize, Serialize};

/// One data-quality problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportError {
    pub kind: String,
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ReportError {
    pub fn new(kind: &str, note: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            note: note.into(),
            row: None,
            field: None,
        }
    }

    /// Attach a 1-based data row number.
    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Attach the field name.
    pub fn on_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Outcome of validating one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// `false` as soon as any error was recorded
    pub valid: bool,
    pub errors: Vec<ReportError>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::valid()
    }
}

impl ValidationReport {
    /// Create an empty, valid report
    pub fn valid() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Record an error
    pub fn push(&mut self, error: ReportError) {
        self.valid = false;
        self.errors.push(error);
    }

    /// Number of recorded errors
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Errors with the given kind code
    pub fn errors_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a ReportError> + 'a {
        self.errors.iter().filter(move |e| e.kind == kind)
    }

    /// Errors attached to a data row
    pub fn errors_on_row(&self, row: usize) -> impl Iterator<Item = &ReportError> + '_ {
        self.errors.iter().filter(move |e| e.row == Some(row))
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Extend<ReportError> for ValidationReport {
    fn extend<T: IntoIterator<Item = ReportError>>(&mut self, iter: T) {
        for e in iter {
            self.push(e);
        }
    }
}
