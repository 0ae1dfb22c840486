//! Entry points
//!
//! [`validate`] checks a file against a template and always returns a
//! report for data problems. [`map`] turns a file that passed validation
//! into a stream of sub-graphs.

use std::io::Read;

use serde::{Deserialize, Serialize};
use surveygraph_tabular::TableReader;
use surveygraph_terms::Catalog;
use surveygraph_validate::{merge_and_validate, ValidationReport, Validator};

use crate::assembler::GraphAssembler;
use crate::chunk::ChunkPolicy;
use crate::error::{MappingError, Result};
use crate::mapper::MappingContext;
use crate::template::{ExtraInputs, TemplateRegistry};

/// Per-run mapping options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapOptions {
    /// Dataset the rows belong to; see [`default_dataset_id`] when absent
    pub dataset_id: Option<String>,
    /// Namespace for derived identifiers
    pub base_namespace: Option<String>,
    /// Rows per sub-graph; `None` or `<= 0` means one sub-graph
    pub chunk_size: Option<i64>,
}

impl MapOptions {
    pub fn base_namespace(&self) -> &str {
        self.base_namespace
            .as_deref()
            .unwrap_or(surveygraph_ns::DEFAULT_BASE_NAMESPACE)
    }
}

/// Validate `data` against a template.
///
/// `Err` only for an unknown template, a check that cannot be configured,
/// or an unreadable header; every data problem is in the report.
pub fn validate<R: Read>(
    registry: &TemplateRegistry,
    catalog: &Catalog,
    template_id: &str,
    data: R,
    inputs: &ExtraInputs,
) -> Result<ValidationReport> {
    validate_with_limit(registry, catalog, template_id, data, inputs, None)
}

/// Like [`validate`], recording at most `error_limit` errors.
pub fn validate_with_limit<R: Read>(
    registry: &TemplateRegistry,
    catalog: &Catalog,
    template_id: &str,
    data: R,
    inputs: &ExtraInputs,
    error_limit: Option<usize>,
) -> Result<ValidationReport> {
    let spec = registry.get(template_id)?;
    let checks = spec.build_checks(catalog, inputs)?;
    let report = Validator::new(spec.schema().clone())?
        .with_checks(checks)
        .with_error_limit(error_limit)
        .validate(data)?;
    tracing::info!(
        template = template_id,
        valid = report.valid,
        errors = report.error_count(),
        "Validated"
    );
    Ok(report)
}

/// Map `data` into sub-graphs.
///
/// The data should have passed [`validate`] first. The header is checked
/// against the template again here; cell values are not, so a value that
/// cannot be resolved ends the stream with an error.
pub fn map<'a, R: Read + 'a>(
    registry: &'a TemplateRegistry,
    catalog: &'a Catalog,
    template_id: &'a str,
    data: R,
    options: &MapOptions,
    inputs: &'a ExtraInputs,
) -> Result<GraphAssembler<'a, R>> {
    let spec = registry.get(template_id)?;
    let reader = TableReader::open(data)?;
    let (merged, errors) = merge_and_validate(spec.schema(), reader.header());
    if !errors.is_empty() {
        let message = errors
            .iter()
            .map(|e| e.note.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(MappingError::Header {
            template: template_id.to_string(),
            message,
        });
    }

    let dataset_id = options
        .dataset_id
        .clone()
        .unwrap_or_else(|| default_dataset_id(options.base_namespace()));
    let ctx = MappingContext::new(
        template_id,
        catalog,
        inputs,
        options.base_namespace(),
        dataset_id,
    )?;
    tracing::info!(
        template = template_id,
        dataset = ctx.dataset_id(),
        chunk_size = ?options.chunk_size,
        "Mapping"
    );
    Ok(GraphAssembler::new(
        reader.with_schema(std::sync::Arc::new(merged)),
        spec.build_mapper(),
        ctx,
        ChunkPolicy::from_size(options.chunk_size),
    ))
}

/// Dataset id used when a run names none: a UUIDv5 of the base namespace,
/// so separate runs over the same namespace share one dataset.
pub fn default_dataset_id(base_namespace: &str) -> String {
    uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_URL, base_namespace.as_bytes()).to_string()
}
