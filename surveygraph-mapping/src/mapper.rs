//! The per-template row mapping seam.

use std::sync::Arc;

use surveygraph_ir::{Graph, Term};
use surveygraph_tabular::Row;
use surveygraph_terms::{Catalog, Vocabulary};

use crate::error::{MappingError, Result};
use crate::identity::{self, EntityIdentity};
use crate::template::ExtraInputs;

/// Turns validated rows of one template into triples.
///
/// A mapper instance serves one run; it may keep state between rows.
pub trait RowMapper: Send {
    /// Emit run-level triples (the dataset node and the like) into the
    /// first chunk.
    fn begin(&mut self, _ctx: &MappingContext<'_>, _graph: &mut Graph) -> Result<()> {
        Ok(())
    }

    /// Emit the triples for one row. Returns the row's primary subject, to
    /// which the row's extra columns are attached.
    fn map_row(
        &mut self,
        ctx: &MappingContext<'_>,
        row: &Row,
        graph: &mut Graph,
    ) -> Result<Option<Term>>;
}

/// What a mapper can see besides the row itself.
pub struct MappingContext<'a> {
    template: &'a str,
    catalog: &'a Catalog,
    inputs: &'a ExtraInputs,
    base: String,
    dataset_id: String,
    dataset: EntityIdentity,
}

impl<'a> MappingContext<'a> {
    pub fn new(
        template: &'a str,
        catalog: &'a Catalog,
        inputs: &'a ExtraInputs,
        base: impl Into<String>,
        dataset_id: impl Into<String>,
    ) -> Result<Self> {
        let base = base.into();
        let dataset_id = dataset_id.into();
        let dataset = identity::dataset(&base, &dataset_id)?;
        Ok(Self {
            template,
            catalog,
            inputs,
            base,
            dataset_id,
            dataset,
        })
    }

    pub fn template(&self) -> &str {
        self.template
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    pub fn inputs(&self) -> &ExtraInputs {
        self.inputs
    }

    /// Base namespace for derived identifiers.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    pub fn dataset(&self) -> &EntityIdentity {
        &self.dataset
    }

    /// Vocabulary for `field`, falling back to `default_id` when the
    /// catalog has no binding for this template.
    pub fn vocabulary(&self, field: &str, default_id: &str) -> Result<Arc<Vocabulary>> {
        self.catalog
            .lookup(self.template, field, default_id)
            .ok_or_else(|| MappingError::MissingVocabulary {
                template: self.template.to_string(),
                field: field.to_string(),
            })
    }

    /// Resolve a cell value to a concept IRI, minting into `graph` if the
    /// vocabulary allows it. Minted concepts cite the dataset as source.
    pub fn resolve(
        &self,
        graph: &mut Graph,
        field: &str,
        default_id: &str,
        value: &str,
    ) -> Result<Term> {
        let vocabulary = self.vocabulary(field, default_id)?;
        let source = self.dataset.to_term();
        Ok(vocabulary.resolve(graph, value, Some(&source))?)
    }
}
