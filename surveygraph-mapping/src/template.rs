//! Template registry
//!
//! A template couples a fixed schema with the checks that gate its files and
//! the mapper that turns its rows into triples. Checks carry per-pass state,
//! so a template holds a factory and every validation pass gets fresh ones.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use surveygraph_tabular::Schema;
use surveygraph_terms::{Catalog, CatalogBuilder, CatalogError};
use surveygraph_validate::{Check, ExprValue, Namespace, SideInputConstraint, ValidateError};

use crate::artifacts::{SiteKey, TemporalCoverage};
use crate::error::{MappingError, Result};
use crate::mapper::RowMapper;

/// Builds the checks for one validation pass.
pub type CheckFactory = Box<
    dyn Fn(&Catalog, &ExtraInputs) -> std::result::Result<Vec<Box<dyn Check>>, ValidateError>
        + Send
        + Sync,
>;

/// Builds the mapper for one mapping run.
pub type MapperFactory = Box<dyn Fn() -> Box<dyn RowMapper> + Send + Sync>;

/// Lookups computed from other files of the same survey.
#[derive(Debug, Clone, Default)]
pub struct ExtraInputs {
    /// Sites declared by the accompanying site file, to their node IRI
    pub site_iris: Option<Arc<HashMap<SiteKey, String>>>,
    /// Site key to default `geo:wktLiteral` lexical form
    pub site_geometries: HashMap<SiteKey, String>,
    /// Site key to temporal coverage of its visits
    pub site_temporal: HashMap<SiteKey, TemporalCoverage>,
    /// Named values visible to row constraint expressions
    pub side_values: BTreeMap<String, serde_json::Value>,
}

impl ExtraInputs {
    pub fn with_site_iris(mut self, iris: HashMap<SiteKey, String>) -> Self {
        self.site_iris = Some(Arc::new(iris));
        self
    }

    /// Declared site keys as `(siteID, siteIDSource)` value lists.
    pub fn site_key_set(&self) -> Option<Arc<HashSet<Vec<String>>>> {
        self.site_iris
            .as_ref()
            .map(|iris| Arc::new(iris.keys().map(SiteKey::to_vec).collect()))
    }

    pub fn with_side_value(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.side_values.insert(name.into(), value);
        self
    }

    /// Side values as an expression namespace.
    pub fn side_namespace(&self) -> Namespace {
        self.side_values
            .iter()
            .map(|(k, v)| (k.clone(), ExprValue::from_json(v)))
            .collect()
    }
}

/// Everything needed to validate and map one template.
pub struct TemplateSpec {
    id: String,
    schema: Arc<Schema>,
    checks: CheckFactory,
    mapper: MapperFactory,
    row_constraints: Vec<String>,
    vocabularies: Vec<(String, String)>,
}

impl TemplateSpec {
    pub fn new(
        id: impl Into<String>,
        schema: Schema,
        checks: CheckFactory,
        mapper: MapperFactory,
    ) -> Self {
        Self {
            id: id.into(),
            schema: Arc::new(schema),
            checks,
            mapper,
            row_constraints: Vec::new(),
            vocabularies: Vec::new(),
        }
    }

    /// Add a boolean expression every row must satisfy. It sees the row's
    /// fields and the run's side values.
    pub fn with_row_constraint(mut self, expression: impl Into<String>) -> Self {
        self.row_constraints.push(expression.into());
        self
    }

    /// Declare that `field` resolves through `vocabulary_id`.
    pub fn with_vocabulary(mut self, field: impl Into<String>, vocabulary_id: impl Into<String>) -> Self {
        self.vocabularies.push((field.into(), vocabulary_id.into()));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Field to vocabulary id bindings.
    pub fn vocabularies(&self) -> &[(String, String)] {
        &self.vocabularies
    }

    /// Fresh checks for one validation pass.
    pub fn build_checks(
        &self,
        catalog: &Catalog,
        inputs: &ExtraInputs,
    ) -> std::result::Result<Vec<Box<dyn Check>>, ValidateError> {
        let mut checks = (self.checks)(catalog, inputs)?;
        if !self.row_constraints.is_empty() {
            let namespace = inputs.side_namespace();
            for expression in &self.row_constraints {
                checks.push(Box::new(SideInputConstraint::new(expression, namespace.clone())?));
            }
        }
        Ok(checks)
    }

    /// Fresh mapper for one run.
    pub fn build_mapper(&self) -> Box<dyn RowMapper> {
        (self.mapper)()
    }
}

impl fmt::Debug for TemplateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateSpec")
            .field("id", &self.id)
            .field("fields", &self.schema.len())
            .field("row_constraints", &self.row_constraints)
            .field("vocabularies", &self.vocabularies)
            .finish_non_exhaustive()
    }
}

/// Templates by id.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, TemplateSpec>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in templates.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        crate::templates::register(&mut registry)?;
        Ok(registry)
    }

    pub fn register(&mut self, spec: TemplateSpec) -> Result<()> {
        if self.templates.contains_key(spec.id()) {
            return Err(MappingError::DuplicateTemplate(spec.id().to_string()));
        }
        self.templates.insert(spec.id().to_string(), spec);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&TemplateSpec> {
        self.templates
            .get(id)
            .ok_or_else(|| MappingError::UnknownTemplate(id.to_string()))
    }

    /// Registered template ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Bind every template's declared vocabularies into `builder`.
    pub fn bind_vocabularies(
        &self,
        mut builder: CatalogBuilder,
    ) -> std::result::Result<CatalogBuilder, CatalogError> {
        for id in self.ids() {
            if let Some(spec) = self.templates.get(id) {
                for (field, vocabulary) in spec.vocabularies() {
                    builder = builder.bind_field(id, field.clone(), vocabulary)?;
                }
            }
        }
        Ok(builder)
    }

    /// Catalog of the built-in vocabularies with this registry's bindings.
    pub fn catalog(&self) -> Result<Catalog> {
        let builder = Catalog::builder().with_builtins()?;
        Ok(self.bind_vocabularies(builder)?.build())
    }
}
