//! Vocabulary catalog
//!
//! A catalog holds every vocabulary a run may resolve against, keyed by
//! vocabulary id and, separately, by the `(template, field)` pairs that use
//! it. Catalogs are built once and then only read, so one instance can be
//! shared by any number of validation and mapping runs.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::builtin;
use crate::error::CatalogError;
use crate::vocabulary::{Vocabulary, VocabularyDefinition};

static SHARED: OnceLock<Catalog> = OnceLock::new();

/// Read-only registry of vocabularies.
#[derive(Debug, Default)]
pub struct Catalog {
    by_id: HashMap<String, Arc<Vocabulary>>,
    by_field: HashMap<(String, String), Arc<Vocabulary>>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Process-wide catalog of the built-in vocabularies.
    ///
    /// Built on first use; later calls return the same instance.
    pub fn shared() -> Result<&'static Catalog, CatalogError> {
        if let Some(catalog) = SHARED.get() {
            return Ok(catalog);
        }
        let catalog = builtin::register(Catalog::builder())?.build();
        Ok(SHARED.get_or_init(|| catalog))
    }

    /// Vocabulary by id.
    pub fn get(&self, id: &str) -> Option<&Vocabulary> {
        self.by_id.get(id).map(Arc::as_ref)
    }

    /// Vocabulary bound to a template field.
    pub fn for_field(&self, template: &str, field: &str) -> Option<&Vocabulary> {
        self.by_field
            .get(&(template.to_string(), field.to_string()))
            .map(Arc::as_ref)
    }

    /// Vocabulary for a template field: its binding if it has one, else the
    /// vocabulary registered as `default_id`.
    pub fn lookup(&self, template: &str, field: &str, default_id: &str) -> Option<Arc<Vocabulary>> {
        self.by_field
            .get(&(template.to_string(), field.to_string()))
            .or_else(|| self.by_id.get(default_id))
            .cloned()
    }

    /// Registered vocabulary ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.by_id.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Assembles a `Catalog`; duplicate ids and field bindings are errors.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    /// Add the built-in vocabularies.
    pub fn with_builtins(self) -> Result<Self, CatalogError> {
        builtin::register(self)
    }

    /// Add a vocabulary.
    pub fn register(mut self, vocabulary: Vocabulary) -> Result<Self, CatalogError> {
        let id = vocabulary.id().to_string();
        if self.catalog.by_id.contains_key(&id) {
            return Err(CatalogError::DuplicateId(id));
        }
        self.catalog.by_id.insert(id, Arc::new(vocabulary));
        Ok(self)
    }

    /// Add a vocabulary from a JSON definition.
    pub fn register_json(self, json: &str) -> Result<Self, CatalogError> {
        let definition = VocabularyDefinition::from_json(json)?;
        self.register(Vocabulary::from_definition(definition)?)
    }

    /// Bind a registered vocabulary to a template field.
    pub fn bind_field(
        mut self,
        template: impl Into<String>,
        field: impl Into<String>,
        vocabulary_id: &str,
    ) -> Result<Self, CatalogError> {
        let vocabulary = self
            .catalog
            .by_id
            .get(vocabulary_id)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownVocabulary(vocabulary_id.to_string()))?;
        let key = (template.into(), field.into());
        if self.catalog.by_field.contains_key(&key) {
            return Err(CatalogError::DuplicateField {
                template: key.0,
                field: key.1,
            });
        }
        self.catalog.by_field.insert(key, vocabulary);
        Ok(self)
    }

    pub fn build(self) -> Catalog {
        self.catalog
    }
}
