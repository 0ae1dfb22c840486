//! Mapper configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! base_namespace = "https://linked.data.gov.au/dataset/bdr/"
//! chunk_size = 5000
//! dataset_id = "my-survey"
//! error_limit = 1000
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::MapOptions;
use crate::error::{MappingError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperConfig {
    /// Namespace for derived identifiers
    pub base_namespace: Option<String>,
    /// Rows per sub-graph
    pub chunk_size: Option<i64>,
    /// Dataset id used when a run does not name one
    pub dataset_id: Option<String>,
    /// Stop validation after this many errors
    pub error_limit: Option<usize>,
}

impl MapperConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: MapperConfig =
            toml::from_str(s).map_err(|e| MappingError::Config(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
            .map_err(|e| MappingError::Config(format!("{}: {e}", path.display())))
    }

    fn check(&self) -> Result<()> {
        if let Some(base) = &self.base_namespace {
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                return Err(MappingError::Config(format!(
                    "base_namespace must be an http(s) IRI, got {base:?}"
                )));
            }
            if !(base.ends_with('/') || base.ends_with('#')) {
                return Err(MappingError::Config(format!(
                    "base_namespace must end in '/' or '#', got {base:?}"
                )));
            }
        }
        if self.error_limit == Some(0) {
            return Err(MappingError::Config("error_limit must be positive".into()));
        }
        Ok(())
    }

    /// Options for one run; `dataset_id` overrides the configured one.
    pub fn map_options(&self, dataset_id: Option<String>) -> MapOptions {
        MapOptions {
            dataset_id: dataset_id.or_else(|| self.dataset_id.clone()),
            base_namespace: self.base_namespace.clone(),
            chunk_size: self.chunk_size,
        }
    }
}

impl From<&MapperConfig> for MapOptions {
    fn from(config: &MapperConfig) -> Self {
        config.map_options(None)
    }
}
