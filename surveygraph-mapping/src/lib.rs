//! Survey template validation and mapping
//!
//! Ties the workspace together: a [`TemplateRegistry`] names each survey
//! template's schema, checks and row mapper; [`validate`] gates a file with
//! those checks, and [`map`] streams the file's rows into RDF sub-graphs.
//!
//! # Design
//!
//! - **Identity** - entities shared across templates (datasets, sites,
//!   surveys, visits) get IRIs from one pure derivation over their natural
//!   keys, so separately mapped files agree on subjects
//! - **Chunking** - [`GraphAssembler`] yields a bounded [`Graph`] every
//!   `chunk_size` rows and at the end; triples are never repeated across
//!   chunks
//! - **Vocabularies** - mappers resolve free text through the caller's
//!   [`Catalog`]; flexible vocabularies mint concepts into the current chunk
//! - **Extra columns** - columns appended beyond the template are attached
//!   to the row's subject as one JSON annotation
//!
//! # Example
//!
//! ```
//! use surveygraph_mapping::{map, validate, ExtraInputs, MapOptions, TemplateRegistry};
//! use surveygraph_mapping::templates::site;
//!
//! let registry = TemplateRegistry::with_builtins().unwrap();
//! let catalog = registry.catalog().unwrap();
//! let inputs = ExtraInputs::default();
//! let csv = "siteID,siteIDSource,existingBDRSiteIRI,siteName,siteType,siteDescription,\
//!            habitat,decimalLatitude,decimalLongitude,geodeticDatum\n\
//!            S1,TERN,,Creek,plot,,,-27.5,153,GDA2020\n";
//!
//! let report = validate(&registry, &catalog, site::ID, csv.as_bytes(), &inputs).unwrap();
//! assert!(report.valid);
//!
//! let options = MapOptions { dataset_id: Some("ds1".into()), ..Default::default() };
//! let chunks: Vec<_> = map(&registry, &catalog, site::ID, csv.as_bytes(), &options, &inputs)
//!     .unwrap()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(chunks.len(), 1);
//! ```

pub mod api;
pub mod artifacts;
pub mod assembler;
pub mod chunk;
pub mod config;
pub mod error;
pub mod extra_columns;
pub mod geometry;
pub mod identity;
pub mod mapper;
pub mod telemetry;
pub mod template;
pub mod templates;
pub mod vocab_check;

pub use api::{default_dataset_id, map, validate, validate_with_limit, MapOptions};
pub use artifacts::{
    site_geometry_map, site_geometry_map_in, site_iri_map, site_temporal_map, SiteKey,
    TemporalCoverage,
};
pub use assembler::GraphAssembler;
pub use chunk::ChunkPolicy;
pub use config::MapperConfig;
pub use error::{MappingError, Result};
pub use geometry::{Geometry, GeometryError, NoReprojection, Reprojector};
pub use identity::{decode_key, encode_key, EntityIdentity};
pub use mapper::{MappingContext, RowMapper};
pub use template::{CheckFactory, ExtraInputs, MapperFactory, TemplateRegistry, TemplateSpec};
pub use vocab_check::VocabularyCheck;

pub use surveygraph_ir::Graph;
pub use surveygraph_terms::Catalog;
pub use surveygraph_validate::ValidationReport;
