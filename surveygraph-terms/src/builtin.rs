//! Vocabulary definitions shipped with the crate.

use crate::catalog::CatalogBuilder;
use crate::error::CatalogError;

/// Ids of the built-in vocabularies.
pub mod ids {
    pub const GEODETIC_DATUM: &str = "GEODETIC_DATUM";
    pub const OCCURRENCE_STATUS: &str = "OCCURRENCE_STATUS";
    pub const SAMPLING_PROTOCOL: &str = "SAMPLING_PROTOCOL";
    pub const HABITAT: &str = "HABITAT";
    pub const PREPARATIONS: &str = "PREPARATIONS";
    pub const BASIS_OF_RECORD: &str = "BASIS_OF_RECORD";
    pub const SITE_TYPE: &str = "SITE_TYPE";
}

const DEFINITIONS: &[&str] = &[
    include_str!("../data/geodetic_datum.json"),
    include_str!("../data/occurrence_status.json"),
    include_str!("../data/sampling_protocol.json"),
    include_str!("../data/habitat.json"),
    include_str!("../data/preparations.json"),
    include_str!("../data/basis_of_record.json"),
    include_str!("../data/site_type.json"),
];

/// Register every built-in vocabulary.
pub fn register(mut builder: CatalogBuilder) -> Result<CatalogBuilder, CatalogError> {
    for json in DEFINITIONS {
        builder = builder.register_json(json)?;
    }
    Ok(builder)
}
