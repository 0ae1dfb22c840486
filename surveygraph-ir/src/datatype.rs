//! RDF literal datatypes
//!
//! Datatypes are always explicit in this IR. Plain strings default to
//! `xsd:string`; structured annotations use `rdf:JSON`; geometries use
//! `geo:wktLiteral`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use surveygraph_ns::{geo, rdf, xsd};

/// RDF literal datatype, always an expanded IRI
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Datatype(Arc<str>);

impl Datatype {
    /// Create a datatype from an expanded IRI
    pub fn from_iri(iri: impl AsRef<str>) -> Self {
        Self(Arc::from(iri.as_ref()))
    }

    /// xsd:string
    pub fn xsd_string() -> Self {
        Self::from_iri(xsd::STRING)
    }

    /// rdf:JSON
    pub fn rdf_json() -> Self {
        Self::from_iri(rdf::JSON)
    }

    /// geo:wktLiteral
    pub fn wkt_literal() -> Self {
        Self::from_iri(geo::WKT_LITERAL)
    }

    /// The expanded IRI of this datatype
    pub fn as_iri(&self) -> &str {
        &self.0
    }

    /// Check if this is xsd:string
    pub fn is_xsd_string(&self) -> bool {
        self.as_iri() == xsd::STRING
    }

    /// Check if this is rdf:JSON
    pub fn is_json(&self) -> bool {
        self.as_iri() == rdf::JSON
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_iri())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_expand_to_vocabulary_iris() {
        assert_eq!(Datatype::xsd_string().as_iri(), xsd::STRING);
        assert_eq!(Datatype::rdf_json().as_iri(), rdf::JSON);
        assert_eq!(Datatype::wkt_literal().as_iri(), geo::WKT_LITERAL);
    }

    #[test]
    fn predicates() {
        assert!(Datatype::xsd_string().is_xsd_string());
        assert!(Datatype::rdf_json().is_json());
        assert!(!Datatype::wkt_literal().is_xsd_string());
        assert_eq!(Datatype::from_iri(xsd::STRING), Datatype::xsd_string());
    }
}
