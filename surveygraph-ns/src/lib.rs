//! RDF vocabulary constants for survey graph conversion
//!
//! This crate is the single place that names every IRI the converter emits,
//! so that independently mapped templates agree on predicates and classes.
//!
//! # Organization
//!
//! Constants are organized by vocabulary:
//! - `rdf` - RDF vocabulary (http://www.w3.org/1999/02/22-rdf-syntax-ns#)
//! - `rdfs` - RDFS vocabulary (http://www.w3.org/2000/01/rdf-schema#)
//! - `xsd` - XSD datatypes used by typed cell values
//! - `skos` - SKOS, used for vocabulary concepts and minted concepts
//! - `dcterms`, `prov`, `schema` - descriptive and provenance metadata
//! - `geo` - GeoSPARQL geometry literals
//! - `time` - OWL-Time intervals for temporal coverage
//! - `tern` - TERN ecological survey ontology classes and properties
//! - `crs` - EPSG coordinate reference system IRIs
//! - `kinds` - Stable validation report kind codes

pub mod kinds;

/// RDF vocabulary constants
pub mod rdf {
    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:JSON IRI
    pub const JSON: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON";

    /// rdf:value IRI
    pub const VALUE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#value";
}

/// RDFS vocabulary constants
pub mod rdfs {
    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

    /// rdfs:label IRI
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

    /// rdfs:comment IRI
    ///
    /// Carries the JSON annotation built from a row's extra columns.
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";

    /// rdfs:isDefinedBy IRI
    pub const IS_DEFINED_BY: &str = "http://www.w3.org/2000/01/rdf-schema#isDefinedBy";
}

/// XSD datatype constants
pub mod xsd {
    /// xsd:string IRI
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    /// xsd:dateTime IRI
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

    /// xsd:dateTimeStamp IRI (dateTime with a mandatory offset)
    pub const DATE_TIME_STAMP: &str = "http://www.w3.org/2001/XMLSchema#dateTimeStamp";

    /// xsd:date IRI
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";

    /// xsd:gYear IRI
    pub const G_YEAR: &str = "http://www.w3.org/2001/XMLSchema#gYear";

    /// xsd:gYearMonth IRI
    pub const G_YEAR_MONTH: &str = "http://www.w3.org/2001/XMLSchema#gYearMonth";
}

/// SKOS vocabulary constants
pub mod skos {
    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/2004/02/skos/core#";

    /// skos:Concept IRI
    pub const CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";

    /// skos:ConceptScheme IRI
    pub const CONCEPT_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#ConceptScheme";

    /// skos:prefLabel IRI
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";

    /// skos:altLabel IRI
    pub const ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";

    /// skos:definition IRI
    pub const DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";

    /// skos:inScheme IRI
    pub const IN_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#inScheme";

    /// skos:broader IRI
    pub const BROADER: &str = "http://www.w3.org/2004/02/skos/core#broader";
}

/// Dublin Core terms
pub mod dcterms {
    /// dcterms:identifier IRI
    pub const IDENTIFIER: &str = "http://purl.org/dc/terms/identifier";

    /// dcterms:source IRI
    pub const SOURCE: &str = "http://purl.org/dc/terms/source";

    /// dcterms:title IRI
    pub const TITLE: &str = "http://purl.org/dc/terms/title";

    /// dcterms:description IRI
    pub const DESCRIPTION: &str = "http://purl.org/dc/terms/description";
}

/// W3C PROV-O constants
pub mod prov {
    /// prov:wasAttributedTo IRI
    pub const WAS_ATTRIBUTED_TO: &str = "http://www.w3.org/ns/prov#wasAttributedTo";

    /// prov:hadPlan IRI
    pub const HAD_PLAN: &str = "http://www.w3.org/ns/prov#hadPlan";

    /// prov:qualifiedAttribution IRI
    pub const QUALIFIED_ATTRIBUTION: &str = "http://www.w3.org/ns/prov#qualifiedAttribution";
}

/// schema.org constants
pub mod schema {
    /// schema:name IRI
    pub const NAME: &str = "https://schema.org/name";

    /// schema:isPartOf IRI
    pub const IS_PART_OF: &str = "https://schema.org/isPartOf";

    /// schema:spatial IRI
    pub const SPATIAL: &str = "https://schema.org/spatial";

    /// schema:temporal IRI
    pub const TEMPORAL: &str = "https://schema.org/temporal";
}

/// GeoSPARQL constants
pub mod geo {
    /// geo:Geometry IRI
    pub const GEOMETRY: &str = "http://www.opengis.net/ont/geosparql#Geometry";

    /// geo:hasGeometry IRI
    pub const HAS_GEOMETRY: &str = "http://www.opengis.net/ont/geosparql#hasGeometry";

    /// geo:asWKT IRI
    pub const AS_WKT: &str = "http://www.opengis.net/ont/geosparql#asWKT";

    /// geo:wktLiteral datatype IRI
    pub const WKT_LITERAL: &str = "http://www.opengis.net/ont/geosparql#wktLiteral";
}

/// OWL-Time constants
pub mod time {
    /// time:Interval IRI
    pub const INTERVAL: &str = "http://www.w3.org/2006/time#Interval";

    /// time:Instant IRI
    pub const INSTANT: &str = "http://www.w3.org/2006/time#Instant";

    /// time:hasBeginning IRI
    pub const HAS_BEGINNING: &str = "http://www.w3.org/2006/time#hasBeginning";

    /// time:hasEnd IRI
    pub const HAS_END: &str = "http://www.w3.org/2006/time#hasEnd";

    /// time:inXSDDateTimeStamp IRI
    pub const IN_XSD_DATE_TIME_STAMP: &str = "http://www.w3.org/2006/time#inXSDDateTimeStamp";

    /// time:inXSDDate IRI
    pub const IN_XSD_DATE: &str = "http://www.w3.org/2006/time#inXSDDate";

    /// time:inXSDgYearMonth IRI
    pub const IN_XSD_G_YEAR_MONTH: &str = "http://www.w3.org/2006/time#inXSDgYearMonth";

    /// time:inXSDgYear IRI
    pub const IN_XSD_G_YEAR: &str = "http://www.w3.org/2006/time#inXSDgYear";
}

/// TERN ecological survey ontology
pub mod tern {
    /// Namespace IRI
    pub const NS: &str = "https://w3id.org/tern/ontologies/tern/";

    /// tern:Site IRI
    pub const SITE: &str = "https://w3id.org/tern/ontologies/tern/Site";

    /// tern:SiteVisit IRI
    pub const SITE_VISIT: &str = "https://w3id.org/tern/ontologies/tern/SiteVisit";

    /// tern:Survey IRI
    pub const SURVEY: &str = "https://w3id.org/tern/ontologies/tern/Survey";

    /// tern:RDFDataset IRI
    pub const RDF_DATASET: &str = "https://w3id.org/tern/ontologies/tern/RDFDataset";

    /// tern:hasSite IRI
    pub const HAS_SITE: &str = "https://w3id.org/tern/ontologies/tern/hasSite";

    /// tern:hasSiteVisit IRI
    pub const HAS_SITE_VISIT: &str = "https://w3id.org/tern/ontologies/tern/hasSiteVisit";

    /// tern:hasHabitat IRI
    pub const HAS_HABITAT: &str = "https://w3id.org/tern/ontologies/tern/hasHabitat";

    /// tern:featureType IRI
    pub const FEATURE_TYPE: &str = "https://w3id.org/tern/ontologies/tern/featureType";
}

/// Coordinate reference system IRIs
pub mod crs {
    /// OGC EPSG CRS base IRI; append the numeric code
    pub const EPSG_BASE: &str = "http://www.opengis.net/def/crs/EPSG/0/";

    /// WGS84 (EPSG:4326)
    pub const WGS84: &str = "http://www.opengis.net/def/crs/EPSG/0/4326";

    /// GDA94 (EPSG:4283)
    pub const GDA94: &str = "http://www.opengis.net/def/crs/EPSG/0/4283";

    /// GDA2020 (EPSG:7844)
    pub const GDA2020: &str = "http://www.opengis.net/def/crs/EPSG/0/7844";
}

/// Default base namespace for identifiers minted by the converter
pub const DEFAULT_BASE_NAMESPACE: &str = "https://linked.data.gov.au/dataset/bdr/";
