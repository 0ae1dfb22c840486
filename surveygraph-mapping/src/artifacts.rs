//! Cross-template artifacts
//!
//! Some templates borrow defaults from another file of the same survey: a
//! site visit without coordinates falls back to its site's location, and a
//! site takes its temporal coverage from its visits. Each lookup is built by
//! one streaming pass over the source file and handed whole to the other
//! file's mapping run through `ExtraInputs`.
//!
//! Every lookup is keyed by the site's natural key, [`SiteKey`]. A site id
//! alone is only unique within the source that issued it.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;

use surveygraph_ir::{Datatype, Graph, Term};
use surveygraph_ns::{time, xsd};
use surveygraph_tabular::{Row, TableReader, Timestamp};
use surveygraph_terms::{ids, Catalog};

use crate::error::{MappingError, Result};
use crate::geometry::{Geometry, Reprojector};
use crate::identity;
use crate::templates::{site, site_visit};

/// A site's natural key: its id within the source that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteKey {
    pub site_id: String,
    pub site_id_source: String,
}

impl SiteKey {
    pub fn new(site_id: impl Into<String>, site_id_source: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            site_id_source: site_id_source.into(),
        }
    }

    /// Key of `row`, if both key fields are filled in.
    pub fn from_row(row: &Row, id_field: &str, source_field: &str) -> Option<Self> {
        Some(Self::new(row.raw(id_field)?, row.raw(source_field)?))
    }

    /// Field values in `(siteID, siteIDSource)` order.
    pub fn to_vec(&self) -> Vec<String> {
        vec![self.site_id.clone(), self.site_id_source.clone()]
    }
}

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.site_id_source, self.site_id)
    }
}

/// Time span covered by a site's visits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalCoverage {
    pub start: Timestamp,
    pub end: Option<Timestamp>,
}

impl TemporalCoverage {
    pub fn new(start: Timestamp, end: Option<Timestamp>) -> Self {
        Self { start, end }
    }

    /// Widen to include another span.
    pub fn extend(&mut self, other: &TemporalCoverage) {
        if other.start.earliest() < self.start.earliest() {
            self.start = other.start.clone();
        }
        let candidate = other.end.as_ref().unwrap_or(&other.start);
        let current = self.end.as_ref().unwrap_or(&self.start);
        if candidate.latest() > current.latest() {
            self.end = Some(candidate.clone());
        }
    }

    /// Write a `time:Interval` for `subject` and return the interval node.
    ///
    /// `label` scopes the blank nodes; use something unique to the subject.
    pub fn emit(&self, graph: &mut Graph, subject: &Term, label: &str) -> Term {
        let interval = Term::blank(format!("{label}-interval"));
        graph.add_triple(
            subject.clone(),
            Term::iri(surveygraph_ns::schema::TEMPORAL),
            interval.clone(),
        );
        graph.add_type(interval.clone(), time::INTERVAL);

        let begin = Term::blank(format!("{label}-begin"));
        graph.add_triple(interval.clone(), Term::iri(time::HAS_BEGINNING), begin.clone());
        write_instant(graph, &begin, &self.start);

        if let Some(end) = &self.end {
            let end_node = Term::blank(format!("{label}-end"));
            graph.add_triple(interval.clone(), Term::iri(time::HAS_END), end_node.clone());
            write_instant(graph, &end_node, end);
        }
        interval
    }
}

fn write_instant(graph: &mut Graph, node: &Term, at: &Timestamp) {
    let predicate = match at.xsd_datatype() {
        xsd::G_YEAR => time::IN_XSD_G_YEAR,
        xsd::G_YEAR_MONTH => time::IN_XSD_G_YEAR_MONTH,
        xsd::DATE => time::IN_XSD_DATE,
        _ => time::IN_XSD_DATE_TIME_STAMP,
    };
    graph.add_type(node.clone(), time::INSTANT);
    graph.add_triple(
        node.clone(),
        Term::iri(predicate),
        Term::typed(at.lexical(), Datatype::from_iri(at.xsd_datatype())),
    );
}

/// Site key to the IRI of the site's node.
///
/// An existing site IRI in the row wins; otherwise the IRI is derived from
/// the key exactly as the site mapper derives it.
pub fn site_iri_map<R: Read>(data: R, base: &str) -> Result<HashMap<SiteKey, String>> {
    let mut out = HashMap::new();
    for row in TableReader::open(data)? {
        let row = row?;
        let Some(key) = SiteKey::from_row(&row, site::columns::SITE_ID, site::columns::SITE_ID_SOURCE)
        else {
            continue;
        };
        let identity = identity::site(
            base,
            row.raw(site::columns::EXISTING_SITE_IRI),
            &key.site_id,
            &key.site_id_source,
        )?;
        out.insert(key, identity.iri().to_string());
    }
    tracing::debug!(sites = out.len(), "Built site IRI map");
    Ok(out)
}

/// Site key to the lexical `geo:wktLiteral` of the site's location, in the
/// datum each row names.
///
/// Rows without both coordinates are skipped. Bad coordinates or an unknown
/// datum fail the pass: the site file is expected to have been validated.
pub fn site_geometry_map<R: Read>(data: R, catalog: &Catalog) -> Result<HashMap<SiteKey, String>> {
    geometry_pass(data, catalog, None)
}

/// As [`site_geometry_map`], with every location reprojected into `target`.
pub fn site_geometry_map_in<R: Read>(
    data: R,
    catalog: &Catalog,
    target: &str,
    service: &dyn Reprojector,
) -> Result<HashMap<SiteKey, String>> {
    geometry_pass(data, catalog, Some((target, service)))
}

fn geometry_pass<R: Read>(
    data: R,
    catalog: &Catalog,
    target: Option<(&str, &dyn Reprojector)>,
) -> Result<HashMap<SiteKey, String>> {
    let datum = catalog
        .lookup(site::ID, site::columns::GEODETIC_DATUM, ids::GEODETIC_DATUM)
        .ok_or_else(|| MappingError::MissingVocabulary {
            template: site::ID.to_string(),
            field: site::columns::GEODETIC_DATUM.to_string(),
        })?;

    let mut out = HashMap::new();
    let mut scratch = Graph::new();
    for row in TableReader::open(data)? {
        let row = row?;
        let Some(key) = SiteKey::from_row(&row, site::columns::SITE_ID, site::columns::SITE_ID_SOURCE)
        else {
            continue;
        };
        let (Some(lat), Some(lon)) = (
            row.raw(site::columns::LATITUDE),
            row.raw(site::columns::LONGITUDE),
        ) else {
            continue;
        };
        let lat = parse_degrees(lat, row.number(), site::columns::LATITUDE)?;
        let lon = parse_degrees(lon, row.number(), site::columns::LONGITUDE)?;
        let crs = datum.resolve(
            &mut scratch,
            row.raw(site::columns::GEODETIC_DATUM).unwrap_or_default(),
            None,
        )?;
        let crs = crs
            .as_iri()
            .filter(|iri| !iri.is_empty())
            .ok_or_else(|| MappingError::InvalidValue {
                row: row.number(),
                field: site::columns::GEODETIC_DATUM.to_string(),
                message: format!("datum resolved to {crs}, not a CRS IRI"),
            })?;
        let mut geometry = Geometry::from_lat_lon(lat, lon, crs)?;
        if let Some((target, service)) = target {
            geometry = geometry.transform_to(target, service)?;
        }
        out.insert(key, geometry.to_wkt());
    }
    tracing::debug!(sites = out.len(), reprojected = target.is_some(), "Built site geometry map");
    Ok(out)
}

fn parse_degrees(raw: &str, row: usize, field: &str) -> Result<f64> {
    raw.parse::<f64>().map_err(|_| MappingError::InvalidValue {
        row,
        field: field.to_string(),
        message: format!("{raw:?} is not a coordinate"),
    })
}

/// Site key to the span from its earliest visit start to its latest end.
///
/// Rows without a full site key or a parseable start are skipped.
pub fn site_temporal_map<R: Read>(data: R) -> Result<HashMap<SiteKey, TemporalCoverage>> {
    let mut out: HashMap<SiteKey, TemporalCoverage> = HashMap::new();
    for row in TableReader::open(data)? {
        let row = row?;
        let Some(key) = SiteKey::from_row(
            &row,
            site_visit::columns::SITE_ID,
            site_visit::columns::SITE_ID_SOURCE,
        ) else {
            continue;
        };
        let Some(start) = row
            .raw(site_visit::columns::VISIT_START)
            .and_then(|raw| Timestamp::parse(raw).ok())
        else {
            continue;
        };
        let end = row
            .raw(site_visit::columns::VISIT_END)
            .and_then(|raw| Timestamp::parse(raw).ok());
        let span = TemporalCoverage::new(start, end);
        match out.get_mut(&key) {
            Some(existing) => existing.extend(&span),
            None => {
                out.insert(key, span);
            }
        }
    }
    tracing::debug!(sites = out.len(), "Built site temporal map");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use surveygraph_ns::crs;

    fn key(id: &str, source: &str) -> SiteKey {
        SiteKey::new(id, source)
    }

    #[test]
    fn test_site_geometry_map() {
        let csv = "siteID,siteIDSource,decimalLatitude,decimalLongitude,geodeticDatum\n\
                   S1,TERN,-27.5,153,GDA2020\n\
                   S2,TERN,,,\n\
                   S3,TERN,-30,150,wgs 84\n";
        let catalog = Catalog::builder().with_builtins().unwrap().build();
        let map = site_geometry_map(csv.as_bytes(), &catalog).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&key("S1", "TERN")], format!("<{}> POINT (153 -27.5)", crs::GDA2020));
        assert_eq!(map[&key("S3", "TERN")], format!("<{}> POINT (150 -30)", crs::WGS84));
    }

    #[test]
    fn test_same_site_id_from_two_sources_stays_apart() {
        let csv = "siteID,siteIDSource,decimalLatitude,decimalLongitude,geodeticDatum\n\
                   S1,ORG-A,-27.5,153,WGS84\n\
                   S1,ORG-B,-10,120,WGS84\n";
        let catalog = Catalog::builder().with_builtins().unwrap().build();
        let map = site_geometry_map(csv.as_bytes(), &catalog).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&key("S1", "ORG-A")], format!("<{}> POINT (153 -27.5)", crs::WGS84));
        assert_eq!(map[&key("S1", "ORG-B")], format!("<{}> POINT (120 -10)", crs::WGS84));
    }

    #[test]
    fn test_unknown_datum_fails() {
        let csv = "siteID,siteIDSource,decimalLatitude,decimalLongitude,geodeticDatum\n\
                   S1,TERN,-27.5,153,MARS\n";
        let catalog = Catalog::builder().with_builtins().unwrap().build();
        assert!(matches!(
            site_geometry_map(csv.as_bytes(), &catalog),
            Err(MappingError::Vocabulary(_))
        ));
    }

    struct Shift;

    impl Reprojector for Shift {
        fn reproject(
            &self,
            point: geo_types::Point<f64>,
            _from: &str,
            _to: &str,
        ) -> std::result::Result<geo_types::Point<f64>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(geo_types::Point::new(point.x() + 1.0, point.y()))
        }
    }

    #[test]
    fn test_site_geometry_map_reprojects_into_target() {
        let csv = "siteID,siteIDSource,decimalLatitude,decimalLongitude,geodeticDatum\n\
                   S1,TERN,-27.5,153,GDA94\n\
                   S2,TERN,-30,150,GDA2020\n";
        let catalog = Catalog::builder().with_builtins().unwrap().build();
        let map = site_geometry_map_in(csv.as_bytes(), &catalog, crs::GDA2020, &Shift).unwrap();
        assert_eq!(map[&key("S1", "TERN")], format!("<{}> POINT (154 -27.5)", crs::GDA2020));
        // Already in the target datum
        assert_eq!(map[&key("S2", "TERN")], format!("<{}> POINT (150 -30)", crs::GDA2020));

        let err = site_geometry_map_in(
            csv.as_bytes(),
            &catalog,
            crs::GDA2020,
            &crate::geometry::NoReprojection,
        )
        .unwrap_err();
        assert!(matches!(err, MappingError::Geometry(_)));
    }

    #[test]
    fn test_site_iri_map_prefers_existing_iri() {
        let csv = "siteID,siteIDSource,existingBDRSiteIRI\n\
                   S1,ORG-A,https://linked.data.gov.au/dataset/bdr/site/abc\n\
                   S1,ORG-B,\n";
        let map = site_iri_map(csv.as_bytes(), "https://example.org/").unwrap();
        assert_eq!(
            map[&key("S1", "ORG-A")],
            "https://linked.data.gov.au/dataset/bdr/site/abc"
        );
        assert_eq!(map[&key("S1", "ORG-B")], "https://example.org/site/ORG-B/S1");
    }

    #[test]
    fn test_site_temporal_map_takes_outer_bounds() {
        let csv = "siteVisitID,siteID,siteIDSource,visitStart,visitEnd\n\
                   V1,S1,TERN,2020-03-01,2020-03-05\n\
                   V2,S1,TERN,2019,\n\
                   V3,S1,TERN,2021-06,2021-07\n\
                   V4,S2,TERN,,\n\
                   V5,S1,ORG-B,2018-01-01,\n";
        let map = site_temporal_map(csv.as_bytes()).unwrap();
        assert_eq!(map.len(), 2);
        let span = &map[&key("S1", "TERN")];
        assert_eq!(span.start, Timestamp::parse("2019").unwrap());
        assert_eq!(span.end, Some(Timestamp::parse("2021-07").unwrap()));
        assert_eq!(map[&key("S1", "ORG-B")].start, Timestamp::parse("2018-01-01").unwrap());
    }

    #[test]
    fn test_emit_interval() {
        let span = TemporalCoverage::new(
            Timestamp::parse("2020-03-01").unwrap(),
            Some(Timestamp::parse("2020-03-05T10:00:00+10:00").unwrap()),
        );
        let mut graph = Graph::new();
        let site = Term::iri("https://example.org/site/TERN/S1");
        let interval = span.emit(&mut graph, &site, "S1");

        assert!(graph.has_type(&interval, time::INTERVAL));
        let begin: Vec<&Term> = graph.objects(&interval, time::HAS_BEGINNING).collect();
        assert_eq!(begin.len(), 1);
        assert_eq!(
            graph.objects(begin[0], time::IN_XSD_DATE).next(),
            Some(&Term::typed("2020-03-01", Datatype::from_iri(xsd::DATE)))
        );
        let end = graph.objects(&interval, time::HAS_END).next().unwrap();
        assert_eq!(graph.objects(end, time::IN_XSD_DATE_TIME_STAMP).count(), 1);
    }
}
