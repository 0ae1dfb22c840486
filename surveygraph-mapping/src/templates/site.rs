//! Survey sites
//!
//! One row per site. A site is identified by its id and the organisation
//! that issued it, unless the row names an existing site IRI.

use surveygraph_ir::{Graph, Term};
use surveygraph_ns::{dcterms, geo, rdfs, schema, tern};
use surveygraph_tabular::{Field, FieldType, Row, Schema};
use surveygraph_terms::{ids, Catalog};
use surveygraph_validate::{Check, LogicalCheck, NullHandling, UniqueTogether, ValidateError};

use crate::artifacts::SiteKey;
use crate::error::{MappingError, Result};
use crate::geometry::Geometry;
use crate::identity;
use crate::mapper::{MappingContext, RowMapper};
use crate::template::{ExtraInputs, TemplateSpec};
use crate::vocab_check::VocabularyCheck;

pub const ID: &str = "survey_site_data-v3.0.0";

/// Column names.
pub mod columns {
    pub const SITE_ID: &str = "siteID";
    pub const SITE_ID_SOURCE: &str = "siteIDSource";
    pub const EXISTING_SITE_IRI: &str = "existingBDRSiteIRI";
    pub const SITE_NAME: &str = "siteName";
    pub const SITE_TYPE: &str = "siteType";
    pub const SITE_DESCRIPTION: &str = "siteDescription";
    pub const HABITAT: &str = "habitat";
    pub const LATITUDE: &str = "decimalLatitude";
    pub const LONGITUDE: &str = "decimalLongitude";
    pub const GEODETIC_DATUM: &str = "geodeticDatum";
}

fn bounded(name: &str, min: f64, max: f64) -> Field {
    let mut field = Field::new(name, FieldType::Number);
    field.constraints.minimum = Some(min);
    field.constraints.maximum = Some(max);
    field
}

/// The fixed schema, in column order.
pub fn schema() -> Schema {
    Schema::new(vec![
        Field::string(columns::SITE_ID).required(),
        Field::string(columns::SITE_ID_SOURCE).required(),
        Field::string(columns::EXISTING_SITE_IRI),
        Field::string(columns::SITE_NAME),
        Field::string(columns::SITE_TYPE),
        Field::string(columns::SITE_DESCRIPTION),
        Field::string(columns::HABITAT),
        bounded(columns::LATITUDE, -90.0, 90.0),
        bounded(columns::LONGITUDE, -180.0, 180.0),
        Field::string(columns::GEODETIC_DATUM),
    ])
}

fn checks(
    catalog: &Catalog,
    _inputs: &ExtraInputs,
) -> std::result::Result<Vec<Box<dyn Check>>, ValidateError> {
    let mut checks: Vec<Box<dyn Check>> = vec![
        Box::new(UniqueTogether::new(
            [columns::SITE_ID, columns::SITE_ID_SOURCE],
            NullHandling::Skip,
        )?),
        Box::new(LogicalCheck::mutually_inclusive([
            columns::LATITUDE,
            columns::LONGITUDE,
            columns::GEODETIC_DATUM,
        ])?),
    ];
    if let Some(datum) = catalog.lookup(ID, columns::GEODETIC_DATUM, ids::GEODETIC_DATUM) {
        checks.push(Box::new(VocabularyCheck::new(columns::GEODETIC_DATUM, datum)));
    }
    Ok(checks)
}

pub fn spec() -> TemplateSpec {
    TemplateSpec::new(
        ID,
        schema(),
        Box::new(checks),
        Box::new(|| Box::new(SiteMapper) as Box<dyn RowMapper>),
    )
    .with_vocabulary(columns::SITE_TYPE, ids::SITE_TYPE)
    .with_vocabulary(columns::HABITAT, ids::HABITAT)
    .with_vocabulary(columns::GEODETIC_DATUM, ids::GEODETIC_DATUM)
}

/// Maps site rows to `tern:Site` nodes.
#[derive(Debug, Default)]
pub struct SiteMapper;

impl RowMapper for SiteMapper {
    fn begin(&mut self, ctx: &MappingContext<'_>, graph: &mut Graph) -> Result<()> {
        write_dataset(ctx, graph);
        Ok(())
    }

    fn map_row(
        &mut self,
        ctx: &MappingContext<'_>,
        row: &Row,
        graph: &mut Graph,
    ) -> Result<Option<Term>> {
        let key = SiteKey::new(
            row.raw(columns::SITE_ID).unwrap_or_default(),
            row.raw(columns::SITE_ID_SOURCE).unwrap_or_default(),
        );
        let site = identity::site(
            ctx.base(),
            row.raw(columns::EXISTING_SITE_IRI),
            &key.site_id,
            &key.site_id_source,
        )?
        .to_term();

        graph.add_type(site.clone(), tern::SITE);
        graph.add_triple(
            site.clone(),
            Term::iri(dcterms::IDENTIFIER),
            Term::string(&key.site_id),
        );
        graph.add_triple(site.clone(), Term::iri(schema::IS_PART_OF), ctx.dataset().to_term());
        if let Some(name) = row.raw(columns::SITE_NAME) {
            graph.add_triple(site.clone(), Term::iri(schema::NAME), Term::string(name));
        }
        if let Some(description) = row.raw(columns::SITE_DESCRIPTION) {
            graph.add_triple(
                site.clone(),
                Term::iri(dcterms::DESCRIPTION),
                Term::string(description),
            );
        }

        let site_type = ctx.resolve(
            graph,
            columns::SITE_TYPE,
            ids::SITE_TYPE,
            row.raw(columns::SITE_TYPE).unwrap_or_default(),
        )?;
        graph.add_triple(site.clone(), Term::iri(tern::FEATURE_TYPE), site_type);

        if let Some(habitat) = row.raw(columns::HABITAT) {
            let concept = ctx.resolve(graph, columns::HABITAT, ids::HABITAT, habitat)?;
            graph.add_triple(site.clone(), Term::iri(tern::HAS_HABITAT), concept);
        }

        if let Some(geometry) = location(ctx, row, graph)? {
            let node = Term::blank(format!("site-geometry-{}", row.number()));
            graph.add_triple(site.clone(), Term::iri(geo::HAS_GEOMETRY), node.clone());
            graph.add_type(node.clone(), geo::GEOMETRY);
            graph.add_triple(node, Term::iri(geo::AS_WKT), geometry.to_term());
        }

        if let Some(coverage) = ctx.inputs().site_temporal.get(&key) {
            coverage.emit(graph, &site, &format!("site-{}", row.number()));
        }

        Ok(Some(site))
    }
}

/// Dataset node shared by every template's first chunk.
pub(crate) fn write_dataset(ctx: &MappingContext<'_>, graph: &mut Graph) {
    let dataset = ctx.dataset().to_term();
    graph.add_type(dataset.clone(), tern::RDF_DATASET);
    graph.add_triple(
        dataset.clone(),
        Term::iri(dcterms::IDENTIFIER),
        Term::string(ctx.dataset_id()),
    );
    graph.add_triple(
        dataset,
        Term::iri(rdfs::IS_DEFINED_BY),
        Term::string(ctx.template()),
    );
}

/// The row's point, if it has coordinates.
fn location(ctx: &MappingContext<'_>, row: &Row, graph: &mut Graph) -> Result<Option<Geometry>> {
    let (Some(lat), Some(lon)) = (
        row.get(columns::LATITUDE).and_then(|v| v.as_f64()),
        row.get(columns::LONGITUDE).and_then(|v| v.as_f64()),
    ) else {
        return Ok(None);
    };
    let datum = ctx.resolve(
        graph,
        columns::GEODETIC_DATUM,
        ids::GEODETIC_DATUM,
        row.raw(columns::GEODETIC_DATUM).unwrap_or_default(),
    )?;
    let crs = datum.as_iri().ok_or_else(|| MappingError::InvalidValue {
        row: row.number(),
        field: columns::GEODETIC_DATUM.to_string(),
        message: "datum did not resolve to an IRI".to_string(),
    })?;
    Ok(Some(Geometry::from_lat_lon(lat, lon, crs)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateRegistry;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use surveygraph_ns::{crs, skos};

    fn map(rows: &[&[&str]]) -> Graph {
        map_with(&ExtraInputs::default(), rows)
    }

    fn map_with(inputs: &ExtraInputs, rows: &[&[&str]]) -> Graph {
        let registry = TemplateRegistry::with_builtins().unwrap();
        let catalog = registry.catalog().unwrap();
        let ctx = MappingContext::new(ID, &catalog, inputs, "https://example.org/", "ds1").unwrap();
        let schema = Arc::new(schema());
        let mut graph = Graph::new();
        let mut mapper = SiteMapper;
        mapper.begin(&ctx, &mut graph).unwrap();
        for (i, cells) in rows.iter().enumerate() {
            let row = Row::from_record(i + 1, Arc::clone(&schema), cells.iter().copied());
            mapper.map_row(&ctx, &row, &mut graph).unwrap();
        }
        graph
    }

    #[test]
    fn test_temporal_coverage_follows_site_source() {
        use crate::artifacts::TemporalCoverage;
        use surveygraph_ns::time;
        use surveygraph_tabular::Timestamp;

        let mut inputs = ExtraInputs::default();
        inputs.site_temporal.insert(
            SiteKey::new("S1", "ORG-B"),
            TemporalCoverage::new(Timestamp::parse("2019").unwrap(), None),
        );
        let graph = map_with(
            &inputs,
            &[
                &["S1", "ORG-A", "", "", "", "", "", "", "", ""],
                &["S1", "ORG-B", "", "", "", "", "", "", "", ""],
            ],
        );
        let a = Term::iri("https://example.org/site/ORG-A/S1");
        let b = Term::iri("https://example.org/site/ORG-B/S1");
        assert_eq!(graph.objects(&a, schema::TEMPORAL).count(), 0);
        let interval = graph.objects(&b, schema::TEMPORAL).next().unwrap();
        assert!(graph.has_type(interval, time::INTERVAL));
    }

    #[test]
    fn test_site_node() {
        let graph = map(&[&["S1", "TERN", "", "Creek", "plot", "", "", "-27.5", "153", "GDA2020"]]);
        let site = Term::iri("https://example.org/site/TERN/S1");
        assert!(graph.has_type(&site, tern::SITE));
        assert_eq!(
            graph.objects(&site, tern::FEATURE_TYPE).next(),
            Some(&Term::iri("https://linked.data.gov.au/def/nrm/site-type/plot"))
        );
        let geometry = graph.objects(&site, geo::HAS_GEOMETRY).next().unwrap();
        let wkt = graph.objects(geometry, geo::AS_WKT).next().unwrap();
        let (value, _) = wkt.as_literal().unwrap();
        assert_eq!(value.lexical(), format!("<{}> POINT (153 -27.5)", crs::GDA2020));
    }

    #[test]
    fn test_blank_site_type_uses_default() {
        let graph = map(&[&["S1", "TERN", "", "", "", "", "", "", "", ""]]);
        let site = Term::iri("https://example.org/site/TERN/S1");
        assert_eq!(
            graph.objects(&site, tern::FEATURE_TYPE).next(),
            Some(&Term::iri("https://linked.data.gov.au/def/nrm/site-type/site"))
        );
        assert!(graph.objects(&site, geo::HAS_GEOMETRY).next().is_none());
    }

    #[test]
    fn test_unknown_habitat_is_minted_once() {
        let graph = map(&[
            &["S1", "TERN", "", "", "", "", "Mulga scrub", "", "", ""],
            &["S2", "TERN", "", "", "", "", "Mulga scrub", "", "", ""],
            &["S3", "TERN", "", "", "", "", "WOOD-LAND", "", "", ""],
        ]);
        let habitat = |site: &str| {
            let site = Term::iri(format!("https://example.org/site/TERN/{site}"));
            let habitat = graph.objects(&site, tern::HAS_HABITAT).next().unwrap().clone();
            habitat
        };
        let minted = habitat("S1");
        assert_eq!(minted, habitat("S2"));
        assert_eq!(graph.objects(&minted, skos::PREF_LABEL).count(), 1);
        assert_eq!(
            graph.objects(&minted, dcterms::SOURCE).next(),
            Some(&Term::iri("https://example.org/dataset/ds1"))
        );
        assert_eq!(
            habitat("S3"),
            Term::iri("https://linked.data.gov.au/def/nrm/habitat/woodland")
        );
    }

    #[test]
    fn test_existing_iri_wins() {
        let graph = map(&[&["S1", "TERN", "https://example.org/existing/9", "", "", "", "", "", "", ""]]);
        assert!(graph.has_type(&Term::iri("https://example.org/existing/9"), tern::SITE));
    }
}
