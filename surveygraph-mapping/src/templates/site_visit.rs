//! Site visits
//!
//! One row per visit to a site. Visits point at the site node the site file
//! produced when its IRI map is supplied, else at the derived site identity.
//! They fall back to the site's location when the site file provided one.

use surveygraph_ir::{Datatype, Graph, Term};
use surveygraph_ns::{dcterms, geo, prov, schema, tern};
use surveygraph_tabular::{Field, FieldType, Row, Schema};
use surveygraph_terms::{ids, Catalog};
use surveygraph_validate::{
    Check, ChronologicalOrder, NullHandling, RelatedKey, UniqueTogether, ValidateError,
};

use crate::artifacts::{SiteKey, TemporalCoverage};
use crate::error::{MappingError, Result};
use crate::identity;
use crate::mapper::{MappingContext, RowMapper};
use crate::template::{ExtraInputs, TemplateSpec};

pub const ID: &str = "survey_site_visit_data-v3.0.0";

/// Column names.
pub mod columns {
    pub const SITE_VISIT_ID: &str = "siteVisitID";
    pub const SITE_ID: &str = "siteID";
    pub const SITE_ID_SOURCE: &str = "siteIDSource";
    pub const VISIT_START: &str = "visitStart";
    pub const VISIT_END: &str = "visitEnd";
    pub const PROTOCOL: &str = "protocolName";
    pub const VISIT_NOTES: &str = "visitNotes";
}

pub fn schema() -> Schema {
    Schema::new(vec![
        Field::string(columns::SITE_VISIT_ID).required().unique(),
        Field::string(columns::SITE_ID).required(),
        Field::string(columns::SITE_ID_SOURCE).required(),
        Field::new(columns::VISIT_START, FieldType::Timestamp).required(),
        Field::new(columns::VISIT_END, FieldType::Timestamp),
        Field::string(columns::PROTOCOL),
        Field::string(columns::VISIT_NOTES),
    ])
}

fn checks(
    _catalog: &Catalog,
    inputs: &ExtraInputs,
) -> std::result::Result<Vec<Box<dyn Check>>, ValidateError> {
    let mut checks: Vec<Box<dyn Check>> = vec![
        Box::new(ChronologicalOrder::new([columns::VISIT_START, columns::VISIT_END])?),
        Box::new(UniqueTogether::new(
            [columns::SITE_ID, columns::SITE_ID_SOURCE, columns::VISIT_START],
            NullHandling::Skip,
        )?),
    ];
    if let Some(site_keys) = inputs.site_key_set() {
        checks.push(Box::new(RelatedKey::new(
            [columns::SITE_ID, columns::SITE_ID_SOURCE],
            site_keys,
        )?));
    }
    Ok(checks)
}

pub fn spec() -> TemplateSpec {
    TemplateSpec::new(
        ID,
        schema(),
        Box::new(checks),
        Box::new(|| Box::new(SiteVisitMapper) as Box<dyn RowMapper>),
    )
    .with_vocabulary(columns::PROTOCOL, ids::SAMPLING_PROTOCOL)
}

/// Maps visit rows to `tern:SiteVisit` nodes.
#[derive(Debug, Default)]
pub struct SiteVisitMapper;

impl RowMapper for SiteVisitMapper {
    fn begin(&mut self, ctx: &MappingContext<'_>, graph: &mut Graph) -> Result<()> {
        super::site::write_dataset(ctx, graph);
        Ok(())
    }

    fn map_row(
        &mut self,
        ctx: &MappingContext<'_>,
        row: &Row,
        graph: &mut Graph,
    ) -> Result<Option<Term>> {
        let visit_id = row.raw(columns::SITE_VISIT_ID).unwrap_or_default();
        let key = SiteKey::new(
            row.raw(columns::SITE_ID).unwrap_or_default(),
            row.raw(columns::SITE_ID_SOURCE).unwrap_or_default(),
        );
        let visit = identity::site_visit(ctx.base(), ctx.dataset_id(), visit_id)?.to_term();
        let site = match ctx.inputs().site_iris.as_ref().and_then(|iris| iris.get(&key)) {
            Some(iri) => Term::iri(iri),
            None => identity::site(ctx.base(), None, &key.site_id, &key.site_id_source)?.to_term(),
        };

        graph.add_type(visit.clone(), tern::SITE_VISIT);
        graph.add_triple(visit.clone(), Term::iri(dcterms::IDENTIFIER), Term::string(visit_id));
        graph.add_triple(visit.clone(), Term::iri(schema::IS_PART_OF), ctx.dataset().to_term());
        graph.add_triple(visit.clone(), Term::iri(tern::HAS_SITE), site.clone());
        graph.add_triple(site, Term::iri(tern::HAS_SITE_VISIT), visit.clone());

        let start = row
            .get_timestamp(columns::VISIT_START)
            .ok_or_else(|| MappingError::InvalidValue {
                row: row.number(),
                field: columns::VISIT_START.to_string(),
                message: "visit has no start".to_string(),
            })?;
        TemporalCoverage::new(start, row.get_timestamp(columns::VISIT_END)).emit(
            graph,
            &visit,
            &format!("visit-{}", row.number()),
        );

        let protocol = ctx.resolve(
            graph,
            columns::PROTOCOL,
            ids::SAMPLING_PROTOCOL,
            row.raw(columns::PROTOCOL).unwrap_or_default(),
        )?;
        graph.add_triple(visit.clone(), Term::iri(prov::HAD_PLAN), protocol);

        if let Some(wkt) = ctx.inputs().site_geometries.get(&key) {
            let node = Term::blank(format!("visit-geometry-{}", row.number()));
            graph.add_triple(visit.clone(), Term::iri(geo::HAS_GEOMETRY), node.clone());
            graph.add_type(node.clone(), geo::GEOMETRY);
            graph.add_triple(
                node,
                Term::iri(geo::AS_WKT),
                Term::typed(wkt, Datatype::wkt_literal()),
            );
        }

        Ok(Some(visit))
    }
}
