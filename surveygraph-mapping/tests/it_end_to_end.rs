//! End-to-end validation and mapping of the built-in templates.

use pretty_assertions::assert_eq;
use surveygraph_ir::{Graph, Term};
use surveygraph_mapping::templates::{site, site_visit};
use surveygraph_mapping::{
    map, site_geometry_map, site_iri_map, site_temporal_map, validate, validate_with_limit,
    ExtraInputs, MapOptions, MapperConfig, TemplateRegistry,
};
use surveygraph_ns::{geo, kinds, rdfs, schema, skos, tern};
use surveygraph_terms::Catalog;

const SITE_HEADER: &str = "siteID,siteIDSource,existingBDRSiteIRI,siteName,siteType,\
                           siteDescription,habitat,decimalLatitude,decimalLongitude,geodeticDatum";

const VISIT_HEADER: &str = "siteVisitID,siteID,siteIDSource,visitStart,visitEnd,protocolName,visitNotes";

fn setup() -> (TemplateRegistry, Catalog) {
    let registry = TemplateRegistry::with_builtins().unwrap();
    let catalog = registry.catalog().unwrap();
    (registry, catalog)
}

fn site_csv(rows: &[&str]) -> String {
    let mut csv = format!("{SITE_HEADER}\n");
    for row in rows {
        csv.push_str(row);
        csv.push('\n');
    }
    csv
}

fn options(chunk_size: Option<i64>) -> MapOptions {
    MapOptions {
        dataset_id: Some("ds1".into()),
        base_namespace: Some("https://example.org/".into()),
        chunk_size,
    }
}

fn map_all(
    registry: &TemplateRegistry,
    catalog: &Catalog,
    template: &str,
    csv: &str,
    options: &MapOptions,
    inputs: &ExtraInputs,
) -> Vec<Graph> {
    map(registry, catalog, template, csv.as_bytes(), options, inputs)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn duplicate_site_key_reported_once() {
    let (registry, catalog) = setup();
    let inputs = ExtraInputs::default();

    let csv = site_csv(&["S1,ORG,,,,,,,,", "S1,ORG,,,,,,,,"]);
    let report = validate(&registry, &catalog, site::ID, csv.as_bytes(), &inputs).unwrap();
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].kind, kinds::ROW_CONSTRAINT);
    assert_eq!(report.errors[0].row, Some(2));

    let csv = site_csv(&["S1,ORG,,,,,,,,", "S1,OTHER,,,,,,,,"]);
    let report = validate(&registry, &catalog, site::ID, csv.as_bytes(), &inputs).unwrap();
    assert!(report.valid, "{:?}", report.errors);
}

#[test]
fn validation_collects_row_problems() {
    let (registry, catalog) = setup();
    let csv = site_csv(&[
        ",ORG,,,,,,,,",
        "S2,ORG,,,,,,-27.5,,",
        "S3,ORG,,,,,,-27.5,153,MARS",
    ]);
    let report =
        validate(&registry, &catalog, site::ID, csv.as_bytes(), &ExtraInputs::default()).unwrap();
    let rows: Vec<Option<usize>> = report.errors.iter().map(|e| e.row).collect();
    assert_eq!(rows, vec![Some(1), Some(2), Some(3)]);
    assert_eq!(report.errors[2].field.as_deref(), Some("geodeticDatum"));
}

#[test]
fn error_limit_from_config() {
    let (registry, catalog) = setup();
    let config = MapperConfig::from_toml_str("error_limit = 2").unwrap();
    let csv = site_csv(&[",,,,,,,,,", ",,,,,,,,,", ",,,,,,,,,"]);
    let report = validate_with_limit(
        &registry,
        &catalog,
        site::ID,
        csv.as_bytes(),
        &ExtraInputs::default(),
        config.error_limit,
    )
    .unwrap();
    assert_eq!(report.errors.last().map(|e| e.kind.as_str()), Some(kinds::ERROR_LIMIT));
}

#[test]
fn extra_columns_must_follow_template_columns() {
    let (registry, catalog) = setup();
    let inputs = ExtraInputs::default();

    let appended = format!("{SITE_HEADER},weather\nS1,ORG,,,,,,,,,sunny\n");
    let report = validate(&registry, &catalog, site::ID, appended.as_bytes(), &inputs).unwrap();
    assert!(report.valid, "{:?}", report.errors);

    let inserted = "siteID,weather,siteIDSource,existingBDRSiteIRI,siteName,siteType,\
                    siteDescription,habitat,decimalLatitude,decimalLongitude,geodeticDatum\n\
                    S1,sunny,ORG,,,,,,,,\n";
    let report = validate(&registry, &catalog, site::ID, inserted.as_bytes(), &inputs).unwrap();
    assert!(!report.valid);
    assert!(report.errors.iter().all(|e| e.kind == kinds::SCHEMA_ERROR));
    assert_eq!(
        report.errors[0].note,
        "Column 2 should be 'siteIDSource' but found 'weather'"
    );
}

#[test]
fn chunked_mapping() {
    let (registry, catalog) = setup();
    let inputs = ExtraInputs::default();
    let rows: Vec<String> = (1..=10).map(|i| format!("S{i},ORG,,,,,,,,")).collect();
    let csv = site_csv(&rows.iter().map(String::as_str).collect::<Vec<_>>());

    let chunks = map_all(&registry, &catalog, site::ID, &csv, &options(Some(3)), &inputs);
    assert_eq!(chunks.len(), 4);
    let sites_per_chunk: Vec<usize> = chunks
        .iter()
        .map(|g| g.iter().filter(|t| t.o == Term::iri(tern::SITE)).count())
        .collect();
    assert_eq!(sites_per_chunk, vec![3, 3, 3, 1]);

    for size in [None, Some(0), Some(-3), Some(50)] {
        let chunks = map_all(&registry, &catalog, site::ID, &csv, &options(size), &inputs);
        assert_eq!(chunks.len(), 1, "chunk size {size:?}");
    }
}

#[test]
fn minted_concepts_are_stable_across_runs() {
    let (registry, catalog) = setup();
    let inputs = ExtraInputs::default();
    let csv = site_csv(&["S1,ORG,,,,,Mulga scrub,,,", "S2,ORG,,,,,Mulga scrub,,,"]);

    let habitat_of = |graphs: &[Graph], site: &str| -> Term {
        let subject = Term::iri(format!("https://example.org/site/ORG/{site}"));
        graphs
            .iter()
            .flat_map(|g| g.objects(&subject, tern::HAS_HABITAT).cloned().collect::<Vec<_>>())
            .next()
            .unwrap()
    };

    let first = map_all(&registry, &catalog, site::ID, &csv, &options(None), &inputs);
    let second = map_all(&registry, &catalog, site::ID, &csv, &options(Some(1)), &inputs);
    let concept = habitat_of(&first, "S1");
    assert_eq!(concept, habitat_of(&first, "S2"));
    assert_eq!(concept, habitat_of(&second, "S1"));

    // Declared once in a single graph; once per chunk when split.
    assert_eq!(first[0].objects(&concept, skos::PREF_LABEL).count(), 1);
    let declared: usize = second
        .iter()
        .map(|g| g.objects(&concept, skos::PREF_LABEL).count())
        .sum();
    assert_eq!(declared, 2);
}

#[test]
fn extra_columns_become_json_annotation() {
    let (registry, catalog) = setup();
    let csv = format!("{SITE_HEADER},weather,observer\nS1,ORG,,,,,,,,,sunny,\n");
    let chunks = map_all(&registry, &catalog, site::ID, &csv, &options(None), &ExtraInputs::default());
    let site = Term::iri("https://example.org/site/ORG/S1");
    assert_eq!(
        chunks[0].objects(&site, rdfs::COMMENT).collect::<Vec<_>>(),
        vec![&Term::json(r#"{"weather":"sunny"}"#)]
    );
}

#[test]
fn site_and_visit_files_agree() {
    let (registry, catalog) = setup();
    let sites = site_csv(&["S1,ORG,,Creek,,,,-27.5,153,GDA2020", "S2,ORG,,Ridge,,,,,,"]);
    let visits = format!(
        "{VISIT_HEADER}\n\
         V1,S1,ORG,2020-03-01,2020-03-04,pitfall,\n\
         V2,S1,ORG,2021-05,,camera trap,\n\
         V3,S2,ORG,2019,,,\n"
    );

    // Artifacts flow from each file into the other's run.
    let mut site_inputs = ExtraInputs::default();
    site_inputs.site_temporal = site_temporal_map(visits.as_bytes()).unwrap();
    let mut visit_inputs = ExtraInputs::default()
        .with_site_iris(site_iri_map(sites.as_bytes(), "https://example.org/").unwrap());
    visit_inputs.site_geometries = site_geometry_map(sites.as_bytes(), &catalog).unwrap();

    let report = validate(&registry, &catalog, site_visit::ID, visits.as_bytes(), &visit_inputs).unwrap();
    assert!(report.valid, "{:?}", report.errors);

    let mut graph = Graph::new();
    for chunk in map_all(&registry, &catalog, site::ID, &sites, &options(None), &site_inputs) {
        graph.merge(chunk);
    }
    for chunk in map_all(&registry, &catalog, site_visit::ID, &visits, &options(Some(2)), &visit_inputs) {
        graph.merge(chunk);
    }

    let s1 = Term::iri("https://example.org/site/ORG/S1");
    let v1 = Term::iri("https://example.org/visit/ds1/V1");
    assert!(graph.has_type(&s1, tern::SITE));
    assert!(graph.contains(&v1, &Term::iri(tern::HAS_SITE), &s1));
    assert_eq!(graph.objects(&s1, schema::TEMPORAL).count(), 1);
    assert_eq!(graph.objects(&v1, geo::HAS_GEOMETRY).count(), 1);

    let unknown_site = format!("{VISIT_HEADER}\nV9,S9,ORG,2020,,,\n");
    let report =
        validate(&registry, &catalog, site_visit::ID, unknown_site.as_bytes(), &visit_inputs).unwrap();
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, Some(1));
}

fn merged(
    registry: &TemplateRegistry,
    catalog: &Catalog,
    runs: &[(&str, &str, &ExtraInputs)],
) -> Graph {
    let mut graph = Graph::new();
    for (template, csv, inputs) in runs {
        for chunk in map_all(registry, catalog, template, csv, &options(None), inputs) {
            graph.merge(chunk);
        }
    }
    graph
}

#[test]
fn one_site_id_from_two_sources() {
    let (registry, catalog) = setup();
    let sites = site_csv(&[
        "S1,ORG-A,,North,plot,,,-27.5,153,WGS84",
        "S1,ORG-B,,South,plot,,,-10,120,WGS84",
    ]);
    let visits = format!(
        "{VISIT_HEADER}
         V1,S1,ORG-A,2020-03-01,,,
         V2,S1,ORG-B,2018-01-01,2018-02-01,,
"
    );
    assert!(validate(&registry, &catalog, site::ID, sites.as_bytes(), &ExtraInputs::default())
        .unwrap()
        .valid);

    let mut site_inputs = ExtraInputs::default();
    site_inputs.site_temporal = site_temporal_map(visits.as_bytes()).unwrap();
    let mut visit_inputs = ExtraInputs::default()
        .with_site_iris(site_iri_map(sites.as_bytes(), "https://example.org/").unwrap());
    visit_inputs.site_geometries = site_geometry_map(sites.as_bytes(), &catalog).unwrap();

    let report = validate(&registry, &catalog, site_visit::ID, visits.as_bytes(), &visit_inputs).unwrap();
    assert!(report.valid, "{:?}", report.errors);
    let stray = format!("{VISIT_HEADER}
V3,S1,ORG-C,2020,,,
");
    let report = validate(&registry, &catalog, site_visit::ID, stray.as_bytes(), &visit_inputs).unwrap();
    assert_eq!(report.errors.len(), 1);

    let graph = merged(
        &registry,
        &catalog,
        &[
            (site::ID, sites.as_str(), &site_inputs),
            (site_visit::ID, visits.as_str(), &visit_inputs),
        ],
    );
    let a = Term::iri("https://example.org/site/ORG-A/S1");
    let b = Term::iri("https://example.org/site/ORG-B/S1");
    let v1 = Term::iri("https://example.org/visit/ds1/V1");
    let v2 = Term::iri("https://example.org/visit/ds1/V2");
    assert!(graph.has_type(&a, tern::SITE));
    assert!(graph.has_type(&b, tern::SITE));
    assert!(graph.contains(&v1, &Term::iri(tern::HAS_SITE), &a));
    assert!(graph.contains(&v2, &Term::iri(tern::HAS_SITE), &b));

    let wkt = |visit: &Term| -> String {
        let node = graph.objects(visit, geo::HAS_GEOMETRY).next().unwrap();
        let literal = graph.objects(node, geo::AS_WKT).next().unwrap();
        literal.as_literal().unwrap().0.lexical().to_string()
    };
    assert!(wkt(&v1).ends_with("POINT (153 -27.5)"));
    assert!(wkt(&v2).ends_with("POINT (120 -10)"));
    assert_eq!(graph.objects(&a, schema::TEMPORAL).count(), 1);
    assert_eq!(graph.objects(&b, schema::TEMPORAL).count(), 1);
}

#[test]
fn visits_link_to_existing_site_iri() {
    let (registry, catalog) = setup();
    let existing = "https://linked.data.gov.au/dataset/bdr/site/abc";
    let sites = site_csv(&[format!("S1,TERN,{existing},Creek,,,,-27.5,153,GDA2020").as_str()]);
    let visits = format!("{VISIT_HEADER}
V1,S1,TERN,2020-03-01,,,
");

    let visit_inputs = ExtraInputs::default()
        .with_site_iris(site_iri_map(sites.as_bytes(), "https://example.org/").unwrap());
    let graph = merged(
        &registry,
        &catalog,
        &[
            (site::ID, sites.as_str(), &ExtraInputs::default()),
            (site_visit::ID, visits.as_str(), &visit_inputs),
        ],
    );

    let site = Term::iri(existing);
    let v1 = Term::iri("https://example.org/visit/ds1/V1");
    assert!(graph.has_type(&site, tern::SITE));
    assert!(graph.contains(&v1, &Term::iri(tern::HAS_SITE), &site));
    assert!(!graph.has_type(&Term::iri("https://example.org/site/TERN/S1"), tern::SITE));
    assert_eq!(
        graph
            .iter()
            .filter(|t| t.p.as_iri() == Some(tern::HAS_SITE))
            .map(|t| &t.o)
            .collect::<Vec<_>>(),
        vec![&site]
    );
}
