//! Extra-column annotations
//!
//! Columns a caller appends after a template's fixed columns are never
//! interpreted. Their non-blank values are gathered per row into one JSON
//! object (keys sorted, compact) and attached to the row's primary subject
//! as an `rdf:JSON` literal under `rdfs:comment`.

use std::collections::BTreeMap;

use surveygraph_ir::{Graph, Term};
use surveygraph_ns::rdfs;
use surveygraph_tabular::Row;

/// Canonical JSON for the row's extra columns, or `None` if all are blank.
pub fn extra_columns_json(row: &Row) -> Option<String> {
    let values: BTreeMap<&str, &str> = row.extra_values().collect();
    if values.is_empty() {
        return None;
    }
    // A map of strings always serializes.
    serde_json::to_string(&values).ok()
}

/// Attach the row's extra columns to `subject`. Returns whether a triple
/// was written.
pub fn annotate(graph: &mut Graph, subject: &Term, row: &Row) -> bool {
    match extra_columns_json(row) {
        Some(json) => {
            graph.add_triple(subject.clone(), Term::iri(rdfs::COMMENT), Term::json(json));
            true
        }
        None => false,
    }
}
