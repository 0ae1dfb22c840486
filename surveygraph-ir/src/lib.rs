//! In-memory RDF graph representation for survey conversion
//!
//! Mapping runs emit triples into a [`Graph`]; the chunked assembler hands
//! each finished `Graph` to the caller as one bounded sub-graph. Serializing
//! a sub-graph (Turtle, JSON-LD, ...) is left to an external graph library.
//!
//! # Key Design Principles
//!
//! 1. **Expanded IRIs only** - every IRI is stored in full; compacting is
//!    a formatter's job.
//!
//! 2. **Explicit datatypes** - literals always carry a datatype. Plain
//!    strings use `xsd:string`.
//!
//! 3. **Bag semantics** - `Graph` keeps triples in insertion order and does
//!    not deduplicate on insert. Use [`Graph::contains`] before writing when
//!    a statement must appear once, or [`Graph::canonicalize`] for set
//!    semantics.
//!
//! # Example
//!
//! ```
//! use surveygraph_ir::{Graph, Term};
//!
//! let mut graph = Graph::new();
//! graph.add_triple(
//!     Term::iri("https://example.org/site/S1"),
//!     Term::iri("https://schema.org/name"),
//!     Term::string("Creek transect"),
//! );
//! assert_eq!(graph.len(), 1);
//! ```

pub mod datatype;
mod graph;
mod term;
mod triple;

pub use datatype::Datatype;
pub use graph::Graph;
pub use term::{LiteralValue, Term};
pub use triple::Triple;
