//! RDF graph - a bag of triples
//!
//! One `Graph` holds one chunk of mapping output. Triples keep insertion
//! order and repeats are kept; writers that must state something once check
//! [`Graph::contains`] first. Membership is answered from a hash index, not
//! by scanning the chunk.

use crate::{Term, Triple};
use rustc_hash::FxHashSet;
use surveygraph_ns::rdf;

/// A collection of RDF triples
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    triples: Vec<Triple>,
    distinct: FxHashSet<Triple>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, triple: Triple) {
        self.distinct.insert(triple.clone());
        self.triples.push(triple);
    }

    /// Add a triple by components
    pub fn add_triple(&mut self, s: Term, p: Term, o: Term) {
        self.add(Triple::new(s, p, o));
    }

    /// Add `s rdf:type class`
    pub fn add_type(&mut self, s: Term, class: &str) {
        self.add_triple(s, Term::iri(rdf::TYPE), Term::iri(class));
    }

    /// Whether an identical triple is already present
    pub fn contains(&self, s: &Term, p: &Term, o: &Term) -> bool {
        self.distinct
            .contains(&Triple::new(s.clone(), p.clone(), o.clone()))
    }

    /// Whether `s rdf:type class` is present
    pub fn has_type(&self, s: &Term, class: &str) -> bool {
        self.contains(s, &Term::iri(rdf::TYPE), &Term::iri(class))
    }

    /// All objects of `(s, p, ?)`, in insertion order
    pub fn objects<'a>(&'a self, s: &'a Term, p: &'a str) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.s == s && t.p.as_iri() == Some(p))
            .map(|t| &t.o)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Sort and drop repeated triples
    pub fn canonicalize(&mut self) {
        self.triples.sort();
        self.triples.dedup();
    }

    /// Move every triple of `other` into this graph
    pub fn merge(&mut self, other: Graph) {
        self.distinct.extend(other.distinct);
        self.triples.extend(other.triples);
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = std::vec::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::slice::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

impl Extend<Triple> for Graph {
    fn extend<T: IntoIterator<Item = Triple>>(&mut self, iter: T) {
        for triple in iter {
            self.add(triple);
        }
    }
}
