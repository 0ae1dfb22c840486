//! Controlled vocabularies
//!
//! A restricted vocabulary only ever answers with one of its own terms. A
//! flexible vocabulary also accepts values it has never seen: it mints a
//! concept for the value in the output graph, with an identifier derived
//! from the value alone, so every run that meets the same value produces
//! the same concept.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use surveygraph_ir::{Graph, Term as RdfTerm};
use surveygraph_ns::{dcterms, skos};
use uuid::Uuid;

use crate::error::{Result, VocabularyError};
use crate::sanitize::sanitize;

/// One concept of a vocabulary: its accepted labels, IRI and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub labels: Vec<String>,
    pub iri: String,
    pub description: String,
}

/// Which resolution rules a vocabulary follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocabularyKind {
    Restricted,
    Flexible,
}

/// Static description of a vocabulary, as stored in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyDefinition {
    pub id: String,
    pub kind: VocabularyKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub terms: Vec<Term>,
    /// IRI prefix for minted concepts (flexible only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Concept scheme minted concepts belong to (flexible only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    /// `skos:definition` text of minted concepts (flexible only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    /// `skos:broader` of minted concepts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broader: Option<String>,
    /// Label of the term used for blank values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl VocabularyDefinition {
    /// Parse a JSON definition.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Terms indexed by sanitized label.
#[derive(Debug, Clone)]
struct TermIndex {
    terms: Vec<Term>,
    by_label: FxHashMap<String, usize>,
}

impl TermIndex {
    fn build(vocabulary: &str, terms: Vec<Term>) -> Result<Self> {
        let mut by_label = FxHashMap::default();
        for (i, term) in terms.iter().enumerate() {
            if term.iri.trim().is_empty() {
                return Err(VocabularyError::Definition {
                    vocabulary: vocabulary.to_string(),
                    message: format!("term {:?} has no IRI", term.labels),
                });
            }
            for label in &term.labels {
                let key = sanitize(label);
                if let Some(prev) = by_label.insert(key, i) {
                    if prev != i {
                        return Err(VocabularyError::DuplicateLabel {
                            vocabulary: vocabulary.to_string(),
                            label: label.clone(),
                        });
                    }
                }
            }
        }
        Ok(Self { terms, by_label })
    }

    fn get(&self, value: &str) -> Option<&Term> {
        self.by_label.get(&sanitize(value)).map(|&i| &self.terms[i])
    }
}

/// A vocabulary that rejects unknown values.
#[derive(Debug, Clone)]
pub struct RestrictedVocabulary {
    id: String,
    index: TermIndex,
    default: Option<usize>,
}

impl RestrictedVocabulary {
    pub fn new(id: impl Into<String>, terms: Vec<Term>) -> Result<Self> {
        let id = id.into();
        let index = TermIndex::build(&id, terms)?;
        Ok(Self {
            id,
            index,
            default: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn terms(&self) -> &[Term] {
        &self.index.terms
    }

    /// Term matching `value`; blank values fall back to the default, if any.
    pub fn resolve(&self, value: &str) -> Result<&Term> {
        if value.trim().is_empty() {
            return self
                .default
                .map(|i| &self.index.terms[i])
                .ok_or_else(|| VocabularyError::Blank {
                    vocabulary: self.id.clone(),
                });
        }
        self.index
            .get(value)
            .ok_or_else(|| VocabularyError::Unrecognised {
                vocabulary: self.id.clone(),
                value: value.to_string(),
            })
    }

    /// IRI of the term matching `value`.
    pub fn resolve_iri(&self, value: &str) -> Result<RdfTerm> {
        self.resolve(value).map(|t| RdfTerm::iri(&t.iri))
    }
}

/// A vocabulary that mints concepts for unknown values.
#[derive(Debug, Clone)]
pub struct FlexibleVocabulary {
    id: String,
    index: TermIndex,
    namespace: String,
    namespace_uuid: Uuid,
    scheme: String,
    definition: String,
    broader: Option<String>,
    default: Option<usize>,
}

impl FlexibleVocabulary {
    pub fn new(
        id: impl Into<String>,
        terms: Vec<Term>,
        namespace: impl Into<String>,
        scheme: impl Into<String>,
        definition: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        let namespace = namespace.into();
        let index = TermIndex::build(&id, terms)?;
        Ok(Self {
            namespace_uuid: Uuid::new_v5(&Uuid::NAMESPACE_URL, namespace.as_bytes()),
            id,
            index,
            namespace,
            scheme: scheme.into(),
            definition: definition.into(),
            broader: None,
            default: None,
        })
    }

    /// Set the `skos:broader` concept of minted terms.
    pub fn with_broader(mut self, broader: impl Into<String>) -> Self {
        self.broader = Some(broader.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn terms(&self) -> &[Term] {
        &self.index.terms
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Deterministic IRI for a value that has no term.
    pub fn mint_iri(&self, value: &str) -> String {
        let id = Uuid::new_v5(&self.namespace_uuid, value.trim().as_bytes());
        format!("{}{}", self.namespace, id)
    }

    /// Resolve `value` to a concept IRI, minting into `graph` on a miss.
    ///
    /// A minted concept is declared at most once per graph. `source`, when
    /// given, is linked from the minted concept with `dcterms:source`, also
    /// when the concept was declared earlier from another source.
    pub fn resolve(
        &self,
        graph: &mut Graph,
        value: &str,
        source: Option<&RdfTerm>,
    ) -> Result<RdfTerm> {
        if value.trim().is_empty() {
            return self
                .default
                .map(|i| RdfTerm::iri(&self.index.terms[i].iri))
                .ok_or_else(|| VocabularyError::Blank {
                    vocabulary: self.id.clone(),
                });
        }
        if let Some(term) = self.index.get(value) {
            return Ok(RdfTerm::iri(&term.iri));
        }

        let concept = RdfTerm::iri(self.mint_iri(value));
        if !graph.has_type(&concept, skos::CONCEPT) {
            tracing::debug!(vocabulary = %self.id, value, iri = ?concept.as_iri(), "Minting concept");
            self.write_concept(graph, &concept, value.trim(), source);
        } else if let Some(source) = source {
            let predicate = RdfTerm::iri(dcterms::SOURCE);
            if !graph.contains(&concept, &predicate, source) {
                graph.add_triple(concept.clone(), predicate, source.clone());
            }
        }
        Ok(concept)
    }

    fn write_concept(&self, graph: &mut Graph, concept: &RdfTerm, label: &str, source: Option<&RdfTerm>) {
        graph.add_type(concept.clone(), skos::CONCEPT);
        graph.add_triple(
            concept.clone(),
            RdfTerm::iri(skos::DEFINITION),
            RdfTerm::string(&self.definition),
        );
        graph.add_triple(
            concept.clone(),
            RdfTerm::iri(skos::IN_SCHEME),
            RdfTerm::iri(&self.scheme),
        );
        graph.add_triple(
            concept.clone(),
            RdfTerm::iri(skos::PREF_LABEL),
            RdfTerm::string(label),
        );
        if let Some(broader) = &self.broader {
            graph.add_triple(
                concept.clone(),
                RdfTerm::iri(skos::BROADER),
                RdfTerm::iri(broader),
            );
        }
        if let Some(source) = source {
            graph.add_triple(concept.clone(), RdfTerm::iri(dcterms::SOURCE), source.clone());
        }
    }
}

/// Either kind of vocabulary, as held by a catalog.
#[derive(Debug, Clone)]
pub enum Vocabulary {
    Restricted(RestrictedVocabulary),
    Flexible(FlexibleVocabulary),
}

impl Vocabulary {
    /// Build a vocabulary from its static definition.
    pub fn from_definition(def: VocabularyDefinition) -> Result<Self> {
        let definition_error = |message: &str| VocabularyError::Definition {
            vocabulary: def.id.clone(),
            message: message.to_string(),
        };
        let default = match &def.default {
            None => None,
            Some(label) => Some(
                def.terms
                    .iter()
                    .position(|t| t.labels.iter().any(|l| sanitize(l) == sanitize(label)))
                    .ok_or_else(|| definition_error("default does not name a term"))?,
            ),
        };

        match def.kind {
            VocabularyKind::Restricted => {
                let mut v = RestrictedVocabulary::new(def.id.clone(), def.terms.clone())?;
                v.default = default;
                Ok(Vocabulary::Restricted(v))
            }
            VocabularyKind::Flexible => {
                let namespace = def
                    .namespace
                    .clone()
                    .ok_or_else(|| definition_error("flexible vocabulary needs a namespace"))?;
                let scheme = def
                    .scheme
                    .clone()
                    .ok_or_else(|| definition_error("flexible vocabulary needs a scheme"))?;
                let text = def
                    .definition
                    .clone()
                    .unwrap_or_else(|| format!("A type of {}", def.name));
                let mut v = FlexibleVocabulary::new(
                    def.id.clone(),
                    def.terms.clone(),
                    namespace,
                    scheme,
                    text,
                )?;
                v.broader = def.broader.clone();
                v.default = default;
                Ok(Vocabulary::Flexible(v))
            }
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Vocabulary::Restricted(v) => v.id(),
            Vocabulary::Flexible(v) => v.id(),
        }
    }

    pub fn kind(&self) -> VocabularyKind {
        match self {
            Vocabulary::Restricted(_) => VocabularyKind::Restricted,
            Vocabulary::Flexible(_) => VocabularyKind::Flexible,
        }
    }

    pub fn terms(&self) -> &[Term] {
        match self {
            Vocabulary::Restricted(v) => v.terms(),
            Vocabulary::Flexible(v) => v.terms(),
        }
    }

    /// Resolve `value` to an IRI. Only flexible vocabularies touch `graph`.
    pub fn resolve(
        &self,
        graph: &mut Graph,
        value: &str,
        source: Option<&RdfTerm>,
    ) -> Result<RdfTerm> {
        match self {
            Vocabulary::Restricted(v) => v.resolve_iri(value),
            Vocabulary::Flexible(v) => v.resolve(graph, value, source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn term(labels: &[&str], iri: &str) -> Term {
        Term {
            labels: labels.iter().map(|s| s.to_string()).collect(),
            iri: iri.to_string(),
            description: String::new(),
        }
    }

    fn preparations() -> FlexibleVocabulary {
        FlexibleVocabulary::new(
            "PREPARATIONS",
            vec![
                term(&["alcohol"], "https://example.org/prep/alcohol"),
                term(&["dried and pressed"], "https://example.org/prep/dried"),
            ],
            "https://example.org/minted/prep/",
            "https://example.org/scheme/prep",
            "A type of preparations",
        )
        .unwrap()
        .with_broader("https://example.org/prep")
    }

    #[test]
    fn restricted_matches_sanitized_labels() {
        let datum = RestrictedVocabulary::new(
            "DATUM",
            vec![term(&["WGS84", "WGS 84"], "http://www.opengis.net/def/crs/EPSG/0/4326")],
        )
        .unwrap();

        assert_eq!(datum.resolve("wgs-84").unwrap().iri, "http://www.opengis.net/def/crs/EPSG/0/4326");
        assert_eq!(
            datum.resolve("AGD66"),
            Err(VocabularyError::Unrecognised {
                vocabulary: "DATUM".into(),
                value: "AGD66".into()
            })
        );
        assert!(matches!(datum.resolve(" "), Err(VocabularyError::Blank { .. })));
    }

    #[test]
    fn duplicate_labels_across_terms_are_rejected() {
        let err = RestrictedVocabulary::new(
            "X",
            vec![term(&["Dried And Pressed"], "a:1"), term(&["DRIED-AND-PRESSED"], "a:2")],
        )
        .unwrap_err();
        assert!(matches!(err, VocabularyError::DuplicateLabel { .. }));
    }

    #[test]
    fn terms_without_iri_are_rejected() {
        let err = RestrictedVocabulary::new("DATUM", vec![term(&["WGS84"], " ")]).unwrap_err();
        assert!(matches!(err, VocabularyError::Definition { .. }));
    }

    #[test]
    fn known_values_do_not_touch_the_graph() {
        let vocab = preparations();
        let mut graph = Graph::new();
        let iri = vocab.resolve(&mut graph, "Dried-and-Pressed", None).unwrap();
        assert_eq!(iri, RdfTerm::iri("https://example.org/prep/dried"));
        assert!(graph.is_empty());
    }

    #[test]
    fn minting_is_deterministic_and_declared_once() {
        let a = preparations();
        let b = preparations();
        let mut g1 = Graph::new();
        let mut g2 = Graph::new();

        let first = a.resolve(&mut g1, "glycerine", None).unwrap();
        let again = a.resolve(&mut g1, "glycerine", None).unwrap();
        let other = b.resolve(&mut g2, "glycerine", None).unwrap();

        assert_eq!(first, again);
        assert_eq!(first, other);
        assert!(first.as_iri().unwrap().starts_with("https://example.org/minted/prep/"));
        // type, definition, scheme, label, broader
        assert_eq!(g1.len(), 5);
        assert_eq!(g2.len(), 5);
        assert!(g1.contains(
            &first,
            &RdfTerm::iri(skos::PREF_LABEL),
            &RdfTerm::string("glycerine")
        ));

        let different = a.resolve(&mut g1, "resin", None).unwrap();
        assert_ne!(different, first);
    }

    #[test]
    fn minted_concept_links_its_source() {
        let vocab = preparations();
        let mut graph = Graph::new();
        let source = RdfTerm::iri("https://example.org/dataset/1");
        let concept = vocab.resolve(&mut graph, "wax", Some(&source)).unwrap();
        assert!(graph.contains(&concept, &RdfTerm::iri(dcterms::SOURCE), &source));
    }

    #[test]
    fn reminted_concept_gains_each_source_once() {
        let vocab = preparations();
        let mut graph = Graph::new();
        let first = RdfTerm::iri("https://example.org/dataset/1");
        let second = RdfTerm::iri("https://example.org/dataset/2");

        let concept = vocab.resolve(&mut graph, "wax", Some(&first)).unwrap();
        let before = graph.len();
        vocab.resolve(&mut graph, "wax", Some(&second)).unwrap();
        vocab.resolve(&mut graph, "wax", Some(&second)).unwrap();
        vocab.resolve(&mut graph, "wax", None).unwrap();

        let sources: Vec<_> = graph.objects(&concept, dcterms::SOURCE).cloned().collect();
        assert_eq!(sources, vec![first, second]);
        assert_eq!(graph.len(), before + 1);
    }

    #[test]
    fn definition_defaults_and_validation() {
        let json = r#"{
            "id": "SITE_TYPE",
            "kind": "flexible",
            "name": "Site type",
            "namespace": "https://example.org/minted/site-type/",
            "scheme": "https://example.org/scheme/site-type",
            "default": "Site",
            "terms": [{"labels": ["site"], "iri": "https://example.org/site", "description": ""}]
        }"#;
        let vocab = Vocabulary::from_definition(VocabularyDefinition::from_json(json).unwrap()).unwrap();
        let mut graph = Graph::new();
        assert_eq!(
            vocab.resolve(&mut graph, "", None).unwrap(),
            RdfTerm::iri("https://example.org/site")
        );

        let mut bad = VocabularyDefinition::from_json(json).unwrap();
        bad.namespace = None;
        assert!(matches!(
            Vocabulary::from_definition(bad),
            Err(VocabularyError::Definition { .. })
        ));
    }
}
