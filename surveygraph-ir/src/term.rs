//! RDF term types: IRI, blank node, and literal

use crate::Datatype;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Literal value storage
///
/// Survey values are emitted in their lexical form with an explicit
/// datatype. `Json` holds canonical JSON text so annotation literals stay
/// hashable and compare by content.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LiteralValue {
    /// Lexical form (strings, dates, WKT and other typed lexicals)
    String(Arc<str>),
    /// Canonical JSON text
    Json(Arc<str>),
}

impl LiteralValue {
    /// The lexical form of this value
    pub fn lexical(&self) -> &str {
        match self {
            LiteralValue::String(s) | LiteralValue::Json(s) => s,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            LiteralValue::Json(_) => None,
        }
    }
}

/// An RDF term in subject, predicate, or object position
///
/// `Term::Iri` always holds an expanded IRI. Ordering puts blank nodes
/// first, then IRIs, then literals (by datatype, then value).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    /// Blank node label (without the `_:` prefix)
    BlankNode(Arc<str>),

    /// Full expanded IRI
    Iri(Arc<str>),

    /// Literal with explicit datatype
    Literal {
        datatype: Datatype,
        value: LiteralValue,
    },
}

impl Term {
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Iri(Arc::from(iri.as_ref()))
    }

    pub fn blank(label: impl AsRef<str>) -> Self {
        Term::BlankNode(Arc::from(label.as_ref()))
    }

    /// Plain `xsd:string` literal
    pub fn string(value: impl AsRef<str>) -> Self {
        Term::typed(value, Datatype::xsd_string())
    }

    /// Literal from a lexical form and datatype
    pub fn typed(lexical: impl AsRef<str>, datatype: Datatype) -> Self {
        Term::Literal {
            datatype,
            value: LiteralValue::String(Arc::from(lexical.as_ref())),
        }
    }

    /// `rdf:JSON` literal from canonical JSON text
    pub fn json(canonical: impl AsRef<str>) -> Self {
        Term::Literal {
            datatype: Datatype::rdf_json(),
            value: LiteralValue::Json(Arc::from(canonical.as_ref())),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Value and datatype of a literal
    pub fn as_literal(&self) -> Option<(&LiteralValue, &Datatype)> {
        match self {
            Term::Literal { value, datatype } => Some((value, datatype)),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::BlankNode(label) => write!(f, "_:{label}"),
            Term::Literal { value, datatype } => {
                write!(f, "{:?}", value.lexical())?;
                if datatype.is_xsd_string() {
                    Ok(())
                } else {
                    write!(f, "^^<{datatype}>")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surveygraph_ns::xsd;

    #[test]
    fn constructors() {
        let iri = Term::iri("https://example.org/site/S1");
        assert_eq!(iri.as_iri(), Some("https://example.org/site/S1"));
        assert!(Term::blank("geometry-1").is_blank());

        let lit = Term::string("Creek");
        let (value, dt) = lit.as_literal().unwrap();
        assert_eq!(value.as_str(), Some("Creek"));
        assert!(dt.is_xsd_string());

        let json = Term::json(r#"{"a":"1"}"#);
        let (value, dt) = json.as_literal().unwrap();
        assert!(dt.is_json());
        assert_eq!(value.as_str(), None);
        assert_eq!(value.lexical(), r#"{"a":"1"}"#);
    }

    #[test]
    fn ordering_blank_iri_literal() {
        assert!(Term::blank("b0") < Term::iri("https://a.org"));
        assert!(Term::iri("https://a.org") < Term::string("a"));
        assert!(Term::iri("https://a.org") < Term::iri("https://b.org"));
    }

    #[test]
    fn display_ntriples_style() {
        assert_eq!(Term::iri("https://a.org/x").to_string(), "<https://a.org/x>");
        assert_eq!(Term::blank("g1").to_string(), "_:g1");
        assert_eq!(Term::string("hi").to_string(), "\"hi\"");
        assert_eq!(
            Term::typed("2021", Datatype::from_iri(xsd::G_YEAR)).to_string(),
            "\"2021\"^^<http://www.w3.org/2001/XMLSchema#gYear>"
        );
    }
}
