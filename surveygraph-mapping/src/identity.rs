//! Entity identity derivation
//!
//! Every template that refers to a shared entity (a dataset, a site, a
//! survey, a site visit) derives the entity's IRI with the same function
//! from the same natural key, so independently mapped files agree on
//! subjects without coordinating.
//!
//! Key values are percent-encoded byte for byte outside the RFC 3986
//! unreserved set. `%` and `/` are both encoded, so two different keys can
//! never expand to the same path and [`decode_key`] recovers the original.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use surveygraph_ir::Term;

use crate::error::{MappingError, Result};

/// Everything except ALPHA / DIGIT / `-` `.` `_` `~`.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^}]+)\}").expect("valid regex"));

/// Path templates shared by every template mapper.
pub mod templates {
    pub const DATASET: &str = "dataset/{dataset_id}";
    pub const SITE: &str = "site/{site_id_source}/{site_id}";
    pub const SURVEY: &str = "survey/{dataset_id}/{survey_id}";
    pub const SITE_VISIT: &str = "visit/{dataset_id}/{site_visit_id}";
    pub const SAMPLING: &str = "sampling/{dataset_id}/{row_id}";
    pub const OCCURRENCE: &str = "occurrence/{dataset_id}/{row_id}";
}

/// Percent-encode one key value.
pub fn encode_key(value: &str) -> String {
    utf8_percent_encode(value, KEY_ENCODE_SET).to_string()
}

/// Recover a key value from its encoded form.
pub fn decode_key(encoded: &str) -> Result<String> {
    percent_decode_str(encoded)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| MappingError::Identity(format!("{encoded:?} is not a valid key: {e}")))
}

/// Expand `template` with encoded key values and resolve it against `base`.
///
/// Every placeholder must have a value; an empty value is an error, since a
/// missing key would silently merge unrelated entities. Values are used
/// exactly as given.
pub fn derive(base: &str, template: &str, keys: &BTreeMap<&str, &str>) -> Result<String> {
    let mut out = String::with_capacity(base.len() + template.len() + 32);
    out.push_str(base);
    let mut last = 0;
    for cap in PLACEHOLDER_RE.captures_iter(template) {
        let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        out.push_str(&template[last..whole.start()]);
        let value = keys
            .get(name.as_str())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                MappingError::Identity(format!(
                    "key '{}' has no value for template {template}",
                    name.as_str()
                ))
            })?;
        out.push_str(&encode_key(value));
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

/// The identity of an entity referenced across templates.
///
/// Either an ordered natural key expanded through a path template, or an
/// absolute IRI supplied on the row, which always wins.
#[derive(Debug, Clone)]
pub struct EntityIdentity {
    iri: String,
}

impl EntityIdentity {
    /// Derive from a natural key.
    pub fn from_key<'k>(
        base: &str,
        template: &str,
        keys: impl IntoIterator<Item = (&'k str, &'k str)>,
    ) -> Result<Self> {
        let keys: BTreeMap<&str, &str> = keys.into_iter().collect();
        Ok(Self {
            iri: derive(base, template, &keys)?,
        })
    }

    /// Use `absolute` when present and non-blank, else derive from the key.
    pub fn resolve<'k>(
        absolute: Option<&str>,
        base: &str,
        template: &str,
        keys: impl IntoIterator<Item = (&'k str, &'k str)>,
    ) -> Result<Self> {
        match absolute.map(str::trim).filter(|s| !s.is_empty()) {
            Some(iri) => Ok(Self {
                iri: iri.to_string(),
            }),
            None => Self::from_key(base, template, keys),
        }
    }

    pub fn iri(&self) -> &str {
        &self.iri
    }

    pub fn to_term(&self) -> Term {
        Term::iri(&self.iri)
    }
}

impl PartialEq for EntityIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.iri == other.iri
    }
}

impl Eq for EntityIdentity {}

impl std::hash::Hash for EntityIdentity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.iri.hash(state);
    }
}

impl fmt::Display for EntityIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iri)
    }
}

/// IRI of the dataset node.
pub fn dataset(base: &str, dataset_id: &str) -> Result<EntityIdentity> {
    EntityIdentity::from_key(base, templates::DATASET, [("dataset_id", dataset_id)])
}

/// IRI of a site, unless the row carries an existing site IRI.
pub fn site(
    base: &str,
    existing: Option<&str>,
    site_id: &str,
    site_id_source: &str,
) -> Result<EntityIdentity> {
    EntityIdentity::resolve(
        existing,
        base,
        templates::SITE,
        [("site_id", site_id), ("site_id_source", site_id_source)],
    )
}

pub fn survey(base: &str, dataset_id: &str, survey_id: &str) -> Result<EntityIdentity> {
    EntityIdentity::from_key(
        base,
        templates::SURVEY,
        [("dataset_id", dataset_id), ("survey_id", survey_id)],
    )
}

pub fn site_visit(base: &str, dataset_id: &str, site_visit_id: &str) -> Result<EntityIdentity> {
    EntityIdentity::from_key(
        base,
        templates::SITE_VISIT,
        [("dataset_id", dataset_id), ("site_visit_id", site_visit_id)],
    )
}

/// Sampling and occurrence IRIs are keyed by row within a dataset.
pub fn sampling(base: &str, dataset_id: &str, row_id: &str) -> Result<EntityIdentity> {
    EntityIdentity::from_key(
        base,
        templates::SAMPLING,
        [("dataset_id", dataset_id), ("row_id", row_id)],
    )
}

pub fn occurrence(base: &str, dataset_id: &str, row_id: &str) -> Result<EntityIdentity> {
    EntityIdentity::from_key(
        base,
        templates::OCCURRENCE,
        [("dataset_id", dataset_id), ("row_id", row_id)],
    )
}
