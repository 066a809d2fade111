//! The search-index record: the single associative structure a
//! documentation build emits and a search front-end consumes.
//!
//! A [`SearchIndexRecord`] is write-once: the index writer produces it,
//! after which it is only ever serialized, parsed, and queried. All maps
//! inside the record are `BTreeMap`s so that serialization is
//! deterministic and a serialize → parse round trip yields an identical
//! record.

mod validate;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Version tag the current writer stamps into [`SearchIndexRecord::envversion`]
/// under the [`ENV_VERSION_KEY`] key.
///
/// Bump this when the record format or the analysis pipeline changes in a
/// way that requires consumers to rebuild their indexes.
pub const ENV_VERSION: u64 = 1;

/// Key under which the format version tag is stored in `envversion`.
pub const ENV_VERSION_KEY: &str = "pharos";

/// The set of document indices associated with a term.
///
/// A term that appears in a single document is stored as a bare index;
/// a term that appears in several documents is stored as a sorted,
/// deduplicated list. This mirrors the on-disk shape of the record, where
/// singleton postings collapse to a scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Posting {
    /// The term appears in exactly one document.
    One(u32),
    /// The term appears in two or more documents.
    Many(Vec<u32>),
}

impl Posting {
    /// Build a posting from an arbitrary collection of document indices.
    ///
    /// The indices are sorted and deduplicated; a singleton normalizes to
    /// [`Posting::One`]. Returns `None` for an empty collection.
    pub fn from_docs<I: IntoIterator<Item = u32>>(docs: I) -> Option<Posting> {
        let mut docs: Vec<u32> = docs.into_iter().collect();
        docs.sort_unstable();
        docs.dedup();
        match docs.len() {
            0 => None,
            1 => Some(Posting::One(docs[0])),
            _ => Some(Posting::Many(docs)),
        }
    }

    /// The document indices as a slice.
    pub fn as_slice(&self) -> &[u32] {
        match self {
            Posting::One(doc) => std::slice::from_ref(doc),
            Posting::Many(docs) => docs,
        }
    }

    /// Iterate over the document indices.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.as_slice().iter().copied()
    }

    /// Check whether the posting contains the given document index.
    pub fn contains(&self, doc: u32) -> bool {
        self.as_slice().binary_search(&doc).is_ok()
    }

    /// Number of documents in the posting.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// A posting is never empty, but the accessor pairs with [`Posting::len`].
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// One entry in the API object inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    /// Index into `docnames` of the page documenting the object.
    pub doc: u32,
    /// Index into `objtypes`.
    pub objtype: u32,
    /// Ranking tier: lower is more important; negative hides the object
    /// from search results.
    pub priority: i8,
    /// Page fragment identifier for deep-linking.
    pub anchor: String,
}

/// Descriptive name for an object type, positionally aligned with
/// [`SearchIndexRecord::objtypes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectTypeName {
    /// Domain the type belongs to (e.g. `"api"`).
    pub domain: String,
    /// Type name within the domain (e.g. `"function"`).
    pub objtype: String,
    /// Human-readable label shown in search results.
    pub display: String,
}

/// A static search index over a set of documentation pages.
///
/// Field order matches the canonical key order of the serialized record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchIndexRecord {
    /// Ordered document identifiers, one per page.
    pub docnames: Vec<String>,

    /// Subsystem name → format version tag. Consumers compare these
    /// against their expected tags to decide whether to rebuild.
    pub envversion: BTreeMap<String, u64>,

    /// Source file per page, positionally aligned with `docnames`.
    pub filenames: Vec<String>,

    /// API object inventory: prefix → object name → entry.
    pub objects: BTreeMap<String, BTreeMap<String, ObjectEntry>>,

    /// Object type names, positionally aligned with `objtypes`.
    pub objnames: Vec<ObjectTypeName>,

    /// `"domain:type"` tags referenced by index from object entries.
    pub objtypes: Vec<String>,

    /// Body term → posting.
    pub terms: BTreeMap<String, Posting>,

    /// Page titles, positionally aligned with `docnames`.
    pub titles: Vec<String>,

    /// Title term → posting.
    pub titleterms: BTreeMap<String, Posting>,
}

impl SearchIndexRecord {
    /// Number of documents in the index.
    pub fn doc_count(&self) -> usize {
        self.docnames.len()
    }

    /// Docname for the given document index.
    pub fn docname(&self, doc: u32) -> Option<&str> {
        self.docnames.get(doc as usize).map(String::as_str)
    }

    /// Title for the given document index.
    pub fn title(&self, doc: u32) -> Option<&str> {
        self.titles.get(doc as usize).map(String::as_str)
    }

    /// Source filename for the given document index.
    pub fn filename(&self, doc: u32) -> Option<&str> {
        self.filenames.get(doc as usize).map(String::as_str)
    }

    /// Check whether this record's version tags match the expected tags.
    ///
    /// A mismatch (missing key, extra key, or different tag value) means
    /// the consumer should rebuild the index.
    pub fn is_compatible(&self, expected: &BTreeMap<String, u64>) -> bool {
        self.envversion == *expected
    }

    /// Serialize the record to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a record from a JSON string.
    ///
    /// Unknown keys are rejected so that malformed records fail at the
    /// parse boundary. Structural invariants are not checked here; call
    /// [`SearchIndexRecord::validate`] for that.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
