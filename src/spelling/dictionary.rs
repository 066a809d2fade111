//! Term dictionary backing spelling suggestions.

use ahash::AHashMap;

use crate::record::SearchIndexRecord;

/// Term → document-frequency dictionary built from a record's term tables.
#[derive(Debug, Clone, Default)]
pub struct SpellingDictionary {
    frequencies: AHashMap<String, u64>,
}

impl SpellingDictionary {
    /// Build a dictionary from a record's body and title terms.
    ///
    /// The frequency of a term is the number of documents it appears in,
    /// counting body and title occurrences separately.
    pub fn from_record(record: &SearchIndexRecord) -> Self {
        let mut frequencies = AHashMap::new();
        for (term, posting) in record.terms.iter().chain(record.titleterms.iter()) {
            *frequencies.entry(term.clone()).or_insert(0) += posting.len() as u64;
        }
        SpellingDictionary { frequencies }
    }

    /// Build a dictionary from precomputed term frequencies.
    pub fn from_frequencies(frequencies: AHashMap<String, u64>) -> Self {
        SpellingDictionary { frequencies }
    }

    /// Check whether a term exists in the dictionary.
    pub fn contains(&self, term: &str) -> bool {
        self.frequencies.contains_key(term)
    }

    /// Document frequency of a term, 0 if absent.
    pub fn frequency(&self, term: &str) -> u64 {
        self.frequencies.get(term).copied().unwrap_or(0)
    }

    /// Iterate over `(term, frequency)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.frequencies.iter().map(|(term, &freq)| (term.as_str(), freq))
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Check whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}
