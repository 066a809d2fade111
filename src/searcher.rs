//! Query-side consumer of a search-index record.
//!
//! [`Searcher::open`] validates a record and builds an fst term dictionary
//! over its body and title terms. Queries are analyzed with the same
//! pipeline the writer used, AND-intersected across terms, and ranked by
//! where each term matched: API object names score above title terms,
//! which score above body terms.

use std::collections::BTreeSet;
use std::sync::Arc;

use ahash::AHashMap;
use aho_corasick::{AhoCorasick, MatchKind};
use fst::automaton::Str;
use fst::{Automaton, IntoStreamer, Streamer};
use log::debug;
use regex::Regex;

use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
use crate::error::{PharosError, Result};
use crate::record::SearchIndexRecord;
use crate::spelling::{Corrector, SpellingDictionary, Suggestion};

/// Score for a query term matching an API object name, before the
/// object's priority tier is subtracted.
const SCORE_OBJECT: f32 = 15.0;
/// Score for an exact title-term match.
const SCORE_TITLE: f32 = 10.0;
/// Score for an exact body-term match.
const SCORE_BODY: f32 = 5.0;
/// Score for a prefix-expanded title-term match.
const SCORE_TITLE_PREFIX: f32 = 7.0;
/// Score for a prefix-expanded body-term match.
const SCORE_BODY_PREFIX: f32 = 2.0;

/// A search query.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Free-text query; analyzed into terms before matching.
    query: String,
    /// Maximum number of hits returned.
    limit: usize,
    /// Match against title terms only.
    titles_only: bool,
    /// Expand each query term by dictionary prefix.
    prefix: bool,
}

impl SearchRequest {
    /// Create a request with the default limit of 10.
    pub fn new(query: impl Into<String>) -> Self {
        SearchRequest {
            query: query.into(),
            limit: 10,
            titles_only: false,
            prefix: false,
        }
    }

    /// The query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The hit limit.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Builder for [`SearchRequest`].
#[derive(Debug, Default)]
pub struct SearchRequestBuilder {
    query: String,
    limit: Option<usize>,
    titles_only: bool,
    prefix: bool,
}

impl SearchRequestBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the query text.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Set the maximum number of hits.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Match against title terms only.
    pub fn titles_only(mut self, titles_only: bool) -> Self {
        self.titles_only = titles_only;
        self
    }

    /// Expand query terms by dictionary prefix.
    pub fn prefix(mut self, prefix: bool) -> Self {
        self.prefix = prefix;
        self
    }

    /// Build the request.
    pub fn build(self) -> SearchRequest {
        SearchRequest {
            query: self.query,
            limit: self.limit.unwrap_or(10),
            titles_only: self.titles_only,
            prefix: self.prefix,
        }
    }
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Document index into the record.
    pub doc: u32,
    /// Docname of the matching page.
    pub docname: String,
    /// Title of the matching page.
    pub title: String,
    /// Accumulated relevance score.
    pub score: f32,
}

/// Searches a validated [`SearchIndexRecord`].
pub struct Searcher {
    record: SearchIndexRecord,
    dictionary: fst::Set<Vec<u8>>,
    analyzer: Arc<dyn Analyzer>,
    corrector: Corrector,
    /// Lowercased object name → (document, priority) pairs.
    object_index: AHashMap<String, Vec<(u32, i8)>>,
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("docs", &self.record.doc_count())
            .field("dictionary_terms", &self.dictionary.len())
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl Searcher {
    /// Open a searcher over the given record with the default analyzer.
    ///
    /// The record is validated before any query structure is built.
    pub fn open(record: SearchIndexRecord) -> Result<Self> {
        Self::open_with_analyzer(record, Arc::new(StandardAnalyzer::new()))
    }

    /// Open a searcher with a custom query analyzer.
    ///
    /// The analyzer must match the one the record was built with, or query
    /// terms will not line up with indexed terms.
    pub fn open_with_analyzer(
        record: SearchIndexRecord,
        analyzer: Arc<dyn Analyzer>,
    ) -> Result<Self> {
        record.validate()?;

        let all_terms: BTreeSet<&str> = record
            .terms
            .keys()
            .chain(record.titleterms.keys())
            .map(String::as_str)
            .collect();
        let dictionary = fst::Set::from_iter(all_terms.iter())
            .map_err(|e| PharosError::index(format!("failed to build term dictionary: {e}")))?;

        let mut object_index: AHashMap<String, Vec<(u32, i8)>> = AHashMap::new();
        for entries in record.objects.values() {
            for (name, entry) in entries {
                if entry.priority < 0 {
                    continue;
                }
                object_index
                    .entry(name.to_lowercase())
                    .or_default()
                    .push((entry.doc, entry.priority));
            }
        }

        let corrector = Corrector::new(SpellingDictionary::from_record(&record));

        Ok(Searcher {
            record,
            dictionary,
            analyzer,
            corrector,
            object_index,
        })
    }

    /// The underlying record.
    pub fn record(&self) -> &SearchIndexRecord {
        &self.record
    }

    /// Resolve a user-typed query to ranked page hits.
    ///
    /// Each analyzed query term must match somewhere in a document for the
    /// document to be returned (AND semantics). A query that analyzes to
    /// no terms (empty, or all stopwords) returns no hits.
    pub fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        let terms = self.analyzer.analyze_terms(&request.query);
        if terms.is_empty() {
            debug!("query '{}' analyzed to no terms", request.query);
            return Ok(Vec::new());
        }

        let mut scores: AHashMap<u32, f32> = AHashMap::new();
        for (i, term) in terms.iter().enumerate() {
            let term_scores = self.term_scores(term, request)?;
            if term_scores.is_empty() {
                return Ok(Vec::new());
            }
            if i == 0 {
                scores = term_scores;
            } else {
                // AND semantics: keep only documents matched by every term.
                let intersected: AHashMap<u32, f32> = term_scores
                    .into_iter()
                    .filter_map(|(doc, score)| {
                        scores.get(&doc).map(|prev| (doc, prev + score))
                    })
                    .collect();
                scores = intersected;
                if scores.is_empty() {
                    return Ok(Vec::new());
                }
            }
        }

        Ok(self.collect_hits(scores, request.limit))
    }

    /// Score contributions of a single query term, per document.
    fn term_scores(&self, term: &str, request: &SearchRequest) -> Result<AHashMap<u32, f32>> {
        let mut scores: AHashMap<u32, f32> = AHashMap::new();

        if let Some(posting) = self.record.titleterms.get(term) {
            for doc in posting.iter() {
                *scores.entry(doc).or_default() += SCORE_TITLE;
            }
        }
        if !request.titles_only {
            if let Some(posting) = self.record.terms.get(term) {
                for doc in posting.iter() {
                    *scores.entry(doc).or_default() += SCORE_BODY;
                }
            }
            if let Some(entries) = self.object_index.get(term) {
                for &(doc, priority) in entries {
                    *scores.entry(doc).or_default() += SCORE_OBJECT - priority as f32;
                }
            }
        }

        if request.prefix {
            for expanded in self.expand_prefix(term)? {
                if expanded == term {
                    continue;
                }
                if let Some(posting) = self.record.titleterms.get(&expanded) {
                    for doc in posting.iter() {
                        *scores.entry(doc).or_default() += SCORE_TITLE_PREFIX;
                    }
                }
                if !request.titles_only {
                    if let Some(posting) = self.record.terms.get(&expanded) {
                        for doc in posting.iter() {
                            *scores.entry(doc).or_default() += SCORE_BODY_PREFIX;
                        }
                    }
                }
            }
        }

        Ok(scores)
    }

    /// All dictionary terms starting with the given prefix.
    fn expand_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let automaton = Str::new(prefix).starts_with();
        let mut stream = self.dictionary.search(automaton).into_stream();
        let mut expanded = Vec::new();
        while let Some(key) = stream.next() {
            let term = std::str::from_utf8(key)
                .map_err(|e| PharosError::index(format!("non-UTF-8 dictionary term: {e}")))?;
            expanded.push(term.to_string());
        }
        Ok(expanded)
    }

    /// Resolve a wildcard pattern (`*` and `?`) to ranked page hits.
    ///
    /// Matching terms are OR-expanded: a document matching any expanded
    /// term is returned.
    pub fn search_wildcard(&self, pattern: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let regex = compile_wildcard(&pattern.to_lowercase())?;

        let mut scores: AHashMap<u32, f32> = AHashMap::new();
        let mut stream = self.dictionary.stream();
        while let Some(key) = stream.next() {
            let term = std::str::from_utf8(key)
                .map_err(|e| PharosError::index(format!("non-UTF-8 dictionary term: {e}")))?;
            if !regex.is_match(term) {
                continue;
            }
            if let Some(posting) = self.record.titleterms.get(term) {
                for doc in posting.iter() {
                    *scores.entry(doc).or_default() += SCORE_TITLE;
                }
            }
            if let Some(posting) = self.record.terms.get(term) {
                for doc in posting.iter() {
                    *scores.entry(doc).or_default() += SCORE_BODY;
                }
            }
        }

        Ok(self.collect_hits(scores, limit))
    }

    /// Suggest corrections for a term with no matches.
    pub fn suggest(&self, term: &str, limit: usize) -> Vec<Suggestion> {
        let normalized = term.to_lowercase();
        self.corrector.suggest(&normalized, limit)
    }

    /// Byte ranges of query-term occurrences in the given text, for
    /// front-end emphasis. Matching is ASCII case-insensitive, leftmost-
    /// longest.
    pub fn highlight(&self, text: &str, terms: &[String]) -> Result<Vec<(usize, usize)>> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(terms)
            .map_err(|e| {
                PharosError::invalid_argument(format!("failed to build highlighter: {e}"))
            })?;
        Ok(automaton
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect())
    }

    fn collect_hits(&self, scores: AHashMap<u32, f32>, limit: usize) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = scores
            .into_iter()
            .filter_map(|(doc, score)| {
                let docname = self.record.docname(doc)?;
                let title = self.record.title(doc)?;
                Some(SearchHit {
                    doc,
                    docname: docname.to_string(),
                    title: title.to_string(),
                    score,
                })
            })
            .collect();
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.doc.cmp(&b.doc))
        });
        hits.truncate(limit);
        hits
    }
}

/// Compile a wildcard pattern into an anchored regex.
///
/// `*` matches zero or more characters, `?` matches exactly one, and
/// `\*` / `\?` match the literal characters.
fn compile_wildcard(pattern: &str) -> Result<Regex> {
    let mut regex_pattern = String::with_capacity(pattern.len() + 2);
    regex_pattern.push('^');

    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                match chars[i + 1] {
                    '*' => regex_pattern.push_str("\\*"),
                    '?' => regex_pattern.push_str("\\?"),
                    c => regex_pattern.push_str(&regex::escape(&c.to_string())),
                }
                i += 1;
            }
            '*' => regex_pattern.push_str(".*"),
            '?' => regex_pattern.push('.'),
            c => regex_pattern.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }

    regex_pattern.push('$');
    Regex::new(&regex_pattern)
        .map_err(|e| PharosError::invalid_argument(format!("invalid wildcard pattern: {e}")))
}
