//! Token transformation and filtering.

use ahash::AHashSet;
use lazy_static::lazy_static;
use unicode_normalization::UnicodeNormalization;

use crate::analysis::token::Token;

lazy_static! {
    /// Default English stopword set.
    static ref ENGLISH_STOPWORDS: AHashSet<&'static str> = [
        "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if",
        "in", "into", "is", "it", "near", "no", "not", "of", "on", "or",
        "such", "that", "the", "their", "then", "there", "these", "they",
        "this", "to", "was", "will", "with",
    ]
    .iter()
    .copied()
    .collect();
}

/// Trait for transforming or dropping tokens in a token stream.
pub trait TokenFilter: Send + Sync + std::fmt::Debug {
    /// Apply the filter to a token stream.
    fn apply(&self, tokens: Vec<Token>) -> Vec<Token>;

    /// Name of this filter.
    fn name(&self) -> &'static str;
}

/// Filter that NFKC-normalizes and lowercases token text.
#[derive(Debug, Clone, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl TokenFilter for LowercaseFilter {
    fn apply(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .map(|mut token| {
                token.text = token.text.nfkc().collect::<String>().to_lowercase();
                token
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

/// Filter that drops stopwords.
///
/// Matching is exact, so this filter is normally placed after
/// [`LowercaseFilter`] in the pipeline.
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    stopwords: AHashSet<String>,
}

impl StopwordFilter {
    /// Create a filter with the default English stopword set.
    pub fn new() -> Self {
        StopwordFilter {
            stopwords: ENGLISH_STOPWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create a filter with a custom stopword set.
    pub fn with_stopwords<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopwordFilter {
            stopwords: stopwords.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenFilter for StopwordFilter {
    fn apply(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .filter(|token| !self.stopwords.contains(token.text.as_str()))
            .collect()
    }

    fn name(&self) -> &'static str {
        "stopword"
    }
}

/// Filter that drops tokens outside a byte-length band.
#[derive(Debug, Clone)]
pub struct LengthFilter {
    min: usize,
    max: usize,
}

impl LengthFilter {
    /// Create a filter with the given inclusive length bounds.
    pub fn new(min: usize, max: usize) -> Self {
        LengthFilter { min, max }
    }
}

impl Default for LengthFilter {
    fn default() -> Self {
        LengthFilter { min: 2, max: 64 }
    }
}

impl TokenFilter for LengthFilter {
    fn apply(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .filter(|token| token.len() >= self.min && token.len() <= self.max)
            .collect()
    }

    fn name(&self) -> &'static str {
        "length"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(texts: &[&str]) -> Vec<Token> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Token::new(*t, i, 0, t.len()))
            .collect()
    }

    #[test]
    fn test_lowercase_filter() {
        let filter = LowercaseFilter::new();
        let out = filter.apply(tokens(&["CTD", "Hydrophone"]));

        let texts: Vec<&str> = out.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["ctd", "hydrophone"]);
    }

    #[test]
    fn test_stopword_filter_default_set() {
        let filter = StopwordFilter::new();
        let out = filter.apply(tokens(&["the", "hydrophone", "and", "ctd"]));

        let texts: Vec<&str> = out.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["hydrophone", "ctd"]);
    }

    #[test]
    fn test_stopword_filter_custom_set() {
        let filter = StopwordFilter::with_stopwords(["data"]);
        let out = filter.apply(tokens(&["data", "the"]));

        let texts: Vec<&str> = out.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["the"]);
    }

    #[test]
    fn test_length_filter() {
        let filter = LengthFilter::default();
        let out = filter.apply(tokens(&["a", "ok", "hydrophone"]));

        let texts: Vec<&str> = out.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["ok", "hydrophone"]);
    }
}
