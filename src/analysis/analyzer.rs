//! Pre-built and custom text analyzers.

use crate::analysis::token::Token;
use crate::analysis::token_filter::{LengthFilter, LowercaseFilter, StopwordFilter, TokenFilter};
use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};

/// Trait combining a tokenizer and token filters into an analysis pipeline.
pub trait Analyzer: Send + Sync + std::fmt::Debug {
    /// Analyze the given text into a token stream.
    fn analyze(&self, text: &str) -> Vec<Token>;

    /// Name of this analyzer.
    fn name(&self) -> &'static str;

    /// Analyze the given text and return just the term strings.
    fn analyze_terms(&self, text: &str) -> Vec<String> {
        self.analyze(text).into_iter().map(|t| t.text).collect()
    }
}

/// The default analyzer: standard tokenizer, lowercase, stopword and
/// length filters.
#[derive(Debug)]
pub struct StandardAnalyzer {
    tokenizer: StandardTokenizer,
    filters: Vec<Box<dyn TokenFilter>>,
}

impl StandardAnalyzer {
    /// Create a standard analyzer with the default filter chain.
    pub fn new() -> Self {
        StandardAnalyzer {
            tokenizer: StandardTokenizer::new(),
            filters: vec![
                Box::new(LowercaseFilter::new()),
                Box::new(StopwordFilter::new()),
                Box::new(LengthFilter::default()),
            ],
        }
    }

    /// Create a standard analyzer with a custom filter chain.
    ///
    /// The tokenizer stays the standard word-boundary tokenizer; only the
    /// filters are replaced.
    pub fn with_filters(filters: Vec<Box<dyn TokenFilter>>) -> Self {
        StandardAnalyzer {
            tokenizer: StandardTokenizer::new(),
            filters,
        }
    }
}

impl Default for StandardAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);
        for filter in &self.filters {
            tokens = filter.apply(tokens);
        }
        tokens
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}
