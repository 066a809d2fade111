//! Text tokenization strategies.

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::Token;

/// Trait for breaking text into tokens.
pub trait Tokenizer: Send + Sync + std::fmt::Debug {
    /// Tokenize the given text.
    fn tokenize(&self, text: &str) -> Vec<Token>;

    /// Name of this tokenizer.
    fn name(&self) -> &'static str;
}

/// Tokenizer that splits text on Unicode word boundaries.
///
/// Tokens that contain no alphanumeric character (pure punctuation
/// sequences) are dropped.
#[derive(Debug, Clone, Default)]
pub struct StandardTokenizer;

impl StandardTokenizer {
    /// Create a new standard tokenizer.
    pub fn new() -> Self {
        StandardTokenizer
    }
}

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        text.unicode_word_indices()
            .filter(|(_, word)| word.chars().any(|c| c.is_alphanumeric()))
            .enumerate()
            .map(|(position, (offset, word))| {
                Token::new(word, position, offset, offset + word.len())
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}
