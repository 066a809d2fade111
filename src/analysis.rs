//! Text analysis module for Pharos.
//!
//! Both the index writer and the searcher push text through the same
//! analysis pipeline so that query terms line up with indexed terms:
//!
//! ```text
//! Text → Tokenizer → Token Stream → Token Filters → Analyzed Tokens
//! ```
//!
//! # Examples
//!
//! ```
//! use pharos::analysis::analyzer::{Analyzer, StandardAnalyzer};
//!
//! let analyzer = StandardAnalyzer::new();
//! let terms: Vec<String> = analyzer
//!     .analyze("Hydrophone Data Access")
//!     .into_iter()
//!     .map(|t| t.text)
//!     .collect();
//! assert_eq!(terms, vec!["hydrophone", "data", "access"]);
//! ```

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

// Re-exports
pub use analyzer::{Analyzer, StandardAnalyzer};
pub use token::Token;
pub use token_filter::{LengthFilter, LowercaseFilter, StopwordFilter, TokenFilter};
pub use tokenizer::{StandardTokenizer, Tokenizer};
