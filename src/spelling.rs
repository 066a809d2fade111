//! Spelling correction and suggestion utilities for Pharos.
//!
//! This module powers typo tolerance for search terms by providing a
//! dictionary builder and edit-distance based "Did you mean?" suggestion
//! helpers that can be surfaced in search front-ends.

pub mod corrector;
pub mod dictionary;

pub use corrector::{Corrector, Suggestion};
pub use dictionary::SpellingDictionary;
