//! Edit-distance based term correction.

use crate::spelling::dictionary::SpellingDictionary;

/// A correction candidate for a misspelled term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// The suggested term.
    pub term: String,
    /// Edit distance from the input.
    pub distance: usize,
    /// Document frequency of the suggested term.
    pub frequency: u64,
}

/// Suggests corrections by scanning a dictionary with bounded Levenshtein
/// distance.
#[derive(Debug, Clone)]
pub struct Corrector {
    dictionary: SpellingDictionary,
    max_distance: usize,
}

impl Corrector {
    /// Create a corrector with the default maximum edit distance of 2.
    pub fn new(dictionary: SpellingDictionary) -> Self {
        Corrector {
            dictionary,
            max_distance: 2,
        }
    }

    /// Set the maximum edit distance considered.
    pub fn with_max_distance(mut self, max_distance: usize) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// The dictionary backing this corrector.
    pub fn dictionary(&self) -> &SpellingDictionary {
        &self.dictionary
    }

    /// Suggest up to `limit` corrections for the input term.
    ///
    /// An exact dictionary hit yields no suggestions. Candidates are
    /// ordered by edit distance, then by descending document frequency,
    /// then alphabetically.
    pub fn suggest(&self, input: &str, limit: usize) -> Vec<Suggestion> {
        if limit == 0 || self.dictionary.contains(input) {
            return Vec::new();
        }

        let input_chars: Vec<char> = input.chars().collect();
        let mut candidates = Vec::new();
        for (term, frequency) in self.dictionary.iter() {
            let term_len = term.chars().count();
            if term_len.abs_diff(input_chars.len()) > self.max_distance {
                continue;
            }
            if let Some(distance) = bounded_levenshtein(&input_chars, term, self.max_distance) {
                candidates.push(Suggestion {
                    term: term.to_string(),
                    distance,
                    frequency,
                });
            }
        }

        candidates.sort_by(|a, b| {
            a.distance
                .cmp(&b.distance)
                .then(b.frequency.cmp(&a.frequency))
                .then(a.term.cmp(&b.term))
        });
        candidates.truncate(limit);
        candidates
    }
}

/// Levenshtein distance between `a` and `b`, or `None` if it exceeds `max`.
fn bounded_levenshtein(a: &[char], b: &str, max: usize) -> Option<usize> {
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return (b.len() <= max).then_some(b.len());
    }
    if b.is_empty() {
        return (a.len() <= max).then_some(a.len());
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        let mut row_min = current[0];
        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
            row_min = row_min.min(current[j + 1]);
        }
        if row_min > max {
            return None;
        }
        std::mem::swap(&mut previous, &mut current);
    }

    (previous[b.len()] <= max).then_some(previous[b.len()])
}
