//! Pre-computed prefix/suffix/substring membership over a fixed word set.
//!
//! Built once per word set (validation set, source set); read-only after
//! that. Exact matches (`w == t`) never count as a hit — a typo equal to a
//! real word is handled separately by the collision resolver, not here.

use std::collections::{HashMap, HashSet};

/// Words longer than this contribute only their prefixes/suffixes to the
/// substring set via a linear scan fallback at query time, rather than
/// pre-materializing every substring up front. Keeps index construction
/// close to linear for the rare very long word.
const SUBSTRING_PRECOMPUTE_MAX_LEN: usize = 30;

pub struct BoundaryIndex {
    /// prefix -> the set of indexed words that own it as a true prefix.
    /// Owner sets are tiny in practice (a handful of words at most), so a
    /// membership check here stays amortized O(1): one hash lookup plus a
    /// scan bounded by the owner count, not the whole word set.
    prefixes: HashMap<String, Vec<String>>,
    suffixes: HashMap<String, Vec<String>>,
    substrings: HashSet<String>,
    long_words: Vec<String>,
}

impl BoundaryIndex {
    /// Build an index over an owned word set.
    pub fn build(words: HashSet<String>) -> Self {
        let mut prefixes: HashMap<String, Vec<String>> = HashMap::new();
        let mut suffixes: HashMap<String, Vec<String>> = HashMap::new();
        let mut substrings = HashSet::new();
        let mut long_words = Vec::new();

        for word in &words {
            let chars: Vec<char> = word.chars().collect();
            let len = chars.len();

            for i in 1..=len {
                let frag: String = chars[..i].iter().collect();
                prefixes.entry(frag).or_default().push(word.clone());
            }
            for i in 0..len {
                let frag: String = chars[i..].iter().collect();
                suffixes.entry(frag).or_default().push(word.clone());
            }

            if len <= SUBSTRING_PRECOMPUTE_MAX_LEN {
                for i in 0..len {
                    for j in (i + 1)..=len {
                        let sub: String = chars[i..j].iter().collect();
                        if sub != *word {
                            substrings.insert(sub);
                        }
                    }
                }
            } else {
                long_words.push(word.clone());
            }
        }

        BoundaryIndex {
            prefixes,
            suffixes,
            substrings,
            long_words,
        }
    }

    /// True iff `t` is a substring of some `w` in the index with `w != t`.
    pub fn is_substring_of_any(&self, t: &str) -> bool {
        if self.substrings.contains(t) {
            return true;
        }
        // Escape hatch for words too long to have been fully precomputed,
        // or for a typo never observed while indexing.
        self.long_words.iter().any(|w| w != t && w.contains(t))
    }

    /// True iff some `w` in the index starts with `t` and `w != t`.
    pub fn is_prefix_of_any(&self, t: &str) -> bool {
        self.prefixes
            .get(t)
            .is_some_and(|owners| owners.iter().any(|w| w != t))
    }

    /// True iff some `w` in the index ends with `t` and `w != t`.
    pub fn is_suffix_of_any(&self, t: &str) -> bool {
        self.suffixes
            .get(t)
            .is_some_and(|owners| owners.iter().any(|w| w != t))
    }
}
