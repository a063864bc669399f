//! The external word-list/frequency provider contract (spec §6).

/// Pure queries against a general-English word list and frequency table.
/// Implementations are supplied by the embedding binary; `corrector-core`
/// never reaches out to the network or the filesystem on its own behalf.
pub trait WordSource: Send + Sync {
    /// Membership test against the general-English word list.
    fn contains(&self, word: &str) -> bool;

    /// Unigram frequency (probability) of `word`. Unknown words return 0.0.
    fn frequency(&self, word: &str) -> f64;

    /// The `n` most frequent words, most frequent first.
    fn top_n(&self, n: usize) -> Vec<String>;

    /// The full general-English word list backing [`contains`](Self::contains),
    /// materialized so the solver can build a [`crate::index::BoundaryIndex`]
    /// over it. Implementations backed by very large corpora may bound this
    /// to a sensible working set (e.g. by length) rather than enumerate
    /// everything.
    fn dictionary_words(&self) -> Vec<String>;
}

/// An in-memory [`WordSource`] useful for tests and for small, fully
/// user-supplied corpora.
pub struct MemoryWordSource {
    frequencies: std::collections::HashMap<String, f64>,
    ranked: Vec<String>,
}

impl MemoryWordSource {
    pub fn new(mut words: Vec<(String, f64)>) -> Self {
        words.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let ranked = words.iter().map(|(w, _)| w.clone()).collect();
        let frequencies = words.into_iter().collect();
        MemoryWordSource { frequencies, ranked }
    }
}

impl WordSource for MemoryWordSource {
    fn contains(&self, word: &str) -> bool {
        self.frequencies.contains_key(word)
    }

    fn frequency(&self, word: &str) -> f64 {
        self.frequencies.get(word).copied().unwrap_or(0.0)
    }

    fn top_n(&self, n: usize) -> Vec<String> {
        self.ranked.iter().take(n).cloned().collect()
    }

    fn dictionary_words(&self) -> Vec<String> {
        self.ranked.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_by_frequency_descending() {
        let src = MemoryWordSource::new(vec![
            ("the".to_string(), 0.05),
            ("zzz".to_string(), 0.001),
            ("and".to_string(), 0.03),
        ]);
        assert_eq!(src.top_n(2), vec!["the".to_string(), "and".to_string()]);
        assert!(src.contains("the"));
        assert!(!src.contains("missing"));
        assert_eq!(src.frequency("missing"), 0.0);
    }
}
