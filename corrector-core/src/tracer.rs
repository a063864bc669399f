//! Structured debug tracing, threaded explicitly instead of relying on a
//! module-level logger singleton (spec §9 "Debug tracing without runtime
//! reflection").

use crate::boundary::Boundary;
use crate::exclusions::wildcard_match;

#[derive(Clone, Debug)]
pub struct TraceRecord {
    pub stage: &'static str,
    pub event: String,
    pub typo: String,
    pub word: String,
    pub boundary: Option<Boundary>,
    pub reason: String,
}

/// Selects which words/typo-patterns to trace, using the same
/// wildcard/boundary grammar as exclusion rules.
#[derive(Clone, Default, Debug)]
pub struct DebugSelector {
    words: Vec<String>,
    typo_patterns: Vec<String>,
}

impl DebugSelector {
    pub fn new(words: impl IntoIterator<Item = String>, typo_patterns: impl IntoIterator<Item = String>) -> Self {
        DebugSelector {
            words: words.into_iter().collect(),
            typo_patterns: typo_patterns.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.typo_patterns.is_empty()
    }

    /// True iff the given record's word is an exact match in the word
    /// selector, or its typo matches a wildcard typo-pattern selector.
    pub fn matches(&self, typo: &str, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
            || self.typo_patterns.iter().any(|p| wildcard_match(p, typo))
    }
}

/// Owned by the pipeline runner; stages append records through a `&mut
/// Tracer` (or, from parallel workers, return records merged afterwards).
#[derive(Default)]
pub struct Tracer {
    selector: DebugSelector,
    enabled: bool,
    records: Vec<TraceRecord>,
}

impl Tracer {
    pub fn new(enabled: bool, selector: DebugSelector) -> Self {
        Tracer {
            selector,
            enabled,
            records: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn selector(&self) -> &DebugSelector {
        &self.selector
    }

    /// Record an event if tracing is enabled and the selector matches (or
    /// the selector is empty, meaning "trace everything").
    pub fn record(
        &mut self,
        stage: &'static str,
        event: impl Into<String>,
        typo: &str,
        word: &str,
        boundary: Option<Boundary>,
        reason: impl Into<String>,
    ) {
        if !self.enabled {
            return;
        }
        if !self.selector.is_empty() && !self.selector.matches(typo, word) {
            return;
        }
        self.records.push(TraceRecord {
            stage,
            event: event.into(),
            typo: typo.to_string(),
            word: word.to_string(),
            boundary,
            reason: reason.into(),
        });
    }

    /// Merge records produced out-of-band by parallel workers, in the
    /// worker's source-word order (deterministic, per spec §5).
    pub fn merge(&mut self, mut records: Vec<TraceRecord>) {
        if !self.enabled {
            return;
        }
        self.records.append(&mut records);
    }

    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_matches_exact_word_or_typo_pattern() {
        let sel = DebugSelector::new(vec!["the".to_string()], vec!["te*".to_string()]);
        assert!(sel.matches("anything", "the"));
        assert!(sel.matches("teh", "other"));
        assert!(!sel.matches("xyz", "other"));
    }

    #[test]
    fn disabled_tracer_records_nothing() {
        let mut tracer = Tracer::new(false, DebugSelector::default());
        tracer.record("stage3", "drop", "teh", "the", None, "test");
        assert!(tracer.records().is_empty());
    }

    #[test]
    fn empty_selector_traces_everything() {
        let mut tracer = Tracer::new(true, DebugSelector::default());
        tracer.record("stage3", "drop", "teh", "the", None, "test");
        assert_eq!(tracer.records().len(), 1);
    }
}
