//! Stage 2: parallel typo generation over the source word set (spec §5).
//!
//! Workers are pure: `word -> (typo, word) pairs + trace strings`. No
//! worker touches shared state; the coordinator merges results into the
//! candidate map, which is commutative because each typo's word list is
//! an unordered set (spec §3 "Candidate map").

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::tracer::TraceRecord;
use crate::typo_gen::generate;

use super::WorkerContext;

pub type CandidateMap = HashMap<String, BTreeSet<String>>;

pub fn generate_all(
    source_words: &HashSet<String>,
    ctx: &WorkerContext,
    cancel: &AtomicBool,
) -> (CandidateMap, Vec<TraceRecord>) {
    let words: Vec<&String> = source_words.iter().collect();

    let per_word: Vec<(Vec<(String, String)>, Vec<TraceRecord>)> = words
        .into_par_iter()
        .map(|word| process_word(word, ctx, cancel))
        .collect();

    let mut candidate_map = CandidateMap::new();
    let mut traces = Vec::new();
    for (pairs, trace) in per_word {
        for (typo, word) in pairs {
            candidate_map.entry(typo).or_default().insert(word);
        }
        traces.extend(trace);
    }
    (candidate_map, traces)
}

fn process_word(
    word: &str,
    ctx: &WorkerContext,
    cancel: &AtomicBool,
) -> (Vec<(String, String)>, Vec<TraceRecord>) {
    let mut pairs = Vec::new();
    let mut traces = Vec::new();

    if cancel.load(Ordering::Relaxed) {
        return (pairs, traces);
    }

    let mut seen = HashSet::new();
    for typo in generate(word, Some(&ctx.adjacency)) {
        if !seen.insert(typo.clone()) {
            continue;
        }
        if ctx.typo_freq_threshold > 0.0 {
            let freq = ctx.word_source.frequency(&typo);
            if freq > ctx.typo_freq_threshold {
                if ctx.tracer_enabled
                    && (ctx.debug_selector.is_empty() || ctx.debug_selector.matches(&typo, word))
                {
                    traces.push(TraceRecord {
                        stage: "stage2_typo_generation",
                        event: "typo_too_frequent".to_string(),
                        typo: typo.clone(),
                        word: word.to_string(),
                        boundary: None,
                        reason: format!(
                            "typo frequency {freq} exceeds typo_freq_threshold {}",
                            ctx.typo_freq_threshold
                        ),
                    });
                }
                continue;
            }
        }
        pairs.push((typo, word.to_string()));
    }

    (pairs, traces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::word_source::MemoryWordSource;
    use crate::tracer::DebugSelector;
    use std::sync::Arc;

    fn ctx(threshold: f64) -> WorkerContext {
        WorkerContext {
            adjacency: Default::default(),
            typo_freq_threshold: threshold,
            word_source: Arc::new(MemoryWordSource::new(vec![("teh".to_string(), 0.9)])),
            tracer_enabled: false,
            debug_selector: DebugSelector::default(),
        }
    }

    #[test]
    fn merges_candidates_across_words() {
        let mut words = HashSet::new();
        words.insert("cat".to_string());
        words.insert("cot".to_string());
        let cancel = AtomicBool::new(false);
        let (map, _) = generate_all(&words, &ctx(0.0), &cancel);
        assert!(map.values().any(|v| v.contains("cat") || v.contains("cot")));
    }

    #[test]
    fn threshold_filters_frequent_typos() {
        let mut words = HashSet::new();
        words.insert("the".to_string());
        let cancel = AtomicBool::new(false);
        let (map, _) = generate_all(&words, &ctx(0.5), &cancel);
        // "teh" (a transposition of "the") has frequency 0.9 in this provider
        // and must be filtered since 0.9 > 0.5.
        assert!(!map.contains_key("teh"));
    }

    #[test]
    fn cancellation_short_circuits() {
        let mut words = HashSet::new();
        words.insert("anything".to_string());
        let cancel = AtomicBool::new(true);
        let (map, _) = generate_all(&words, &ctx(0.0), &cancel);
        assert!(map.is_empty());
    }
}
