//! Stage 6: platform filter, rank and emit (spec §4.6).
//!
//! The only stage that knows which [`Platform`] it is building for; every
//! earlier stage is platform-agnostic except for stage 4's pattern
//! direction choice.

use std::collections::HashMap;

use crate::config::Config;
use crate::correction::Correction;
use crate::pattern::Pattern;
use crate::pipeline::Dictionaries;
use crate::platform::{personality_for, Entry};
use crate::reports::SubstringConflict;

pub struct Stage6Output {
    pub corrections: Vec<Correction>,
    pub patterns: Vec<Pattern>,
    pub dropped: usize,
    pub firmware_substring_conflicts: Vec<SubstringConflict>,
}

pub fn finalize(
    corrections: Vec<Correction>,
    patterns: Vec<Pattern>,
    dicts: &Dictionaries,
    config: &Config,
    frequencies: &HashMap<String, f64>,
) -> Stage6Output {
    let personality = personality_for(config.platform);
    let total_in = corrections.len() + patterns.len();

    let mut entries: Vec<Entry> = Vec::with_capacity(total_in);
    entries.extend(corrections.into_iter().map(Entry::Direct));
    entries.extend(patterns.into_iter().map(Entry::Pattern));

    let (entries, filter_dropped) = personality.filter(entries);

    let (entries, firmware_substring_conflicts) = if personality.applies_full_substring_uniqueness() {
        enforce_full_substring_uniqueness(entries)
    } else {
        (entries, Vec::new())
    };

    let entries = personality.rank(entries, frequencies, &dicts.user_words);
    let before_truncate = entries.len();
    let entries = personality.truncate(entries, config.max_corrections);
    let truncated = before_truncate - entries.len();

    let mut corrections = Vec::new();
    let mut patterns = Vec::new();
    for e in entries {
        match e {
            Entry::Direct(c) => corrections.push(c),
            Entry::Pattern(p) => patterns.push(p),
        }
    }

    let dropped = total_in - corrections.len() - patterns.len();
    debug_assert_eq!(dropped, filter_dropped + firmware_substring_conflicts.len() + truncated);

    Stage6Output {
        corrections,
        patterns,
        dropped,
        firmware_substring_conflicts,
    }
}

/// Firmware-specific extension on top of stage 5 (spec §4.5 "Firmware-
/// specific extension"): no surviving typo may be a substring of any
/// other surviving typo, regardless of boundary or anchor position. Plain
/// `contains`, not the anchored prefix/suffix detector stage 5 uses,
/// since firmware's flat trie has no left/right distinction at match time.
fn enforce_full_substring_uniqueness(entries: Vec<Entry>) -> (Vec<Entry>, Vec<SubstringConflict>) {
    let mut indices: Vec<usize> = (0..entries.len()).collect();
    indices.sort_by_key(|&i| entries[i].typo().len());

    let mut kept_indices: Vec<usize> = Vec::new();
    let mut removed = Vec::new();

    for &i in &indices {
        let typo = entries[i].typo();
        let blocker = kept_indices
            .iter()
            .find(|&&j| typo.contains(entries[j].typo()));

        match blocker {
            Some(&j) => removed.push(SubstringConflict {
                kept: to_correction(&entries[j]),
                removed: to_correction(&entries[i]),
            }),
            None => kept_indices.push(i),
        }
    }

    kept_indices.sort_unstable();
    let mut kept_set: std::collections::HashSet<usize> = kept_indices.into_iter().collect();
    let kept: Vec<Entry> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, e)| if kept_set.remove(&i) { Some(e) } else { None })
        .collect();

    (kept, removed)
}

fn to_correction(entry: &Entry) -> Correction {
    Correction::new(entry.typo(), entry.word(), entry.boundary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Boundary;
    use crate::config::{Config, PartialConfig, Platform};
    use crate::exclusions::ExclusionRule;
    use crate::index::BoundaryIndex;
    use crate::typo_gen::AdjacencyMap;
    use std::collections::HashSet;

    fn dicts(user_words: &[&str]) -> Dictionaries {
        Dictionaries {
            validation_set: HashSet::new(),
            source_words: HashSet::new(),
            user_words: user_words.iter().map(|s| s.to_string()).collect(),
            exclusion_rules: Vec::<ExclusionRule>::new(),
            adjacency: AdjacencyMap::new(),
            validation_index: BoundaryIndex::build(HashSet::new()),
            source_index: BoundaryIndex::build(HashSet::new()),
        }
    }

    fn config(platform: Platform) -> Config {
        Config::finalize(PartialConfig {
            platform: Some(platform),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn expander_keeps_everything_and_sorts_alphabetically() {
        let corrections = vec![
            Correction::new("xyz", "zebra", Boundary::None),
            Correction::new("abc", "apple", Boundary::None),
        ];
        let out = finalize(corrections, vec![], &dicts(&[]), &config(Platform::Expander), &HashMap::new());
        assert_eq!(out.corrections.len(), 2);
        assert_eq!(out.corrections[0].word, "apple");
        assert_eq!(out.dropped, 0);
    }

    #[test]
    fn firmware_drops_non_lowercase_and_applies_cap() {
        let mut freqs = HashMap::new();
        freqs.insert("the".to_string(), 0.9);
        freqs.insert("he".to_string(), 0.1);

        let corrections = vec![
            Correction::new("teh", "the", Boundary::None),
            Correction::new("he11o", "hello", Boundary::None),
            Correction::new("hte", "he", Boundary::None),
        ];
        let mut cfg = config(Platform::Firmware);
        cfg.max_corrections = Some(1);
        let out = finalize(corrections, vec![], &dicts(&[]), &cfg, &HashMap::new());
        assert_eq!(out.corrections.len(), 1);
        assert!(out.dropped >= 2);
        let _ = freqs;
    }

    #[test]
    fn firmware_substring_uniqueness_prefers_shorter_typo() {
        let corrections = vec![
            Correction::new("teh", "the", Boundary::None),
            Correction::new("tehy", "they", Boundary::Right),
        ];
        let out = finalize(corrections, vec![], &dicts(&[]), &config(Platform::Firmware), &HashMap::new());
        assert_eq!(out.corrections.len(), 1);
        assert_eq!(out.corrections[0].typo, "teh");
        assert_eq!(out.firmware_substring_conflicts.len(), 1);
    }
}
