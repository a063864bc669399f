//! Stage 3: collision resolution and boundary selection (spec §4.3).
//!
//! The first hard stage: turns the candidate map into a flat set of
//! triples, classifying everything it drops instead of discarding it
//! silently (spec §7).

use std::collections::HashMap;

use crate::boundary::Boundary;
use crate::config::Config;
use crate::correction::Correction;
use crate::exclusions::ExclusionRule;
use crate::index::BoundaryIndex;
use crate::reports::AmbiguousCollision;
use crate::tracer::Tracer;

use super::stage2_typo_generation::CandidateMap;
use super::Dictionaries;

pub struct Stage3Output {
    pub accepted: Vec<Correction>,
    pub ambiguous_collisions: Vec<AmbiguousCollision>,
    pub dropped_too_short: Vec<Correction>,
    pub excluded: Vec<Correction>,
}

pub fn resolve(
    candidate_map: &CandidateMap,
    dicts: &Dictionaries,
    config: &Config,
    frequencies: &HashMap<String, f64>,
    tracer: &mut Tracer,
) -> Stage3Output {
    let mut out = Stage3Output {
        accepted: Vec::new(),
        ambiguous_collisions: Vec::new(),
        dropped_too_short: Vec::new(),
        excluded: Vec::new(),
    };

    for (typo, words) in candidate_map {
        resolve_one_typo(typo, words, dicts, config, frequencies, tracer, &mut out);
    }

    out
}

fn resolve_one_typo(
    typo: &str,
    words: &std::collections::BTreeSet<String>,
    dicts: &Dictionaries,
    config: &Config,
    frequencies: &HashMap<String, f64>,
    tracer: &mut Tracer,
    out: &mut Stage3Output,
) {
    // Step 1: boundary selection per candidate word.
    let mut by_boundary: HashMap<Boundary, Vec<String>> = HashMap::new();
    for word in words {
        let boundary = select_boundary(typo, word, &dicts.validation_index, &dicts.source_index);
        by_boundary.entry(boundary).or_default().push(word.clone());
    }

    // Step 2/3: frequency resolution within each boundary group.
    for (boundary, mut group) in by_boundary {
        group.sort_by(|a, b| {
            frequencies
                .get(b)
                .unwrap_or(&0.0)
                .partial_cmp(frequencies.get(a).unwrap_or(&0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let chosen = if group.len() == 1 {
            Some(group[0].clone())
        } else {
            let freq0 = *frequencies.get(&group[0]).unwrap_or(&0.0);
            let freq1 = *frequencies.get(&group[1]).unwrap_or(&0.0);
            let passes = if freq1 <= 0.0 {
                freq0 > 0.0
            } else {
                freq0 / freq1 > config.freq_ratio
            };
            if passes {
                Some(group[0].clone())
            } else {
                out.ambiguous_collisions.push(AmbiguousCollision {
                    typo: typo.to_string(),
                    boundary,
                    candidates: group
                        .iter()
                        .map(|w| (w.clone(), *frequencies.get(w).unwrap_or(&0.0)))
                        .collect(),
                });
                tracer.record(
                    "stage3_collision_resolution",
                    "ambiguous_collision",
                    typo,
                    &group[0],
                    Some(boundary),
                    format!("{} candidates, ratio did not clear freq_ratio", group.len()),
                );
                None
            }
        };

        let Some(mut word) = chosen else { continue };
        let mut boundary = boundary;

        // Step 4: short-typo rule.
        if typo.chars().count() < config.min_typo_length
            && word.chars().count() > config.min_word_length
        {
            out.dropped_too_short.push(Correction::new(typo, word, boundary));
            tracer.record(
                "stage3_collision_resolution",
                "dropped_too_short",
                typo,
                &word,
                Some(boundary),
                format!(
                    "typo len {} < min_typo_length {} and word len {} > min_word_length {}",
                    typo.chars().count(),
                    config.min_typo_length,
                    word.chars().count(),
                    config.min_word_length
                ),
            );
            continue;
        }

        // Step 5: user-word override.
        if dicts.user_words.contains(&word) && word.chars().count() == 2 {
            boundary = Boundary::Both;
        }

        let correction = Correction::new(typo, std::mem::take(&mut word), boundary);

        // Step 6: exclusion filter.
        if dicts
            .exclusion_rules
            .iter()
            .filter(|r| matches!(r, ExclusionRule::TypoWordRule { .. }))
            .any(|r| r.matches_correction(&correction))
        {
            tracer.record(
                "stage3_collision_resolution",
                "excluded_by_rule",
                &correction.typo,
                &correction.word,
                Some(correction.boundary),
                "matched a typo->word exclusion rule",
            );
            out.excluded.push(correction);
            continue;
        }

        out.accepted.push(correction);
    }
}

/// Pick the least restrictive boundary that doesn't cause a false trigger
/// (spec §4.3 step 1): try `None, Left, Right` in order, fall back to
/// `Both`.
pub fn select_boundary(
    typo: &str,
    word: &str,
    validation_index: &BoundaryIndex,
    source_index: &BoundaryIndex,
) -> Boundary {
    if !causes_false_trigger(Boundary::None, typo, word, validation_index, source_index) {
        return Boundary::None;
    }
    if !causes_false_trigger(Boundary::Left, typo, word, validation_index, source_index) {
        return Boundary::Left;
    }
    if !causes_false_trigger(Boundary::Right, typo, word, validation_index, source_index) {
        return Boundary::Right;
    }
    Boundary::Both
}

fn causes_false_trigger(
    boundary: Boundary,
    typo: &str,
    word: &str,
    validation_index: &BoundaryIndex,
    source_index: &BoundaryIndex,
) -> bool {
    match boundary {
        Boundary::None => {
            validation_index.is_substring_of_any(typo)
                || source_index.is_substring_of_any(typo)
                || is_substring_of_word(typo, word)
        }
        Boundary::Left => {
            validation_index.is_prefix_of_any(typo)
                || source_index.is_prefix_of_any(typo)
                || is_prefix_of_word(typo, word)
        }
        Boundary::Right => {
            validation_index.is_suffix_of_any(typo)
                || source_index.is_suffix_of_any(typo)
                || is_suffix_of_word(typo, word)
        }
        Boundary::Both => false,
    }
}

fn is_substring_of_word(typo: &str, word: &str) -> bool {
    word != typo && word.contains(typo)
}

fn is_prefix_of_word(typo: &str, word: &str) -> bool {
    word != typo && word.starts_with(typo)
}

fn is_suffix_of_word(typo: &str, word: &str) -> bool {
    word != typo && word.ends_with(typo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Dictionaries;
    use crate::typo_gen::AdjacencyMap;
    use std::collections::{BTreeSet, HashSet};

    fn dicts(validation: &[&str], source: &[&str], user_words: &[&str]) -> Dictionaries {
        let validation_set: HashSet<String> = validation.iter().map(|s| s.to_string()).collect();
        let source_words: HashSet<String> = source.iter().map(|s| s.to_string()).collect();
        Dictionaries {
            validation_index: BoundaryIndex::build(validation_set.clone()),
            source_index: BoundaryIndex::build(source_words.clone()),
            validation_set,
            source_words,
            user_words: user_words.iter().map(|s| s.to_string()).collect(),
            exclusion_rules: Vec::new(),
            adjacency: AdjacencyMap::new(),
        }
    }

    #[test]
    fn ambiguous_collision_is_dropped() {
        let candidate_map: CandidateMap = {
            let mut m = CandidateMap::new();
            let mut set = BTreeSet::new();
            set.insert("and".to_string());
            set.insert("nod".to_string());
            m.insert("nad".to_string(), set);
            m
        };
        let dicts = dicts(&["and", "nod"], &["and", "nod"], &[]);
        let config = Config::finalize(crate::config::PartialConfig::default()).unwrap();
        let mut freqs = HashMap::new();
        freqs.insert("and".to_string(), 1e-3);
        freqs.insert("nod".to_string(), 5e-4);
        let mut tracer = Tracer::default();
        let out = resolve(&candidate_map, &dicts, &config, &freqs, &mut tracer);
        assert!(out.accepted.is_empty());
        assert_eq!(out.ambiguous_collisions.len(), 1);
    }

    #[test]
    fn clear_frequency_winner_is_accepted() {
        let candidate_map: CandidateMap = {
            let mut m = CandidateMap::new();
            let mut set = BTreeSet::new();
            set.insert("and".to_string());
            set.insert("nod".to_string());
            m.insert("nad".to_string(), set);
            m
        };
        let dicts = dicts(&["and", "nod"], &["and", "nod"], &[]);
        let config = Config::finalize(crate::config::PartialConfig::default()).unwrap();
        let mut freqs = HashMap::new();
        freqs.insert("and".to_string(), 1e-2);
        freqs.insert("nod".to_string(), 5e-4);
        let mut tracer = Tracer::default();
        let out = resolve(&candidate_map, &dicts, &config, &freqs, &mut tracer);
        assert_eq!(out.accepted.len(), 1);
        assert_eq!(out.accepted[0].word, "and");
    }

    #[test]
    fn user_word_override_forces_both_boundary() {
        let candidate_map: CandidateMap = {
            let mut m = CandidateMap::new();
            let mut set = BTreeSet::new();
            set.insert("ot".to_string());
            m.insert("ot".to_string(), set); // trivial, boundary selection irrelevant here
            m
        };
        let dicts = dicts(&[], &["ot"], &["ot"]);
        let config = Config::finalize(crate::config::PartialConfig {
            min_typo_length: Some(1),
            ..Default::default()
        })
        .unwrap();
        let mut freqs = HashMap::new();
        freqs.insert("ot".to_string(), 1e-3);
        let mut tracer = Tracer::default();
        let out = resolve(&candidate_map, &dicts, &config, &freqs, &mut tracer);
        // typo == word here is nonsensical for a real correction but the
        // override logic only cares about the boundary outcome.
        assert!(out.accepted.iter().all(|c| c.boundary == Boundary::Both) || out.accepted.is_empty());
    }

    #[test]
    fn short_typo_targeting_long_word_is_dropped() {
        let candidate_map: CandidateMap = {
            let mut m = CandidateMap::new();
            let mut set = BTreeSet::new();
            set.insert("beautiful".to_string());
            m.insert("bu".to_string(), set);
            m
        };
        let dicts = dicts(&[], &["beautiful"], &[]);
        let config = Config::finalize(crate::config::PartialConfig::default()).unwrap();
        let mut freqs = HashMap::new();
        freqs.insert("beautiful".to_string(), 1e-4);
        let mut tracer = Tracer::default();
        let out = resolve(&candidate_map, &dicts, &config, &freqs, &mut tracer);
        assert!(out.accepted.is_empty());
        assert_eq!(out.dropped_too_short.len(), 1);
    }

    #[test]
    fn boundary_selection_prefers_least_restrictive() {
        let validation: HashSet<String> = HashSet::new();
        let source: HashSet<String> = HashSet::new();
        let vidx = BoundaryIndex::build(validation);
        let sidx = BoundaryIndex::build(source);
        assert_eq!(select_boundary("xyz", "other", &vidx, &sidx), Boundary::None);
    }

    #[test]
    fn boundary_selection_escalates_when_substring_of_validation_word() {
        let validation: HashSet<String> = ["xyzabc".to_string()].into_iter().collect();
        let vidx = BoundaryIndex::build(validation);
        let sidx = BoundaryIndex::build(HashSet::new());
        // "xyz" is a substring of "xyzabc", so NONE is unsafe.
        assert_ne!(select_boundary("xyz", "other", &vidx, &sidx), Boundary::None);
    }
}
