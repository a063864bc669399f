//! Stage 4: pattern generalization (spec §4.4).
//!
//! Collapses families of corrections sharing an affix substitution into
//! a single [`Pattern`], then re-runs collision resolution and
//! substring-conflict removal on the pattern set itself before
//! reconciling against the surviving direct corrections.

use std::collections::{HashMap, HashSet};

use crate::boundary::Boundary;
use crate::config::{Config, Platform};
use crate::correction::Correction;
use crate::pattern::Pattern;
use crate::reports::RejectedPattern;
use crate::tracer::Tracer;

use super::Dictionaries;

pub struct Stage4Output {
    pub corrections: Vec<Correction>,
    pub patterns: Vec<Pattern>,
    pub rejected: Vec<RejectedPattern>,
}

/// Minimum fragment length on either side of the substitution point
/// (spec §4.4 "Extraction"): the non-fragment stem must be at least this
/// long, or the pattern degenerates into matching almost the whole word.
const MIN_STEM_LENGTH: usize = 2;

pub fn generalize(
    corrections: Vec<Correction>,
    dicts: &Dictionaries,
    config: &Config,
    frequencies: &HashMap<String, f64>,
    platform: Platform,
    tracer: &mut Tracer,
) -> Stage4Output {
    let target_boundary = match platform {
        Platform::Expander => Boundary::Right,
        Platform::Firmware => Boundary::Left,
    };

    let buckets = extract_pattern_buckets(&corrections, target_boundary);

    let mut rejected = Vec::new();
    let mut candidates = Vec::new();
    let mut subsumed: HashSet<(String, String, Boundary)> = HashSet::new();

    for ((typo_frag, word_frag, boundary), occurrences) in buckets {
        if occurrences.len() < 2 {
            continue;
        }
        if let Some(reason) = reject_reason(&typo_frag, &word_frag, boundary, &occurrences, config, dicts) {
            tracer.record(
                "stage4_pattern_generalization",
                "rejected",
                &typo_frag,
                &word_frag,
                Some(boundary),
                reason.clone(),
            );
            rejected.push(RejectedPattern {
                typo_frag,
                word_frag,
                boundary,
                reason,
            });
            continue;
        }

        for c in &occurrences {
            subsumed.insert((c.typo.clone(), c.word.clone(), c.boundary));
        }
        let mut pattern = Pattern::new(typo_frag, word_frag, boundary);
        pattern.replacements = occurrences;
        candidates.push(pattern);
    }

    let remaining: Vec<Correction> = corrections
        .into_iter()
        .filter(|c| !subsumed.contains(&(c.typo.clone(), c.word.clone(), c.boundary)))
        .collect();

    let resolved = resolve_pattern_collisions(candidates, frequencies, config, &mut rejected);

    let synthetic: Vec<Correction> = resolved
        .iter()
        .map(|p| Correction::new(p.typo_frag.clone(), p.word_frag.clone(), p.boundary))
        .collect();
    let conflict_out = super::stage5_conflicts::remove_conflicts(synthetic);
    let surviving_keys: HashSet<(String, Boundary)> = conflict_out
        .kept
        .iter()
        .map(|c| (c.typo.clone(), c.boundary))
        .collect();
    for conflict in &conflict_out.removed {
        rejected.push(RejectedPattern {
            typo_frag: conflict.removed.typo.clone(),
            word_frag: conflict.removed.word.clone(),
            boundary: conflict.removed.boundary,
            reason: format!(
                "absorbed by shorter pattern {} -> {}",
                conflict.kept.typo, conflict.kept.word
            ),
        });
    }
    let surviving: Vec<Pattern> = resolved
        .into_iter()
        .filter(|p| surviving_keys.contains(&(p.typo_frag.clone(), p.boundary)))
        .collect();

    let mut final_corrections = remaining;
    let direct_pairs: HashSet<(String, String, Boundary)> = final_corrections
        .iter()
        .map(|c| (c.typo.clone(), c.word.clone(), c.boundary))
        .collect();

    let mut safe_patterns = Vec::new();
    for pattern in surviving {
        let other_boundary_conflict = direct_pairs
            .iter()
            .any(|(t, w, b)| *t == pattern.typo_frag && *w == pattern.word_frag && *b != pattern.boundary);
        if other_boundary_conflict {
            final_corrections.extend(pattern.replacements.clone());
            rejected.push(RejectedPattern {
                typo_frag: pattern.typo_frag,
                word_frag: pattern.word_frag,
                boundary: pattern.boundary,
                reason: "cross-boundary conflict with a direct correction".to_string(),
            });
        } else {
            safe_patterns.push(pattern);
        }
    }

    Stage4Output {
        corrections: final_corrections,
        patterns: safe_patterns,
        rejected,
    }
}

fn reject_reason(
    typo_frag: &str,
    word_frag: &str,
    boundary: Boundary,
    occurrences: &[Correction],
    config: &Config,
    dicts: &Dictionaries,
) -> Option<String> {
    if typo_frag.chars().count() < config.min_typo_length {
        return Some(format!(
            "fragment shorter than min_typo_length ({})",
            config.min_typo_length
        ));
    }

    let pattern = Pattern::new(typo_frag, word_frag, boundary);
    if let Some(bad) = occurrences
        .iter()
        .find(|c| pattern.apply(&c.typo).as_deref() != Some(c.word.as_str()))
    {
        return Some(format!(
            "does not reproduce '{}' for typo '{}'",
            bad.word, bad.typo
        ));
    }

    if dicts.validation_set.contains(typo_frag) {
        return Some(format!("fragment exists as validation word '{typo_frag}'"));
    }

    let corrupts_validation = match boundary {
        Boundary::Left => dicts.validation_index.is_prefix_of_any(typo_frag),
        _ => dicts.validation_index.is_suffix_of_any(typo_frag),
    };
    if corrupts_validation {
        return Some("would trigger at the anchor end of a validation word".to_string());
    }

    let corrupts_source = match boundary {
        Boundary::Left => dicts.source_index.is_prefix_of_any(typo_frag),
        _ => dicts.source_index.is_suffix_of_any(typo_frag),
    };
    if corrupts_source {
        return Some("appears at the anchor end of a source word".to_string());
    }

    None
}

/// Extract candidate `(typo_frag, word_frag, boundary)` buckets from
/// corrections whose boundary matches the platform's pattern direction
/// (spec §4.4 "Extraction").
fn extract_pattern_buckets(
    corrections: &[Correction],
    boundary: Boundary,
) -> HashMap<(String, String, Boundary), Vec<Correction>> {
    let mut buckets: HashMap<(String, String, Boundary), Vec<Correction>> = HashMap::new();

    for c in corrections {
        if c.boundary != boundary {
            continue;
        }
        let typo_chars: Vec<char> = c.typo.chars().collect();
        let word_chars: Vec<char> = c.word.chars().collect();
        let word_len = word_chars.len();
        if word_len < MIN_STEM_LENGTH * 2 {
            continue;
        }
        let max_len = word_len - MIN_STEM_LENGTH;

        for length in MIN_STEM_LENGTH..=max_len {
            if typo_chars.len() < length {
                continue;
            }
            let (typo_frag, word_frag, typo_rest_matches) = match boundary {
                Boundary::Right => {
                    let typo_frag: String = typo_chars[typo_chars.len() - length..].iter().collect();
                    let word_frag: String = word_chars[word_len - length..].iter().collect();
                    let typo_rest: String = typo_chars[..typo_chars.len() - length].iter().collect();
                    let word_rest: String = word_chars[..word_len - length].iter().collect();
                    (typo_frag, word_frag, typo_rest == word_rest)
                }
                _ => {
                    let typo_frag: String = typo_chars[..length].iter().collect();
                    let word_frag: String = word_chars[..length].iter().collect();
                    let typo_rest: String = typo_chars[length..].iter().collect();
                    let word_rest: String = word_chars[length..].iter().collect();
                    (typo_frag, word_frag, typo_rest == word_rest)
                }
            };
            if !typo_rest_matches || typo_frag == word_frag {
                continue;
            }
            buckets
                .entry((typo_frag, word_frag, boundary))
                .or_default()
                .push(c.clone());
        }
    }

    buckets
}

/// Two different corrections can generalize to the same `typo_frag` with
/// different `word_frag`s; resolve by the same frequency-ratio gate used
/// in stage 3, scoring each candidate by the summed frequency of the
/// words its replacements target (spec §4.4 "Resolution").
fn resolve_pattern_collisions(
    patterns: Vec<Pattern>,
    frequencies: &HashMap<String, f64>,
    config: &Config,
    rejected: &mut Vec<RejectedPattern>,
) -> Vec<Pattern> {
    let mut by_typo_frag: HashMap<String, Vec<Pattern>> = HashMap::new();
    for p in patterns {
        by_typo_frag.entry(p.typo_frag.clone()).or_default().push(p);
    }

    let mut out = Vec::new();
    for (_, mut group) in by_typo_frag {
        if group.len() == 1 {
            out.push(group.pop().unwrap());
            continue;
        }
        group.sort_by(|a, b| {
            pattern_score(b, frequencies)
                .partial_cmp(&pattern_score(a, frequencies))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let top = pattern_score(&group[0], frequencies);
        let runner_up = pattern_score(&group[1], frequencies);
        let passes = if runner_up <= 0.0 {
            top > 0.0
        } else {
            top / runner_up > config.freq_ratio
        };
        if passes {
            let winner = group.remove(0);
            for loser in group {
                rejected.push(RejectedPattern {
                    typo_frag: loser.typo_frag,
                    word_frag: loser.word_frag,
                    boundary: loser.boundary,
                    reason: format!(
                        "lost pattern collision to {} -> {}",
                        winner.typo_frag, winner.word_frag
                    ),
                });
            }
            out.push(winner);
        } else {
            for p in group {
                rejected.push(RejectedPattern {
                    typo_frag: p.typo_frag,
                    word_frag: p.word_frag,
                    boundary: p.boundary,
                    reason: "ambiguous pattern collision".to_string(),
                });
            }
        }
    }
    out
}

fn pattern_score(pattern: &Pattern, frequencies: &HashMap<String, f64>) -> f64 {
    pattern
        .replacements
        .iter()
        .map(|c| *frequencies.get(&c.word).unwrap_or(&0.0))
        .sum()
}
