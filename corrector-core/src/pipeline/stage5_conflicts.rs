//! Stage 5: substring-conflict removal (spec §4.5).
//!
//! With a left-to-right matcher, a shorter trigger fires before a longer
//! one that contains it; the longer rule becomes unreachable noise if
//! the shorter trigger's correction, extended by whatever's left of the
//! longer typo, reproduces the longer word exactly.

use std::collections::HashMap;

use crate::boundary::Boundary;
use crate::correction::Correction;
use crate::reports::SubstringConflict;

pub struct Stage5Output {
    pub kept: Vec<Correction>,
    pub removed: Vec<SubstringConflict>,
}

pub fn remove_conflicts(corrections: Vec<Correction>) -> Stage5Output {
    let mut by_boundary: HashMap<Boundary, Vec<&Correction>> = HashMap::new();
    for c in &corrections {
        by_boundary.entry(c.boundary).or_default().push(c);
    }

    // typo -> blocking correction, scoped per boundary since the same typo
    // string could in principle appear under different boundaries.
    let mut blocked: HashMap<(String, Boundary), Correction> = HashMap::new();
    for (boundary, group) in by_boundary {
        resolve_group(boundary, &group, &mut blocked);
    }

    let mut kept = Vec::new();
    let mut removed = Vec::new();
    for c in corrections {
        match blocked.get(&(c.typo.clone(), c.boundary)) {
            Some(blocker) => removed.push(SubstringConflict {
                kept: blocker.clone(),
                removed: c,
            }),
            None => kept.push(c),
        }
    }

    Stage5Output { kept, removed }
}

fn resolve_group(
    boundary: Boundary,
    group: &[&Correction],
    blocked: &mut HashMap<(String, Boundary), Correction>,
) {
    // Typos within a boundary group are unique by construction (stage 3
    // and stage 4 both resolve to one word per typo per boundary).
    let by_typo: HashMap<&str, &Correction> = group.iter().map(|c| (c.typo.as_str(), *c)).collect();

    let mut sorted: Vec<&str> = by_typo.keys().copied().collect();
    sorted.sort_by_key(|t| (t.len(), *t));

    // anchor char -> kept (unblocked) typos sharing that anchor, in the
    // order they were accepted.
    let mut by_anchor: HashMap<char, Vec<&str>> = HashMap::new();

    for typo in sorted {
        let Some(anchor) = anchor_char(boundary, typo) else {
            continue;
        };
        let long_word = by_typo[typo].word.as_str();

        let blocker = by_anchor.get(&anchor).and_then(|candidates| {
            candidates
                .iter()
                .find(|&&candidate| {
                    let short_word = by_typo[candidate].word.as_str();
                    conflicts(boundary, typo, candidate, short_word, long_word)
                })
                .copied()
        });

        match blocker {
            Some(candidate) => {
                blocked.insert((typo.to_string(), boundary), by_typo[candidate].clone());
            }
            None => {
                by_anchor.entry(anchor).or_default().push(typo);
            }
        }
    }
}

fn anchor_char(boundary: Boundary, typo: &str) -> Option<char> {
    if boundary == Boundary::Right {
        typo.chars().last()
    } else {
        typo.chars().next()
    }
}

/// True iff `short_typo` blocks `long_typo` (spec §4.5 "Conflict
/// predicate"): `long_typo` contains `short_typo` at the relevant anchor
/// and triggering `short_typo` first reproduces `long_word` exactly.
fn conflicts(boundary: Boundary, long_typo: &str, short_typo: &str, short_word: &str, long_word: &str) -> bool {
    if boundary == Boundary::Right {
        if !long_typo.ends_with(short_typo) {
            return false;
        }
        let prefix = &long_typo[..long_typo.len() - short_typo.len()];
        format!("{prefix}{short_word}") == long_word
    } else {
        if !long_typo.starts_with(short_typo) {
            return false;
        }
        let suffix = &long_typo[short_typo.len()..];
        format!("{short_word}{suffix}") == long_word
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longer_prefix_correction_is_blocked() {
        let corrections = vec![
            Correction::new("teh", "the", Boundary::Left),
            Correction::new("tehir", "their", Boundary::Left),
        ];
        let out = remove_conflicts(corrections);
        assert_eq!(out.kept.len(), 1);
        assert_eq!(out.kept[0].typo, "teh");
        assert_eq!(out.removed.len(), 1);
        assert_eq!(out.removed[0].removed.typo, "tehir");
        assert_eq!(out.removed[0].kept.typo, "teh");
    }

    #[test]
    fn longer_suffix_correction_is_blocked() {
        let corrections = vec![
            Correction::new("herre", "here", Boundary::Right),
            Correction::new("wherre", "where", Boundary::Right),
        ];
        let out = remove_conflicts(corrections);
        assert_eq!(out.kept.len(), 1);
        assert_eq!(out.kept[0].typo, "herre");
        assert_eq!(out.removed.len(), 1);
        assert_eq!(out.removed[0].removed.typo, "wherre");
    }

    #[test]
    fn different_boundaries_do_not_conflict() {
        let corrections = vec![
            Correction::new("toin", "ton", Boundary::None),
            Correction::new("toin", "tion", Boundary::Right),
        ];
        let out = remove_conflicts(corrections);
        assert_eq!(out.kept.len(), 2);
        assert!(out.removed.is_empty());
    }

    #[test]
    fn mismatched_result_does_not_conflict() {
        // "cat" is a prefix of "cats" but triggering it doesn't reproduce
        // "cats"'s correction, so the longer rule survives.
        let corrections = vec![
            Correction::new("cat", "cot", Boundary::None),
            Correction::new("cats", "rats", Boundary::None),
        ];
        let out = remove_conflicts(corrections);
        assert_eq!(out.kept.len(), 2);
    }
}
