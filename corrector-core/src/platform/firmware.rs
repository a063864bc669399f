//! Personality B: right-to-left firmware table (spec §4.6 "Personality B").
//!
//! Restricted character set, same-typo boundary collapsing, a three-tier
//! ranking and a hard cap, emitted as one flat `trigger -> correction`
//! text file.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use super::{marked_trigger, Entry, Personality};

pub struct Firmware;

impl Personality for Firmware {
    fn filter(&self, entries: Vec<Entry>) -> (Vec<Entry>, usize) {
        let original_len = entries.len();

        let charset_ok: Vec<Entry> = entries
            .into_iter()
            .filter(|e| is_firmware_charset(e.typo()) && is_firmware_charset(e.word()))
            .collect();

        let deduped = keep_least_restrictive_per_typo(charset_ok);

        let dropped = original_len - deduped.len();
        (deduped, dropped)
    }

    fn rank(&self, entries: Vec<Entry>, frequencies: &HashMap<String, f64>, user_words: &HashSet<String>) -> Vec<Entry> {
        let mut tier0 = Vec::new();
        let mut tier1 = Vec::new();
        let mut tier2 = Vec::new();

        for e in entries {
            if !e.is_pattern() && user_words.contains(e.word()) {
                tier0.push(e);
            } else if e.is_pattern() {
                tier1.push(e);
            } else {
                tier2.push(e);
            }
        }

        tier1.sort_by(|a, b| pattern_score(b, frequencies).total_cmp(&pattern_score(a, frequencies)));
        tier2.sort_by(|a, b| {
            frequencies
                .get(b.word())
                .unwrap_or(&0.0)
                .total_cmp(frequencies.get(a.word()).unwrap_or(&0.0))
        });

        tier0.into_iter().chain(tier1).chain(tier2).collect()
    }

    fn truncate(&self, mut entries: Vec<Entry>, max_corrections: Option<usize>) -> Vec<Entry> {
        if let Some(max) = max_corrections {
            entries.truncate(max);
        }
        entries
    }

    fn emit(&self, path: &Path, entries: &[Entry], _max_entries_per_file: usize) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut sorted: Vec<&Entry> = entries.iter().collect();
        sorted.sort_by(|a, b| a.word().cmp(b.word()));

        let mut f = File::create(path)?;
        for e in sorted {
            writeln!(f, "{} -> {}", marked_trigger(e.typo(), e.boundary()), e.word())?;
        }
        Ok(())
    }

    fn applies_full_substring_uniqueness(&self) -> bool {
        true
    }
}

fn is_firmware_charset(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase() || c == '\'')
}

fn pattern_score(entry: &Entry, frequencies: &HashMap<String, f64>) -> f64 {
    match entry {
        Entry::Pattern(p) => p
            .replacements
            .iter()
            .map(|c| *frequencies.get(&c.word).unwrap_or(&0.0))
            .sum(),
        Entry::Direct(c) => *frequencies.get(&c.word).unwrap_or(&0.0),
    }
}

/// Same typo with two different boundaries is an inconsistent table entry
/// on firmware; keep only the least restrictive boundary (spec §4.6
/// "Same-typo, different-boundary").
fn keep_least_restrictive_per_typo(entries: Vec<Entry>) -> Vec<Entry> {
    let mut best_rank: HashMap<String, u8> = HashMap::new();
    for e in &entries {
        let rank = e.boundary().rank();
        best_rank
            .entry(e.typo().to_string())
            .and_modify(|r| *r = (*r).min(rank))
            .or_insert(rank);
    }

    let mut seen: HashSet<String> = HashSet::new();
    entries
        .into_iter()
        .filter(|e| {
            let least = best_rank[e.typo()];
            if e.boundary().rank() != least {
                return false;
            }
            // Among entries already at the least-strict rank (Left/Right
            // tie), keep only the first one seen.
            seen.insert(e.typo().to_string())
        })
        .collect()
}
