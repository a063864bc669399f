//! Personality A: left-to-right expander (spec §4.6 "Personality A").
//!
//! Unrestricted character set, unbounded corrections list, no ranking
//! beyond alphabetic order, output bucketed by first letter of the
//! correction word.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::boundary::Boundary;

use super::{Entry, Personality};

/// Mirrors `entroppy/platforms/espanso/file_writing.py`'s per-entry dict
/// shape, serialized with `serde_yaml_ng` the way `bbq-tool` reaches for
/// that crate for its own dictionary YAML, rather than hand-writing YAML
/// syntax (which would mis-escape triggers/replacements containing quotes).
#[derive(Serialize)]
struct MatchEntry {
    trigger: String,
    replace: String,
    propagate_case: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    word: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    left_word: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    right_word: Option<bool>,
}

impl MatchEntry {
    fn from_entry(e: &Entry) -> Self {
        let mut entry = MatchEntry {
            trigger: e.typo().to_string(),
            replace: e.word().to_string(),
            propagate_case: true,
            word: None,
            left_word: None,
            right_word: None,
        };
        match e.boundary() {
            Boundary::Both => entry.word = Some(true),
            Boundary::Left => entry.left_word = Some(true),
            Boundary::Right => entry.right_word = Some(true),
            Boundary::None => {}
        }
        entry
    }
}

#[derive(Serialize)]
struct MatchFile {
    matches: Vec<MatchEntry>,
}

pub struct Expander;

impl Personality for Expander {
    fn filter(&self, entries: Vec<Entry>) -> (Vec<Entry>, usize) {
        (entries, 0)
    }

    fn rank(&self, mut entries: Vec<Entry>, _frequencies: &HashMap<String, f64>, _user_words: &HashSet<String>) -> Vec<Entry> {
        entries.sort_by(|a, b| a.word().cmp(b.word()).then_with(|| a.typo().cmp(b.typo())));
        entries
    }

    fn truncate(&self, entries: Vec<Entry>, _max_corrections: Option<usize>) -> Vec<Entry> {
        entries
    }

    fn emit(&self, dir: &Path, entries: &[Entry], max_entries_per_file: usize) -> io::Result<()> {
        std::fs::create_dir_all(dir)?;

        // Group by first letter of the correct word, non-alphabetic words
        // bucketed under "symbols" (spec §6 "Expander output").
        let mut buckets: BTreeMap<String, Vec<&Entry>> = BTreeMap::new();
        for e in entries {
            let key = match e.word().chars().next() {
                Some(c) if c.is_alphabetic() => c.to_lowercase().to_string(),
                _ => "symbols".to_string(),
            };
            buckets.entry(key).or_default().push(e);
        }

        let max = max_entries_per_file.max(1);
        for (letter, mut items) in buckets {
            items.sort_by(|a, b| a.word().cmp(b.word()));
            let chunks: Vec<&[&Entry]> = items.chunks(max).collect();
            let split = items.len() > max;

            for (i, chunk) in chunks.iter().enumerate() {
                let name = if !split {
                    if letter == "symbols" {
                        "typos_symbols.yml".to_string()
                    } else {
                        format!("typos_{letter}.yml")
                    }
                } else if letter == "symbols" {
                    format!("typos_symbols_{:03}.yml", i + 1)
                } else {
                    let first_word = chunk.first().map(|e| e.word()).unwrap_or("");
                    let last_word = chunk.last().map(|e| e.word()).unwrap_or("");
                    format!("typos_{first_word}_to_{last_word}.yml")
                };

                let f = File::create(dir.join(name))?;
                let doc = MatchFile {
                    matches: chunk.iter().map(|e| MatchEntry::from_entry(e)).collect(),
                };
                serde_yaml_ng::to_writer(f, &doc)
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Boundary;
    use crate::correction::Correction;

    #[test]
    fn ranks_alphabetically_by_word() {
        let personality = Expander;
        let entries = vec![
            Entry::Direct(Correction::new("xyz", "zebra", Boundary::None)),
            Entry::Direct(Correction::new("abc", "apple", Boundary::None)),
        ];
        let ranked = personality.rank(entries, &HashMap::new(), &HashSet::new());
        assert_eq!(ranked[0].word(), "apple");
        assert_eq!(ranked[1].word(), "zebra");
    }

    #[test]
    fn never_truncates() {
        let personality = Expander;
        let entries = vec![Entry::Direct(Correction::new("xyz", "zebra", Boundary::None))];
        let out = personality.truncate(entries, Some(0));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn emits_one_file_per_letter_with_boundary_keys() {
        let personality = Expander;
        let entries = vec![
            Entry::Direct(Correction::new("teh", "the", Boundary::Both)),
            Entry::Direct(Correction::new("xyz", "zebra", Boundary::None)),
        ];
        let dir = tempdir();
        personality.emit(&dir, &entries, 500).unwrap();
        assert!(dir.join("typos_t.yml").exists());
        assert!(dir.join("typos_z.yml").exists());
        let content = std::fs::read_to_string(dir.join("typos_t.yml")).unwrap();
        assert!(content.contains("matches:"));
        assert!(content.contains("word: true"));
    }

    fn tempdir() -> std::path::PathBuf {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let pid = std::process::id();
        let mut dir = std::env::temp_dir();
        dir.push(format!("corrector-expander-test-{pid}-{n}"));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }
}
