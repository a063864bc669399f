//! Stage 1: load dictionaries, exclusions, adjacency map and build the
//! two boundary indices (spec §2 stage 1, §6 file formats).

use std::collections::HashSet;
use std::path::Path;

use crate::config::Config;
use crate::dictionary::{adjacency::parse_adjacency_file, include::parse_include_file, WordSource};
use crate::error::CorrectorError;
use crate::exclusions::{parse_exclusion_file, ExclusionRule};
use crate::index::BoundaryIndex;

use super::Dictionaries;

pub fn load_dictionaries(
    config: &Config,
    word_source: &dyn WordSource,
) -> Result<Dictionaries, CorrectorError> {
    let include_words = match &config.include {
        Some(path) => parse_include_file(&read_file(path)?),
        None => HashSet::new(),
    };
    let exclusion_rules = match &config.exclude {
        Some(path) => parse_exclusion_file(&read_file(path)?),
        None => Vec::new(),
    };
    let adjacency = match &config.adjacent_letters {
        Some(path) => parse_adjacency_file(&read_file(path)?),
        None => Default::default(),
    };

    let is_word_excluded = |w: &str| {
        exclusion_rules
            .iter()
            .any(|r| matches!(r, ExclusionRule::WordPattern(_)) && r.matches_word(w))
    };

    let mut validation_set: HashSet<String> = word_source.dictionary_words().into_iter().collect();
    validation_set.extend(include_words.iter().cloned());
    validation_set.retain(|w| !is_word_excluded(w));

    let mut source_words: HashSet<String> = HashSet::new();
    if let Some(n) = config.top_n {
        for w in word_source.top_n(n) {
            let len = w.chars().count();
            if len >= config.min_word_length && len <= config.max_word_length && !is_word_excluded(&w) {
                source_words.insert(w);
            }
        }
    }
    // User include words bypass frequency filtering entirely (spec §6).
    source_words.extend(include_words.iter().cloned());

    let validation_index = BoundaryIndex::build(validation_set.clone());
    let source_index = BoundaryIndex::build(source_words.clone());

    Ok(Dictionaries {
        validation_set,
        source_words,
        user_words: include_words,
        exclusion_rules,
        adjacency,
        validation_index,
        source_index,
    })
}

fn read_file(path: &Path) -> Result<String, CorrectorError> {
    std::fs::read_to_string(path).map_err(|source| CorrectorError::InputIo {
        path: path.to_path_buf(),
        source,
    })
}
