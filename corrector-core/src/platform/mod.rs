//! Target matcher personalities (spec §4.6): each owns its own filtering,
//! ranking, truncation and file emission, selected by [`Config::platform`].

pub mod expander;
pub mod firmware;

pub use expander::Expander;
pub use firmware::Firmware;

use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Path;

use crate::boundary::Boundary;
use crate::config::Platform as PlatformKind;
use crate::correction::Correction;
use crate::pattern::Pattern;

/// Either a direct correction or a pattern, viewed through the fields a
/// platform personality actually cares about: trigger string, correction
/// string, and boundary. Kept distinct from [`Correction`] because a
/// pattern's `typo_frag`/`word_frag` are fragments, not whole words, and
/// the pattern's `replacements` need to survive to emission and reports.
pub enum Entry {
    Direct(Correction),
    Pattern(Pattern),
}

impl Entry {
    pub fn typo(&self) -> &str {
        match self {
            Entry::Direct(c) => &c.typo,
            Entry::Pattern(p) => &p.typo_frag,
        }
    }

    pub fn word(&self) -> &str {
        match self {
            Entry::Direct(c) => &c.word,
            Entry::Pattern(p) => &p.word_frag,
        }
    }

    pub fn boundary(&self) -> Boundary {
        match self {
            Entry::Direct(c) => c.boundary,
            Entry::Pattern(p) => p.boundary,
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, Entry::Pattern(_))
    }
}

pub trait Personality {
    /// Drop entries this platform's character set or structural
    /// constraints reject. Returns survivors and a count of how many
    /// were dropped here (separate from the full-substring-uniqueness
    /// extension, which stage 6 applies on top when
    /// [`Personality::applies_full_substring_uniqueness`] is true).
    fn filter(&self, entries: Vec<Entry>) -> (Vec<Entry>, usize);

    fn rank(&self, entries: Vec<Entry>, frequencies: &HashMap<String, f64>, user_words: &HashSet<String>) -> Vec<Entry>;

    fn truncate(&self, entries: Vec<Entry>, max_corrections: Option<usize>) -> Vec<Entry>;

    /// Write the surviving entries to `config.output` (spec §6): a
    /// directory for the expander (one bucketed file per letter), a
    /// single flat file for firmware.
    fn emit(&self, output: &Path, entries: &[Entry], max_entries_per_file: usize) -> std::io::Result<()>;

    /// Firmware's hard trie constraint (spec §4.5 "Firmware-specific
    /// extension"): no surviving typo may be a substring of any other,
    /// regardless of boundary. Stage 6 applies this between `filter` and
    /// `rank` when true.
    fn applies_full_substring_uniqueness(&self) -> bool {
        false
    }
}

pub fn personality_for(kind: PlatformKind) -> Box<dyn Personality> {
    match kind {
        PlatformKind::Expander => Box::new(Expander),
        PlatformKind::Firmware => Box::new(Firmware),
    }
}

/// Boundary marker syntax shared by firmware emission and exclusion-rule
/// parsing: `:t` (Left), `t:` (Right), `:t:` (Both), `t` (None).
pub fn marked_trigger(typo: &str, boundary: Boundary) -> String {
    let mut s = String::new();
    if boundary.has_left_marker() {
        s.push(':');
    }
    s.push_str(typo);
    if boundary.has_right_marker() {
        s.push(':');
    }
    s
}
