//! Exclusion rule grammar (spec §6) and the wildcard/boundary-marker
//! matching shared with debug selectors (spec §9 "Debug tracing").

use crate::boundary::Boundary;
use crate::correction::Correction;

/// One parsed line from an `--exclude` file.
#[derive(Clone, Debug)]
pub enum ExclusionRule {
    /// `word` or `*pat*`: filters dictionary words out of the validation
    /// and source sets.
    WordPattern(String),
    /// `typo -> word` (wildcards allowed on either side, boundary markers
    /// on the typo side): filters final triples.
    TypoWordRule {
        typo_pattern: String,
        word_pattern: String,
        boundary: Option<Boundary>,
    },
}

impl ExclusionRule {
    pub fn matches_word(&self, word: &str) -> bool {
        match self {
            ExclusionRule::WordPattern(pat) => wildcard_match(pat, word),
            ExclusionRule::TypoWordRule { .. } => false,
        }
    }

    pub fn matches_correction(&self, correction: &Correction) -> bool {
        match self {
            ExclusionRule::WordPattern(_) => false,
            ExclusionRule::TypoWordRule {
                typo_pattern,
                word_pattern,
                boundary,
            } => {
                if let Some(b) = boundary {
                    if *b != correction.boundary {
                        return false;
                    }
                }
                wildcard_match(typo_pattern, &correction.typo)
                    && wildcard_match(word_pattern, &correction.word)
            }
        }
    }
}

/// Parse a full exclude file: `#` starts a comment, blank lines skipped.
/// A line containing `->` is a typo->word rule; anything else is a word
/// pattern.
pub fn parse_exclusion_file(contents: &str) -> Vec<ExclusionRule> {
    contents
        .lines()
        .map(strip_comment)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(parse_line)
        .collect()
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn parse_line(line: &str) -> ExclusionRule {
    if let Some((lhs, rhs)) = line.split_once("->") {
        let (typo_pattern, boundary) = parse_boundary_markers(lhs.trim());
        ExclusionRule::TypoWordRule {
            typo_pattern,
            word_pattern: rhs.trim().to_string(),
            boundary,
        }
    } else {
        ExclusionRule::WordPattern(line.to_string())
    }
}

/// Strip boundary markers from a pattern string used on the typo side of a
/// rule: `:pattern:` -> `Both`, `:pattern` -> `Left`, `pattern:` -> `Right`,
/// `pattern` -> unconstrained (`None` here means "no boundary constraint",
/// distinct from [`Boundary::None`]).
pub fn parse_boundary_markers(pattern: &str) -> (String, Option<Boundary>) {
    if pattern.is_empty() {
        return (pattern.to_string(), None);
    }
    let starts = pattern.starts_with(':');
    let ends = pattern.ends_with(':') && pattern.len() > 1;
    match (starts, ends) {
        (true, true) => (pattern[1..pattern.len() - 1].to_string(), Some(Boundary::Both)),
        (true, false) => (pattern[1..].to_string(), Some(Boundary::Left)),
        (false, true) => (pattern[..pattern.len() - 1].to_string(), Some(Boundary::Right)),
        (false, false) => (pattern.to_string(), None),
    }
}

/// Minimal glob: `*` matches any run of characters (including none); any
/// other character matches itself literally. No escaping, no `?`.
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    wildcard_match_chars(&p, &t)
}

fn wildcard_match_chars(p: &[char], t: &[char]) -> bool {
    match p.first() {
        None => t.is_empty(),
        Some('*') => {
            wildcard_match_chars(&p[1..], t)
                || (!t.is_empty() && wildcard_match_chars(p, &t[1..]))
        }
        Some(c) => match t.first() {
            Some(tc) if tc == c => wildcard_match_chars(&p[1..], &t[1..]),
            _ => false,
        },
    }
}
