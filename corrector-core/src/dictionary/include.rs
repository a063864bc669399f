//! `--include` file format: newline-delimited lowercase words, `#` comments.

use std::collections::HashSet;

/// Parse an include list. Bypasses frequency filtering; a 2-character word
/// in this set later forces `Boundary::Both` (spec §4.3 step 5).
pub fn parse_include_file(contents: &str) -> HashSet<String> {
    contents
        .lines()
        .map(strip_comment)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}
