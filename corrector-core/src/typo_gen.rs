//! Typo generation: five deterministic edit operators over a source word.
//!
//! Pure and side-effect free; the candidate map that deduplicates the
//! output lives in the caller (stage 2).

use std::collections::HashMap;

/// `char -> string of keys adjacent to it on the keyboard`.
pub type AdjacencyMap = HashMap<char, String>;

/// Generate every typo reachable from `word` by exactly one of the five
/// edit operators, in a fixed, deterministic order:
/// transposition, omission, duplication, adjacent-key insertion,
/// adjacent-key replacement.
pub fn generate(word: &str, adjacency: Option<&AdjacencyMap>) -> Vec<String> {
    if word.is_empty() {
        return Vec::new();
    }
    let chars: Vec<char> = word.chars().collect();
    let mut out = Vec::new();

    transpositions(&chars, &mut out);
    if chars.len() >= 4 {
        omissions(&chars, &mut out);
    }
    duplications(&chars, &mut out);
    if let Some(adj) = adjacency {
        insertions(&chars, adj, &mut out);
        replacements(&chars, adj, &mut out);
    }

    out
}

fn transpositions(chars: &[char], out: &mut Vec<String>) {
    for i in 0..chars.len().saturating_sub(1) {
        let mut v = chars.to_vec();
        v.swap(i, i + 1);
        out.push(v.into_iter().collect());
    }
}

fn omissions(chars: &[char], out: &mut Vec<String>) {
    for i in 0..chars.len() {
        let mut v = chars.to_vec();
        v.remove(i);
        out.push(v.into_iter().collect());
    }
}

fn duplications(chars: &[char], out: &mut Vec<String>) {
    for i in 0..chars.len() {
        let mut v = chars.to_vec();
        v.insert(i, chars[i]);
        out.push(v.into_iter().collect());
    }
}

fn insertions(chars: &[char], adjacency: &AdjacencyMap, out: &mut Vec<String>) {
    for i in 0..chars.len() {
        if let Some(neighbors) = adjacency.get(&chars[i]) {
            for n in neighbors.chars() {
                let mut v = chars.to_vec();
                v.insert(i, n);
                out.push(v.into_iter().collect());
                let mut v = chars.to_vec();
                v.insert(i + 1, n);
                out.push(v.into_iter().collect());
            }
        }
    }
}

fn replacements(chars: &[char], adjacency: &AdjacencyMap, out: &mut Vec<String>) {
    for i in 0..chars.len() {
        if let Some(neighbors) = adjacency.get(&chars[i]) {
            for n in neighbors.chars() {
                let mut v = chars.to_vec();
                v[i] = n;
                out.push(v.into_iter().collect());
            }
        }
    }
}
