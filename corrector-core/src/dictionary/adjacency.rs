//! `--adjacent-letters` file format: `key -> string_of_adjacent_keys`,
//! `#` comments allowed.

use crate::typo_gen::AdjacencyMap;

pub fn parse_adjacency_file(contents: &str) -> AdjacencyMap {
    let mut map = AdjacencyMap::new();
    for line in contents.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }
        if let Some((key, neighbors)) = line.split_once("->") {
            let key = key.trim();
            let neighbors = neighbors.trim();
            if let Some(c) = key.chars().next() {
                if key.chars().count() == 1 {
                    map.insert(c, neighbors.to_string());
                }
            }
        }
    }
    map
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}
