//! Generalized affix-substitution rules produced by stage 4.

use crate::boundary::Boundary;
use crate::correction::Correction;

/// A generalized correction standing in for a family of concrete
/// corrections that all share the same affix substitution.
#[derive(Clone, Debug)]
pub struct Pattern {
    pub typo_frag: String,
    pub word_frag: String,
    pub boundary: Boundary,
    /// The concrete corrections this pattern subsumes. Owned here; no
    /// pattern ever outlives its replacement list and no cycles arise
    /// (spec §9 "Cyclic references via indices").
    pub replacements: Vec<Correction>,
}

impl Pattern {
    pub fn new(typo_frag: impl Into<String>, word_frag: impl Into<String>, boundary: Boundary) -> Self {
        Pattern {
            typo_frag: typo_frag.into(),
            word_frag: word_frag.into(),
            boundary,
            replacements: Vec::new(),
        }
    }

    /// Apply the fragment substitution to a full typo, producing the word
    /// it should resolve to, according to this pattern's boundary
    /// direction (suffix substitution for `Right`, prefix for `Left`/other).
    pub fn apply(&self, typo: &str) -> Option<String> {
        match self.boundary {
            Boundary::Right => {
                let stem = typo.strip_suffix(self.typo_frag.as_str())?;
                Some(format!("{stem}{}", self.word_frag))
            }
            _ => {
                let stem = typo.strip_prefix(self.typo_frag.as_str())?;
                Some(format!("{}{stem}", self.word_frag))
            }
        }
    }

    /// Forward-composition law (spec §8 property 5): applying the pattern
    /// to every replacement's typo reproduces that replacement's word.
    pub fn is_consistent(&self) -> bool {
        self.replacements
            .iter()
            .all(|c| self.apply(&c.typo).as_deref() == Some(c.word.as_str()))
    }
}
