//! Standalone-binary bridge for [`corrector_core::dictionary::WordSource`]
//! (spec §6 + SPEC_FULL §6 "CLI-only flag layered on top").

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use corrector_core::dictionary::WordSource;

/// `word\tfrequency`, most frequent first is not required: this provider
/// sorts once at load time.
pub struct FileWordSource {
    frequencies: HashMap<String, f64>,
    ranked: Vec<String>,
}

impl FileWordSource {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading wordlist `{}`", path.display()))?;
        Ok(Self::from_lines(&contents))
    }

    /// Tiny embedded fallback so the binary runs standalone with no
    /// `--wordlist` argument. Not a substitute for a real corpus.
    pub fn embedded_seed() -> Self {
        Self::from_lines(SEED_WORDLIST)
    }

    fn from_lines(contents: &str) -> Self {
        let mut entries: Vec<(String, f64)> = Vec::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '\t');
            let Some(word) = parts.next() else { continue };
            let freq: f64 = parts.next().and_then(|f| f.trim().parse().ok()).unwrap_or(0.0);
            entries.push((word.trim().to_lowercase(), freq));
        }
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let ranked = entries.iter().map(|(w, _)| w.clone()).collect();
        let frequencies = entries.into_iter().collect();
        FileWordSource { frequencies, ranked }
    }
}

impl WordSource for FileWordSource {
    fn contains(&self, word: &str) -> bool {
        self.frequencies.contains_key(word)
    }

    fn frequency(&self, word: &str) -> f64 {
        self.frequencies.get(word).copied().unwrap_or(0.0)
    }

    fn top_n(&self, n: usize) -> Vec<String> {
        self.ranked.iter().take(n).cloned().collect()
    }

    fn dictionary_words(&self) -> Vec<String> {
        self.ranked.clone()
    }
}

const SEED_WORDLIST: &str = "\
the\t0.05
be\t0.04
to\t0.035
of\t0.03
and\t0.028
a\t0.026
in\t0.024
that\t0.012
have\t0.011
it\t0.010
for\t0.009
not\t0.008
on\t0.007
with\t0.007
he\t0.006
as\t0.006
you\t0.006
do\t0.005
at\t0.005
this\t0.005
but\t0.004
his\t0.004
by\t0.004
from\t0.004
they\t0.003
we\t0.003
say\t0.003
her\t0.003
she\t0.003
or\t0.003
an\t0.003
will\t0.003
my\t0.003
one\t0.002
all\t0.002
would\t0.002
there\t0.002
their\t0.002
what\t0.002
so\t0.002
up\t0.002
out\t0.002
if\t0.002
about\t0.002
who\t0.002
get\t0.002
which\t0.002
go\t0.002
me\t0.002
when\t0.002
make\t0.002
";
