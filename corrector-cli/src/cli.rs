//! CLI surface (spec §6): one flat argument struct, no subcommands.

use std::path::PathBuf;

use clap::Parser;

use corrector_core::config::Platform;

#[derive(Parser, Debug)]
#[command(name = "corrector")]
#[command(about = "Synthesize an autocorrect dictionary from a word corpus", long_about = None)]
pub struct Cli {
    /// Target matcher personality.
    #[arg(long, value_parser = parse_platform, default_value = "expander")]
    pub platform: Platform,

    /// Request this many most-frequent words from the word source.
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Newline-delimited words that bypass frequency filtering.
    #[arg(long)]
    pub include: Option<PathBuf>,

    /// Exclusion rule file (word patterns and typo->word rules).
    #[arg(long)]
    pub exclude: Option<PathBuf>,

    /// `key -> adjacent_keys` file used for insertion/replacement typos.
    #[arg(long)]
    pub adjacent_letters: Option<PathBuf>,

    /// Output directory (expander) or file (firmware).
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Hard cap on the number of corrections (firmware only).
    #[arg(long)]
    pub max_corrections: Option<usize>,

    /// Minimum frequency-ratio margin a collision winner must clear.
    #[arg(long)]
    pub freq_ratio: Option<f64>,

    #[arg(long)]
    pub max_word_length: Option<usize>,

    #[arg(long)]
    pub min_word_length: Option<usize>,

    #[arg(long)]
    pub min_typo_length: Option<usize>,

    /// Maximum entries per expander output file.
    #[arg(long)]
    pub max_entries_per_file: Option<usize>,

    /// Drop generated typos whose own frequency exceeds this (0 disables).
    #[arg(long)]
    pub typo_freq_threshold: Option<f64>,

    /// Worker thread count for stage 2 (default: available parallelism).
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Write a timestamped reports subfolder here.
    #[arg(long)]
    pub reports: Option<PathBuf>,

    #[arg(long)]
    pub verbose: bool,

    #[arg(long)]
    pub debug: bool,

    /// JSON config file; CLI flags override values it sets.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Newline-delimited `word\tfrequency` word source; falls back to a
    /// tiny embedded seed list when omitted (spec §6 didn't anticipate a
    /// standalone binary, this flag is the CLI-only bridge to one).
    #[arg(long)]
    pub wordlist: Option<PathBuf>,

    /// Only trace records touching these words.
    #[arg(long)]
    pub debug_words: Vec<String>,

    /// Only trace records touching these typos.
    #[arg(long)]
    pub debug_typos: Vec<String>,
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    s.parse()
}
