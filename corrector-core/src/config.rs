//! Pipeline configuration: defaults, JSON loading, CLI-overrides-JSON merge,
//! and validation (spec §6, §9 "Enumerated configuration").

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CorrectorError;

/// Target matcher personality (spec §4.6).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Expander,
    Firmware,
}

impl Default for Platform {
    fn default() -> Self {
        Platform::Expander
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expander" => Ok(Platform::Expander),
            "firmware" => Ok(Platform::Firmware),
            other => Err(format!("unknown platform `{other}` (expected expander|firmware)")),
        }
    }
}

/// Every field is optional so JSON files and CLI args can each specify a
/// subset; [`merge`] resolves CLI-over-JSON-over-hardcoded-fallback.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
pub struct PartialConfig {
    pub top_n: Option<usize>,
    pub max_word_length: Option<usize>,
    pub min_word_length: Option<usize>,
    pub min_typo_length: Option<usize>,
    pub freq_ratio: Option<f64>,
    pub typo_freq_threshold: Option<f64>,
    pub output: Option<PathBuf>,
    pub include: Option<PathBuf>,
    pub exclude: Option<PathBuf>,
    pub adjacent_letters: Option<PathBuf>,
    pub verbose: Option<bool>,
    pub debug: Option<bool>,
    pub jobs: Option<usize>,
    pub max_entries_per_file: Option<usize>,
    pub reports: Option<PathBuf>,
    pub platform: Option<Platform>,
    pub max_corrections: Option<usize>,
    pub debug_words: Option<HashSet<String>>,
    pub debug_typos: Option<HashSet<String>>,
}

impl PartialConfig {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// CLI values take priority over JSON values, field by field.
    pub fn merge_cli_over(cli: PartialConfig, json: PartialConfig) -> PartialConfig {
        PartialConfig {
            top_n: cli.top_n.or(json.top_n),
            max_word_length: cli.max_word_length.or(json.max_word_length),
            min_word_length: cli.min_word_length.or(json.min_word_length),
            min_typo_length: cli.min_typo_length.or(json.min_typo_length),
            freq_ratio: cli.freq_ratio.or(json.freq_ratio),
            typo_freq_threshold: cli.typo_freq_threshold.or(json.typo_freq_threshold),
            output: cli.output.or(json.output),
            include: cli.include.or(json.include),
            exclude: cli.exclude.or(json.exclude),
            adjacent_letters: cli.adjacent_letters.or(json.adjacent_letters),
            verbose: cli.verbose.or(json.verbose),
            debug: cli.debug.or(json.debug),
            jobs: cli.jobs.or(json.jobs),
            max_entries_per_file: cli.max_entries_per_file.or(json.max_entries_per_file),
            reports: cli.reports.or(json.reports),
            platform: cli.platform.or(json.platform),
            max_corrections: cli.max_corrections.or(json.max_corrections),
            debug_words: cli.debug_words.or(json.debug_words),
            debug_typos: cli.debug_typos.or(json.debug_typos),
        }
    }
}

/// Fully resolved, validated configuration driving a pipeline run.
#[derive(Clone, Debug)]
pub struct Config {
    pub top_n: Option<usize>,
    pub max_word_length: usize,
    pub min_word_length: usize,
    pub min_typo_length: usize,
    pub freq_ratio: f64,
    pub typo_freq_threshold: f64,
    pub output: PathBuf,
    pub include: Option<PathBuf>,
    pub exclude: Option<PathBuf>,
    pub adjacent_letters: Option<PathBuf>,
    pub verbose: bool,
    pub debug: bool,
    pub jobs: usize,
    pub max_entries_per_file: usize,
    pub reports: Option<PathBuf>,
    pub platform: Platform,
    pub max_corrections: Option<usize>,
    pub debug_words: HashSet<String>,
    pub debug_typos: HashSet<String>,
}

impl Config {
    /// Fill defaults for anything left unset and validate the result.
    pub fn finalize(partial: PartialConfig) -> Result<Config, CorrectorError> {
        let config = Config {
            top_n: partial.top_n,
            max_word_length: partial.max_word_length.unwrap_or(10),
            min_word_length: partial.min_word_length.unwrap_or(3),
            min_typo_length: partial.min_typo_length.unwrap_or(3),
            freq_ratio: partial.freq_ratio.unwrap_or(10.0),
            typo_freq_threshold: partial.typo_freq_threshold.unwrap_or(0.0),
            output: partial.output.unwrap_or_else(|| PathBuf::from("out")),
            include: partial.include,
            exclude: partial.exclude,
            adjacent_letters: partial.adjacent_letters,
            verbose: partial.verbose.unwrap_or(false),
            debug: partial.debug.unwrap_or(false),
            jobs: partial.jobs.unwrap_or_else(num_cpus_fallback),
            max_entries_per_file: partial.max_entries_per_file.unwrap_or(500),
            reports: partial.reports,
            platform: partial.platform.unwrap_or_default(),
            max_corrections: partial.max_corrections,
            debug_words: partial.debug_words.unwrap_or_default(),
            debug_typos: partial.debug_typos.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CorrectorError> {
        let fail = |field: &str, message: String| {
            Err(CorrectorError::Configuration {
                field: field.to_string(),
                message,
            })
        };

        if self.min_typo_length < 1 {
            return fail(
                "min_typo_length",
                format!("must be >= 1, got {}", self.min_typo_length),
            );
        }
        if self.min_word_length < 1 {
            return fail(
                "min_word_length",
                format!("must be >= 1, got {}", self.min_word_length),
            );
        }
        if self.max_word_length < self.min_word_length {
            return fail(
                "max_word_length",
                format!(
                    "{} must be >= min_word_length ({})",
                    self.max_word_length, self.min_word_length
                ),
            );
        }
        if self.freq_ratio <= 0.0 {
            return fail("freq_ratio", format!("must be > 0, got {}", self.freq_ratio));
        }
        if let Some(top_n) = self.top_n {
            if top_n < 1 {
                return fail("top_n", format!("must be >= 1, got {top_n}"));
            }
        }
        if let Some(max_corrections) = self.max_corrections {
            if max_corrections < 1 {
                return fail(
                    "max_corrections",
                    format!("must be >= 1, got {max_corrections}"),
                );
            }
        }
        if self.max_entries_per_file < 1 {
            return fail(
                "max_entries_per_file",
                format!("must be >= 1, got {}", self.max_entries_per_file),
            );
        }
        if self.typo_freq_threshold < 0.0 {
            return fail(
                "typo_freq_threshold",
                format!("must be >= 0, got {}", self.typo_freq_threshold),
            );
        }
        if self.jobs < 1 {
            return fail("jobs", format!("must be >= 1, got {}", self.jobs));
        }
        Ok(())
    }
}

fn num_cpus_fallback() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = Config::finalize(PartialConfig::default()).unwrap();
        assert_eq!(cfg.min_typo_length, 3);
        assert_eq!(cfg.freq_ratio, 10.0);
        assert_eq!(cfg.platform, Platform::Expander);
    }

    #[test]
    fn rejects_bad_length_relationship() {
        let partial = PartialConfig {
            max_word_length: Some(2),
            min_word_length: Some(5),
            ..Default::default()
        };
        assert!(Config::finalize(partial).is_err());
    }

    #[test]
    fn cli_overrides_json() {
        let json = PartialConfig {
            freq_ratio: Some(5.0),
            ..Default::default()
        };
        let cli = PartialConfig {
            freq_ratio: Some(20.0),
            ..Default::default()
        };
        let merged = PartialConfig::merge_cli_over(cli, json);
        assert_eq!(merged.freq_ratio, Some(20.0));
    }

    #[test]
    fn json_fills_what_cli_leaves_unset() {
        let json = PartialConfig {
            min_typo_length: Some(2),
            ..Default::default()
        };
        let cli = PartialConfig::default();
        let merged = PartialConfig::merge_cli_over(cli, json);
        assert_eq!(merged.min_typo_length, Some(2));
    }
}
