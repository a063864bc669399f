//! Binary entry point: parse CLI, load config, run the pipeline, emit
//! output and reports (spec §6, §7).

mod cli;
mod providers;

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use corrector_core::config::{Config, PartialConfig};
use corrector_core::dictionary::WordSource;
use corrector_core::error::CorrectorError;
use corrector_core::platform::personality_for;
use corrector_core::reports::ReportWriter;

use cli::Cli;
use providers::FileWordSource;

/// Exit code 0 (including an empty result) or 1 on any other failure
/// (spec §7); clap itself exits 2 on usage errors before `main` runs.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(&cli);
    run(cli)
}

/// `--verbose`/`--debug` raise the default log filter to `debug`;
/// per-record tracer output (spec §9) rides the same `log::debug!` level,
/// gated separately inside the pipeline by `Config::debug`. `RUST_LOG`
/// still overrides this default when set.
fn init_logger(cli: &Cli) {
    let default_level = if cli.verbose || cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;

    let word_source: Arc<dyn WordSource> = match &cli.wordlist {
        Some(path) => Arc::new(FileWordSource::from_path(path)?),
        None => {
            log::warn!("no --wordlist given, using the tiny embedded seed list");
            Arc::new(FileWordSource::embedded_seed())
        }
    };

    let cancel = AtomicBool::new(false);
    let output = corrector_core::pipeline::run(&config, word_source, &cancel)
        .map_err(map_pipeline_error)?;

    if output.corrections.is_empty() && output.patterns.is_empty() {
        log::warn!("no corrections survived the pipeline; writing empty output");
    }

    let personality = personality_for(config.platform);
    let entries: Vec<corrector_core::platform::Entry> = output
        .corrections
        .iter()
        .cloned()
        .map(corrector_core::platform::Entry::Direct)
        .chain(output.patterns.iter().cloned().map(corrector_core::platform::Entry::Pattern))
        .collect();
    personality
        .emit(&config.output, &entries, config.max_entries_per_file)
        .with_context(|| format!("writing output to `{}`", config.output.display()))?;

    if let Some(reports_root) = &config.reports {
        let dir = timestamped_reports_dir(reports_root);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating reports directory `{}`", dir.display()))?;
        ReportWriter::new(&dir)
            .write_all(&output.reports)
            .with_context(|| format!("writing reports to `{}`", dir.display()))?;
    }

    log::info!(
        "wrote {} corrections and {} patterns",
        output.corrections.len(),
        output.patterns.len()
    );
    Ok(())
}

fn build_config(cli: &Cli) -> Result<Config> {
    let json = match &cli.config {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading config `{}`", path.display()))?;
            PartialConfig::from_json_str(&contents)
                .with_context(|| format!("parsing config `{}`", path.display()))?
        }
        None => PartialConfig::default(),
    };

    let cli_partial = PartialConfig {
        top_n: cli.top_n,
        max_word_length: cli.max_word_length,
        min_word_length: cli.min_word_length,
        min_typo_length: cli.min_typo_length,
        freq_ratio: cli.freq_ratio,
        typo_freq_threshold: cli.typo_freq_threshold,
        output: cli.output.clone(),
        include: cli.include.clone(),
        exclude: cli.exclude.clone(),
        adjacent_letters: cli.adjacent_letters.clone(),
        verbose: if cli.verbose { Some(true) } else { None },
        debug: if cli.debug { Some(true) } else { None },
        jobs: cli.jobs,
        max_entries_per_file: cli.max_entries_per_file,
        reports: cli.reports.clone(),
        platform: Some(cli.platform),
        max_corrections: cli.max_corrections,
        debug_words: if cli.debug_words.is_empty() {
            None
        } else {
            Some(cli.debug_words.iter().cloned().collect())
        },
        debug_typos: if cli.debug_typos.is_empty() {
            None
        } else {
            Some(cli.debug_typos.iter().cloned().collect())
        },
    };

    let merged = PartialConfig::merge_cli_over(cli_partial, json);
    Config::finalize(merged).map_err(anyhow::Error::from)
}

fn map_pipeline_error(err: CorrectorError) -> anyhow::Error {
    anyhow::Error::from(err)
}

fn timestamped_reports_dir(root: &std::path::Path) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    root.join(format!("run-{stamp}"))
}
