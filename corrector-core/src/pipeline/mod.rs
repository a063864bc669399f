//! The six-stage solver (spec §2). [`run`] wires the stages together;
//! each stage is otherwise independently testable.

pub mod stage1_load;
pub mod stage2_typo_generation;
pub mod stage3_collision;
pub mod stage4_patterns;
pub mod stage5_conflicts;
pub mod stage6_platform;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::config::Config;
use crate::correction::Correction;
use crate::dictionary::WordSource;
use crate::error::CorrectorError;
use crate::exclusions::ExclusionRule;
use crate::index::BoundaryIndex;
use crate::pattern::Pattern;
use crate::reports::{StageReports, StageStat};
use crate::tracer::{DebugSelector, Tracer};
use crate::typo_gen::AdjacencyMap;

/// Everything stage 1 produces and every later stage reads.
pub struct Dictionaries {
    pub validation_set: HashSet<String>,
    pub source_words: HashSet<String>,
    pub user_words: HashSet<String>,
    pub exclusion_rules: Vec<ExclusionRule>,
    pub adjacency: AdjacencyMap,
    pub validation_index: BoundaryIndex,
    pub source_index: BoundaryIndex,
}

/// The frozen, immutable snapshot handed to every stage-2 worker (spec §5,
/// §9 "Replacing shared mutable state"). No hidden state: workers only see
/// what is reachable from this struct.
pub struct WorkerContext {
    pub adjacency: AdjacencyMap,
    pub typo_freq_threshold: f64,
    pub word_source: Arc<dyn WordSource>,
    pub tracer_enabled: bool,
    pub debug_selector: DebugSelector,
}

/// Result of the whole pipeline.
pub struct PipelineOutput {
    pub corrections: Vec<Correction>,
    pub patterns: Vec<Pattern>,
    pub reports: StageReports,
}

/// Run stages 1-6 in order. `word_source` backs frequency/membership
/// lookups everywhere they're needed (stage 1's `top_n`, stage 3's
/// per-candidate frequency resolution, stage 6's ranking).
pub fn run(
    config: &Config,
    word_source: Arc<dyn WordSource>,
    cancel: &AtomicBool,
) -> Result<PipelineOutput, CorrectorError> {
    let tracer_enabled = config.debug;
    let selector = DebugSelector::new(
        config.debug_words.iter().cloned(),
        config.debug_typos.iter().cloned(),
    );
    let mut tracer = Tracer::new(tracer_enabled, selector.clone());
    let mut reports = StageReports::default();

    log::info!("stage 1: loading dictionaries");
    let dicts = stage1_load::load_dictionaries(config, word_source.as_ref())?;
    reports.stage_stats.push(StageStat {
        stage: "stage1_load",
        kept: dicts.source_words.len(),
        dropped: 0,
        expected_share: 5.0,
    });

    log::info!(
        "stage 2: generating typos for {} source words across {} workers",
        dicts.source_words.len(),
        config.jobs
    );
    let worker_ctx = WorkerContext {
        adjacency: dicts.adjacency.clone(),
        typo_freq_threshold: config.typo_freq_threshold,
        word_source: word_source.clone(),
        tracer_enabled,
        debug_selector: selector,
    };
    let (candidate_map, worker_traces) =
        stage2_typo_generation::generate_all(&dicts.source_words, &worker_ctx, cancel);
    tracer.merge(worker_traces);
    reports.stage_stats.push(StageStat {
        stage: "stage2_typo_generation",
        kept: candidate_map.len(),
        dropped: 0,
        expected_share: 10.0,
    });

    log::info!("stage 3: resolving collisions for {} typos", candidate_map.len());
    let frequencies = precompute_frequencies(&candidate_map, word_source.as_ref());
    let stage3_out = stage3_collision::resolve(
        &candidate_map,
        &dicts,
        config,
        &frequencies,
        &mut tracer,
    );
    reports.ambiguous_collisions.extend(stage3_out.ambiguous_collisions);
    reports.dropped_too_short.extend(stage3_out.dropped_too_short);
    reports.excluded.extend(stage3_out.excluded);
    reports.stage_stats.push(StageStat {
        stage: "stage3_collision_resolution",
        kept: stage3_out.accepted.len(),
        dropped: reports.dropped_too_short.len() + reports.excluded.len(),
        expected_share: 25.0,
    });

    log::info!("stage 4: generalizing patterns over {} corrections", stage3_out.accepted.len());
    let stage4_out = stage4_patterns::generalize(
        stage3_out.accepted,
        &dicts,
        config,
        &frequencies,
        config.platform,
        &mut tracer,
    );
    reports.accepted_patterns.extend(stage4_out.patterns.clone());
    reports.rejected_patterns.extend(stage4_out.rejected);
    reports.stage_stats.push(StageStat {
        stage: "stage4_pattern_generalization",
        kept: stage4_out.corrections.len(),
        dropped: 0,
        expected_share: 20.0,
    });

    log::info!("stage 5: removing substring conflicts over {} corrections", stage4_out.corrections.len());
    let stage5_out = stage5_conflicts::remove_conflicts(stage4_out.corrections);
    reports.substring_conflicts.extend(stage5_out.removed.clone());
    reports.stage_stats.push(StageStat {
        stage: "stage5_substring_conflicts",
        kept: stage5_out.kept.len(),
        dropped: stage5_out.removed.len(),
        expected_share: 15.0,
    });

    log::info!("stage 6: platform filter, rank and emit");
    let stage6_out = stage6_platform::finalize(
        stage5_out.kept,
        stage4_out.patterns,
        &dicts,
        config,
        &frequencies,
    );
    reports.firmware_substring_conflicts.extend(stage6_out.firmware_substring_conflicts);
    reports.stage_stats.push(StageStat {
        stage: "stage6_platform",
        kept: stage6_out.corrections.len(),
        dropped: stage6_out.dropped,
        expected_share: 15.0,
    });

    if tracer.is_enabled() {
        for record in tracer.records() {
            log::debug!(
                "trace[{}] {} typo={} word={} boundary={:?}: {}",
                record.stage,
                record.event,
                record.typo,
                record.word,
                record.boundary,
                record.reason
            );
        }
    }

    Ok(PipelineOutput {
        corrections: stage6_out.corrections,
        patterns: stage6_out.patterns,
        reports,
    })
}

/// Batch all frequency lookups the rest of the pipeline could possibly
/// need in one pass, so stages 3 and 6 rescore for free (spec §4.6).
fn precompute_frequencies(
    candidate_map: &HashMap<String, std::collections::BTreeSet<String>>,
    word_source: &dyn WordSource,
) -> HashMap<String, f64> {
    let mut freqs = HashMap::new();
    for words in candidate_map.values() {
        for w in words {
            freqs.entry(w.clone()).or_insert_with(|| word_source.frequency(w));
        }
    }
    freqs
}
