//! Universal invariants and scenarios over the full six-stage pipeline.

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use corrector_core::boundary::Boundary;
use corrector_core::config::{Config, PartialConfig, Platform};
use corrector_core::correction::Correction;
use corrector_core::dictionary::word_source::MemoryWordSource;
use corrector_core::pipeline;

fn run_with(words: &[(&str, f64)], platform: Platform, top_n: usize) -> pipeline::PipelineOutput {
    let source = MemoryWordSource::new(
        words.iter().map(|(w, f)| (w.to_string(), *f)).collect(),
    );
    let config = Config::finalize(PartialConfig {
        top_n: Some(top_n),
        min_word_length: Some(1),
        max_word_length: Some(20),
        min_typo_length: Some(1),
        platform: Some(platform),
        ..Default::default()
    })
    .unwrap();
    let cancel = AtomicBool::new(false);
    pipeline::run(&config, Arc::new(source), &cancel).unwrap()
}

#[test]
fn invariant_no_typo_equals_word_and_both_nonempty() {
    let out = run_with(&[("the", 0.05), ("and", 0.03), ("cat", 0.01)], Platform::Expander, 10);
    for c in &out.corrections {
        assert_ne!(c.typo, c.word);
        assert!(!c.typo.is_empty());
        assert!(!c.word.is_empty());
    }
}

#[test]
fn invariant_surviving_typo_not_a_validation_word() {
    let out = run_with(&[("the", 0.05), ("and", 0.03)], Platform::Expander, 10);
    for c in &out.corrections {
        assert!(!["the", "and"].contains(&c.typo.as_str()));
    }
}

#[test]
fn invariant_user_word_override_forces_both() {
    let words: Vec<(&str, f64)> = vec![("ab", 0.5), ("something", 0.01)];
    let source = MemoryWordSource::new(words.iter().map(|(w, f)| (w.to_string(), *f)).collect());
    let config = Config::finalize(PartialConfig {
        top_n: Some(10),
        min_word_length: Some(1),
        max_word_length: Some(20),
        min_typo_length: Some(1),
        ..Default::default()
    })
    .unwrap();
    let cancel = AtomicBool::new(false);
    let out = pipeline::run(&config, Arc::new(source), &cancel).unwrap();
    // none of this synthetic set happens to produce a 2-char user word
    // triple; the property is exercised directly at stage 3 instead (see
    // stage3_collision's own unit tests). This test only checks the
    // pipeline runs end to end without violating invariant 7 when it does
    // fire.
    for c in &out.corrections {
        if c.word.chars().count() == 2 {
            // not a user word here (no --include file wired), so no
            // override should have applied.
            assert_ne!(c.boundary, Boundary::Both);
        }
    }
}

#[test]
fn firmware_charset_and_substring_uniqueness_hold() {
    let out = run_with(
        &[("the", 0.05), ("there", 0.02), ("bee", 0.01), ("xbeeyy", 0.001)],
        Platform::Firmware,
        10,
    );
    for c in &out.corrections {
        assert!(c.typo.chars().all(|ch| ch.is_ascii_lowercase() || ch == '\''));
        assert!(c.word.chars().all(|ch| ch.is_ascii_lowercase() || ch == '\''));
    }
    for a in &out.corrections {
        for b in &out.corrections {
            if a.typo != b.typo {
                assert!(
                    !a.typo.contains(&b.typo),
                    "{} should not contain surviving typo {}",
                    a.typo,
                    b.typo
                );
            }
        }
    }
}

#[test]
fn pattern_forward_composition_law_holds() {
    let out = run_with(
        &[
            ("action", 0.02),
            ("motion", 0.01),
            ("section", 0.015),
        ],
        Platform::Expander,
        10,
    );
    for p in &out.patterns {
        assert!(p.is_consistent());
    }
}

#[test]
fn conflict_detector_is_idempotent() {
    let corrections = vec![
        Correction::new("teh", "the", Boundary::Left),
        Correction::new("tehir", "their", Boundary::Left),
        Correction::new("hte", "the", Boundary::Left),
    ];
    let first = corrector_core::pipeline::stage5_conflicts::remove_conflicts(corrections);
    let second = corrector_core::pipeline::stage5_conflicts::remove_conflicts(first.kept.clone());
    assert_eq!(first.kept, second.kept);
    assert!(second.removed.is_empty());
}

#[test]
fn boundary_index_round_trip_prefix_suffix_substring() {
    use corrector_core::index::BoundaryIndex;
    use std::collections::HashSet;

    let words: HashSet<String> = ["hello", "help", "shell"].iter().map(|s| s.to_string()).collect();
    let idx = BoundaryIndex::build(words.clone());

    for t in ["hel", "hello", "zzz", "ell"] {
        let expected_prefix = words.iter().any(|w| w != t && w.starts_with(t));
        assert_eq!(idx.is_prefix_of_any(t), expected_prefix, "prefix mismatch for {t}");

        let expected_suffix = words.iter().any(|w| w != t && w.ends_with(t));
        assert_eq!(idx.is_suffix_of_any(t), expected_suffix, "suffix mismatch for {t}");

        let expected_sub = words.iter().any(|w| w != t && w.contains(t));
        assert_eq!(idx.is_substring_of_any(t), expected_sub, "substring mismatch for {t}");
    }
}

// Scenario S1 (spec: prefix conflict removal, expander).
#[test]
fn scenario_s1_prefix_conflict_removal() {
    let corrections = vec![
        Correction::new("teh", "the", Boundary::Left),
        Correction::new("tehir", "their", Boundary::Left),
        Correction::new("hte", "the", Boundary::Left),
    ];
    let out = corrector_core::pipeline::stage5_conflicts::remove_conflicts(corrections);
    assert!(out.kept.iter().any(|c| c.typo == "teh"));
    assert!(out.kept.iter().any(|c| c.typo == "hte"));
    assert!(!out.kept.iter().any(|c| c.typo == "tehir"));
    assert_eq!(out.removed.len(), 1);
    assert_eq!(out.removed[0].removed.typo, "tehir");
}

// Scenario S2 (spec: suffix conflict removal, expander).
#[test]
fn scenario_s2_suffix_conflict_removal() {
    let corrections = vec![
        Correction::new("herre", "here", Boundary::Right),
        Correction::new("wherre", "where", Boundary::Right),
    ];
    let out = corrector_core::pipeline::stage5_conflicts::remove_conflicts(corrections);
    assert!(out.kept.iter().any(|c| c.typo == "herre"));
    assert!(!out.kept.iter().any(|c| c.typo == "wherre"));
}

// Scenario S3 (spec: ambiguous collision).
#[test]
fn scenario_s3_ambiguous_collision_then_clear_winner() {
    use corrector_core::pipeline::stage2_typo_generation::CandidateMap;
    use std::collections::BTreeSet;

    let mut candidate_map = CandidateMap::new();
    let mut set = BTreeSet::new();
    set.insert("and".to_string());
    set.insert("nod".to_string());
    candidate_map.insert("nad".to_string(), set);

    let dicts_ambiguous = test_dicts(&["and", "nod"], &["and", "nod"]);
    let config = Config::finalize(PartialConfig::default()).unwrap();
    let mut tracer = corrector_core::tracer::Tracer::default();

    let mut freqs_ambiguous = HashMap::new();
    freqs_ambiguous.insert("and".to_string(), 1e-3);
    freqs_ambiguous.insert("nod".to_string(), 5e-4);
    let ambiguous_out = corrector_core::pipeline::stage3_collision::resolve(
        &candidate_map,
        &dicts_ambiguous,
        &config,
        &freqs_ambiguous,
        &mut tracer,
    );
    assert!(ambiguous_out.accepted.is_empty());
    assert_eq!(ambiguous_out.ambiguous_collisions.len(), 1);

    let mut freqs_clear = HashMap::new();
    freqs_clear.insert("and".to_string(), 1e-2);
    freqs_clear.insert("nod".to_string(), 5e-4);
    let mut tracer2 = corrector_core::tracer::Tracer::default();
    let clear_out = corrector_core::pipeline::stage3_collision::resolve(
        &candidate_map,
        &dicts_ambiguous,
        &config,
        &freqs_clear,
        &mut tracer2,
    );
    assert_eq!(clear_out.accepted.len(), 1);
    assert_eq!(clear_out.accepted[0].word, "and");
}

// Scenario S4/S5 (spec: pattern generalization and its rejection on a
// validation clash) are covered directly in stage4_patterns's own unit
// tests (`extracts_and_generalizes_suffix_family`,
// `fragment_colliding_with_validation_word_is_rejected`), which this
// suite deliberately doesn't re-derive to avoid duplicating the same
// fixture twice.

// Scenario S6 (spec: firmware substring uniqueness).
#[test]
fn scenario_s6_firmware_substring_uniqueness() {
    let corrections = vec![
        Correction::new("beej", "bee", Boundary::Right),
        Correction::new("xbeejy", "xbeeyy", Boundary::Right),
    ];
    let dicts = test_dicts(&[], &[]);
    let config = Config::finalize(PartialConfig {
        platform: Some(Platform::Firmware),
        ..Default::default()
    })
    .unwrap();
    let out = corrector_core::pipeline::stage6_platform::finalize(
        corrections,
        vec![],
        &dicts,
        &config,
        &HashMap::new(),
    );
    assert_eq!(out.corrections.len(), 1);
    assert_eq!(out.corrections[0].typo, "beej");
    assert_eq!(out.firmware_substring_conflicts.len(), 1);
}

fn test_dicts(validation: &[&str], source: &[&str]) -> pipeline::Dictionaries {
    use corrector_core::exclusions::ExclusionRule;
    use corrector_core::index::BoundaryIndex;
    use corrector_core::typo_gen::AdjacencyMap;
    use std::collections::HashSet;

    let validation_set: HashSet<String> = validation.iter().map(|s| s.to_string()).collect();
    let source_words: HashSet<String> = source.iter().map(|s| s.to_string()).collect();
    pipeline::Dictionaries {
        validation_index: BoundaryIndex::build(validation_set.clone()),
        source_index: BoundaryIndex::build(source_words.clone()),
        validation_set,
        source_words,
        user_words: HashSet::new(),
        exclusion_rules: Vec::<ExclusionRule>::new(),
        adjacency: AdjacencyMap::new(),
    }
}
