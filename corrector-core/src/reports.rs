//! Human-readable and machine-readable run reports (spec §6 "Reports
//! directory"). Classification outcomes from stages 3-5 are first-class
//! reported data, not errors (spec §7).

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::boundary::Boundary;
use crate::correction::Correction;
use crate::pattern::Pattern;

/// A typo with more than one surviving candidate word in the same
/// boundary group, dropped because no candidate cleared `freq_ratio`.
#[derive(Clone, Debug)]
pub struct AmbiguousCollision {
    pub typo: String,
    pub boundary: Boundary,
    /// `(word, frequency)`, sorted descending by frequency.
    pub candidates: Vec<(String, f64)>,
}

/// One row of the `statistics.csv` machine-readable summary.
///
/// `expected_share` is a placeholder, not a measurement: the fixed
/// budget share from spec §2's stage table, not a timed fraction of a
/// real run (the pipeline never instruments wall-clock time per stage).
#[derive(Clone, Debug)]
pub struct StageStat {
    pub stage: &'static str,
    pub kept: usize,
    pub dropped: usize,
    pub expected_share: f64,
}

/// A rejected pattern and the reason stage 4 rejected it.
#[derive(Clone, Debug)]
pub struct RejectedPattern {
    pub typo_frag: String,
    pub word_frag: String,
    pub boundary: Boundary,
    pub reason: String,
}

/// A substring conflict: `removed` is unreachable because `kept` would
/// always fire first (spec §4.5).
#[derive(Clone, Debug)]
pub struct SubstringConflict {
    pub kept: Correction,
    pub removed: Correction,
}

/// Everything the run accumulated across stages, ready to be rendered to
/// the reports directory or inspected by tests.
#[derive(Default, Clone, Debug)]
pub struct StageReports {
    pub ambiguous_collisions: Vec<AmbiguousCollision>,
    pub dropped_too_short: Vec<Correction>,
    pub excluded: Vec<Correction>,
    pub substring_conflicts: Vec<SubstringConflict>,
    pub firmware_substring_conflicts: Vec<SubstringConflict>,
    pub accepted_patterns: Vec<Pattern>,
    pub rejected_patterns: Vec<RejectedPattern>,
    pub stage_stats: Vec<StageStat>,
}

/// Writes [`StageReports`] into a directory the caller has already created
/// (typically a timestamped subfolder of `--reports`; the timestamp itself
/// is the caller's concern, keeping this library free of wall-clock reads).
pub struct ReportWriter<'a> {
    dir: &'a Path,
}

impl<'a> ReportWriter<'a> {
    pub fn new(dir: &'a Path) -> Self {
        ReportWriter { dir }
    }

    pub fn write_all(&self, reports: &StageReports) -> io::Result<()> {
        self.write_summary(reports)?;
        self.write_patterns(reports)?;
        self.write_conflicts(reports)?;
        self.write_collisions(reports)?;
        self.write_short_typos(reports)?;
        self.write_exclusions(reports)?;
        self.write_statistics_csv(reports)?;
        Ok(())
    }

    fn create(&self, name: &str) -> io::Result<File> {
        File::create(self.dir.join(name))
    }

    fn write_summary(&self, reports: &StageReports) -> io::Result<()> {
        let mut f = self.create("summary.txt")?;
        writeln!(f, "ambiguous_collisions: {}", reports.ambiguous_collisions.len())?;
        writeln!(f, "dropped_too_short: {}", reports.dropped_too_short.len())?;
        writeln!(f, "excluded: {}", reports.excluded.len())?;
        writeln!(f, "substring_conflicts: {}", reports.substring_conflicts.len())?;
        writeln!(
            f,
            "firmware_substring_conflicts: {}",
            reports.firmware_substring_conflicts.len()
        )?;
        writeln!(f, "accepted_patterns: {}", reports.accepted_patterns.len())?;
        writeln!(f, "rejected_patterns: {}", reports.rejected_patterns.len())?;
        Ok(())
    }

    fn write_patterns(&self, reports: &StageReports) -> io::Result<()> {
        let mut f = self.create("patterns.txt")?;
        for p in &reports.accepted_patterns {
            writeln!(
                f,
                "{} -> {} ({}) [{} replacements]",
                p.typo_frag,
                p.word_frag,
                p.boundary,
                p.replacements.len()
            )?;
        }
        for r in &reports.rejected_patterns {
            writeln!(
                f,
                "REJECTED {} -> {} ({}): {}",
                r.typo_frag, r.word_frag, r.boundary, r.reason
            )?;
        }
        Ok(())
    }

    fn write_conflicts(&self, reports: &StageReports) -> io::Result<()> {
        for boundary in [Boundary::None, Boundary::Left, Boundary::Right, Boundary::Both] {
            let mut f = self.create(&format!("conflicts_{boundary}.txt"))?;
            for c in reports
                .substring_conflicts
                .iter()
                .chain(&reports.firmware_substring_conflicts)
                .filter(|c| c.removed.boundary == boundary)
            {
                writeln!(
                    f,
                    "{} -> {} removed (blocked by {} -> {})",
                    c.removed.typo, c.removed.word, c.kept.typo, c.kept.word
                )?;
            }
        }
        Ok(())
    }

    fn write_collisions(&self, reports: &StageReports) -> io::Result<()> {
        let mut f = self.create("collisions.txt")?;
        for c in &reports.ambiguous_collisions {
            write!(f, "{} ({}):", c.typo, c.boundary)?;
            for (word, freq) in &c.candidates {
                write!(f, " {word}({freq:.6})")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }

    fn write_short_typos(&self, reports: &StageReports) -> io::Result<()> {
        let mut f = self.create("short_typos.txt")?;
        for c in &reports.dropped_too_short {
            writeln!(f, "{} -> {} ({})", c.typo, c.word, c.boundary)?;
        }
        Ok(())
    }

    fn write_exclusions(&self, reports: &StageReports) -> io::Result<()> {
        let mut f = self.create("exclusions.txt")?;
        for c in &reports.excluded {
            writeln!(f, "{} -> {} ({})", c.typo, c.word, c.boundary)?;
        }
        Ok(())
    }

    fn write_statistics_csv(&self, reports: &StageReports) -> io::Result<()> {
        let path = self.dir.join("statistics.csv");
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["stage", "kept", "dropped", "expected_share"])?;
        for stat in &reports.stage_stats {
            writer.write_record([
                stat.stage,
                &stat.kept.to_string(),
                &stat.dropped.to_string(),
                &stat.expected_share.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}
