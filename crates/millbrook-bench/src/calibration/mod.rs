use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use millbrook_core::ghost::GhostRound;
use millbrook_core::model::course::{HOLES, HoleInfo};
use millbrook_core::model::junk::JunkFlags;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsCollector, AnalyticsError, AnalyticsSummary};
use crate::config::{CalibrationConfig, ConfigError, ResolvedOutputs};

/// Simulates ghost rounds for every configured handicap.
pub struct CalibrationRunner {
    config: CalibrationConfig,
    outputs: ResolvedOutputs,
    holes: [HoleInfo; HOLES],
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub rounds_played: usize,
    pub handicaps: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub analytics: AnalyticsSummary,
}

/// One simulated ghost round reduced to what calibration looks at.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub handicap: f64,
    pub seed: u64,
    pub scores: [u8; HOLES],
    pub total: u32,
    pub to_par: i32,
    pub birdies: u32,
    pub sandies: u32,
    pub greenies: u32,
    pub three_putts: u32,
    pub long_drives: u32,
}

impl RoundOutcome {
    pub fn from_round(round: &GhostRound, holes: &[HoleInfo; HOLES]) -> Self {
        let par: u32 = holes.iter().map(|hole| u32::from(hole.par)).sum();
        let total = round.total();
        let birdies = holes
            .iter()
            .zip(round.scores.iter())
            .filter(|(hole, score)| **score < hole.par)
            .count() as u32;
        let count = |pick: fn(&JunkFlags) -> bool| {
            round.junk.values().filter(|flags| pick(flags)).count() as u32
        };
        Self {
            handicap: round.index,
            seed: round.seed,
            scores: round.scores,
            total,
            to_par: total as i32 - par as i32,
            birdies,
            sandies: count(|flags| flags.sandie),
            greenies: count(|flags| flags.on_green_from_tee && !flags.three_putt),
            three_putts: count(|flags| flags.three_putt),
            long_drives: count(|flags| flags.long_drive),
        }
    }
}

impl CalibrationRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: CalibrationConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let holes = config.course.holes()?;
        Ok(Self {
            config,
            outputs,
            holes,
        })
    }

    /// Execute the calibration, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.ghosts.seed.unwrap_or(0));
        let mut analytics = AnalyticsCollector::new(&self.config.ghosts.handicaps, &self.holes);
        let mut rows_written = 0usize;

        for &handicap in &self.config.ghosts.handicaps {
            for round_index in 0..self.config.ghosts.rounds {
                let seed = rng.next_u64();
                let round = GhostRound::generate(handicap, &self.holes, seed);
                let outcome = RoundOutcome::from_round(&round, &self.holes);
                analytics.record_round(&outcome)?;
                write_round_row(&mut writer, &self.config.run_id, round_index, &outcome)?;
                rows_written += 1;
            }
            event!(
                target: "millbrook_bench::calibration",
                Level::INFO,
                handicap,
                rounds = self.config.ghosts.rounds,
                "handicap simulated"
            );
        }

        writer.flush()?;

        let summary = analytics.finalize()?;
        summary.write_markdown(&self.outputs.summary_md)?;

        Ok(RunSummary {
            rounds_played: rows_written,
            handicaps: self.config.ghosts.handicaps.len(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            analytics: summary,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct RoundLogRow<'a> {
    run_id: &'a str,
    round_id: String,
    handicap: f64,
    seed: u64,
    scores: [u8; HOLES],
    total: u32,
    to_par: i32,
    birdies: u32,
    sandies: u32,
    greenies: u32,
    three_putts: u32,
    long_drives: u32,
}

fn write_round_row(
    writer: &mut BufWriter<File>,
    run_id: &str,
    round_index: usize,
    outcome: &RoundOutcome,
) -> Result<(), RunnerError> {
    let row = RoundLogRow {
        run_id,
        round_id: format!("H{:04.1}_R{round_index:05}", outcome.handicap),
        handicap: outcome.handicap,
        seed: outcome.seed,
        scores: outcome.scores,
        total: outcome.total,
        to_par: outcome.to_par,
        birdies: outcome.birdies,
        sandies: outcome.sandies,
        greenies: outcome.greenies,
        three_putts: outcome.three_putts,
        long_drives: outcome.long_drives,
    };
    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use millbrook_core::model::course::standard_tee;

    #[test]
    fn outcome_counts_birdies_and_junk() {
        let holes = standard_tee().ordered_holes().unwrap();
        let round = GhostRound::generate(4.0, &holes, 31);
        let outcome = RoundOutcome::from_round(&round, &holes);
        let expected_birdies = round
            .scores
            .iter()
            .zip(holes.iter())
            .filter(|(score, hole)| **score < hole.par)
            .count() as u32;
        assert_eq!(outcome.birdies, expected_birdies);
        assert_eq!(outcome.total, round.total());
        assert_eq!(outcome.to_par, round.total() as i32 - 72);
        assert!(outcome.long_drives <= 1);
    }
}
