use std::fs;
use std::path::Path;

use millbrook_core::ghost::GhostProfile;
use millbrook_core::ghost::simulator::{difficulty_weight, expected_over_par};
use millbrook_core::model::course::{HOLES, HoleInfo};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::calibration::RoundOutcome;

const CONFIDENCE_Z: f64 = 1.96; // 95% CI

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("handicap {0} recorded but never registered")]
    UnknownHandicap(f64),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("normal distribution unavailable: {0}")]
    Distribution(String),
}

/// Gathers simulated rounds per handicap and reduces them to a report.
pub struct AnalyticsCollector {
    holes: [HoleInfo; HOLES],
    handicaps: Vec<HandicapAccumulator>,
}

impl AnalyticsCollector {
    pub fn new(handicaps: &[f64], holes: &[HoleInfo; HOLES]) -> Self {
        Self {
            holes: *holes,
            handicaps: handicaps
                .iter()
                .map(|&index| HandicapAccumulator::new(index))
                .collect(),
        }
    }

    pub fn record_round(&mut self, outcome: &RoundOutcome) -> Result<(), AnalyticsError> {
        let acc = self
            .handicaps
            .iter_mut()
            .find(|acc| acc.index == outcome.handicap)
            .ok_or(AnalyticsError::UnknownHandicap(outcome.handicap))?;
        acc.record(outcome);
        Ok(())
    }

    pub fn finalize(self) -> Result<AnalyticsSummary, AnalyticsError> {
        let normal = Normal::new(0.0, 1.0)
            .map_err(|err| AnalyticsError::Distribution(err.to_string()))?;
        let holes = self.holes;
        let reports = self
            .handicaps
            .into_iter()
            .map(|acc| acc.into_report(&holes, &normal))
            .collect();
        Ok(AnalyticsSummary { handicaps: reports })
    }
}

struct HandicapAccumulator {
    index: f64,
    to_par: Vec<f64>,
    birdies: u64,
    holes_played: u64,
    sandies: u64,
    greenies: u64,
    three_putts: u64,
    long_drives: u64,
}

impl HandicapAccumulator {
    fn new(index: f64) -> Self {
        Self {
            index,
            to_par: Vec::new(),
            birdies: 0,
            holes_played: 0,
            sandies: 0,
            greenies: 0,
            three_putts: 0,
            long_drives: 0,
        }
    }

    fn record(&mut self, outcome: &RoundOutcome) {
        self.to_par.push(f64::from(outcome.to_par));
        self.birdies += u64::from(outcome.birdies);
        self.holes_played += HOLES as u64;
        self.sandies += u64::from(outcome.sandies);
        self.greenies += u64::from(outcome.greenies);
        self.three_putts += u64::from(outcome.three_putts);
        self.long_drives += u64::from(outcome.long_drives);
    }

    fn into_report(self, holes: &[HoleInfo; HOLES], normal: &Normal) -> HandicapReport {
        let rounds = self.to_par.len();
        let (mean, sd) = mean_and_sd(&self.to_par);
        let ci95 = confidence_interval(&self.to_par);
        let expected_to_par = expected_over_par(self.index, holes).iter().sum::<f64>();

        let profile = GhostProfile::for_index(self.index);
        let expected_birdie_rate = holes
            .iter()
            .map(|hole| profile.birdie_rate(difficulty_weight(hole.stroke_index)))
            .sum::<f64>()
            / HOLES as f64;
        let birdie_rate = ratio(self.birdies, self.holes_played);
        let birdie_p_value =
            proportion_p_value(birdie_rate, expected_birdie_rate, self.holes_played, normal);

        let per_round = |count: u64| ratio(count, rounds as u64);
        HandicapReport {
            index: self.index,
            rounds,
            mean_to_par: mean,
            sd_to_par: sd,
            ci95,
            expected_to_par,
            birdie_rate,
            expected_birdie_rate,
            birdie_p_value,
            sandies_per_round: per_round(self.sandies),
            greenies_per_round: per_round(self.greenies),
            three_putts_per_round: per_round(self.three_putts),
            long_drive_rate: per_round(self.long_drives),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub handicaps: Vec<HandicapReport>,
}

impl AnalyticsSummary {
    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        let mut rows = String::new();
        rows.push_str("# Ghost Calibration Summary\n\n");
        rows.push_str("| Index | Rounds | Mean to par | SD | 95% CI | Model to par | Birdie % | Band birdie % | p-value | Sandies/rd | Greenies/rd | 3-putts/rd | LD rate |\n");
        rows.push_str("|-------|--------|-------------|----|--------|--------------|----------|---------------|---------|------------|-------------|------------|---------|\n");

        for report in &self.handicaps {
            rows.push_str(&format!(
                "| {index:.1} | {rounds} | {mean:+.2} | {sd:.2} | [{ci_low:+.2}, {ci_high:+.2}] | {model:+.2} | {birdie:.2}% | {band:.2}% | {pval:.3} | {sandies:.2} | {greenies:.2} | {putts:.2} | {ld:.2} |\n",
                index = report.index,
                rounds = report.rounds,
                mean = report.mean_to_par,
                sd = report.sd_to_par,
                ci_low = report.ci95.0,
                ci_high = report.ci95.1,
                model = report.expected_to_par,
                birdie = report.birdie_rate * 100.0,
                band = report.expected_birdie_rate * 100.0,
                pval = report.birdie_p_value,
                sandies = report.sandies_per_round,
                greenies = report.greenies_per_round,
                putts = report.three_putts_per_round,
                ld = report.long_drive_rate,
            ));
        }

        fs::write(path.as_ref(), rows).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HandicapReport {
    pub index: f64,
    pub rounds: usize,
    pub mean_to_par: f64,
    pub sd_to_par: f64,
    pub ci95: (f64, f64),
    /// Sum of the per-hole expected strokes over par.
    pub expected_to_par: f64,
    pub birdie_rate: f64,
    pub expected_birdie_rate: f64,
    pub birdie_p_value: f64,
    pub sandies_per_round: f64,
    pub greenies_per_round: f64,
    pub three_putts_per_round: f64,
    pub long_drive_rate: f64,
}

fn ratio(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

fn mean_and_sd(points: &[f64]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let mean = points.iter().sum::<f64>() / points.len() as f64;
    if points.len() == 1 {
        return (mean, 0.0);
    }
    let variance = points
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (points.len() as f64 - 1.0);
    (mean, variance.sqrt())
}

fn confidence_interval(points: &[f64]) -> (f64, f64) {
    let (mean, sd) = mean_and_sd(points);
    if points.len() < 2 {
        return (mean, mean);
    }
    let margin = CONFIDENCE_Z * sd / (points.len() as f64).sqrt();
    (mean - margin, mean + margin)
}

/// Two-sided z-test of an observed rate against `expected` over `trials`.
fn proportion_p_value(observed: f64, expected: f64, trials: u64, normal: &Normal) -> f64 {
    if trials == 0 || expected <= 0.0 || expected >= 1.0 {
        return 1.0;
    }
    let std_error = (expected * (1.0 - expected) / trials as f64).sqrt();
    let z = (observed - expected).abs() / std_error;
    (2.0 * (1.0 - normal.cdf(z))).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal() -> Normal {
        Normal::new(0.0, 1.0).unwrap()
    }

    #[test]
    fn interval_brackets_the_mean() {
        let points = [2.0, 4.0, 6.0, 8.0];
        let (mean, sd) = mean_and_sd(&points);
        assert_eq!(mean, 5.0);
        assert!((sd - 2.581_988_897).abs() < 1e-6);
        let (low, high) = confidence_interval(&points);
        assert!(low < mean && mean < high);
        assert_eq!(confidence_interval(&[3.0]), (3.0, 3.0));
    }

    #[test]
    fn matching_rate_is_not_significant() {
        let p = proportion_p_value(0.10, 0.10, 1_000, &normal());
        assert!((p - 1.0).abs() < 1e-9);
    }

    #[test]
    fn distant_rate_is_significant() {
        let p = proportion_p_value(0.20, 0.10, 1_000, &normal());
        assert!(p < 0.001);
        assert_eq!(proportion_p_value(0.2, 0.0, 10, &normal()), 1.0);
    }

    #[test]
    fn unknown_handicap_is_rejected() {
        let holes = millbrook_core::model::course::fallback_holes();
        let mut collector = AnalyticsCollector::new(&[10.0], &holes);
        let outcome = RoundOutcome {
            handicap: 3.0,
            seed: 1,
            scores: [4; HOLES],
            total: 72,
            to_par: 0,
            birdies: 0,
            sandies: 0,
            greenies: 0,
            three_putts: 0,
            long_drives: 0,
        };
        assert!(matches!(
            collector.record_round(&outcome),
            Err(AnalyticsError::UnknownHandicap(_))
        ));
    }
}
