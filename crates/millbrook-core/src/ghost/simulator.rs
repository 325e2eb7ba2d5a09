use super::profile::{GhostProfile, ease};
use super::rng::{DeterministicRng, Lcg};
use crate::model::course::{HOLES, HoleInfo, LONG_DRIVE_HOLE};
use crate::model::junk::JunkFlags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hole number → flags the ghost "observed" on that hole.
pub type GhostJunkEvents = BTreeMap<u8, JunkFlags>;

/// Mixed into the seed so junk draws never share a stream with score draws.
pub const JUNK_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

const HARDEST_WEIGHT: f64 = 1.3;
const EASIEST_WEIGHT: f64 = 0.7;
const BASE_SIGMA: f64 = 0.5;
const SIGMA_PER_STROKE: f64 = 0.025;
const SIGMA_DIFFICULTY_SWING: f64 = 0.1;
const BEST_RELATIVE_SCORE: i32 = -2;
const WORST_RELATIVE_SCORE: i32 = 4;

/// Relative difficulty of a hole: 1.3 for stroke index 1 down to 0.7 for 18.
pub fn difficulty_weight(stroke_index: u8) -> f64 {
    let si = f64::from(stroke_index.clamp(1, HOLES as u8));
    HARDEST_WEIGHT - (HARDEST_WEIGHT - EASIEST_WEIGHT) * (si - 1.0) / (HOLES as f64 - 1.0)
}

/// Strokes a handicap tends to lose to its index over a full round.
fn scoring_buffer(index: f64) -> f64 {
    if index < 8.0 {
        0.5
    } else if index < 18.0 {
        1.5
    } else {
        2.5
    }
}

fn playing_index(index: f64) -> f64 {
    if index.is_finite() { index.max(0.0) } else { 0.0 }
}

/// Expected strokes over par on each hole.
pub fn expected_over_par(index: f64, holes: &[HoleInfo; HOLES]) -> [f64; HOLES] {
    let handicap = playing_index(index);
    let budget = handicap + scoring_buffer(handicap);
    let total_weight: f64 = holes
        .iter()
        .map(|hole| difficulty_weight(hole.stroke_index))
        .sum();

    let mut mu = [0.0; HOLES];
    for (slot, hole) in mu.iter_mut().zip(holes.iter()) {
        let si = f64::from(hole.stroke_index);
        let mut expected = budget * difficulty_weight(hole.stroke_index) / total_weight;
        if si <= handicap {
            expected = expected.max(1.0);
        }
        if handicap > HOLES as f64 && si <= handicap - HOLES as f64 {
            expected = expected.max(2.0);
        }
        *slot = expected;
    }
    mu
}

/// Score spread on a hole: wider for higher handicaps, ±10% by difficulty.
pub fn hole_sigma(index: f64, stroke_index: u8) -> f64 {
    let spread = BASE_SIGMA + SIGMA_PER_STROKE * index.abs();
    let tilt = (difficulty_weight(stroke_index) - 1.0) / (HARDEST_WEIGHT - 1.0);
    spread * (1.0 + SIGMA_DIFFICULTY_SWING * tilt)
}

/// Draws 18 gross scores, each within `[par - 2, par + 4]`.
pub fn generate_scores<R: DeterministicRng + ?Sized>(
    index: f64,
    holes: &[HoleInfo; HOLES],
    rng: &mut R,
) -> [u8; HOLES] {
    let mu = expected_over_par(index, holes);
    let mut scores = [0u8; HOLES];
    for (i, hole) in holes.iter().enumerate() {
        let sigma = hole_sigma(playing_index(index), hole.stroke_index);
        let over = (mu[i] + sigma * rng.next_normal()).round() as i32;
        let par = i32::from(hole.par);
        let gross = (par + over).clamp(par + BEST_RELATIVE_SCORE, par + WORST_RELATIVE_SCORE);
        scores[i] = gross.clamp(1, i32::from(u8::MAX)) as u8;
    }
    scores
}

/// [`generate_scores`] on the reference LCG.
pub fn generate_ghost_scores(index: f64, holes: &[HoleInfo; HOLES], seed: u64) -> [u8; HOLES] {
    generate_scores(index, holes, &mut Lcg::new(seed))
}

/// Draws junk flags for every hole given the ghost's scores.
///
/// Flags only appear where they could count: sandies and greenies need par
/// or better, greenies and three-putts need a par 3, long drives need 17.
pub fn generate_junk_events(
    index: f64,
    scores: &[u8; HOLES],
    holes: &[HoleInfo; HOLES],
    seed: u64,
) -> GhostJunkEvents {
    let profile = GhostProfile::for_index(index);
    let mut rng = Lcg::new(seed ^ JUNK_STREAM);
    holes
        .iter()
        .zip(scores.iter())
        .map(|(hole, &score)| (hole.number, draw_flags(&profile, hole, score, &mut rng)))
        .collect()
}

fn draw_flags<R: DeterministicRng + ?Sized>(
    profile: &GhostProfile,
    hole: &HoleInfo,
    score: u8,
    rng: &mut R,
) -> JunkFlags {
    let mut flags = JunkFlags::NONE;
    let easing = ease(difficulty_weight(hole.stroke_index));
    let par_or_better = score <= hole.par;

    if hole.par == 3 {
        if par_or_better {
            flags.on_green_from_tee = rng.chance(profile.greenie * easing);
        } else if rng.chance(profile.three_putt) {
            flags.on_green_from_tee = true;
            flags.three_putt = true;
        }
    }
    if par_or_better && !flags.on_green_from_tee {
        flags.sandie = rng.chance(profile.sandie * easing);
    }
    if hole.number == LONG_DRIVE_HOLE {
        flags.long_drive = rng.chance(profile.long_drive);
    }
    flags
}

/// Everything a ghost will do in one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhostRound {
    pub seed: u64,
    pub index: f64,
    pub scores: [u8; HOLES],
    pub junk: GhostJunkEvents,
}

impl GhostRound {
    pub fn generate(index: f64, holes: &[HoleInfo; HOLES], seed: u64) -> Self {
        let scores = generate_ghost_scores(index, holes, seed);
        let junk = generate_junk_events(index, &scores, holes, seed);
        Self {
            seed,
            index,
            scores,
            junk,
        }
    }

    pub fn score(&self, hole: u8) -> Option<u8> {
        self.scores.get(usize::from(hole).checked_sub(1)?).copied()
    }

    pub fn flags(&self, hole: u8) -> Option<JunkFlags> {
        self.junk.get(&hole).copied()
    }

    pub fn total(&self) -> u32 {
        self.scores.iter().map(|&s| u32::from(s)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::course::{ResolvedCourse, standard_tee};

    fn holes() -> [HoleInfo; HOLES] {
        ResolvedCourse::single_tee("millbrook", &standard_tee()).holes
    }

    #[test]
    fn weights_span_point_seven_to_one_point_three() {
        assert!((difficulty_weight(1) - 1.3).abs() < 1e-12);
        assert!((difficulty_weight(18) - 0.7).abs() < 1e-12);
        assert!((difficulty_weight(9) - 1.3 + 0.6 * 8.0 / 17.0).abs() < 1e-12);
    }

    #[test]
    fn stroke_holes_expect_at_least_a_bogey() {
        let layout = holes();
        let mu = expected_over_par(10.0, &layout);
        for (hole, expected) in layout.iter().zip(mu.iter()) {
            if hole.stroke_index <= 10 {
                assert!(*expected >= 1.0, "hole {}", hole.number);
            } else {
                assert!(*expected < 1.0, "hole {}", hole.number);
            }
        }
    }

    #[test]
    fn second_cycle_holes_expect_a_double() {
        let layout = holes();
        let mu = expected_over_par(21.0, &layout);
        for (hole, expected) in layout.iter().zip(mu.iter()) {
            if hole.stroke_index <= 3 {
                assert!(*expected >= 2.0);
            }
            assert!(*expected >= 1.0);
        }
    }

    #[test]
    fn sigma_grows_with_handicap_and_difficulty() {
        assert!((hole_sigma(0.0, 9) - 0.5 * (1.0 + 0.1 * (difficulty_weight(9) - 1.0) / 0.3)).abs() < 1e-12);
        assert!(hole_sigma(20.0, 9) > hole_sigma(5.0, 9));
        assert!((hole_sigma(20.0, 1) - 1.1).abs() < 1e-12);
        assert!((hole_sigma(20.0, 18) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn same_seed_same_round() {
        let layout = holes();
        let a = GhostRound::generate(12.3, &layout, 77);
        let b = GhostRound::generate(12.3, &layout, 77);
        assert_eq!(a, b);
    }

    #[test]
    fn flags_are_recorded_for_every_hole() {
        let round = GhostRound::generate(8.0, &holes(), 5);
        assert_eq!(round.junk.len(), HOLES);
        assert_eq!(round.score(0), None);
        assert!(round.score(18).is_some());
        assert!(round.flags(18).is_some());
        assert_eq!(round.flags(19), None);
    }
}
