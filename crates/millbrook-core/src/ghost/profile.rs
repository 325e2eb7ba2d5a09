//! Handicap-banded junk rates.
//!
//! Per-hole probabilities observed across club rounds, bucketed by index.
//! `birdie` is the reference rate a ghost's scores should produce; the other
//! columns drive the Bernoulli draws for junk flags.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostProfile {
    /// Bands apply to indexes strictly below this bound.
    pub max_index: f64,
    pub birdie: f64,
    /// Given par or better.
    pub sandie: f64,
    /// Given par or better on a par 3.
    pub greenie: f64,
    /// Given worse than par on a par 3.
    pub three_putt: f64,
    pub long_drive: f64,
}

pub const PROFILES: [GhostProfile; 6] = [
    GhostProfile {
        max_index: 3.0,
        birdie: 0.13,
        sandie: 0.12,
        greenie: 0.38,
        three_putt: 0.05,
        long_drive: 0.40,
    },
    GhostProfile {
        max_index: 7.0,
        birdie: 0.10,
        sandie: 0.10,
        greenie: 0.30,
        three_putt: 0.08,
        long_drive: 0.32,
    },
    GhostProfile {
        max_index: 12.0,
        birdie: 0.07,
        sandie: 0.07,
        greenie: 0.22,
        three_putt: 0.11,
        long_drive: 0.25,
    },
    GhostProfile {
        max_index: 17.0,
        birdie: 0.045,
        sandie: 0.05,
        greenie: 0.16,
        three_putt: 0.15,
        long_drive: 0.18,
    },
    GhostProfile {
        max_index: 22.0,
        birdie: 0.02,
        sandie: 0.03,
        greenie: 0.10,
        three_putt: 0.19,
        long_drive: 0.12,
    },
    GhostProfile {
        max_index: f64::INFINITY,
        birdie: 0.012,
        sandie: 0.02,
        greenie: 0.06,
        three_putt: 0.23,
        long_drive: 0.08,
    },
];

impl GhostProfile {
    pub fn for_index(index: f64) -> GhostProfile {
        let index = if index.is_finite() { index.abs() } else { 0.0 };
        PROFILES
            .iter()
            .copied()
            .find(|band| index < band.max_index)
            .unwrap_or(PROFILES[PROFILES.len() - 1])
    }

    /// Birdie rate on a hole of the given difficulty weight (1.0 is average).
    pub fn birdie_rate(&self, weight: f64) -> f64 {
        (self.birdie * ease(weight)).clamp(0.0, 1.0)
    }
}

/// Scales a rate up on easy holes and down on hard ones.
pub fn ease(weight: f64) -> f64 {
    (2.0 - weight).max(0.0)
}
