//! Simulated opponents for practice rounds.
//!
//! A ghost plays to a handicap index. Its 18 scores and its junk flags are
//! drawn once, from a seed, when the match is created, and replayed as-is
//! while the round is scored.

pub mod profile;
pub mod rng;
pub mod simulator;

pub use profile::GhostProfile;
pub use rng::{DeterministicRng, Lcg};
pub use simulator::{
    GhostJunkEvents, GhostRound, generate_ghost_scores, generate_junk_events, generate_scores,
};
