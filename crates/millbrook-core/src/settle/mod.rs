//! Per-hole settlement: junk, stakes, payouts and the Big Game side pool.

pub mod big_game;
pub mod junk;
pub mod payout;
pub mod stake;
