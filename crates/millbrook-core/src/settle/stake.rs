//! The stake for each hole and how it moves.
//!
//! Hole 1 opens at $1 and hole 2 is always $2. From hole 3 on, the base is
//! `$2 × 2^doubles`. A double is a trailing-team call, at most once per hole,
//! that doubles the stake of the hole being played. Pushed holes roll their
//! base into `carry`; a decided hole pays out the carry and resets it.

use crate::model::course::HOLES;
use crate::model::money::Money;
use crate::model::score::HoleOutcome;
use crate::model::team::Team;
use crate::settle::payout::hole_payout;
use serde::{Deserialize, Serialize};

pub const OPENING_BASE: Money = Money::from_dollars(1);
pub const SECOND_HOLE_BASE: Money = Money::from_dollars(2);
const LAST_HOLE: u8 = HOLES as u8;
const MAX_DOUBLING_SHIFT: u32 = 32;

/// Base stake for `hole` after `doubles` called doubles.
pub fn calculate_base(hole: u8, doubles: u32) -> Money {
    let factor = 1i64 << doubles.min(MAX_DOUBLING_SHIFT);
    match hole {
        0 | 1 => Money::from_cents(OPENING_BASE.cents().saturating_mul(factor)),
        2 => SECOND_HOLE_BASE,
        _ => Money::from_cents(SECOND_HOLE_BASE.cents().saturating_mul(factor)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeState {
    pub hole: u8,
    pub base: Money,
    pub carry: Money,
    pub doubles: u32,
    pub double_used_this_hole: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeSettlement {
    pub payout: Money,
    pub carry_after: Money,
    pub next: StakeState,
}

impl StakeState {
    pub const fn opening() -> Self {
        Self {
            hole: 1,
            base: OPENING_BASE,
            carry: Money::ZERO,
            doubles: 0,
            double_used_this_hole: false,
        }
    }

    pub fn is_double_available(&self, trailing: Option<Team>) -> bool {
        trailing.is_some() && !self.double_used_this_hole
    }

    /// Applies a double for `trailing`. Illegal calls return the state unchanged.
    pub fn call_double(&self, trailing: Option<Team>) -> StakeState {
        if !self.is_double_available(trailing) {
            tracing::debug!(
                target: "millbrook_core::stake",
                hole = self.hole,
                used = self.double_used_this_hole,
                trailing = ?trailing,
                "double rejected"
            );
            return *self;
        }
        StakeState {
            base: self.base.doubled(),
            doubles: self.doubles + 1,
            double_used_this_hole: true,
            ..*self
        }
    }

    /// Closes the current hole and returns the state for the next one.
    ///
    /// Settling hole 18 leaves the stake parked on 18.
    pub fn settle(&self, outcome: HoleOutcome) -> StakeSettlement {
        let (payout, carry_after) = hole_payout(outcome, self.base, self.carry);
        let next_hole = (self.hole + 1).min(LAST_HOLE);
        StakeSettlement {
            payout,
            carry_after,
            next: StakeState {
                hole: next_hole,
                base: calculate_base(next_hole, self.doubles),
                carry: carry_after,
                doubles: self.doubles,
                double_used_this_hole: false,
            },
        }
    }
}

impl Default for StakeState {
    fn default() -> Self {
        Self::opening()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_hole_is_one_dollar() {
        let stake = StakeState::opening();
        assert_eq!(stake.hole, 1);
        assert_eq!(stake.base, Money::from_dollars(1));
        assert_eq!(stake.carry, Money::ZERO);
    }

    #[test]
    fn second_hole_is_two_dollars_whatever_happens() {
        let won = StakeState::opening().settle(HoleOutcome::Won(Team::Red));
        let pushed = StakeState::opening().settle(HoleOutcome::Push);
        assert_eq!(won.next.base, Money::from_dollars(2));
        assert_eq!(pushed.next.base, Money::from_dollars(2));

        let doubled = StakeState::opening().call_double(Some(Team::Blue));
        assert_eq!(doubled.base, Money::from_dollars(2));
        let after = doubled.settle(HoleOutcome::Won(Team::Blue));
        assert_eq!(after.next.base, Money::from_dollars(2));
        assert_eq!(after.next.doubles, 1);
    }

    #[test]
    fn base_grows_with_doubles_from_hole_three() {
        assert_eq!(calculate_base(3, 0), Money::from_dollars(2));
        assert_eq!(calculate_base(3, 1), Money::from_dollars(4));
        assert_eq!(calculate_base(12, 3), Money::from_dollars(16));
        assert_eq!(calculate_base(1, 1), Money::from_dollars(2));
    }

    #[test]
    fn push_rolls_base_into_carry() {
        let settled = StakeState::opening().settle(HoleOutcome::Push);
        assert_eq!(settled.payout, Money::ZERO);
        assert_eq!(settled.carry_after, Money::from_dollars(1));
        assert_eq!(settled.next.carry, Money::from_dollars(1));

        let second = settled.next.settle(HoleOutcome::Push);
        assert_eq!(second.carry_after, Money::from_dollars(3));
        assert_eq!(second.next.base, Money::from_dollars(2));
    }

    #[test]
    fn decided_hole_pays_base_plus_carry_and_resets() {
        let mut stake = StakeState::opening().settle(HoleOutcome::Push).next;
        stake = stake.call_double(Some(Team::Red));
        assert_eq!(stake.base, Money::from_dollars(4));
        let settled = stake.settle(HoleOutcome::Won(Team::Red));
        assert_eq!(settled.payout, Money::from_dollars(5));
        assert_eq!(settled.carry_after, Money::ZERO);
        assert_eq!(settled.next.base, Money::from_dollars(4));
        assert!(!settled.next.double_used_this_hole);
    }

    #[test]
    fn double_is_once_per_hole_and_needs_a_trailing_team() {
        let stake = StakeState::opening();
        assert_eq!(stake.call_double(None), stake);
        let once = stake.call_double(Some(Team::Red));
        assert_eq!(once.doubles, 1);
        let twice = once.call_double(Some(Team::Red));
        assert_eq!(twice, once);
        assert!(!once.is_double_available(Some(Team::Blue)));
    }

    #[test]
    fn final_hole_does_not_advance() {
        let stake = StakeState {
            hole: 18,
            base: Money::from_dollars(2),
            ..StakeState::opening()
        };
        let settled = stake.settle(HoleOutcome::Won(Team::Red));
        assert_eq!(settled.next.hole, 18);
    }
}
