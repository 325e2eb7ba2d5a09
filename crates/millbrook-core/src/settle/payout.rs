//! Turning a hole result into money.
//!
//! The hole stake and the junk are settled separately, and each is split so
//! that one team's gain is exactly the other's loss.

use crate::model::junk::JunkEvent;
use crate::model::money::Money;
use crate::model::player::{PLAYERS, Seat};
use crate::model::score::HoleOutcome;
use crate::model::team::{Team, members};

/// Team net on a hole: the better of its members' net scores.
pub fn team_net(net: &[i32; PLAYERS], teams: &[Team; PLAYERS], team: Team) -> Option<i32> {
    Seat::LOOP
        .iter()
        .filter(|seat| teams[seat.index()] == team)
        .map(|seat| net[seat.index()])
        .min()
}

/// Lower team net wins; a tie, or a team with nobody in it, is a push.
pub fn decide_outcome(red_net: Option<i32>, blue_net: Option<i32>) -> HoleOutcome {
    match (red_net, blue_net) {
        (Some(red), Some(blue)) if red < blue => HoleOutcome::Won(Team::Red),
        (Some(red), Some(blue)) if blue < red => HoleOutcome::Won(Team::Blue),
        _ => HoleOutcome::Push,
    }
}

/// `(payout, carry_after)` for a hole played at `base` with `carry_in` pending.
pub fn hole_payout(outcome: HoleOutcome, base: Money, carry_in: Money) -> (Money, Money) {
    match outcome {
        HoleOutcome::Won(_) => (base + carry_in, Money::ZERO),
        HoleOutcome::Push => (Money::ZERO, carry_in + base),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JunkTotals {
    pub red: Money,
    pub blue: Money,
}

impl JunkTotals {
    pub fn from_events(events: &[JunkEvent]) -> Self {
        let mut totals = JunkTotals::default();
        for event in events {
            match event.team {
                Team::Red => totals.red += event.signed_value(),
                Team::Blue => totals.blue += event.signed_value(),
            }
        }
        totals
    }

    pub fn net_to_red(&self) -> Money {
        self.red - self.blue
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    pub payout: Money,
    pub new_carry: Money,
    pub junk: JunkTotals,
    pub deltas: [Money; PLAYERS],
}

impl Distribution {
    pub fn delta_sum(&self) -> Money {
        self.deltas.iter().sum()
    }
}

/// Per-seat money movement for one hole.
///
/// Winners share `+payout`, losers share `-payout`. Junk nets out between the
/// teams: Red collectively receives `red_junk - blue_junk` and Blue pays it.
/// Shares divide by the actual roster size of each team.
pub fn distribute(
    outcome: HoleOutcome,
    base: Money,
    carry_in: Money,
    junk: &[JunkEvent],
    teams: &[Team; PLAYERS],
) -> Distribution {
    let (payout, new_carry) = hole_payout(outcome, base, carry_in);
    let mut deltas = [Money::ZERO; PLAYERS];

    if let HoleOutcome::Won(winner) = outcome {
        transfer(&mut deltas, teams, winner, payout);
    }

    let totals = JunkTotals::from_events(junk);
    transfer(&mut deltas, teams, Team::Red, totals.net_to_red());

    Distribution {
        payout,
        new_carry,
        junk: totals,
        deltas,
    }
}

/// Moves `amount` from `receiver`'s opponents to `receiver`, split per roster.
fn transfer(deltas: &mut [Money; PLAYERS], teams: &[Team; PLAYERS], receiver: Team, amount: Money) {
    if amount.is_zero() {
        return;
    }
    let gainers = members(teams, receiver);
    let payers = members(teams, receiver.opponent());
    if gainers.is_empty() || payers.is_empty() {
        tracing::warn!(
            target: "millbrook_core::payout",
            receiver = %receiver,
            amount = %amount,
            "skipping transfer: one side has no players"
        );
        return;
    }
    for (seat, share) in gainers.iter().zip(amount.split(gainers.len())) {
        deltas[seat.index()] += share;
    }
    for (seat, share) in payers.iter().zip((-amount).split(payers.len())) {
        deltas[seat.index()] += share;
    }
}
