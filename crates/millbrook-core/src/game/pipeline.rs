//! The per-hole reducers.
//!
//! `submit_hole` runs allocation lookup, the hole result, payout, junk and the
//! Big Game against an immutable [`MatchState`] and returns the next state.
//! Nothing is committed unless every step succeeds.

use crate::game::error::MatchError;
use crate::game::match_state::{MatchState, MatchStatus, hole_slot};
use crate::model::course::HOLES;
use crate::model::junk::{JunkEvent, JunkFlags};
use crate::model::player::{PLAYERS, Seat};
use crate::model::score::{HoleScore, LedgerRow};
use crate::model::team::Team;
use crate::settle::big_game::NetEntry;
use crate::settle::junk::{JunkInput, evaluate};
use crate::settle::payout::{decide_outcome, distribute, team_net};
use serde::{Deserialize, Serialize};

/// Highest gross score the engine accepts on a single hole.
pub const MAX_GROSS: u8 = 20;

/// Raw input for one hole, as typed on the scorecard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleEntry {
    pub hole: u8,
    pub gross: [u8; PLAYERS],
    #[serde(default)]
    pub flags: [JunkFlags; PLAYERS],
}

impl HoleEntry {
    pub fn new(hole: u8, gross: [u8; PLAYERS]) -> Self {
        Self {
            hole,
            gross,
            flags: [JunkFlags::NONE; PLAYERS],
        }
    }

    pub fn with_flags(mut self, seat: Seat, flags: JunkFlags) -> Self {
        self.flags[seat.index()] = flags;
        self
    }
}

/// Settles `entry` against `state`, returning the state after the hole.
pub fn submit_hole(state: &MatchState, entry: &HoleEntry) -> Result<MatchState, MatchError> {
    if state.status != MatchStatus::InProgress {
        return Err(MatchError::NotInProgress {
            status: state.status,
        });
    }
    let hole = entry.hole;
    if hole != state.current_hole() {
        return Err(MatchError::OutOfOrderHole {
            expected: state.current_hole(),
            submitted: hole,
        });
    }
    let slot = hole_slot(hole).ok_or(MatchError::OutOfOrderHole {
        expected: state.current_hole(),
        submitted: hole,
    })?;

    let (gross, flags) = resolve_inputs(state, entry)?;
    let par = state.course.par(hole);

    let strokes = Seat::LOOP.map(|seat| state.strokes[seat.index()][slot]);
    let net = Seat::LOOP.map(|seat| i32::from(gross[seat.index()]) - i32::from(strokes[seat.index()]));
    let red_net = team_net(&net, &state.teams, Team::Red);
    let blue_net = team_net(&net, &state.teams, Team::Blue);
    let outcome = decide_outcome(red_net, blue_net);

    let base = state.stake.base;
    let junk: Vec<JunkEvent> = Seat::LOOP
        .iter()
        .flat_map(|&seat| {
            evaluate(&JunkInput {
                hole,
                seat,
                player_id: &state.players[seat.index()].id,
                team: state.teams[seat.index()],
                gross: gross[seat.index()],
                par,
                flags: flags[seat.index()],
                base,
            })
        })
        .collect();

    let distribution = distribute(outcome, base, state.stake.carry, &junk, &state.teams);
    let settlement = state.stake.settle(outcome);

    let mut next = state.clone();
    next.scores.apply_deltas(&distribution.deltas);
    next.ledger.push(LedgerRow {
        hole,
        outcome,
        base,
        carry_after: settlement.carry_after,
        doubles: state.stake.doubles,
        payout: distribution.payout,
        red_junk: distribution.junk.red,
        blue_junk: distribution.junk.blue,
        deltas: distribution.deltas,
        running_totals: *next.scores.standings(),
    });
    next.hole_scores[slot] = Some(HoleScore {
        hole,
        par,
        gross,
        strokes,
        net,
        red_net,
        blue_net,
    });
    next.junk_events.extend(junk);

    if state.config.big_game {
        let eligible: Vec<NetEntry> = Seat::LOOP
            .iter()
            .filter(|seat| state.is_big_game_eligible(**seat))
            .map(|&seat| NetEntry {
                seat,
                net: i32::from(gross[seat.index()])
                    - i32::from(state.big_game_strokes[seat.index()][slot]),
            })
            .collect();
        next.big_game.record(hole, par, &eligible);
    }

    next.stake = settlement.next;
    if usize::from(hole) == HOLES {
        next.status = MatchStatus::Finished;
    }

    tracing::debug!(
        target: "millbrook_core::hole",
        hole,
        outcome = ?outcome,
        base = %base,
        payout = %distribution.payout,
        carry = %settlement.carry_after,
        junk = distribution.junk.red.cents() + distribution.junk.blue.cents(),
        "hole settled"
    );

    Ok(next)
}

/// Applies a double for the trailing team; anything illegal is a no-op.
pub fn call_double(state: &MatchState) -> MatchState {
    let mut next = state.clone();
    if state.is_in_progress() {
        next.stake = state.stake.call_double(state.trailing_team());
    }
    next
}

/// Gross scores and flags with ghost seats replaced by their stored round.
fn resolve_inputs(
    state: &MatchState,
    entry: &HoleEntry,
) -> Result<([u8; PLAYERS], [JunkFlags; PLAYERS]), MatchError> {
    let hole = entry.hole;
    let mut gross = entry.gross;
    let mut flags = entry.flags;

    for seat in Seat::LOOP {
        let i = seat.index();
        if state.players[i].is_ghost {
            let ghost = state.ghosts[i]
                .as_ref()
                .ok_or(MatchError::GhostDataMissing { seat, hole })?;
            let score = ghost
                .score(hole)
                .ok_or(MatchError::GhostDataMissing { seat, hole })?;
            if gross[i] != score && gross[i] != 0 {
                tracing::debug!(
                    target: "millbrook_core::hole",
                    seat = %seat,
                    entered = gross[i],
                    ghost = score,
                    "ignoring entered score for ghost seat"
                );
            }
            gross[i] = score;
            flags[i] = ghost
                .flags(hole)
                .ok_or(MatchError::GhostDataMissing { seat, hole })?;
        }
        if !(1..=MAX_GROSS).contains(&gross[i]) {
            return Err(MatchError::InvalidGross {
                seat,
                hole,
                gross: gross[i],
            });
        }
    }

    Ok((gross, flags))
}
