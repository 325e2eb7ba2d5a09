use crate::model::money::Money;
use crate::model::player::{PLAYERS, Seat};
use crate::model::team::Team;
use serde::{Deserialize, Serialize};

/// Cumulative per-seat winnings. Every update is a zero-sum delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    totals: [Money; PLAYERS],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self {
            totals: [Money::ZERO; PLAYERS],
        }
    }

    pub fn set_totals(&mut self, totals: [Money; PLAYERS]) {
        self.totals = totals;
    }

    pub fn total(&self, seat: Seat) -> Money {
        self.totals[seat.index()]
    }

    pub fn standings(&self) -> &[Money; PLAYERS] {
        &self.totals
    }

    pub fn apply_deltas(&mut self, deltas: &[Money; PLAYERS]) {
        for seat in Seat::LOOP {
            self.totals[seat.index()] += deltas[seat.index()];
        }
    }

    pub fn team_total(&self, teams: &[Team; PLAYERS], team: Team) -> Money {
        Seat::LOOP
            .iter()
            .filter(|seat| teams[seat.index()] == team)
            .map(|seat| self.total(*seat))
            .sum()
    }

    /// The team strictly behind on money, if any.
    pub fn trailing_team(&self, teams: &[Team; PLAYERS]) -> Option<Team> {
        let red = self.team_total(teams, Team::Red);
        let blue = self.team_total(teams, Team::Blue);
        match red.cmp(&blue) {
            core::cmp::Ordering::Less => Some(Team::Red),
            core::cmp::Ordering::Greater => Some(Team::Blue),
            core::cmp::Ordering::Equal => None,
        }
    }

    pub fn net_sum(&self) -> Money {
        self.totals.iter().sum()
    }
}

/// Per-hole scoring record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleScore {
    pub hole: u8,
    pub par: u8,
    pub gross: [u8; PLAYERS],
    pub strokes: [u8; PLAYERS],
    pub net: [i32; PLAYERS],
    pub red_net: Option<i32>,
    pub blue_net: Option<i32>,
}

impl HoleScore {
    pub fn team_net(&self, team: Team) -> Option<i32> {
        match team {
            Team::Red => self.red_net,
            Team::Blue => self.blue_net,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoleOutcome {
    Won(Team),
    Push,
}

impl HoleOutcome {
    pub const fn winner(self) -> Option<Team> {
        match self {
            HoleOutcome::Won(team) => Some(team),
            HoleOutcome::Push => None,
        }
    }
}

/// One settled hole. `running_totals` always sums to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub hole: u8,
    pub outcome: HoleOutcome,
    pub base: Money,
    pub carry_after: Money,
    pub doubles: u32,
    pub payout: Money,
    pub red_junk: Money,
    pub blue_junk: Money,
    pub deltas: [Money; PLAYERS],
    pub running_totals: [Money; PLAYERS],
}
