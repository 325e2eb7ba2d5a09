use crate::game::match_state::MatchStatus;
use crate::model::player::{PlayerId, Seat};
use crate::model::team::Team;
use thiserror::Error;

/// Rejected input or an internal inconsistency. State is never half-applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("hole {submitted} submitted but the match is on hole {expected}")]
    OutOfOrderHole { expected: u8, submitted: u8 },
    #[error("match is {status}; no more scores can be entered")]
    NotInProgress { status: MatchStatus },
    #[error("gross score {gross} for {seat} on hole {hole} is out of range")]
    InvalidGross { seat: Seat, hole: u8, gross: u8 },
    #[error("team {team} has {count} players; each team needs exactly 2")]
    UnbalancedTeams { team: Team, count: usize },
    #[error("player id '{id}' appears more than once")]
    DuplicatePlayer { id: PlayerId },
    #[error("ghost round missing for {seat} on hole {hole}")]
    GhostDataMissing { seat: Seat, hole: u8 },
}

impl MatchError {
    /// Input field the error refers to, for form highlighting.
    pub const fn field(&self) -> &'static str {
        match self {
            MatchError::OutOfOrderHole { .. } => "hole",
            MatchError::NotInProgress { .. } => "status",
            MatchError::InvalidGross { .. } => "grossScores",
            MatchError::UnbalancedTeams { .. } => "teams",
            MatchError::DuplicatePlayer { .. } => "players",
            MatchError::GhostDataMissing { .. } => "ghost",
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            MatchError::OutOfOrderHole { .. } => "out_of_order_hole",
            MatchError::NotInProgress { .. } => "not_in_progress",
            MatchError::InvalidGross { .. } => "invalid_gross",
            MatchError::UnbalancedTeams { .. } => "unbalanced_teams",
            MatchError::DuplicatePlayer { .. } => "duplicate_player",
            MatchError::GhostDataMissing { .. } => "ghost_data_missing",
        }
    }

    /// Internal consistency failures, as opposed to bad input.
    pub const fn is_internal(&self) -> bool {
        matches!(self, MatchError::GhostDataMissing { .. })
    }
}
