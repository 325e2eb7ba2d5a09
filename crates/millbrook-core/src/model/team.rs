use super::player::{PLAYERS, Seat};
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Red, Team::Blue];

    pub const fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Team::Red => "Red",
            Team::Blue => "Blue",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seats on `team`, in seat order.
pub fn members(teams: &[Team; PLAYERS], team: Team) -> Vec<Seat> {
    Seat::LOOP
        .iter()
        .copied()
        .filter(|seat| teams[seat.index()] == team)
        .collect()
}

pub fn roster_size(teams: &[Team; PLAYERS], team: Team) -> usize {
    teams.iter().filter(|t| **t == team).count()
}

#[cfg(test)]
mod tests {
    use super::{Team, members, roster_size};
    use crate::model::player::Seat;

    #[test]
    fn opponent_flips() {
        assert_eq!(Team::Red.opponent(), Team::Blue);
        assert_eq!(Team::Blue.opponent(), Team::Red);
    }

    #[test]
    fn members_follow_seat_order() {
        let teams = [Team::Blue, Team::Red, Team::Blue, Team::Red];
        assert_eq!(members(&teams, Team::Red), vec![Seat::Two, Seat::Four]);
        assert_eq!(roster_size(&teams, Team::Blue), 2);
    }
}
