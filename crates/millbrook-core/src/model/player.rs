use core::fmt;
use serde::{Deserialize, Serialize};

pub const PLAYERS: usize = 4;

/// One of the four scorecard slots in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Seat {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
}

impl Seat {
    pub const LOOP: [Seat; PLAYERS] = [Seat::One, Seat::Two, Seat::Three, Seat::Four];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::One),
            1 => Some(Seat::Two),
            2 => Some(Seat::Three),
            3 => Some(Seat::Four),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.index() + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A golfer as supplied by the player repository. Immutable once a match starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub first: String,
    pub last: String,
    pub index: f64,
    #[serde(default)]
    pub is_ghost: bool,
    #[serde(default)]
    pub source_player_id: Option<PlayerId>,
}

impl Player {
    pub fn new(id: impl Into<String>, first: &str, last: &str, index: f64) -> Self {
        Self {
            id: PlayerId::new(id),
            first: first.to_string(),
            last: last.to_string(),
            index,
            is_ghost: false,
            source_player_id: None,
        }
    }

    /// Builds a simulated opponent that plays to `source`'s handicap.
    pub fn ghost_of(source: &Player) -> Self {
        Self {
            id: PlayerId::new(format!("ghost-{}", source.id)),
            first: source.first.clone(),
            last: format!("{} (ghost)", source.last),
            index: source.index,
            is_ghost: true,
            source_player_id: Some(source.id.clone()),
        }
    }

    pub fn display_name(&self) -> String {
        match (self.first.trim(), self.last.trim()) {
            ("", "") => self.id.to_string(),
            (first, "") => first.to_string(),
            ("", last) => last.to_string(),
            (first, last) => format!("{first} {last}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Player, Seat};

    #[test]
    fn index_roundtrip() {
        for (i, seat) in Seat::LOOP.iter().enumerate() {
            assert_eq!(Seat::from_index(i), Some(*seat));
            assert_eq!(seat.index(), i);
        }
        assert_eq!(Seat::from_index(4), None);
    }

    #[test]
    fn seat_display_is_one_based() {
        assert_eq!(Seat::One.to_string(), "P1");
        assert_eq!(Seat::Four.to_string(), "P4");
    }

    #[test]
    fn ghost_copies_handicap_and_links_source() {
        let real = Player::new("p7", "Ada", "Lane", 12.4);
        let ghost = Player::ghost_of(&real);
        assert!(ghost.is_ghost);
        assert_eq!(ghost.index, 12.4);
        assert_eq!(ghost.source_player_id.as_ref(), Some(&real.id));
        assert_eq!(ghost.display_name(), "Ada Lane (ghost)");
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let anon = Player::new("p9", " ", "", 3.0);
        assert_eq!(anon.display_name(), "p9");
    }
}
