use crate::model::money::Money;
use crate::model::player::{PlayerId, Seat};
use crate::model::team::Team;
use core::fmt;
use serde::{Deserialize, Serialize};

/// What the scorer observed for one player on one hole, beyond the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct JunkFlags {
    /// Got up and down from a greenside bunker.
    pub sandie: bool,
    /// Hit the green with the tee shot.
    pub on_green_from_tee: bool,
    pub three_putt: bool,
    pub long_drive: bool,
}

impl JunkFlags {
    pub const NONE: JunkFlags = JunkFlags {
        sandie: false,
        on_green_from_tee: false,
        three_putt: false,
        long_drive: false,
    };

    pub const fn any(self) -> bool {
        self.sandie || self.on_green_from_tee || self.three_putt || self.long_drive
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JunkKind {
    Birdie,
    Sandie,
    Greenie,
    Penalty,
    #[serde(rename = "LD10")]
    Ld10,
}

impl JunkKind {
    pub const ALL: [JunkKind; 5] = [
        JunkKind::Birdie,
        JunkKind::Sandie,
        JunkKind::Greenie,
        JunkKind::Penalty,
        JunkKind::Ld10,
    ];

    /// Penalties cost the player's team; everything else pays it.
    pub const fn is_debit(self) -> bool {
        matches!(self, JunkKind::Penalty)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            JunkKind::Birdie => "Birdie",
            JunkKind::Sandie => "Sandie",
            JunkKind::Greenie => "Greenie",
            JunkKind::Penalty => "Penalty",
            JunkKind::Ld10 => "LD10",
        }
    }
}

impl fmt::Display for JunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunkEvent {
    pub hole: u8,
    pub player_id: PlayerId,
    pub seat: Seat,
    pub team: Team,
    pub kind: JunkKind,
    pub value: Money,
}

impl JunkEvent {
    /// Value as it counts toward the team's junk total.
    pub fn signed_value(&self) -> Money {
        if self.kind.is_debit() {
            -self.value
        } else {
            self.value
        }
    }
}
