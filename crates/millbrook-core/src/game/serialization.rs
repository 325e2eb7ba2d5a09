use super::match_state::MatchState;
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_VERSION: u32 = 1;

/// Saved form of a match, resumable at the next hole.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub state: MatchState,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

impl MatchSnapshot {
    pub fn capture(state: &MatchState) -> Self {
        MatchSnapshot {
            version: SNAPSHOT_VERSION,
            state: state.clone(),
        }
    }

    pub fn restore(self) -> MatchState {
        self.state
    }

    pub fn to_json(state: &MatchState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
