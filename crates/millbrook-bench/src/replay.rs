//! Plays a scripted scorecard through a [`MatchSession`] and writes the ledger.

use std::fs;
use std::path::{Path, PathBuf};

use millbrook_core::export::{ExportRow, export_rows};
use millbrook_core::game::{HoleEntry, MatchConfig, MatchError, MatchSession, MatchStatus};
use millbrook_core::model::course::{StaticCourseSource, TeeId, standard_tee};
use millbrook_core::model::junk::JunkFlags;
use millbrook_core::model::money::Money;
use millbrook_core::model::player::{PLAYERS, Player, Seat};
use millbrook_core::model::team::Team;
use serde::Deserialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{ConfigError, read_yaml};

/// A whole match as it would be keyed in from a paper card.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Scorecard {
    #[serde(default = "default_course_id")]
    pub course_id: String,
    /// Extra tees registered for the course after the standard one.
    #[serde(default)]
    pub tee_files: Vec<PathBuf>,
    #[serde(default)]
    pub big_game: bool,
    #[serde(default)]
    pub big_game_specific_index: Option<f64>,
    #[serde(default)]
    pub seed: u64,
    pub players: Vec<ScorecardPlayer>,
    pub holes: Vec<ScorecardHole>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScorecardPlayer {
    pub id: String,
    pub first: String,
    pub last: String,
    pub index: f64,
    pub team: Team,
    #[serde(default)]
    pub ghost: bool,
    #[serde(default)]
    pub tee: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScorecardHole {
    pub hole: u8,
    pub gross: [u8; PLAYERS],
    #[serde(default)]
    pub flags: [JunkFlags; PLAYERS],
    /// The trailing team calls a double before the hole is scored.
    #[serde(default)]
    pub double: bool,
}

fn default_course_id() -> String {
    "millbrook".to_string()
}

impl Scorecard {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        Ok(read_yaml(path.as_ref())?)
    }

    fn players(&self) -> Result<[Player; PLAYERS], ReplayError> {
        let players: Vec<Player> = self
            .players
            .iter()
            .map(|entry| {
                let player = Player::new(entry.id.as_str(), &entry.first, &entry.last, entry.index);
                if entry.ghost {
                    Player::ghost_of(&player)
                } else {
                    player
                }
            })
            .collect();
        players
            .try_into()
            .map_err(|players: Vec<Player>| ReplayError::PlayerCount {
                found: players.len(),
            })
    }

    fn teams(&self) -> Result<[Team; PLAYERS], ReplayError> {
        let teams: Vec<Team> = self.players.iter().map(|entry| entry.team).collect();
        teams
            .try_into()
            .map_err(|teams: Vec<Team>| ReplayError::PlayerCount { found: teams.len() })
    }

    /// Per-seat tees, only when every seat names one.
    fn tee_ids(&self) -> Option<[TeeId; PLAYERS]> {
        let ids: Vec<TeeId> = self
            .players
            .iter()
            .map(|entry| entry.tee.as_deref().map(TeeId::new))
            .collect::<Option<_>>()?;
        ids.try_into().ok()
    }

    fn course_source(&self) -> Result<StaticCourseSource, ReplayError> {
        let mut source = StaticCourseSource::new().with_tee(&self.course_id, standard_tee());
        for path in &self.tee_files {
            source.insert(&self.course_id, read_yaml(path)?);
        }
        Ok(source)
    }
}

/// Result of a replayed match.
pub struct ReplaySummary {
    pub holes_played: usize,
    pub status: MatchStatus,
    pub standings: Vec<(String, Money)>,
    pub big_game_total: Option<i32>,
    pub doubles_rejected: usize,
    pub csv_path: PathBuf,
}

/// Runs `card` hole by hole and writes one CSV row per settled hole.
pub fn replay(card: &Scorecard, csv_path: &Path) -> Result<ReplaySummary, ReplayError> {
    let mut config = MatchConfig::new(&card.course_id);
    config.big_game = card.big_game;
    config.big_game_specific_index = card.big_game_specific_index;
    config.seed = card.seed;
    config.player_tee_ids = card.tee_ids();

    let mut session =
        MatchSession::create(card.players()?, card.teams()?, config, &card.course_source()?)?;
    let mut doubles_rejected = 0usize;

    for hole in &card.holes {
        if hole.double && !session.call_double() {
            doubles_rejected += 1;
            event!(
                target: "millbrook_bench::replay",
                Level::WARN,
                hole = hole.hole,
                "double on the card was not available"
            );
        }
        session.submit(&HoleEntry {
            hole: hole.hole,
            gross: hole.gross,
            flags: hole.flags,
        })?;
    }

    let state = session.state();
    write_csv(&export_rows(state), csv_path)?;

    let standings = Seat::LOOP
        .iter()
        .map(|&seat| (state.player(seat).display_name(), state.scores().total(seat)))
        .collect();

    event!(
        target: "millbrook_bench::replay",
        Level::INFO,
        holes = state.ledger().len(),
        status = %state.status(),
        "scorecard replayed"
    );

    Ok(ReplaySummary {
        holes_played: state.ledger().len(),
        status: state.status(),
        standings,
        big_game_total: card.big_game.then(|| state.big_game_total()),
        doubles_rejected,
        csv_path: csv_path.to_path_buf(),
    })
}

fn write_csv(rows: &[ExportRow], path: &Path) -> Result<(), ReplayError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(ExportRow::headers())?;
    for row in rows {
        writer.write_record(row.to_record())?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("scorecard needs exactly 4 players but lists {found}")]
    PlayerCount { found: usize },
    #[error("match rejected the card: {0}")]
    Match(#[from] MatchError),
    #[error("failed to write ledger CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CARD: &str = r#"
big_game: true
seed: 11
players:
  - { id: "p1", first: "Al", last: "Avery", index: 6.1, team: Red }
  - { id: "p2", first: "Bo", last: "Baker", index: 8.4, team: Blue }
  - { id: "p3", first: "Cy", last: "Chen", index: 9.3, team: Red }
  - { id: "p4", first: "Di", last: "Dunn", index: 10.2, team: Blue }
holes:
  - { hole: 1, gross: [4, 4, 4, 4] }
  - { hole: 2, gross: [3, 5, 5, 5], flags: [{ sandie: true }, {}, {}, {}] }
  - { hole: 3, gross: [5, 4, 5, 5], double: true }
"#;

    #[test]
    fn replays_a_partial_card_into_csv() {
        let card: Scorecard = serde_yaml::from_str(CARD).expect("card parses");
        let dir = tempdir().expect("temp dir");
        let csv_path = dir.path().join("ledger.csv");
        let summary = replay(&card, &csv_path).expect("replay");

        assert_eq!(summary.holes_played, 3);
        assert_eq!(summary.status, MatchStatus::InProgress);
        assert_eq!(summary.doubles_rejected, 0);
        let total: Money = summary.standings.iter().map(|(_, money)| *money).sum();
        assert_eq!(total, Money::ZERO);
        assert!(summary.big_game_total.is_some());

        let mut reader = csv::Reader::from_path(&csv_path).expect("csv readable");
        let headers = reader.headers().expect("headers").clone();
        assert_eq!(&headers[0], "hole");
        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().expect("records");
        assert_eq!(records.len(), 3);
        assert_eq!(&records[2][3], "4.00");
    }

    #[test]
    fn double_without_a_trailing_team_is_counted() {
        let yaml = CARD.replace("{ hole: 1, gross: [4, 4, 4, 4] }", "{ hole: 1, gross: [4, 4, 4, 4], double: true }");
        let card: Scorecard = serde_yaml::from_str(&yaml).expect("card parses");
        let dir = tempdir().expect("temp dir");
        let summary = replay(&card, &dir.path().join("ledger.csv")).expect("replay");
        assert_eq!(summary.doubles_rejected, 1);
    }

    #[test]
    fn short_roster_is_rejected() {
        let mut card: Scorecard = serde_yaml::from_str(CARD).expect("card parses");
        card.players.pop();
        let dir = tempdir().expect("temp dir");
        let err = replay(&card, &dir.path().join("ledger.csv")).err().expect("fails");
        assert!(matches!(err, ReplayError::PlayerCount { found: 3 }));
    }
}
