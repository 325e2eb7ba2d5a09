use crate::game::error::MatchError;
use crate::ghost::GhostRound;
use crate::handicap::allocator::{StrokeRow, allocate_with_baseline};
use crate::model::course::{HOLES, ResolvedCourse, TeeId};
use crate::model::junk::JunkEvent;
use crate::model::money::Money;
use crate::model::player::{PLAYERS, Player, Seat};
use crate::model::score::{HoleScore, LedgerRow, ScoreBoard};
use crate::model::team::{Team, roster_size};
use crate::settle::big_game::BigGameTally;
use crate::settle::stake::StakeState;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::array;
use std::collections::HashSet;

/// Options chosen when the match is set up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub course_id: String,
    #[serde(default)]
    pub big_game: bool,
    #[serde(default)]
    pub player_tee_ids: Option<[TeeId; PLAYERS]>,
    /// Baseline index for Big Game strokes instead of the low eligible index.
    #[serde(default)]
    pub big_game_specific_index: Option<f64>,
    #[serde(default)]
    pub seed: u64,
}

impl MatchConfig {
    pub fn new(course_id: &str) -> Self {
        Self {
            course_id: course_id.to_string(),
            big_game: false,
            player_tee_ids: None,
            big_game_specific_index: None,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    InProgress,
    Finished,
    Abandoned,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchStatus::InProgress => "in progress",
            MatchStatus::Finished => "finished",
            MatchStatus::Abandoned => "abandoned",
        })
    }
}

/// Everything known about a match. Plain data; the per-hole reducers in
/// [`crate::game::pipeline`] produce each successive value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub(crate) players: [Player; PLAYERS],
    pub(crate) teams: [Team; PLAYERS],
    pub(crate) config: MatchConfig,
    pub(crate) course: ResolvedCourse,
    pub(crate) strokes: [StrokeRow; PLAYERS],
    pub(crate) big_game_strokes: [StrokeRow; PLAYERS],
    pub(crate) ghosts: [Option<GhostRound>; PLAYERS],
    pub(crate) stake: StakeState,
    pub(crate) scores: ScoreBoard,
    pub(crate) hole_scores: [Option<HoleScore>; HOLES],
    pub(crate) ledger: Vec<LedgerRow>,
    pub(crate) junk_events: Vec<JunkEvent>,
    pub(crate) big_game: BigGameTally,
    pub(crate) status: MatchStatus,
}

pub fn validate_teams(teams: &[Team; PLAYERS]) -> Result<(), MatchError> {
    for team in Team::ALL {
        let count = roster_size(teams, team);
        if count != 2 {
            return Err(MatchError::UnbalancedTeams { team, count });
        }
    }
    Ok(())
}

impl MatchState {
    /// Sets up a match: validates the rosters, allocates strokes for all 18
    /// holes, and draws every ghost's round.
    pub fn create(
        players: [Player; PLAYERS],
        teams: [Team; PLAYERS],
        config: MatchConfig,
        course: ResolvedCourse,
    ) -> Result<Self, MatchError> {
        validate_teams(&teams)?;
        let mut seen = HashSet::new();
        for player in &players {
            if !seen.insert(player.id.clone()) {
                return Err(MatchError::DuplicatePlayer {
                    id: player.id.clone(),
                });
            }
        }

        let indexes = players.each_ref().map(|player| player.index);
        let strokes = to_seat_rows(allocate_with_baseline(
            &indexes,
            &course.stroke_indexes,
            None,
        ));

        let big_game_baseline = config
            .big_game_specific_index
            .unwrap_or_else(|| eligible_baseline(&players));
        let big_game_strokes = to_seat_rows(allocate_with_baseline(
            &indexes,
            &course.stroke_indexes,
            Some(big_game_baseline),
        ));

        let ghosts = array::from_fn(|i| {
            let player = &players[i];
            player.is_ghost.then(|| {
                let seat = Seat::LOOP[i];
                GhostRound::generate(
                    player.index,
                    &course.holes_for(seat),
                    config.seed.wrapping_add(i as u64),
                )
            })
        });

        tracing::info!(
            target: "millbrook_core::match",
            course = %course.course_id,
            big_game = config.big_game,
            ghosts = players.iter().filter(|p| p.is_ghost).count(),
            seed = config.seed,
            "match created"
        );

        Ok(Self {
            players,
            teams,
            config,
            course,
            strokes,
            big_game_strokes,
            ghosts,
            stake: StakeState::opening(),
            scores: ScoreBoard::new(),
            hole_scores: array::from_fn(|_| None),
            ledger: Vec::new(),
            junk_events: Vec::new(),
            big_game: BigGameTally::new(),
            status: MatchStatus::InProgress,
        })
    }

    pub fn players(&self) -> &[Player; PLAYERS] {
        &self.players
    }

    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat.index()]
    }

    pub fn teams(&self) -> &[Team; PLAYERS] {
        &self.teams
    }

    pub fn team(&self, seat: Seat) -> Team {
        self.teams[seat.index()]
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn course(&self) -> &ResolvedCourse {
        &self.course
    }

    pub fn strokes(&self, seat: Seat) -> &StrokeRow {
        &self.strokes[seat.index()]
    }

    pub fn strokes_on(&self, seat: Seat, hole: u8) -> u8 {
        hole_slot(hole)
            .map(|slot| self.strokes[seat.index()][slot])
            .unwrap_or(0)
    }

    pub fn big_game_strokes(&self, seat: Seat) -> &StrokeRow {
        &self.big_game_strokes[seat.index()]
    }

    pub fn ghost(&self, seat: Seat) -> Option<&GhostRound> {
        self.ghosts[seat.index()].as_ref()
    }

    pub fn stake(&self) -> &StakeState {
        &self.stake
    }

    pub fn current_hole(&self) -> u8 {
        self.stake.hole
    }

    pub fn base(&self) -> Money {
        self.stake.base
    }

    pub fn carry(&self) -> Money {
        self.stake.carry
    }

    pub fn doubles(&self) -> u32 {
        self.stake.doubles
    }

    pub fn double_used_this_hole(&self) -> bool {
        self.stake.double_used_this_hole
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn hole_score(&self, hole: u8) -> Option<&HoleScore> {
        self.hole_scores.get(hole_slot(hole)?)?.as_ref()
    }

    pub fn ledger(&self) -> &[LedgerRow] {
        &self.ledger
    }

    pub fn junk_events(&self) -> &[JunkEvent] {
        &self.junk_events
    }

    pub fn junk_for_hole(&self, hole: u8) -> impl Iterator<Item = &JunkEvent> {
        self.junk_events.iter().filter(move |event| event.hole == hole)
    }

    pub fn big_game(&self) -> &BigGameTally {
        &self.big_game
    }

    pub fn big_game_total(&self) -> i32 {
        self.big_game.running_total()
    }

    pub fn is_big_game_eligible(&self, seat: Seat) -> bool {
        !self.players[seat.index()].is_ghost
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == MatchStatus::InProgress
    }

    pub fn trailing_team(&self) -> Option<Team> {
        self.scores.trailing_team(&self.teams)
    }

    pub fn is_double_available(&self) -> bool {
        self.is_in_progress() && self.stake.is_double_available(self.trailing_team())
    }
}

pub(crate) fn hole_slot(hole: u8) -> Option<usize> {
    usize::from(hole).checked_sub(1).filter(|slot| *slot < HOLES)
}

fn to_seat_rows(rows: Vec<StrokeRow>) -> [StrokeRow; PLAYERS] {
    array::from_fn(|i| rows.get(i).copied().unwrap_or([0; HOLES]))
}

/// Lowest index among real players; falls back to the whole field.
fn eligible_baseline(players: &[Player; PLAYERS]) -> f64 {
    let eligible = lowest_index(players.iter().filter(|player| !player.is_ghost));
    if eligible.is_finite() {
        eligible
    } else {
        lowest_index(players.iter())
    }
}

fn lowest_index<'a>(players: impl Iterator<Item = &'a Player>) -> f64 {
    players
        .map(|player| player.index)
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::course::standard_tee;

    fn foursome() -> [Player; PLAYERS] {
        [
            Player::new("p1", "Al", "Avery", 6.1),
            Player::new("p2", "Bo", "Baker", 8.4),
            Player::new("p3", "Cy", "Chen", 9.3),
            Player::new("p4", "Di", "Dunn", 10.2),
        ]
    }

    const TEAMS: [Team; PLAYERS] = [Team::Red, Team::Blue, Team::Red, Team::Blue];

    fn course() -> ResolvedCourse {
        ResolvedCourse::single_tee("millbrook", &standard_tee())
    }

    #[test]
    fn new_match_opens_on_hole_one_for_a_dollar() {
        let state =
            MatchState::create(foursome(), TEAMS, MatchConfig::new("millbrook"), course()).unwrap();
        assert_eq!(state.current_hole(), 1);
        assert_eq!(state.base(), Money::from_dollars(1));
        assert_eq!(state.carry(), Money::ZERO);
        assert_eq!(state.status(), MatchStatus::InProgress);
        assert!(!state.is_double_available());
    }

    #[test]
    fn strokes_are_allocated_at_creation() {
        let state =
            MatchState::create(foursome(), TEAMS, MatchConfig::new("millbrook"), course()).unwrap();
        let totals = Seat::LOOP.map(|seat| state.strokes(seat).iter().map(|&s| u32::from(s)).sum::<u32>());
        assert_eq!(totals, [0, 2, 3, 4]);
        assert_eq!(state.strokes_on(Seat::Four, 5), 1);
        assert_eq!(state.strokes_on(Seat::Four, 0), 0);
    }

    #[test]
    fn teams_must_be_two_and_two() {
        let err = MatchState::create(
            foursome(),
            [Team::Red, Team::Red, Team::Red, Team::Blue],
            MatchConfig::new("millbrook"),
            course(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            MatchError::UnbalancedTeams {
                team: Team::Red,
                count: 3
            }
        );
    }

    #[test]
    fn duplicate_players_are_rejected() {
        let mut players = foursome();
        players[3].id = players[0].id.clone();
        let err = MatchState::create(players, TEAMS, MatchConfig::new("millbrook"), course())
            .unwrap_err();
        assert_eq!(err.code(), "duplicate_player");
    }

    #[test]
    fn ghosts_are_drawn_once_and_excluded_from_big_game_baseline() {
        let mut players = foursome();
        players[0] = Player::ghost_of(&Player::new("p9", "Gus", "Hale", 2.0));
        players[0].index = 2.0;
        let mut config = MatchConfig::new("millbrook");
        config.big_game = true;
        config.seed = 41;
        let state = MatchState::create(players, TEAMS, config, course()).unwrap();
        assert!(state.ghost(Seat::One).is_some());
        assert!(state.ghost(Seat::Two).is_none());
        assert!(!state.is_big_game_eligible(Seat::One));
        // Big Game baseline is 8.4 (lowest real player); match baseline is 2.0.
        let bg_total: u32 = state.big_game_strokes(Seat::Two).iter().map(|&s| u32::from(s)).sum();
        let match_total: u32 = state.strokes(Seat::Two).iter().map(|&s| u32::from(s)).sum();
        assert_eq!(bg_total, 0);
        assert_eq!(match_total, 6);
    }

    #[test]
    fn explicit_big_game_index_overrides_baseline() {
        let mut config = MatchConfig::new("millbrook");
        config.big_game = true;
        config.big_game_specific_index = Some(9.0);
        let state = MatchState::create(foursome(), TEAMS, config, course()).unwrap();
        let bg_total: u32 = state.big_game_strokes(Seat::Four).iter().map(|&s| u32::from(s)).sum();
        assert_eq!(bg_total, 1);
        assert_eq!(state.big_game_strokes(Seat::One), &[0; HOLES]);
    }
}
