use crate::game::error::MatchError;
use crate::game::match_state::{MatchConfig, MatchState, MatchStatus};
use crate::game::pipeline::{self, HoleEntry};
use crate::model::course::{CourseSource, resolve_course};
use crate::model::junk::JunkFlags;
use crate::model::player::{PLAYERS, Player};
use crate::model::score::LedgerRow;
use crate::model::team::Team;

/// Owns the one mutable [`MatchState`] of a match and swaps in each new
/// state only after a reducer succeeds.
#[derive(Debug, Clone)]
pub struct MatchSession {
    state: MatchState,
}

impl MatchSession {
    /// Resolves all course data, allocates strokes and draws ghost rounds.
    pub fn create(
        players: [Player; PLAYERS],
        teams: [Team; PLAYERS],
        config: MatchConfig,
        courses: &dyn CourseSource,
    ) -> Result<Self, MatchError> {
        let course = resolve_course(courses, &config.course_id, config.player_tee_ids.as_ref());
        let state = MatchState::create(players, teams, config, course)?;
        Ok(Self { state })
    }

    pub fn from_state(state: MatchState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn enter_hole_scores(
        &mut self,
        hole: u8,
        gross: [u8; PLAYERS],
        flags: [JunkFlags; PLAYERS],
    ) -> Result<(), MatchError> {
        self.submit(&HoleEntry { hole, gross, flags })
    }

    pub fn submit(&mut self, entry: &HoleEntry) -> Result<(), MatchError> {
        self.state = pipeline::submit_hole(&self.state, entry)?;
        Ok(())
    }

    pub fn last_row(&self) -> Option<&LedgerRow> {
        self.state.ledger().last()
    }

    /// Returns whether the double took effect.
    pub fn call_double(&mut self) -> bool {
        let next = pipeline::call_double(&self.state);
        let applied = next.doubles() != self.state.doubles();
        self.state = next;
        applied
    }

    pub fn is_double_available(&self) -> bool {
        self.state.is_double_available()
    }

    /// Stops the match at the current hole boundary. Settled holes stand.
    pub fn abandon(&mut self) -> Result<(), MatchError> {
        if !self.state.is_in_progress() {
            return Err(MatchError::NotInProgress {
                status: self.state.status(),
            });
        }
        self.state.status = MatchStatus::Abandoned;
        tracing::info!(
            target: "millbrook_core::match",
            hole = self.state.current_hole(),
            settled = self.state.ledger().len(),
            "match abandoned"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::course::{HoleInfo, StaticCourseSource, TeeId, TeeOption, standard_tee};
    use crate::model::money::Money;
    use crate::model::player::Seat;

    const TEAMS: [Team; PLAYERS] = [Team::Red, Team::Blue, Team::Red, Team::Blue];

    fn players() -> [Player; PLAYERS] {
        [
            Player::new("p1", "Al", "Avery", 6.1),
            Player::new("p2", "Bo", "Baker", 8.4),
            Player::new("p3", "Cy", "Chen", 9.3),
            Player::new("p4", "Di", "Dunn", 10.2),
        ]
    }

    fn session() -> MatchSession {
        let source = StaticCourseSource::new().with_tee("millbrook", standard_tee());
        MatchSession::create(players(), TEAMS, MatchConfig::new("millbrook"), &source).unwrap()
    }

    #[test]
    fn enter_hole_scores_commits_a_row() {
        let mut session = session();
        session
            .enter_hole_scores(1, [4, 4, 4, 4], [JunkFlags::NONE; PLAYERS])
            .unwrap();
        let row = session.last_row().unwrap();
        assert_eq!(row.hole, 1);
        assert_eq!(row.carry_after, Money::from_dollars(1));
        assert_eq!(session.state().base(), Money::from_dollars(2));
    }

    #[test]
    fn rejected_entry_leaves_state_alone() {
        let mut session = session();
        let before = session.state().clone();
        assert!(session.submit(&HoleEntry::new(3, [4, 4, 4, 4])).is_err());
        assert!(session.submit(&HoleEntry::new(1, [4, 21, 4, 4])).is_err());
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn double_reports_whether_it_applied() {
        let mut session = session();
        assert!(!session.call_double());
        session.submit(&HoleEntry::new(1, [4, 3, 4, 4])).unwrap();
        assert!(session.is_double_available());
        assert!(session.call_double());
        assert!(!session.call_double());
        assert_eq!(session.state().base(), Money::from_dollars(4));
    }

    #[test]
    fn abandoned_match_refuses_scores() {
        let mut session = session();
        session.submit(&HoleEntry::new(1, [4, 4, 4, 4])).unwrap();
        session.abandon().unwrap();
        let err = session.submit(&HoleEntry::new(2, [4, 4, 4, 4])).unwrap_err();
        assert_eq!(
            err,
            MatchError::NotInProgress {
                status: MatchStatus::Abandoned
            }
        );
        assert!(session.abandon().is_err());
        assert_eq!(session.state().ledger().len(), 1);
    }

    #[test]
    fn per_player_tees_are_resolved_up_front() {
        let reversed = TeeOption {
            id: TeeId::new("forward"),
            name: "Forward".into(),
            holes: standard_tee()
                .holes
                .iter()
                .map(|hole| HoleInfo {
                    stroke_index: 19 - hole.stroke_index,
                    ..*hole
                })
                .collect(),
        };
        let source = StaticCourseSource::new()
            .with_tee("millbrook", standard_tee())
            .with_tee("millbrook", reversed);
        let mut config = MatchConfig::new("millbrook");
        let standard = standard_tee().id;
        config.player_tee_ids = Some([
            standard.clone(),
            standard.clone(),
            standard,
            TeeId::new("forward"),
        ]);
        let session = MatchSession::create(players(), TEAMS, config, &source).unwrap();
        let state = session.state();
        // Seat 4 gets four strokes on the forward tee's hardest holes (SI 18 on the card).
        assert_eq!(state.strokes_on(Seat::Four, 13), 1);
        assert_eq!(state.strokes_on(Seat::Four, 5), 0);
        assert_eq!(state.strokes_on(Seat::Three, 5), 1);
    }
}
