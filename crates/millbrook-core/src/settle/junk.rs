use crate::model::course::LONG_DRIVE_HOLE;
use crate::model::junk::{JunkEvent, JunkFlags, JunkKind};
use crate::model::money::Money;
use crate::model::player::{PlayerId, Seat};
use crate::model::team::Team;

/// Long drive on 17 is a flat ten dollars no matter the stake.
pub const LONG_DRIVE_VALUE: Money = Money::from_dollars(10);

/// One player's result on one hole, as junk sees it.
#[derive(Debug, Clone, Copy)]
pub struct JunkInput<'a> {
    pub hole: u8,
    pub seat: Seat,
    pub player_id: &'a PlayerId,
    pub team: Team,
    pub gross: u8,
    pub par: u8,
    pub flags: JunkFlags,
    /// Stake for this hole after any double.
    pub base: Money,
}

/// Every junk event `input` earns. Rules are independent; several may fire.
pub fn evaluate(input: &JunkInput<'_>) -> Vec<JunkEvent> {
    let mut kinds = Vec::new();
    let par_three = input.par == 3;

    if input.gross < input.par {
        kinds.push(JunkKind::Birdie);
    }
    if input.flags.sandie && input.gross <= input.par {
        kinds.push(JunkKind::Sandie);
    }
    if par_three && input.flags.on_green_from_tee && input.gross <= input.par {
        kinds.push(JunkKind::Greenie);
    }
    if par_three
        && input.flags.on_green_from_tee
        && input.flags.three_putt
        && input.gross > input.par
    {
        kinds.push(JunkKind::Penalty);
    }
    if input.hole == LONG_DRIVE_HOLE && input.flags.long_drive {
        kinds.push(JunkKind::Ld10);
    }

    kinds
        .into_iter()
        .map(|kind| JunkEvent {
            hole: input.hole,
            player_id: input.player_id.clone(),
            seat: input.seat,
            team: input.team,
            kind,
            value: value_of(kind, input.base),
        })
        .collect()
}

pub fn value_of(kind: JunkKind, base: Money) -> Money {
    match kind {
        JunkKind::Ld10 => LONG_DRIVE_VALUE,
        _ => base,
    }
}
