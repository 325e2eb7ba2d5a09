//! Flat per-hole rows for spreadsheet export.
//!
//! The core only shapes the rows; writing them out is left to the caller.

use crate::game::MatchState;
use crate::model::money::Money;
use crate::model::player::{PLAYERS, Seat};
use crate::model::score::HoleOutcome;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub hole: u8,
    pub par: u8,
    pub winner: String,
    pub base: Money,
    pub carry: Money,
    pub doubles: u32,
    pub payout: Money,
    pub gross: [u8; PLAYERS],
    pub net: [i32; PLAYERS],
    pub running: [Money; PLAYERS],
    pub red_junk: Money,
    pub blue_junk: Money,
    pub big_game_subtotal: Option<i32>,
}

impl ExportRow {
    /// Column names matching [`ExportRow::to_record`].
    pub fn headers() -> Vec<String> {
        let mut headers: Vec<String> = ["hole", "par", "winner", "base", "carry", "doubles", "payout"]
            .into_iter()
            .map(String::from)
            .collect();
        for seat in Seat::LOOP {
            let tag = seat.to_string().to_lowercase();
            headers.push(format!("{tag}_gross"));
            headers.push(format!("{tag}_net"));
            headers.push(format!("{tag}_running"));
        }
        headers.extend(
            ["red_junk", "blue_junk", "big_game_subtotal"]
                .into_iter()
                .map(String::from),
        );
        headers
    }

    pub fn to_record(&self) -> Vec<String> {
        let mut record = vec![
            self.hole.to_string(),
            self.par.to_string(),
            self.winner.clone(),
            amount(self.base),
            amount(self.carry),
            self.doubles.to_string(),
            amount(self.payout),
        ];
        for seat in Seat::LOOP {
            let i = seat.index();
            record.push(self.gross[i].to_string());
            record.push(self.net[i].to_string());
            record.push(amount(self.running[i]));
        }
        record.push(amount(self.red_junk));
        record.push(amount(self.blue_junk));
        record.push(
            self.big_game_subtotal
                .map(|subtotal| subtotal.to_string())
                .unwrap_or_default(),
        );
        record
    }
}

/// One row per settled hole, in play order.
pub fn export_rows(state: &MatchState) -> Vec<ExportRow> {
    state
        .ledger()
        .iter()
        .filter_map(|row| {
            let score = state.hole_score(row.hole)?;
            Some(ExportRow {
                hole: row.hole,
                par: score.par,
                winner: match row.outcome {
                    HoleOutcome::Won(team) => team.to_string(),
                    HoleOutcome::Push => "push".to_string(),
                },
                base: row.base,
                carry: row.carry_after,
                doubles: row.doubles,
                payout: row.payout,
                gross: score.gross,
                net: score.net,
                running: row.running_totals,
                red_junk: row.red_junk,
                blue_junk: row.blue_junk,
                big_game_subtotal: state
                    .big_game()
                    .row(row.hole)
                    .map(|big_game| big_game.subtotal),
            })
        })
        .collect()
}

/// Plain decimal dollars, without the currency sign.
fn amount(money: Money) -> String {
    let cents = money.cents();
    let sign = if cents < 0 { "-" } else { "" };
    format!("{sign}{}.{:02}", cents.abs() / 100, cents.abs() % 100)
}
