use crate::model::player::Seat;
use serde::{Deserialize, Serialize};

/// A seat's net score on one hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetEntry {
    pub seat: Seat,
    pub net: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigGameRow {
    pub hole: u8,
    /// The two counting scores, in seat order.
    pub best_net: [NetEntry; 2],
    pub subtotal: i32,
    pub running_total: i32,
    pub to_par: i32,
}

/// The two lowest nets, lower seat first on ties, returned in seat order.
pub fn best_two(entries: &[NetEntry]) -> Option<[NetEntry; 2]> {
    if entries.len() < 2 {
        return None;
    }
    let mut ranked = entries.to_vec();
    ranked.sort_by_key(|entry| (entry.net, entry.seat));
    let mut pair = [ranked[0], ranked[1]];
    pair.sort_by_key(|entry| entry.seat);
    Some(pair)
}

/// Running state of the Big Game pool across a round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigGameTally {
    rows: Vec<BigGameRow>,
    running_total: i32,
    par_counted: i32,
}

impl BigGameTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[BigGameRow] {
        &self.rows
    }

    pub fn running_total(&self) -> i32 {
        self.running_total
    }

    pub fn to_par(&self) -> i32 {
        self.running_total - 2 * self.par_counted
    }

    pub fn row(&self, hole: u8) -> Option<&BigGameRow> {
        self.rows.iter().find(|row| row.hole == hole)
    }

    /// Adds `hole` to the pool. With fewer than two eligible players the hole
    /// is skipped and the totals stand.
    pub fn record(&mut self, hole: u8, par: u8, eligible: &[NetEntry]) -> Option<&BigGameRow> {
        let Some(best_net) = best_two(eligible) else {
            tracing::warn!(
                target: "millbrook_core::big_game",
                hole,
                eligible = eligible.len(),
                "not enough eligible players; hole skipped"
            );
            return None;
        };
        let subtotal = best_net[0].net + best_net[1].net;
        self.running_total += subtotal;
        self.par_counted += i32::from(par);
        let row = BigGameRow {
            hole,
            best_net,
            subtotal,
            running_total: self.running_total,
            to_par: self.to_par(),
        };
        self.rows.push(row);
        self.rows.last()
    }
}
