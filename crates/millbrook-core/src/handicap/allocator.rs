//! Handicap stroke allocation.
//!
//! Every player plays off the lowest index in the group (or an explicit
//! baseline). The difference, floored, is the number of strokes received;
//! strokes are dealt one at a time down the stroke-index order and wrap back
//! to the hardest hole once all 18 have one.

use crate::model::course::HOLES;
use std::array;
use thiserror::Error;

/// Stroke index per hole, `table[hole - 1]`, a permutation of 1..=18.
pub type StrokeIndexTable = [u8; HOLES];

/// Strokes received per hole, `row[hole - 1]`.
pub type StrokeRow = [u8; HOLES];

const INDEX_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("stroke index table has {found} entries, expected 18")]
    WrongLength { found: usize },
    #[error("stroke index {value} is duplicated or outside 1..=18")]
    InvalidIndex { value: u8 },
}

pub fn default_stroke_indexes() -> StrokeIndexTable {
    array::from_fn(|i| i as u8 + 1)
}

pub fn stroke_index_table(raw: &[u8]) -> Result<StrokeIndexTable, AllocationError> {
    if raw.len() != HOLES {
        return Err(AllocationError::WrongLength { found: raw.len() });
    }
    let mut seen = [false; HOLES];
    for &value in raw {
        let slot = usize::from(value)
            .checked_sub(1)
            .filter(|slot| *slot < HOLES)
            .ok_or(AllocationError::InvalidIndex { value })?;
        if seen[slot] {
            return Err(AllocationError::InvalidIndex { value });
        }
        seen[slot] = true;
    }
    Ok(array::from_fn(|i| raw[i]))
}

/// Strokes `index` receives against `baseline`. Never negative.
pub fn total_strokes(index: f64, baseline: f64) -> u32 {
    let gap = index - baseline + INDEX_EPSILON;
    if gap.is_finite() && gap > 0.0 {
        gap.floor() as u32
    } else {
        0
    }
}

/// Hole positions (0-based) from hardest to easiest.
fn hole_order(table: &StrokeIndexTable) -> [usize; HOLES] {
    let mut order: [usize; HOLES] = array::from_fn(|i| i);
    order.sort_by_key(|&hole| (table[hole], hole));
    order
}

fn deal(strokes: u32, table: &StrokeIndexTable) -> StrokeRow {
    let order = hole_order(table);
    let mut row = [0u8; HOLES];
    for k in 0..strokes as usize {
        let hole = order[k % HOLES];
        row[hole] = row[hole].saturating_add(1);
    }
    row
}

fn lowest(indexes: &[f64]) -> f64 {
    indexes
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold(f64::INFINITY, f64::min)
}

/// Allocates strokes for every player against one shared table.
pub fn allocate(indexes: &[f64], table: &StrokeIndexTable) -> Vec<StrokeRow> {
    let baseline = lowest(indexes);
    indexes
        .iter()
        .map(|&index| deal(total_strokes(index, baseline), table))
        .collect()
}

/// Like [`allocate`], but each player is ranked against their own tee.
pub fn allocate_multi_tee(indexes: &[f64], tables: &[StrokeIndexTable]) -> Vec<StrokeRow> {
    allocate_with_baseline(indexes, tables, None)
}

/// Per-tee allocation with an optional baseline override (used by the Big Game).
///
/// `tables` is matched to `indexes` by position; a player without a table of
/// their own is ranked against the ascending default.
pub fn allocate_with_baseline(
    indexes: &[f64],
    tables: &[StrokeIndexTable],
    baseline: Option<f64>,
) -> Vec<StrokeRow> {
    let baseline = baseline.unwrap_or_else(|| lowest(indexes));
    let fallback = default_stroke_indexes();
    indexes
        .iter()
        .enumerate()
        .map(|(i, &index)| {
            let table = tables.get(i).unwrap_or(&fallback);
            deal(total_strokes(index, baseline), table)
        })
        .collect()
}
