//! Course and tee data supplied by the course collaborator.
//!
//! The engine never fetches anything itself: a [`CourseSource`] is consulted
//! once, up front, and the answers are frozen into a [`ResolvedCourse`] that
//! the settlement pipeline reads from.

use crate::handicap::allocator::{StrokeIndexTable, default_stroke_indexes, stroke_index_table};
use crate::model::player::{PLAYERS, Seat};
use serde::{Deserialize, Serialize};
use std::array;
use std::collections::HashMap;
use thiserror::Error;

pub const HOLES: usize = 18;
pub const DEFAULT_PAR: u8 = 4;
pub const LONG_DRIVE_HOLE: u8 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleInfo {
    pub number: u8,
    pub par: u8,
    pub yardage: u16,
    pub stroke_index: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeeId(String);

impl TeeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeeOption {
    pub id: TeeId,
    pub name: String,
    pub holes: Vec<HoleInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CourseError {
    #[error("tee '{tee}' lists {found} holes, expected 18")]
    MissingHoles { tee: String, found: usize },
    #[error("tee '{tee}' hole numbers are not 1..=18")]
    HoleNumbering { tee: String },
    #[error("tee '{tee}' stroke indexes are not a permutation of 1..=18")]
    InvalidStrokeIndexes { tee: String },
    #[error("tee '{tee}' not found for course '{course}'")]
    UnknownTee { course: String, tee: String },
}

impl TeeOption {
    /// Holes ordered by number, validated to a full 18.
    pub fn ordered_holes(&self) -> Result<[HoleInfo; HOLES], CourseError> {
        if self.holes.len() != HOLES {
            return Err(CourseError::MissingHoles {
                tee: self.id.as_str().to_string(),
                found: self.holes.len(),
            });
        }
        let mut sorted = self.holes.clone();
        sorted.sort_by_key(|hole| hole.number);
        let expected = (1..=HOLES as u8).collect::<Vec<_>>();
        let numbers = sorted.iter().map(|hole| hole.number).collect::<Vec<_>>();
        if numbers != expected {
            return Err(CourseError::HoleNumbering {
                tee: self.id.as_str().to_string(),
            });
        }
        Ok(array::from_fn(|i| sorted[i]))
    }

    pub fn stroke_indexes(&self) -> Result<StrokeIndexTable, CourseError> {
        let holes = self.ordered_holes()?;
        let raw = holes.iter().map(|hole| hole.stroke_index).collect::<Vec<_>>();
        stroke_index_table(&raw).map_err(|_| CourseError::InvalidStrokeIndexes {
            tee: self.id.as_str().to_string(),
        })
    }
}

/// The course repository, as far as the engine is concerned.
pub trait CourseSource {
    fn tee(&self, course_id: &str, tee_id: &TeeId) -> Option<TeeOption>;
    fn default_tee(&self, course_id: &str) -> Option<TeeOption>;
}

/// In-memory [`CourseSource`]; the first tee registered for a course is its default.
#[derive(Debug, Clone, Default)]
pub struct StaticCourseSource {
    courses: HashMap<String, Vec<TeeOption>>,
}

impl StaticCourseSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tee(mut self, course_id: &str, tee: TeeOption) -> Self {
        self.insert(course_id, tee);
        self
    }

    pub fn insert(&mut self, course_id: &str, tee: TeeOption) {
        self.courses
            .entry(course_id.to_string())
            .or_default()
            .push(tee);
    }
}

impl CourseSource for StaticCourseSource {
    fn tee(&self, course_id: &str, tee_id: &TeeId) -> Option<TeeOption> {
        self.courses
            .get(course_id)?
            .iter()
            .find(|tee| &tee.id == tee_id)
            .cloned()
    }

    fn default_tee(&self, course_id: &str) -> Option<TeeOption> {
        self.courses.get(course_id)?.first().cloned()
    }
}

const STANDARD_PARS: [u8; HOLES] = [4, 4, 4, 3, 5, 4, 3, 5, 4, 4, 3, 5, 4, 4, 4, 3, 5, 4];
const STANDARD_STROKE_INDEXES: [u8; HOLES] =
    [7, 15, 5, 11, 1, 13, 3, 17, 9, 2, 14, 6, 18, 10, 4, 16, 8, 12];
const STANDARD_YARDAGES: [u16; HOLES] = [
    402, 365, 418, 176, 540, 384, 205, 512, 395, 431, 158, 528, 341, 389, 447, 192, 501, 410,
];

/// The Millbrook white tees.
pub fn standard_tee() -> TeeOption {
    TeeOption {
        id: TeeId::new("standard"),
        name: "Standard".to_string(),
        holes: (0..HOLES)
            .map(|i| HoleInfo {
                number: i as u8 + 1,
                par: STANDARD_PARS[i],
                yardage: STANDARD_YARDAGES[i],
                stroke_index: STANDARD_STROKE_INDEXES[i],
            })
            .collect(),
    }
}

/// Stand-in layout used when a tee is missing or malformed.
pub fn fallback_holes() -> [HoleInfo; HOLES] {
    let table = default_stroke_indexes();
    array::from_fn(|i| HoleInfo {
        number: i as u8 + 1,
        par: DEFAULT_PAR,
        yardage: 0,
        stroke_index: table[i],
    })
}

/// Course data frozen for the lifetime of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCourse {
    pub course_id: String,
    pub holes: [HoleInfo; HOLES],
    pub tee_ids: [Option<TeeId>; PLAYERS],
    pub stroke_indexes: [StrokeIndexTable; PLAYERS],
}

impl ResolvedCourse {
    /// A course where every seat plays the same validated tee.
    pub fn single_tee(course_id: &str, tee: &TeeOption) -> Self {
        let (holes, table) = layout_or_fallback(course_id, Some(tee));
        Self {
            course_id: course_id.to_string(),
            holes,
            tee_ids: array::from_fn(|_| Some(tee.id.clone())),
            stroke_indexes: [table; PLAYERS],
        }
    }

    pub fn hole(&self, number: u8) -> Option<&HoleInfo> {
        self.holes.get(usize::from(number).checked_sub(1)?)
    }

    pub fn par(&self, number: u8) -> u8 {
        self.hole(number).map(|hole| hole.par).unwrap_or(DEFAULT_PAR)
    }

    pub fn total_par(&self) -> u32 {
        self.holes.iter().map(|hole| u32::from(hole.par)).sum()
    }

    /// The match holes with `seat`'s own stroke indexes substituted in.
    pub fn holes_for(&self, seat: Seat) -> [HoleInfo; HOLES] {
        let table = &self.stroke_indexes[seat.index()];
        array::from_fn(|i| HoleInfo {
            stroke_index: table[i],
            ..self.holes[i]
        })
    }
}

/// Pulls every tee the match needs from `source` before scoring begins.
///
/// Par and yardage come from the first seat tee with a complete layout, then
/// the course default. Only when neither resolves does the match fall back to
/// the synthetic par-4 layout. Stroke indexes stay per seat.
pub fn resolve_course(
    source: &dyn CourseSource,
    course_id: &str,
    player_tee_ids: Option<&[TeeId; PLAYERS]>,
) -> ResolvedCourse {
    let seat_tees: [Option<TeeOption>; PLAYERS] = match player_tee_ids {
        Some(ids) => array::from_fn(|i| {
            let tee = source.tee(course_id, &ids[i]);
            if tee.is_none() {
                let err = CourseError::UnknownTee {
                    course: course_id.to_string(),
                    tee: ids[i].as_str().to_string(),
                };
                tracing::warn!(
                    target: "millbrook_core::course",
                    seat = %Seat::LOOP[i],
                    error = %err,
                    "falling back to default stroke indexes"
                );
            }
            tee
        }),
        None => {
            let tee = source.default_tee(course_id);
            array::from_fn(|_| tee.clone())
        }
    };

    let layout_tee = seat_tees
        .iter()
        .flatten()
        .find(|tee| tee.ordered_holes().is_ok())
        .cloned()
        .or_else(|| source.default_tee(course_id));
    let (holes, _) = layout_or_fallback(course_id, layout_tee.as_ref());
    let stroke_indexes =
        array::from_fn(|i| layout_or_fallback(course_id, seat_tees[i].as_ref()).1);

    ResolvedCourse {
        course_id: course_id.to_string(),
        holes,
        tee_ids: array::from_fn(|i| seat_tees[i].as_ref().map(|tee| tee.id.clone())),
        stroke_indexes,
    }
}

fn layout_or_fallback(
    course_id: &str,
    tee: Option<&TeeOption>,
) -> ([HoleInfo; HOLES], StrokeIndexTable) {
    let Some(tee) = tee else {
        tracing::warn!(
            target: "millbrook_core::course",
            course = course_id,
            "no tee data available; using synthetic layout"
        );
        return (fallback_holes(), default_stroke_indexes());
    };

    match tee.ordered_holes() {
        Ok(holes) => match tee.stroke_indexes() {
            Ok(table) => (holes, table),
            Err(err) => {
                tracing::warn!(
                    target: "millbrook_core::course",
                    course = course_id,
                    error = %err,
                    "keeping pars but replacing stroke indexes with 1..18"
                );
                let table = default_stroke_indexes();
                let holes = array::from_fn(|i| HoleInfo {
                    stroke_index: table[i],
                    ..holes[i]
                });
                (holes, table)
            }
        },
        Err(err) => {
            tracing::warn!(
                target: "millbrook_core::course",
                course = course_id,
                error = %err,
                "tee layout incomplete; using synthetic layout"
            );
            (fallback_holes(), default_stroke_indexes())
        }
    }
}
