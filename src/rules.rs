//! The rules-engine contract consumed by the match controller.
//!
//! A rules engine owns the board exclusively. The match controller never
//! inspects stones directly; it asks the engine for the legal-action set,
//! places stones through it, and reads back the terminal state.

use std::fmt;

use crate::error::Result;

/// A grid coordinate `(x, y)`.
pub type Point = (usize, usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "BLACK"),
            Color::White => write!(f, "WHITE"),
        }
    }
}

/// A connected set of stones removed by a single placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub color: Color,
    pub points: Vec<Point>,
}

/// Board state, legality and capture resolution for one game.
pub trait RulesEngine {
    /// Board side length.
    fn size(&self) -> usize;

    /// Side to move.
    fn next(&self) -> Color;

    /// Number of stones placed so far, the opening move included.
    fn counter_move(&self) -> usize;

    /// Place a stone for the side to move.
    ///
    /// With `check_legal == false` the caller asserts that `point` is legal.
    fn put_stone(&mut self, point: Point, check_legal: bool) -> Result<()>;

    /// Legal actions for the side to move, recomputed after every placement.
    fn legal_actions(&self) -> &[Point];

    /// The stone at `point`, if any.
    fn exist_stone(&self, point: Point) -> Option<Color>;

    /// The winner once the game is over.
    fn winner(&self) -> Option<Color>;

    /// True iff the game ended because the side to move had no legal action.
    fn end_by_no_legal_actions(&self) -> bool;

    /// Groups captured by the most recent placement.
    fn removed_groups(&self) -> &[Group];

    fn is_legal(&self, point: Point) -> bool {
        self.legal_actions().contains(&point)
    }
}
