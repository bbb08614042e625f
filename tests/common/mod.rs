//! Scripted collaborators for driving matches in tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::rc::Rc;

use go_match::agent::Agent;
use go_match::error::{Error, Result};
use go_match::render::{Canvas, Marker, Renderer};
use go_match::rules::{Color, Group, Point, RulesEngine};

/// A rules engine whose legal sets and ending are fixed up front.
///
/// Every placement flips the side to move. After `end_after` placements the
/// game ends with `final_winner`; before that, each placement installs the
/// next scripted legal set (or keeps the current one when the script runs out).
pub struct ScriptedRules {
    pub size: usize,
    pub next: Color,
    pub legal: Vec<Point>,
    pub legal_script: VecDeque<Vec<Point>>,
    pub end_after: usize,
    pub final_winner: Color,
    pub no_legal_end: bool,
    pub final_removed: Vec<Group>,
    /// Every placement as `(point, check_legal)`.
    pub placed: Vec<(Point, bool)>,
    stones: HashMap<Point, Color>,
    removed: Vec<Group>,
    winner: Option<Color>,
    ended_no_legal: bool,
}

impl ScriptedRules {
    /// Opening stone is Black's; the first polled side is White.
    pub fn new(end_after: usize, final_winner: Color) -> Self {
        Self {
            size: 19,
            next: Color::Black,
            legal: Vec::new(),
            legal_script: VecDeque::new(),
            end_after,
            final_winner,
            no_legal_end: false,
            final_removed: Vec::new(),
            placed: Vec::new(),
            stones: HashMap::new(),
            removed: Vec::new(),
            winner: None,
            ended_no_legal: false,
        }
    }

    pub fn with_legal(mut self, sets: impl IntoIterator<Item = Vec<Point>>) -> Self {
        self.legal_script = sets.into_iter().collect();
        self
    }

    pub fn ending_without_legal_actions(mut self) -> Self {
        self.no_legal_end = true;
        self
    }

    pub fn with_final_removed(mut self, groups: Vec<Group>) -> Self {
        self.final_removed = groups;
        self
    }
}

impl RulesEngine for ScriptedRules {
    fn size(&self) -> usize {
        self.size
    }

    fn next(&self) -> Color {
        self.next
    }

    fn counter_move(&self) -> usize {
        self.placed.len()
    }

    fn put_stone(&mut self, point: Point, check_legal: bool) -> Result<()> {
        if self.winner.is_some() {
            return Err(Error::GameOver);
        }
        if check_legal && !self.is_legal(point) {
            return Err(Error::IllegalMove(point));
        }
        self.placed.push((point, check_legal));
        self.stones.insert(point, self.next);
        self.next = self.next.opponent();

        if self.placed.len() >= self.end_after {
            self.winner = Some(self.final_winner);
            self.ended_no_legal = self.no_legal_end;
            self.removed = std::mem::take(&mut self.final_removed);
            for group in &self.removed {
                for p in &group.points {
                    self.stones.remove(p);
                }
            }
            self.legal.clear();
        } else if let Some(next) = self.legal_script.pop_front() {
            self.legal = next;
        }
        Ok(())
    }

    fn legal_actions(&self) -> &[Point] {
        &self.legal
    }

    fn exist_stone(&self, point: Point) -> Option<Color> {
        self.stones.get(&point).copied()
    }

    fn winner(&self) -> Option<Color> {
        self.winner
    }

    fn end_by_no_legal_actions(&self) -> bool {
        self.ended_no_legal
    }

    fn removed_groups(&self) -> &[Group] {
        &self.removed
    }
}

/// Returns a fixed sequence of moves and counts how often it was polled.
pub struct ScriptedAgent {
    moves: VecDeque<Point>,
    pub polls: Rc<Cell<usize>>,
}

impl ScriptedAgent {
    pub fn new(moves: impl IntoIterator<Item = Point>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
            polls: Rc::new(Cell::new(0)),
        }
    }
}

impl<R: RulesEngine> Agent<R> for ScriptedAgent {
    fn get_action(&mut self, _rules: &R) -> Result<Point> {
        self.polls.set(self.polls.get() + 1);
        self.moves.pop_front().ok_or(Error::NoLegalMoves)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// A canvas the test keeps a handle to after the match takes ownership.
#[derive(Clone, Default)]
pub struct SharedCanvas {
    pub canvas: Rc<RefCell<Canvas>>,
    pub saved: Rc<RefCell<Vec<std::path::PathBuf>>>,
}

impl Renderer for SharedCanvas {
    fn initialize(&mut self, size: usize) -> Result<()> {
        self.canvas.borrow_mut().initialize(size)
    }

    fn draw(&mut self, point: Point, marker: Marker) -> Result<()> {
        self.canvas.borrow_mut().draw(point, marker)
    }

    fn erase(&mut self, point: Point) -> Result<()> {
        self.canvas.borrow_mut().erase(point)
    }

    fn save_snapshot(&self, path: &Path) -> Result<()> {
        self.canvas.borrow().save_snapshot(path)?;
        self.saved.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}
