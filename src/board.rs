//! Capture-game rules engine on a square grid.
//!
//! Stones are placed alternately, Black first. The first placement that
//! captures an opposing group wins the game for the mover. Suicide is never
//! legal; if one is forced through an unchecked placement, the mover's own
//! group is removed and the opponent wins. A side left without any legal
//! action ends the game early.

use std::fmt;

use crate::constants::N;
use crate::error::{Error, Result};
use crate::rules::{Color, Group, Point, RulesEngine};

#[derive(Clone, Debug)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Color>>,
    next: Color,
    counter_move: usize,
    legal_actions: Vec<Point>,
    removed_groups: Vec<Group>,
    winner: Option<Color>,
    end_by_no_legal_actions: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty standard-size board with Black to move.
    pub fn new() -> Self {
        Self::with_size(N)
    }

    pub fn with_size(size: usize) -> Self {
        let mut board = Self {
            size,
            cells: vec![None; size * size],
            next: Color::Black,
            counter_move: 0,
            legal_actions: Vec::new(),
            removed_groups: Vec::new(),
            winner: None,
            end_by_no_legal_actions: false,
        };
        board.legal_actions = board.compute_legal_actions();
        board
    }

    fn on_board(&self, (x, y): Point) -> bool {
        (1..=self.size).contains(&x) && (1..=self.size).contains(&y)
    }

    fn idx(&self, (x, y): Point) -> usize {
        (y - 1) * self.size + (x - 1)
    }

    fn get(&self, point: Point) -> Option<Color> {
        if !self.on_board(point) {
            return None;
        }
        self.cells[self.idx(point)]
    }

    fn set(&mut self, point: Point, stone: Option<Color>) {
        let i = self.idx(point);
        self.cells[i] = stone;
    }

    fn neighbors(&self, (x, y): Point) -> impl Iterator<Item = Point> + '_ {
        [
            (x.wrapping_sub(1), y),
            (x + 1, y),
            (x, y.wrapping_sub(1)),
            (x, y + 1),
        ]
        .into_iter()
        .filter(|&p| self.on_board(p))
    }

    /// Count the liberties of the group containing `point` (0 if empty).
    pub fn liberties(&self, point: Point) -> usize {
        let Some(color) = self.get(point) else {
            return 0;
        };
        let mut stack = vec![point];
        let mut visited = vec![false; self.size * self.size];
        let mut liberty_seen = vec![false; self.size * self.size];
        let mut liberties = 0;
        while let Some(p) = stack.pop() {
            let i = self.idx(p);
            if visited[i] {
                continue;
            }
            visited[i] = true;
            for n in self.neighbors(p) {
                let ni = self.idx(n);
                match self.get(n) {
                    None if !liberty_seen[ni] => {
                        liberty_seen[ni] = true;
                        liberties += 1;
                    }
                    Some(c) if c == color && !visited[ni] => stack.push(n),
                    _ => {}
                }
            }
        }
        liberties
    }

    fn collect_group(&self, start: Point) -> Vec<Point> {
        let mut out = Vec::new();
        let Some(color) = self.get(start) else {
            return out;
        };
        let mut stack = vec![start];
        let mut visited = vec![false; self.size * self.size];
        while let Some(p) = stack.pop() {
            let i = self.idx(p);
            if visited[i] {
                continue;
            }
            visited[i] = true;
            out.push(p);
            for n in self.neighbors(p) {
                if !visited[self.idx(n)] && self.get(n) == Some(color) {
                    stack.push(n);
                }
            }
        }
        out
    }

    /// Opposing groups that would have no liberties after `color` plays at `point`.
    fn captured_by(&self, point: Point, color: Color) -> Vec<Group> {
        let opp = color.opponent();
        let mut groups: Vec<Group> = Vec::new();
        for n in self.neighbors(point) {
            if self.get(n) != Some(opp) || groups.iter().any(|g| g.points.contains(&n)) {
                continue;
            }
            if self.liberties(n) == 0 {
                groups.push(Group {
                    color: opp,
                    points: self.collect_group(n),
                });
            }
        }
        groups
    }

    /// Stones captured and liberties kept if the side to move played at
    /// `point`. Liberties are counted before captured stones are lifted.
    /// Occupied and off-board points give `(0, 0)`. The board is left
    /// unchanged.
    pub fn probe(&mut self, point: Point) -> (usize, usize) {
        if !self.on_board(point) || self.get(point).is_some() {
            return (0, 0);
        }
        let color = self.next;
        self.set(point, Some(color));
        let captured: usize = self
            .captured_by(point, color)
            .iter()
            .map(|g| g.points.len())
            .sum();
        let liberties = self.liberties(point);
        self.set(point, None);
        (captured, liberties)
    }

    fn compute_legal_actions(&mut self) -> Vec<Point> {
        let mut legal = Vec::new();
        for y in 1..=self.size {
            for x in 1..=self.size {
                let p = (x, y);
                if self.get(p).is_some() {
                    continue;
                }
                let (captured, liberties) = self.probe(p);
                if captured > 0 || liberties > 0 {
                    legal.push(p);
                }
            }
        }
        legal
    }
}

impl RulesEngine for Board {
    fn size(&self) -> usize {
        self.size
    }

    fn next(&self) -> Color {
        self.next
    }

    fn counter_move(&self) -> usize {
        self.counter_move
    }

    fn put_stone(&mut self, point: Point, check_legal: bool) -> Result<()> {
        if self.winner.is_some() {
            return Err(Error::GameOver);
        }
        if !self.on_board(point) {
            return Err(Error::OffBoard(point));
        }
        if self.get(point).is_some() {
            return Err(Error::Occupied(point));
        }
        if check_legal && !self.is_legal(point) {
            return Err(Error::IllegalMove(point));
        }

        let color = self.next;
        self.set(point, Some(color));
        let captured = self.captured_by(point, color);
        for group in &captured {
            for &p in &group.points {
                self.set(p, None);
            }
        }
        self.removed_groups = captured;

        if !self.removed_groups.is_empty() {
            self.winner = Some(color);
        } else if self.liberties(point) == 0 {
            // forced suicide
            let points = self.collect_group(point);
            for &p in &points {
                self.set(p, None);
            }
            self.removed_groups.push(Group { color, points });
            self.winner = Some(color.opponent());
        }

        self.counter_move += 1;
        self.next = color.opponent();

        if self.winner.is_some() {
            self.legal_actions.clear();
        } else {
            self.legal_actions = self.compute_legal_actions();
            if self.legal_actions.is_empty() {
                self.end_by_no_legal_actions = true;
                self.winner = Some(self.next.opponent());
            }
        }
        Ok(())
    }

    fn legal_actions(&self) -> &[Point] {
        &self.legal_actions
    }

    fn exist_stone(&self, point: Point) -> Option<Color> {
        self.get(point)
    }

    fn winner(&self) -> Option<Color> {
        self.winner
    }

    fn end_by_no_legal_actions(&self) -> bool {
        self.end_by_no_legal_actions
    }

    fn removed_groups(&self) -> &[Group] {
        &self.removed_groups
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 1..=self.size {
            for x in 1..=self.size {
                let ch = match self.get((x, y)) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
