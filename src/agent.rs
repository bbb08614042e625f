//! Autonomous agents.
//!
//! An agent is a synchronous computation that returns one move for the side
//! to move. Agents are expected to return a currently legal point; the match
//! controller only relies on this in headless mode.

use crate::board::Board;
use crate::error::{Error, Result};
use crate::rules::{Point, RulesEngine};

pub trait Agent<R: RulesEngine> {
    /// Choose a move for the side to move in `rules`.
    fn get_action(&mut self, rules: &R) -> Result<Point>;

    fn name(&self) -> &str;
}

fn pick(rng: &mut fastrand::Rng, moves: &[Point]) -> Result<Point> {
    if moves.is_empty() {
        return Err(Error::NoLegalMoves);
    }
    Ok(moves[rng.usize(..moves.len())])
}

/// Plays a uniformly random legal move.
pub struct RandomAgent {
    rng: fastrand::Rng,
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomAgent {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl<R: RulesEngine> Agent<R> for RandomAgent {
    fn get_action(&mut self, rules: &R) -> Result<Point> {
        pick(&mut self.rng, rules.legal_actions())
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// One-ply capture heuristics.
///
/// Prefers the move capturing the most stones, then any move that does not
/// leave the new stone in atari, then any legal move.
pub struct GreedyAgent {
    rng: fastrand::Rng,
}

impl Default for GreedyAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl GreedyAgent {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Agent<Board> for GreedyAgent {
    fn get_action(&mut self, board: &Board) -> Result<Point> {
        let legal = board.legal_actions();
        let mut scratch = board.clone();
        let mut best_capture: Option<(Point, usize)> = None;
        let mut safe = Vec::new();

        for &pt in legal {
            let (captured, liberties) = scratch.probe(pt);
            if captured > 0 {
                if best_capture.is_none_or(|(_, n)| captured > n) {
                    best_capture = Some((pt, captured));
                }
            } else if liberties > 1 {
                safe.push(pt);
            }
        }

        if let Some((pt, _)) = best_capture {
            return Ok(pt);
        }
        if safe.is_empty() {
            pick(&mut self.rng, legal)
        } else {
            pick(&mut self.rng, &safe)
        }
    }

    fn name(&self) -> &str {
        "greedy"
    }
}
