//! Per-color move sources.

use crate::agent::Agent;
use crate::error::Result;
use crate::input::HumanInput;
use crate::rules::{Point, RulesEngine};

/// Where the moves for one color come from. Fixed for the whole match.
pub enum PlayerSource<R: RulesEngine> {
    Agent(Box<dyn Agent<R>>),
    Human(HumanInput),
}

impl<R: RulesEngine> PlayerSource<R> {
    pub fn agent(agent: impl Agent<R> + 'static) -> Self {
        PlayerSource::Agent(Box::new(agent))
    }

    pub fn is_human(&self) -> bool {
        matches!(self, PlayerSource::Human(_))
    }

    pub fn name(&self) -> &str {
        match self {
            PlayerSource::Agent(agent) => agent.name(),
            PlayerSource::Human(_) => "human",
        }
    }

    /// Produce one candidate move for the side to move.
    pub fn next_move(&mut self, rules: &R) -> Result<Point> {
        match self {
            PlayerSource::Agent(agent) => agent.get_action(rules),
            PlayerSource::Human(human) => human.next_move(rules),
        }
    }
}
