//! go-match: match orchestration for a two-player capture game.
//!
//! Two sides, each bound to an autonomous agent or a human, take turns on a
//! Go-like board until the first capture (or until the side to move has no
//! legal action). Single matches can be watched and played in the terminal;
//! batches of agent matches produce win and draw rates.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, pacing and layout constants
//! - [`rules`] - The rules-engine contract (`RulesEngine`, `Color`, `Point`)
//! - [`board`] - The capture-game rules engine
//! - [`agent`] - Autonomous agents
//! - [`player`] - Per-color move sources (agent or human)
//! - [`input`] - Human input adapter with cancellable polling
//! - [`render`] - Incremental renderer contract and in-memory canvas
//! - [`terminal`] - crossterm renderer and input events
//! - [`game`] - The match controller
//! - [`batch`] - Batch evaluation and outcome statistics
//!
//! ## Example
//!
//! ```
//! use go_match::agent::RandomAgent;
//! use go_match::batch::BatchEvaluator;
//! use go_match::board::Board;
//! use go_match::game::{Match, MatchConfig};
//! use go_match::player::PlayerSource;
//!
//! let mut eval = BatchEvaluator::new();
//! let report = eval
//!     .run(
//!         3,
//!         |i| {
//!             Match::new(
//!                 PlayerSource::agent(RandomAgent::with_seed(2 * i as u64)),
//!                 PlayerSource::agent(RandomAgent::with_seed(2 * i as u64 + 1)),
//!                 Board::with_size(9),
//!                 None,
//!                 MatchConfig::default(),
//!             )
//!         },
//!         |_, _, _| {},
//!     )
//!     .unwrap();
//! assert_eq!(report.tally.total(), 3);
//! println!("{report}");
//! ```

pub mod agent;
pub mod batch;
pub mod board;
pub mod constants;
pub mod error;
pub mod game;
pub mod input;
pub mod player;
pub mod render;
pub mod rules;
pub mod terminal;

pub use error::{Error, Result};
