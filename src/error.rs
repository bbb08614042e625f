//! Error types for match orchestration.

use std::path::PathBuf;

use thiserror::Error;

use crate::rules::Point;

/// Main error type for the crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("point {0:?} is off the board")]
    OffBoard(Point),

    #[error("point {0:?} is already occupied")]
    Occupied(Point),

    #[error("illegal move at {0:?}")]
    IllegalMove(Point),

    #[error("game already over")]
    GameOver,

    #[error("no legal moves available")]
    NoLegalMoves,

    #[error("agent returned illegal move {0:?} in headless mode")]
    ContractViolation(Point),

    #[error("input aborted by quit signal")]
    Aborted,

    #[error("invalid configuration: {0}")]
    Config(&'static str),

    #[error("failed to save snapshot to {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias using the crate error type.
pub type Result<T> = std::result::Result<T, Error>;
