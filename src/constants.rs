//! Constants for board geometry, match pacing, and rendering.
//!
//! The board uses 1-based coordinates: a 19x19 game addresses points
//! `(1, 1)` through `(19, 19)`, and the center is `(10, 10)`.

use std::time::Duration;

use crate::rules::Point;

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
pub const N: usize = 19;

/// Center point of a board of the given size; every match opens here.
pub const fn center(size: usize) -> Point {
    (size / 2 + 1, size / 2 + 1)
}

/// The fixed opening move on the standard board.
pub const FIRST_MOVE: Point = center(N);

// =============================================================================
// Match Pacing
// =============================================================================

/// Interval between polls of the input event queue while waiting for a human.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Delay before polling an agent when a renderer is attached.
pub const AGENT_DELAY: Duration = Duration::from_millis(100);

// =============================================================================
// Rendering
// =============================================================================

/// Marker size used for legal-action candidates.
pub const CANDIDATE_SIZE: u32 = 8;

/// Pixel offset of grid coordinate 0 in the windowed layout.
pub const PIXEL_ORIGIN: f64 = 5.0;

/// Pixel distance between adjacent grid lines in the windowed layout.
pub const PIXEL_SPACING: f64 = 40.0;

/// Side length in pixels of one board cell in a saved snapshot.
pub const SNAPSHOT_CELL: usize = 16;

/// Terminal column of grid coordinate 0.
pub const TERM_ORIGIN_X: f64 = 2.0;

/// Terminal row of grid coordinate 0.
pub const TERM_ORIGIN_Y: f64 = 1.0;

/// Terminal columns between adjacent grid points.
pub const TERM_SPACING_X: f64 = 2.0;

/// Terminal rows between adjacent grid points.
pub const TERM_SPACING_Y: f64 = 1.0;
