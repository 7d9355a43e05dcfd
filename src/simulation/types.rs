//! Core types for the parking simulation
//!
//! Ids, grid positions and the default lot layout.

use std::fmt;

/// A wrapper type for car ids
///
/// Car ids are handed out in arrival order starting at 1, so comparing two ids
/// tells you which car arrived first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CarId(pub u64);

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A wrapper type for slot ids
///
/// Slots are numbered row-major: `row * cols + col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(pub usize);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot-{}", self.0)
    }
}

/// A cell on the parking grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Euclidean distance from this cell to `origin`
    pub fn distance(&self, origin: &GridPosition) -> f32 {
        let dx = self.col as f32 - origin.col as f32;
        let dy = self.row as f32 - origin.row as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Simulation time measured in whole ticks
pub type Tick = u64;

/// Rows in the default lot
pub const DEFAULT_ROWS: usize = 4;

/// Columns in the default lot
pub const DEFAULT_COLS: usize = 6;

/// Entrance of the default lot
pub const DEFAULT_ENTRANCE: GridPosition = GridPosition { row: 0, col: 0 };
