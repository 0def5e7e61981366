//! Contains common, primitive types shared by every Marquee component.
//!
//! This module fixes the grid layout the screen saver walks on and defines the
//! small value types (`Position`, `ComponentId`) passed between the walker, the
//! grid state and the hosting `Scope`.

use slotmap::new_key_type;
use std::fmt;

/// Number of rows in each grid.
pub const ROWS: usize = 7;

/// Number of columns in each grid.
pub const COLS: usize = 5;

/// Number of grids the leader marker cycles through.
pub const GRID_COUNT: usize = 3;

/// Number of markers in the train (leader included).
pub const MARKER_COUNT: usize = 4;

new_key_type! {
    /// Uniquely and safely identifies a component mounted on a `Scope`.
    ///
    /// Keys are never reused, so a stale id held by a view layer after an
    /// unmount simply fails to resolve instead of aliasing a newer component.
    pub struct ComponentId;
}

/// One cell on one grid's border path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Index into the set of grids.
    pub grid: usize,
    /// Row in `[0, ROWS)`.
    pub row: usize,
    /// Column in `[0, COLS)`.
    pub col: usize,
}

impl Position {
    pub const fn new(grid: usize, row: usize, col: usize) -> Self {
        Self { grid, row, col }
    }

    /// The top-left cell of the first grid, where the train is laid out.
    pub const fn origin() -> Self {
        Self::new(0, 0, 0)
    }

    /// Returns `true` if this cell lies on the border of a `rows` x `cols` grid.
    pub fn is_perimeter(&self, rows: usize, cols: usize) -> bool {
        self.row < rows
            && self.col < cols
            && (self.row == 0 || self.row == rows - 1 || self.col == 0 || self.col == cols - 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grid {} ({}, {})", self.grid, self.row, self.col)
    }
}
