//! The perimeter walk that moves the screen saver's marker train.
//!
//! The leader walks clockwise along the border of a grid. When it reaches the
//! bottom-right corner it hands off to the top-left corner of the next grid,
//! cycling through all grids. Followers copy the position of the marker ahead
//! of them from the previous step.

use crate::common::{Position, COLS, GRID_COUNT, MARKER_COUNT, ROWS};

/// Computes the next cell on the fixed `ROWS` x `COLS`, `GRID_COUNT` layout.
pub fn next_position(current: Position) -> Position {
    next_position_in(current, ROWS, COLS, GRID_COUNT)
}

/// Computes the next cell of a clockwise walk around a `rows` x `cols` grid.
///
/// Rules are checked in a fixed order, which decides the corners: the top
/// edge wins over the left edge at the top-left corner, and the bottom-right
/// corner hands off to the next grid before the bottom edge is considered.
/// Reaching the bottom-right corner is the only way to change grid.
///
/// `current` must lie on the perimeter. Interior cells trip a debug assertion
/// and are returned unchanged in release builds.
pub fn next_position_in(
    current: Position,
    rows: usize,
    cols: usize,
    grid_count: usize,
) -> Position {
    debug_assert!(
        current.is_perimeter(rows, cols),
        "{current} is not on the perimeter of a {rows}x{cols} grid"
    );
    let last_row = rows - 1;
    let last_col = cols - 1;
    let mut next = current;

    if current.row == 0 {
        if current.col < last_col {
            next.col += 1;
        } else {
            next.row += 1;
        }
    } else if current.col == last_col {
        if current.row < last_row {
            next.row += 1;
        } else {
            next = Position::new((current.grid + 1) % grid_count, 0, 0);
        }
    } else if current.row == last_row {
        if current.col > 0 {
            next.col -= 1;
        } else {
            next.row -= 1;
        }
    } else if current.col == 0 {
        // row 0 was handled by the top-edge branch, so only the upward move is left.
        next.row -= 1;
    }

    next
}

/// The ordered marker train. Index 0 is the leader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerTrail {
    positions: [Position; MARKER_COUNT],
}

impl MarkerTrail {
    /// Lays the train out from the origin with the leader in front.
    ///
    /// The last follower sits on `Position::origin()` and every marker ahead of
    /// it is one step further along the walk, so no two markers share a cell.
    pub fn new() -> Self {
        let mut positions = [Position::origin(); MARKER_COUNT];
        let mut cell = Position::origin();
        for slot in positions.iter_mut().rev() {
            *slot = cell;
            cell = next_position(cell);
        }
        Self { positions }
    }

    /// Builds a trail from explicit positions, leader first.
    pub fn from_positions(positions: [Position; MARKER_COUNT]) -> Self {
        Self { positions }
    }

    pub fn leader(&self) -> Position {
        self.positions[0]
    }

    pub fn positions(&self) -> &[Position; MARKER_COUNT] {
        &self.positions
    }

    /// Moves the leader one cell and shifts every follower into the cell the
    /// marker ahead of it held before this step.
    pub fn advance(&mut self) {
        let leader = next_position(self.positions[0]);
        self.positions.copy_within(0..MARKER_COUNT - 1, 1);
        self.positions[0] = leader;
    }
}

impl Default for MarkerTrail {
    fn default() -> Self {
        Self::new()
    }
}
