//! The cell matrix the view layer renders.

use crate::common::{Position, COLS, GRID_COUNT, MARKER_COUNT, ROWS};
use crate::components::walker::MarkerTrail;

/// One `ROWS` x `COLS` matrix. `0` is empty, `k > 0` is marker `k`.
pub type Cells = [[u8; COLS]; ROWS];

/// Every grid's cells, indexed by grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    grids: [Cells; GRID_COUNT],
}

impl GridState {
    /// An all-empty state.
    pub fn empty() -> Self {
        Self {
            grids: [[[0; COLS]; ROWS]; GRID_COUNT],
        }
    }

    /// Builds the state for a trail: marker `i + 1` at `trail[i]`.
    pub fn from_trail(trail: &MarkerTrail) -> Self {
        let mut state = Self::empty();
        state.rewrite(trail);
        state
    }

    /// Clears every cell, then writes each marker at its trail position.
    ///
    /// The whole state is rebuilt instead of erasing the previous cells; with
    /// 105 cells this is cheaper than tracking what moved.
    pub fn rewrite(&mut self, trail: &MarkerTrail) {
        for cells in self.grids.iter_mut() {
            for row in cells.iter_mut() {
                row.fill(0);
            }
        }
        for (index, position) in trail.positions().iter().enumerate() {
            self.grids[position.grid][position.row][position.col] = (index + 1) as u8;
        }
    }

    /// The marker at `position`, if any.
    pub fn marker_at(&self, position: Position) -> Option<u8> {
        self.grids
            .get(position.grid)
            .and_then(|cells| cells.get(position.row))
            .and_then(|row| row.get(position.col))
            .copied()
            .filter(|&value| value != 0)
    }

    pub fn grid(&self, index: usize) -> Option<&Cells> {
        self.grids.get(index)
    }

    pub fn grids(&self) -> &[Cells; GRID_COUNT] {
        &self.grids
    }

    /// Every occupied cell with its marker, in grid/row/column order.
    pub fn occupied(&self) -> Vec<(Position, u8)> {
        let mut found = Vec::with_capacity(MARKER_COUNT);
        for (grid, cells) in self.grids.iter().enumerate() {
            for (row, values) in cells.iter().enumerate() {
                for (col, &value) in values.iter().enumerate() {
                    if value != 0 {
                        found.push((Position::new(grid, row, col), value));
                    }
                }
            }
        }
        found
    }
}

impl Default for GridState {
    fn default() -> Self {
        Self::from_trail(&MarkerTrail::new())
    }
}
