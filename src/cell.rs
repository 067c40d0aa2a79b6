use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::MarkOutcome;
use crate::types::{CellCount, Coord2, ix};

/// Player-visible state of a single cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

impl CellState {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

/// Per-cell state store; every cell starts out `Hidden`.
///
/// Bounds are not checked here, callers validate positions first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellGrid {
    cells: Array2<CellState>,
    revealed_count: CellCount,
    flagged_count: CellCount,
}

impl CellGrid {
    pub fn new(size: Coord2) -> Self {
        Self {
            cells: Array2::default(ix(size)),
            revealed_count: 0,
            flagged_count: 0,
        }
    }

    pub fn get(&self, coords: Coord2) -> CellState {
        self.cells[ix(coords)]
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self.get(coords).is_revealed()
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.get(coords).is_flagged()
    }

    /// Marks a hidden cell revealed; no-op on flagged or already revealed cells.
    pub fn set_revealed(&mut self, coords: Coord2) {
        if matches!(self.get(coords), CellState::Hidden) {
            self.cells[ix(coords)] = CellState::Revealed;
            self.revealed_count += 1;
        }
    }

    /// Flags a hidden cell or unflags a flagged one; no-op on revealed cells.
    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        use CellState::*;
        use MarkOutcome::*;

        match self.get(coords) {
            Hidden => {
                self.cells[ix(coords)] = Flagged;
                self.flagged_count += 1;
                Changed
            }
            Flagged => {
                self.cells[ix(coords)] = Hidden;
                self.flagged_count -= 1;
                Changed
            }
            Revealed => NoChange,
        }
    }

    /// Flags a hidden cell without toggling; no-op otherwise.
    pub fn set_flagged(&mut self, coords: Coord2) {
        if matches!(self.get(coords), CellState::Hidden) {
            self.cells[ix(coords)] = CellState::Flagged;
            self.flagged_count += 1;
        }
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_default_to_hidden() {
        let grid = CellGrid::new((3, 3));
        assert_eq!(grid.get((2, 1)), CellState::Hidden);
        assert_eq!(grid.revealed_count(), 0);
        assert_eq!(grid.flagged_count(), 0);
    }

    #[test]
    fn toggle_flag_round_trips_and_counts() {
        let mut grid = CellGrid::new((2, 2));

        assert_eq!(grid.toggle_flag((0, 1)), MarkOutcome::Changed);
        assert!(grid.is_flagged((0, 1)));
        assert_eq!(grid.flagged_count(), 1);

        assert_eq!(grid.toggle_flag((0, 1)), MarkOutcome::Changed);
        assert!(!grid.is_flagged((0, 1)));
        assert_eq!(grid.flagged_count(), 0);
    }

    #[test]
    fn reveal_is_a_noop_on_flagged_cells() {
        let mut grid = CellGrid::new((2, 2));
        grid.toggle_flag((1, 1));

        grid.set_revealed((1, 1));

        assert_eq!(grid.get((1, 1)), CellState::Flagged);
        assert_eq!(grid.revealed_count(), 0);
    }

    #[test]
    fn flag_toggle_is_a_noop_on_revealed_cells() {
        let mut grid = CellGrid::new((2, 2));
        grid.set_revealed((0, 0));

        assert_eq!(grid.toggle_flag((0, 0)), MarkOutcome::NoChange);
        assert!(grid.is_revealed((0, 0)));
    }
}
