use std::collections::{HashSet, VecDeque};

use crate::*;

/// Reveal and chord logic over a cell grid and a fixed mine layout.
///
/// Borrows the session's store for the duration of one interaction; status
/// transitions are applied by the caller based on the returned outcome.
#[derive(Debug)]
pub struct RevealEngine<'a> {
    grid: &'a mut CellGrid,
    layout: &'a MineLayout,
    triggered_mine: Option<Coord2>,
}

impl<'a> RevealEngine<'a> {
    pub fn new(grid: &'a mut CellGrid, layout: &'a MineLayout) -> Self {
        Self {
            grid,
            layout,
            triggered_mine: None,
        }
    }

    /// The mine cell revealed by this interaction, if any.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Reveals a hidden cell, flood-filling outward when it has no adjacent
    /// mines. Revealed and flagged cells are left untouched.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.layout.validate_coords(coords)?;
        Ok(self.reveal_cell(coords))
    }

    /// Reveals all unflagged neighbors of a revealed numbered cell whose
    /// flagged-neighbor count matches its number; otherwise a no-op.
    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.layout.validate_coords(coords)?;

        if !self.is_chordable(coords) {
            return Ok(RevealOutcome::Continue);
        }

        let size = self.layout.size();
        Ok(iter_neighbors(coords, size)
            .map(|pos| self.reveal_cell(pos))
            .reduce(core::ops::BitOr::bitor)
            .unwrap_or(RevealOutcome::Continue))
    }

    pub fn is_chordable(&self, coords: Coord2) -> bool {
        let count = self.layout.adjacent_mines(coords);
        self.grid.is_revealed(coords) && count > 0 && count == self.count_flagged_neighbors(coords)
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        iter_neighbors(coords, self.layout.size())
            .filter(|&pos| self.grid.is_flagged(pos))
            .count() as u8
    }

    fn reveal_cell(&mut self, coords: Coord2) -> RevealOutcome {
        if self.grid.get(coords) != CellState::Hidden {
            return RevealOutcome::Continue;
        }

        if self.layout.contains_mine(coords) {
            self.grid.set_revealed(coords);
            self.triggered_mine = Some(coords);
            log::debug!("mine hit at {:?}", coords);
            return RevealOutcome::HitMine;
        }

        self.grid.set_revealed(coords);
        let count = self.layout.adjacent_mines(coords);
        log::debug!("revealed {:?}, adjacent mines: {}", coords, count);

        if count == 0 {
            self.flood_fill(coords);
        }

        if self.grid.revealed_count() == self.layout.safe_cell_count() {
            RevealOutcome::Win
        } else {
            RevealOutcome::Continue
        }
    }

    /// Iterative flood fill with an explicit work list, so a large open
    /// region never recurses.
    fn flood_fill(&mut self, origin: Coord2) {
        let size = self.layout.size();
        let mut visited: HashSet<Coord2> = HashSet::from([origin]);
        let mut frontier: VecDeque<Coord2> = iter_neighbors(origin, size)
            .filter(|&pos| self.grid.get(pos) == CellState::Hidden)
            .collect();
        log::trace!("flood fill from {:?}, frontier: {:?}", origin, frontier);

        while let Some(pos) = frontier.pop_front() {
            if !visited.insert(pos) {
                continue;
            }
            if self.grid.get(pos) != CellState::Hidden {
                continue;
            }

            self.grid.set_revealed(pos);
            log::trace!("flood revealed {:?}", pos);

            if self.layout.adjacent_mines(pos) == 0 {
                frontier.extend(
                    iter_neighbors(pos, size)
                        .filter(|&next| self.grid.get(next) == CellState::Hidden)
                        .filter(|next| !visited.contains(next)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(size: Coord2, mines: &[Coord2]) -> MineLayout {
        MineLayout::from_mine_coords(size, mines).unwrap()
    }

    #[test]
    fn revealing_a_mine_reports_the_hit() {
        let layout = layout((2, 2), &[(0, 0)]);
        let mut grid = CellGrid::new(layout.size());
        let mut engine = RevealEngine::new(&mut grid, &layout);

        assert_eq!(engine.reveal((0, 0)), Ok(RevealOutcome::HitMine));
        assert_eq!(engine.triggered_mine(), Some((0, 0)));
    }

    #[test]
    fn flood_fill_opens_the_zero_region_and_its_border() {
        let layout = layout((3, 3), &[(2, 2)]);
        let mut grid = CellGrid::new(layout.size());
        let mut engine = RevealEngine::new(&mut grid, &layout);

        assert_eq!(engine.reveal((0, 0)), Ok(RevealOutcome::Win));
        assert!(grid.is_revealed((0, 0)));
        assert!(grid.is_revealed((1, 1)));
        assert_eq!(grid.get((2, 2)), CellState::Hidden);
    }

    #[test]
    fn flood_fill_stops_at_flags() {
        // one corner mine; a flag in the middle must survive the fill
        let layout = layout((4, 4), &[(0, 0)]);
        let mut grid = CellGrid::new(layout.size());
        grid.toggle_flag((2, 2));
        let mut engine = RevealEngine::new(&mut grid, &layout);

        assert_eq!(engine.reveal((3, 3)), Ok(RevealOutcome::Continue));
        assert_eq!(grid.get((2, 2)), CellState::Flagged);
        assert!(grid.is_revealed((3, 2)));
    }

    #[test]
    fn reveal_is_a_noop_on_flagged_and_revealed_cells() {
        let layout = layout((2, 2), &[(0, 0)]);
        let mut grid = CellGrid::new(layout.size());
        grid.toggle_flag((0, 0));
        let mut engine = RevealEngine::new(&mut grid, &layout);

        assert_eq!(engine.reveal((0, 0)), Ok(RevealOutcome::Continue));
        assert_eq!(engine.triggered_mine(), None);

        assert_eq!(engine.reveal((1, 1)), Ok(RevealOutcome::Continue));
        assert_eq!(engine.reveal((1, 1)), Ok(RevealOutcome::Continue));
    }

    #[test]
    fn chord_reveals_neighbors_when_flags_match_the_count() {
        let mines = &[(0, 1), (2, 1)];
        let layout = layout((3, 3), mines);
        let mut grid = CellGrid::new(layout.size());
        grid.toggle_flag((0, 1));
        grid.toggle_flag((2, 1));
        let mut engine = RevealEngine::new(&mut grid, &layout);
        engine.reveal((1, 1)).unwrap();

        assert_eq!(engine.chord_reveal((1, 1)), Ok(RevealOutcome::Win));
        assert!(grid.is_revealed((1, 0)));
        assert!(grid.is_revealed((1, 2)));
    }

    #[test]
    fn chord_is_a_noop_when_flag_count_differs() {
        let layout = layout((3, 3), &[(0, 1), (2, 1)]);
        let mut grid = CellGrid::new(layout.size());
        grid.toggle_flag((0, 1));
        let mut engine = RevealEngine::new(&mut grid, &layout);
        engine.reveal((1, 1)).unwrap();

        let before = grid.clone();
        let mut engine = RevealEngine::new(&mut grid, &layout);
        assert_eq!(engine.chord_reveal((1, 1)), Ok(RevealOutcome::Continue));
        assert_eq!(grid, before);
    }

    #[test]
    fn chord_on_a_misflagged_board_hits_the_mine() {
        let layout = layout((3, 3), &[(0, 1)]);
        let mut grid = CellGrid::new(layout.size());
        grid.toggle_flag((0, 0));
        let mut engine = RevealEngine::new(&mut grid, &layout);
        engine.reveal((1, 1)).unwrap();

        assert_eq!(engine.chord_reveal((1, 1)), Ok(RevealOutcome::HitMine));
        assert_eq!(engine.triggered_mine(), Some((0, 1)));
    }

    #[test]
    fn out_of_bounds_positions_fail_fast() {
        let layout = layout((2, 2), &[(0, 0)]);
        let mut grid = CellGrid::new(layout.size());
        let mut engine = RevealEngine::new(&mut grid, &layout);

        assert_eq!(engine.reveal((2, 0)), Err(GameError::OutOfBounds));
        assert_eq!(engine.chord_reveal((0, 5)), Err(GameError::OutOfBounds));
    }
}
