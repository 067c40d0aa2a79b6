//! Minesweeper game-logic engine.
//!
//! The crate covers everything a front end needs except rendering: mine
//! placement with a guaranteed-safe first click, precomputed adjacency
//! counts, iterative flood-fill reveal, chording, and a [`Session`] state
//! machine tracking status, flags, and elapsed time.

use core::ops::{BitOr, Index};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod session;
mod types;

use types::ix;

/// The three classic board presets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::new_unchecked((9, 9), 10),
            Self::Intermediate => GameConfig::new_unchecked((16, 16), 40),
            Self::Expert => GameConfig::new_unchecked((16, 30), 99),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Clamps the requested shape into something playable: at least 2x2,
    /// at least one mine, at least one safe cell.
    pub fn new((height, width): Coord2, mines: CellCount) -> Self {
        let height = height.max(2);
        let width = width.max(2);
        let total = height as CellCount * width as CellCount;
        Self::new_unchecked((height, width), mines.clamp(1, total - 1))
    }

    pub const fn total_cells(&self) -> CellCount {
        self.size.0 as CellCount * self.size.1 as CellCount
    }

    pub const fn contains(&self, (row, col): Coord2) -> bool {
        row < self.size.0 && col < self.size.1
    }
}

/// Mine positions plus the adjacency map, both fixed for the whole game.
///
/// The adjacency count of every cell is computed once at construction;
/// lookups afterwards never recount.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mines: Array2<bool>,
    adjacency: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mines: Array2<bool>) -> Self {
        let dim = mines.dim();
        let size = (dim.0 as Coord, dim.1 as Coord);
        let mine_count = mines.iter().filter(|&&is_mine| is_mine).count() as CellCount;

        let mut adjacency: Array2<u8> = Array2::zeros(dim);
        for row in 0..size.0 {
            for col in 0..size.1 {
                adjacency[ix((row, col))] = iter_neighbors((row, col), size)
                    .filter(|&pos| mines[ix(pos)])
                    .count() as u8;
            }
        }

        Self {
            mines,
            adjacency,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mines: Array2<bool> = Array2::default(ix(size));
        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::OutOfBounds);
            }
            mines[ix(coords)] = true;
        }
        Ok(Self::from_mine_mask(mines))
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.mines.dim();
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        self.mines.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Precomputed count of mines in the 8-neighborhood of `coords`.
    pub fn adjacent_mines(&self, coords: Coord2) -> u8 {
        self.adjacency[ix(coords)]
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (height, width) = self.size();
        if coords.0 < height && coords.1 < width {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mines[ix(coords)]
    }
}

/// Outcome of a flag operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Outcome of a reveal or chord operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    Continue,
    HitMine,
    Win,
}

/// Merges per-cell outcomes when chording; a mine hit anywhere dominates.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) | (_, HitMine) => HitMine,
            (Win, _) | (_, Win) => Win,
            (Continue, Continue) => Continue,
        }
    }
}
