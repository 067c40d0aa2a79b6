use thiserror::Error;

use crate::types::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("{requested} mines do not fit the {available} cells left after the first-click exclusion")]
    InvalidConfiguration {
        requested: CellCount,
        available: CellCount,
    },
    #[error("position outside board bounds")]
    OutOfBounds,
}

pub type Result<T> = core::result::Result<T, GameError>;
