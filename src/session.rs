use serde::{Deserialize, Serialize};

use crate::*;

/// Overall game status.
///
/// Valid transitions:
/// - NotStarted -> InProgress (first reveal, after mine placement)
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// A single game from first click to win or loss.
///
/// Mines are placed lazily on the first reveal so the clicked cell can be
/// kept safe; until then flags can be placed but carry no mine information.
/// Finished sessions accept no further moves; start a new game by replacing
/// the session wholesale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    difficulty: Difficulty,
    grid: CellGrid,
    layout: Option<MineLayout>,
    status: GameStatus,
    elapsed_secs: u32,
    seed: u64,
    triggered_mine: Option<Coord2>,
}

impl Session {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_seed(difficulty, rand::random())
    }

    /// Pins the mine-placement seed, for reproducible games.
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            grid: CellGrid::new(difficulty.config().size),
            layout: None,
            status: GameStatus::NotStarted,
            elapsed_secs: 0,
            seed,
            triggered_mine: None,
        }
    }

    /// Discards all progress and starts over with the given difficulty.
    pub fn new_game(&mut self, difficulty: Difficulty) {
        *self = Self::new(difficulty);
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> GameConfig {
        self.difficulty.config()
    }

    pub fn size(&self) -> Coord2 {
        self.config().size
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn total_mines(&self) -> CellCount {
        self.config().mines
    }

    /// Mines minus flags; negative when the player has overflagged.
    pub fn remaining_mines(&self) -> isize {
        self.total_mines() as isize - self.grid.flagged_count() as isize
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// The mine that ended a lost game, for endgame display.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell_state(&self, coords: Coord2) -> Result<CellState> {
        let coords = self.validate(coords)?;
        Ok(self.grid.get(coords))
    }

    /// Adjacency count of a revealed cell; `None` before the board is
    /// generated or while the cell is unrevealed.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> Result<Option<u8>> {
        let coords = self.validate(coords)?;
        Ok(self
            .layout
            .as_ref()
            .filter(|_| self.grid.is_revealed(coords))
            .map(|layout| layout.adjacent_mines(coords)))
    }

    /// Whether the cell holds a mine; `false` before the board is generated.
    /// Consumers use this to paint remaining mines once the game is lost.
    pub fn has_mine_at(&self, coords: Coord2) -> Result<bool> {
        let coords = self.validate(coords)?;
        Ok(self
            .layout
            .as_ref()
            .is_some_and(|layout| layout.contains_mine(coords)))
    }

    /// Reveals a cell. The first reveal of the session places the mines with
    /// the clicked cell as the guaranteed-safe start, then starts the game.
    pub fn reveal_cell(&mut self, coords: Coord2) -> Result<GameStatus> {
        let coords = self.validate(coords)?;

        if self.status.is_finished() || self.grid.is_flagged(coords) {
            return Ok(self.status);
        }

        if self.layout.is_none() {
            let layout = RandomLayoutGenerator::new(self.seed, coords).generate(self.config())?;
            self.layout = Some(layout);
            self.status = GameStatus::InProgress;
            log::debug!("game started, first click at {:?}", coords);
        }

        let (outcome, triggered) = match self.layout.as_ref() {
            Some(layout) => {
                let mut engine = RevealEngine::new(&mut self.grid, layout);
                let outcome = engine.reveal(coords)?;
                (outcome, engine.triggered_mine())
            }
            None => (RevealOutcome::Continue, None),
        };

        self.apply_outcome(outcome, triggered);
        Ok(self.status)
    }

    /// Flags or unflags a hidden cell. Permitted before the first reveal;
    /// a no-op on revealed cells and finished games.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.validate(coords)?;

        if self.status.is_finished() {
            return Ok(());
        }

        if self.grid.toggle_flag(coords).has_update() {
            log::debug!(
                "flag toggled at {:?}, {} mines left",
                coords,
                self.remaining_mines()
            );
        }
        Ok(())
    }

    /// Chord reveal on a numbered cell; a no-op unless the game is in
    /// progress and the cell's flagged-neighbor count matches its number.
    pub fn chord(&mut self, coords: Coord2) -> Result<GameStatus> {
        let coords = self.validate(coords)?;

        if self.status != GameStatus::InProgress {
            return Ok(self.status);
        }

        let (outcome, triggered) = match self.layout.as_ref() {
            Some(layout) => {
                let mut engine = RevealEngine::new(&mut self.grid, layout);
                let outcome = engine.chord_reveal(coords)?;
                (outcome, engine.triggered_mine())
            }
            None => (RevealOutcome::Continue, None),
        };

        self.apply_outcome(outcome, triggered);
        Ok(self.status)
    }

    /// Advances the elapsed-time counter by one second. Driven externally at
    /// ~1 Hz by the front end; inert unless the game is in progress.
    pub fn tick(&mut self) {
        if self.status == GameStatus::InProgress {
            self.elapsed_secs += 1;
        }
    }

    fn apply_outcome(&mut self, outcome: RevealOutcome, triggered: Option<Coord2>) {
        match outcome {
            RevealOutcome::HitMine => {
                self.triggered_mine = triggered;
                self.status = GameStatus::Lost;
                log::debug!("game lost after {}s, mine at {:?}", self.elapsed_secs, triggered);
            }
            RevealOutcome::Win => {
                self.status = GameStatus::Won;
                self.flag_remaining_mines();
                log::debug!("game won after {}s", self.elapsed_secs);
            }
            RevealOutcome::Continue => {}
        }
    }

    /// Flags every unflagged mine so the counter reads zero after a win.
    fn flag_remaining_mines(&mut self) {
        let Some(layout) = self.layout.as_ref() else {
            return;
        };
        let (height, width) = layout.size();
        for row in 0..height {
            for col in 0..width {
                if layout.contains_mine((row, col)) {
                    self.grid.set_flagged((row, col));
                }
            }
        }
    }

    fn validate(&self, coords: Coord2) -> Result<Coord2> {
        if self.config().contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }
}
