use ndarray::Array2;
use rand::prelude::*;

use super::*;
use crate::types::ix;

/// Uniform mine placement that keeps the first-clicked cell and its whole
/// neighborhood clear, so the first reveal always opens a zero region.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
    first_click: Coord2,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64, first_click: Coord2) -> Self {
        Self { seed, first_click }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        let size = config.size;
        if !config.contains(self.first_click) {
            return Err(GameError::OutOfBounds);
        }

        // Cells that must stay clear: the first click plus its clipped
        // 8-neighborhood.
        let mut excluded: Array2<bool> = Array2::default(ix(size));
        excluded[ix(self.first_click)] = true;
        for pos in iter_neighbors(self.first_click, size) {
            excluded[ix(pos)] = true;
        }
        let excluded_count = excluded.iter().filter(|&&skip| skip).count() as CellCount;

        let available = config.total_cells() - excluded_count;
        if config.mines > available {
            return Err(GameError::InvalidConfiguration {
                requested: config.mines,
                available,
            });
        }

        // Sample without replacement: the mask starts with the exclusion
        // zone marked occupied, and each draw picks the n-th free cell.
        let mut occupied = excluded.clone();
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut free_cells = available;
        let cells = occupied
            .as_slice_mut()
            .expect("freshly built mask is contiguous");
        for _ in 0..config.mines {
            let target = rng.random_range(0..free_cells);
            let mut skipped = 0;
            for cell in cells.iter_mut() {
                if *cell {
                    continue;
                }
                if skipped == target {
                    *cell = true;
                    free_cells -= 1;
                    break;
                }
                skipped += 1;
            }
        }

        // The exclusion zone was only a placement blocker, clear it again.
        let mut mines = occupied;
        for (cell, &skip) in mines.iter_mut().zip(excluded.iter()) {
            if skip {
                *cell = false;
            }
        }

        let layout = MineLayout::from_mine_mask(mines);
        log::debug!(
            "generated {}x{} layout with {} mines, first click {:?}",
            size.0,
            size.1,
            layout.mine_count(),
            self.first_click
        );
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let config = Difficulty::Beginner.config();
        let a = RandomLayoutGenerator::new(7, (4, 4)).generate(config).unwrap();
        let b = RandomLayoutGenerator::new(7, (4, 4)).generate(config).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.mine_count(), 10);
    }

    #[test]
    fn first_click_neighborhood_stays_clear() {
        let config = GameConfig::new_unchecked((5, 5), 16);
        let layout = RandomLayoutGenerator::new(3, (2, 2)).generate(config).unwrap();

        assert!(!layout.contains_mine((2, 2)));
        for pos in iter_neighbors((2, 2), (5, 5)) {
            assert!(!layout.contains_mine(pos), "mine at {:?}", pos);
        }
        assert_eq!(layout.adjacent_mines((2, 2)), 0);
    }

    #[test]
    fn too_many_mines_is_an_invalid_configuration() {
        // 5x5 minus the 9-cell exclusion zone leaves 16 eligible cells
        let config = GameConfig::new_unchecked((5, 5), 17);
        let result = RandomLayoutGenerator::new(0, (2, 2)).generate(config);

        assert_eq!(
            result,
            Err(GameError::InvalidConfiguration {
                requested: 17,
                available: 16,
            })
        );
    }

    #[test]
    fn first_click_outside_the_board_is_rejected() {
        let config = Difficulty::Beginner.config();
        let result = RandomLayoutGenerator::new(0, (9, 0)).generate(config);
        assert_eq!(result, Err(GameError::OutOfBounds));
    }
}
