use crate::*;
pub use random::*;

mod random;

/// Produces the mine layout for a fresh session.
pub trait LayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}
