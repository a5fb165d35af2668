//! Single-threaded diamond-square

use hpcimg_core::{Grid, Result};
use hpcimg_parallel::ExecutionStrategy;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::step::{
    diamond_cols, diamond_rows, diamond_value, levels, seed_corners, square_cols, square_rows,
    square_value, Level,
};
use super::{DiamondSquareParams, HeightMapSynthesis};

/// Runs every pass in program order with one generator seeded once per call.
///
/// With [`Seed::Fixed`](super::Seed::Fixed) the output is bit-for-bit
/// reproducible.
#[derive(Debug, Clone, Default)]
pub struct SequentialDiamondSquare;

impl SequentialDiamondSquare {
    pub fn new() -> Self {
        Self
    }

    fn refine(grid: &mut Grid, level: Level, rng: &mut StdRng) {
        let size = grid.size();
        let half = level.half();
        let cells = grid.as_mut_slice();

        for row in diamond_rows(size, level.step) {
            for col in diamond_cols(size, level.step) {
                let noise = level.amplitude.draw(rng);
                let value = diamond_value(cells, size, row, col, half, noise);
                cells[row * size + col] = value;
            }
        }

        for row in square_rows(size, level.step) {
            for col in square_cols(size, level.step, row) {
                let noise = level.amplitude.draw(rng);
                let value = square_value(cells, size, row, col, half, noise);
                cells[row * size + col] = value;
            }
        }
    }
}

impl HeightMapSynthesis for SequentialDiamondSquare {
    fn synthesize(&self, params: &DiamondSquareParams) -> Result<Grid> {
        params.validate()?;
        let mut grid = Grid::try_new(params.size)?;
        let seed = params.seed.resolve();
        let mut rng = StdRng::seed_from_u64(seed);
        tracing::debug!(size = params.size, seed, "sequential diamond-square");

        seed_corners(&mut grid, params.corners, &mut rng);
        for level in levels(params.size, params.max_value) {
            tracing::trace!(step = level.step, bound = level.amplitude.bound(), "level");
            Self::refine(&mut grid, level, &mut rng);
        }
        Ok(grid)
    }

    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Sequential
    }
}
