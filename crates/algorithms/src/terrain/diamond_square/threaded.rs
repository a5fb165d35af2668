//! Diamond-square with each pass partitioned across a worker pool

use hpcimg_core::{Grid, Result};
use hpcimg_parallel::{worker_seed, ExecutionStrategy, WorkerPool};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::step::{
    diamond_cols, diamond_rows, diamond_value, levels, seed_corners, square_cols, square_rows,
    square_value, Amplitude, Level,
};
use super::{DiamondSquareParams, HeightMapSynthesis};

/// Shared-memory diamond-square.
///
/// Within one pass every target cell is written by exactly one row task and
/// only cells written by earlier passes are read, so rows can be computed in
/// any order. The pool joins after the diamond pass and after the square
/// pass, which is the barrier between dependent passes. Each worker stream
/// owns its own generator, so results vary with scheduling even for a fixed
/// seed; value range and corners do not.
#[derive(Debug)]
pub struct ThreadedDiamondSquare {
    pool: WorkerPool,
}

impl ThreadedDiamondSquare {
    /// Engine with its own pool of `threads` workers (`0` = all cores)
    pub fn new(threads: usize) -> Result<Self> {
        Ok(Self {
            pool: WorkerPool::new(threads)?,
        })
    }

    /// Engine on an existing pool
    pub fn with_pool(pool: WorkerPool) -> Self {
        Self { pool }
    }

    /// Number of workers
    pub fn threads(&self) -> usize {
        self.pool.threads()
    }

    /// Run one pass: compute every target row from a read-only snapshot,
    /// then write the results back once all workers are done.
    ///
    /// `seeds` is the call's base seed and the pass number; each worker
    /// stream derives its own generator from them.
    fn pass<C, V>(&self, grid: &mut Grid, rows: Vec<usize>, seeds: (u64, u32), amplitude: Amplitude, cols: C, value: V)
    where
        C: Fn(usize) -> std::iter::StepBy<std::ops::Range<usize>> + Sync + Send,
        V: Fn(&[u8], usize, usize, i32) -> u8 + Sync + Send,
    {
        let size = grid.size();
        let cells = grid.as_slice();
        let updates: Vec<Vec<u8>> = self.pool.map_rows(
            &rows,
            |stream| StdRng::seed_from_u64(worker_seed(seeds.0, seeds.1, stream)),
            |rng, row| {
                cols(row)
                    .map(|col| value(cells, row, col, amplitude.draw(rng)))
                    .collect()
            },
        );

        let cells = grid.as_mut_slice();
        for (&row, values) in rows.iter().zip(updates) {
            for (col, v) in cols(row).zip(values) {
                cells[row * size + col] = v;
            }
        }
    }

    fn refine(&self, grid: &mut Grid, level: Level, base: u64) {
        let size = grid.size();
        let step = level.step;
        let half = level.half();

        self.pass(
            grid,
            diamond_rows(size, step).collect(),
            (base, level.index * 2),
            level.amplitude,
            |_| diamond_cols(size, step),
            |cells, row, col, noise| diamond_value(cells, size, row, col, half, noise),
        );

        self.pass(
            grid,
            square_rows(size, step).collect(),
            (base, level.index * 2 + 1),
            level.amplitude,
            |row| square_cols(size, step, row),
            |cells, row, col, noise| square_value(cells, size, row, col, half, noise),
        );
    }
}

impl HeightMapSynthesis for ThreadedDiamondSquare {
    fn synthesize(&self, params: &DiamondSquareParams) -> Result<Grid> {
        params.validate()?;
        let mut grid = Grid::try_new(params.size)?;
        let base = params.seed.resolve();
        tracing::debug!(
            size = params.size,
            seed = base,
            threads = self.threads(),
            "threaded diamond-square"
        );

        let mut rng = StdRng::seed_from_u64(base);
        seed_corners(&mut grid, params.corners, &mut rng);
        for level in levels(params.size, params.max_value) {
            tracing::trace!(step = level.step, bound = level.amplitude.bound(), "level");
            self.refine(&mut grid, level, base);
        }
        Ok(grid)
    }

    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Threaded(self.threads())
    }
}
