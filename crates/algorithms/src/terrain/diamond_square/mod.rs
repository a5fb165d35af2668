//! Diamond-square fractal height-map synthesis
//!
//! The grid is refined level by level. At each level a diamond pass sets the
//! center of every `step x step` square from its four corners, then a square
//! pass sets every edge midpoint from its two to four in-bounds neighbors.
//! Both passes add a uniform perturbation whose range halves every level,
//! which is what makes the result self-similar.
//!
//! Three engines implement the same recursion:
//! - [`SequentialDiamondSquare`]: one thread, one generator per call
//! - [`ThreadedDiamondSquare`]: each pass partitioned by row across a
//!   [`WorkerPool`](hpcimg_parallel::WorkerPool), one generator per worker
//! - [`OffloadedDiamondSquare`]: corners on the host, everything else on an
//!   [`Accelerator`](crate::accel::Accelerator)

mod offloaded;
mod sequential;
pub(crate) mod step;
mod threaded;

use std::time::{SystemTime, UNIX_EPOCH};

use hpcimg_core::{Algorithm, Error, Grid, Result};
use hpcimg_parallel::ExecutionStrategy;

use crate::strategy::StrategySelector;

pub use offloaded::OffloadedDiamondSquare;
pub use sequential::SequentialDiamondSquare;
pub use threaded::ThreadedDiamondSquare;

/// Exclusive upper bound of corner samples and the default starting amplitude
pub const MAX: u32 = 256;

/// Where an engine takes its random seed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Seed {
    /// Always the same sequence
    Fixed(u64),
    /// Derived from the wall clock at call time
    #[default]
    Clock,
}

impl Seed {
    /// Concrete seed value for this call
    pub fn resolve(self) -> u64 {
        match self {
            Seed::Fixed(seed) => seed,
            Seed::Clock => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0),
        }
    }
}

/// Parameters for diamond-square synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiamondSquareParams {
    /// Grid side length, must be `2^n + 1`
    pub size: usize,
    /// Starting perturbation amplitude; `0` disables perturbation
    pub max_value: u32,
    /// Seed source
    pub seed: Seed,
    /// Preset corners (top-left, top-right, bottom-left, bottom-right)
    /// instead of random ones
    pub corners: Option<[u8; 4]>,
}

impl Default for DiamondSquareParams {
    fn default() -> Self {
        Self {
            size: 257,
            max_value: MAX,
            seed: Seed::Clock,
            corners: None,
        }
    }
}

impl DiamondSquareParams {
    /// Parameters for a grid of the given side, everything else default
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Reject sizes that are not `2^n + 1`
    pub fn validate(&self) -> Result<()> {
        if self.size < 2 || !(self.size - 1).is_power_of_two() {
            return Err(Error::InvalidParameter {
                name: "size",
                value: self.size.to_string(),
                reason: "grid side must be 2^n + 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Capability shared by every diamond-square engine
pub trait HeightMapSynthesis {
    /// Fill a fresh `size x size` grid
    fn synthesize(&self, params: &DiamondSquareParams) -> Result<Grid>;

    /// Strategy this engine implements
    fn strategy(&self) -> ExecutionStrategy;
}

/// One of the three diamond-square engines
#[derive(Debug)]
pub enum DiamondSquareEngine {
    Sequential(SequentialDiamondSquare),
    Threaded(ThreadedDiamondSquare),
    Offloaded(OffloadedDiamondSquare),
}

impl HeightMapSynthesis for DiamondSquareEngine {
    fn synthesize(&self, params: &DiamondSquareParams) -> Result<Grid> {
        match self {
            DiamondSquareEngine::Sequential(engine) => engine.synthesize(params),
            DiamondSquareEngine::Threaded(engine) => engine.synthesize(params),
            DiamondSquareEngine::Offloaded(engine) => engine.synthesize(params),
        }
    }

    fn strategy(&self) -> ExecutionStrategy {
        match self {
            DiamondSquareEngine::Sequential(engine) => engine.strategy(),
            DiamondSquareEngine::Threaded(engine) => engine.strategy(),
            DiamondSquareEngine::Offloaded(engine) => engine.strategy(),
        }
    }
}

/// Diamond-square algorithm
#[derive(Debug, Clone, Default)]
pub struct DiamondSquare;

impl Algorithm for DiamondSquare {
    type Input = ExecutionStrategy;
    type Output = Grid;
    type Params = DiamondSquareParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "DiamondSquare"
    }

    fn description(&self) -> &'static str {
        "Fractal height-map synthesis by recursive diamond and square steps"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        diamond_square(&params, input)
    }
}

/// Synthesize a height-map with the engine for `strategy`.
///
/// Offloaded runs use the default host accelerator; build engines through
/// [`StrategySelector`] to supply another one.
pub fn diamond_square(params: &DiamondSquareParams, strategy: ExecutionStrategy) -> Result<Grid> {
    StrategySelector::default()
        .diamond_square(strategy)?
        .synthesize(params)
}
