//! Diamond-square delegated to an accelerator

use std::sync::Arc;

use hpcimg_core::{Grid, Result};
use hpcimg_parallel::ExecutionStrategy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::step::seed_corners;
use super::{DiamondSquareParams, HeightMapSynthesis};
use crate::accel::{default_accelerator, Accelerator};

/// Seeds the corners on the host, then hands the grid to the device for one
/// synchronous fill.
#[derive(Debug, Clone)]
pub struct OffloadedDiamondSquare {
    device: Arc<dyn Accelerator>,
}

impl OffloadedDiamondSquare {
    pub fn new(device: Arc<dyn Accelerator>) -> Self {
        Self { device }
    }

    /// Device this engine delegates to
    pub fn device(&self) -> &dyn Accelerator {
        self.device.as_ref()
    }
}

impl Default for OffloadedDiamondSquare {
    fn default() -> Self {
        Self::new(default_accelerator())
    }
}

impl HeightMapSynthesis for OffloadedDiamondSquare {
    fn synthesize(&self, params: &DiamondSquareParams) -> Result<Grid> {
        params.validate()?;
        let mut grid = Grid::try_new(params.size)?;
        let mut rng = StdRng::seed_from_u64(params.seed.resolve());
        seed_corners(&mut grid, params.corners, &mut rng);

        let kernel_seed: u64 = rng.gen();
        tracing::debug!(
            size = params.size,
            device = self.device.name(),
            "offloaded diamond-square"
        );
        self.device
            .diamond_square(&mut grid, kernel_seed, params.max_value)?;
        Ok(grid)
    }

    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Offloaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::diamond_square::Seed;

    #[test]
    fn test_offloaded_keeps_corners() {
        let engine = OffloadedDiamondSquare::default();
        let grid = engine
            .synthesize(&DiamondSquareParams {
                size: 129,
                corners: Some([200, 3, 77, 150]),
                seed: Seed::Fixed(8),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(grid.corners(), [200, 3, 77, 150]);
        assert_eq!(engine.strategy(), ExecutionStrategy::Offloaded);
        assert_eq!(engine.device().name(), "host");
    }

    #[test]
    fn test_offloaded_flat_without_perturbation() {
        let grid = OffloadedDiamondSquare::default()
            .synthesize(&DiamondSquareParams {
                size: 5,
                max_value: 0,
                seed: Seed::Fixed(0),
                corners: Some([0, 0, 0, 0]),
            })
            .unwrap();
        assert!(grid.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_offloaded_fixed_seed_repeats_on_host() {
        let engine = OffloadedDiamondSquare::default();
        let params = DiamondSquareParams {
            size: 33,
            seed: Seed::Fixed(21),
            ..Default::default()
        };
        assert_eq!(
            engine.synthesize(&params).unwrap(),
            engine.synthesize(&params).unwrap()
        );
    }

    #[test]
    fn test_offloaded_rejects_bad_size() {
        let engine = OffloadedDiamondSquare::default();
        assert!(engine.synthesize(&DiamondSquareParams::with_size(12)).is_err());
    }
}
