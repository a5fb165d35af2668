//! Mapping from a requested execution strategy to a concrete engine

use std::sync::Arc;

use hpcimg_core::Result;
use hpcimg_parallel::ExecutionStrategy;

use crate::accel::{default_accelerator, Accelerator};
use crate::morphology::{
    MorphologyContext, MorphologyEngine, OffloadedMorphology, SequentialMorphology,
    ThreadedMorphology,
};
use crate::terrain::{
    DiamondSquareEngine, OffloadedDiamondSquare, SequentialDiamondSquare, ThreadedDiamondSquare,
};

/// Builds engines for a strategy; offloaded engines share one accelerator
#[derive(Debug, Clone)]
pub struct StrategySelector {
    accelerator: Arc<dyn Accelerator>,
}

impl Default for StrategySelector {
    fn default() -> Self {
        Self::new(default_accelerator())
    }
}

impl StrategySelector {
    pub fn new(accelerator: Arc<dyn Accelerator>) -> Self {
        Self { accelerator }
    }

    /// Accelerator handed to offloaded engines
    pub fn accelerator(&self) -> &dyn Accelerator {
        self.accelerator.as_ref()
    }

    /// Diamond-square engine for `strategy`
    pub fn diamond_square(&self, strategy: ExecutionStrategy) -> Result<DiamondSquareEngine> {
        tracing::debug!(%strategy, "selecting diamond-square engine");
        Ok(match strategy {
            ExecutionStrategy::Sequential => {
                DiamondSquareEngine::Sequential(SequentialDiamondSquare::new())
            }
            ExecutionStrategy::Threaded(threads) => {
                DiamondSquareEngine::Threaded(ThreadedDiamondSquare::new(threads)?)
            }
            ExecutionStrategy::Offloaded => DiamondSquareEngine::Offloaded(
                OffloadedDiamondSquare::new(Arc::clone(&self.accelerator)),
            ),
        })
    }

    /// Morphology engine for `strategy` over `context`
    pub fn morphology<'a>(
        &self,
        strategy: ExecutionStrategy,
        context: MorphologyContext<'a>,
    ) -> Result<MorphologyEngine<'a>> {
        tracing::debug!(%strategy, "selecting morphology engine");
        Ok(match strategy {
            ExecutionStrategy::Sequential => {
                MorphologyEngine::Sequential(SequentialMorphology::new(context))
            }
            ExecutionStrategy::Threaded(threads) => {
                MorphologyEngine::Threaded(ThreadedMorphology::new(context, threads)?)
            }
            ExecutionStrategy::Offloaded => MorphologyEngine::Offloaded(OffloadedMorphology::new(
                context,
                Arc::clone(&self.accelerator),
            )),
        })
    }
}
