//! # hpcimg Algorithms
//!
//! Image synthesis and processing engines for hpcimg.
//!
//! ## Available Algorithm Categories
//!
//! - **terrain**: Diamond-square fractal height-maps
//! - **morphology**: Per-channel opening and closing of RGB images
//!
//! Every algorithm comes in three interchangeable strategies (sequential,
//! threaded, offloaded to an [`accel::Accelerator`]); [`strategy`] maps an
//! [`ExecutionStrategy`](hpcimg_parallel::ExecutionStrategy) to an engine.

pub mod accel;
pub mod morphology;
pub mod strategy;
pub mod terrain;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::accel::{Accelerator, HostAccelerator};
    pub use crate::morphology::{
        closing, opening, Closing, ClosingParams, ElementLoader, ElementShape, MorphologyContext,
        Opening, OpeningClosing, OpeningParams, Operation, StructuringElement, SynthesizedElement,
    };
    pub use crate::strategy::StrategySelector;
    pub use crate::terrain::{
        diamond_square, DiamondSquare, DiamondSquareParams, HeightMapSynthesis, Seed,
    };
    pub use hpcimg_core::prelude::*;
    pub use hpcimg_parallel::ExecutionStrategy;
}
