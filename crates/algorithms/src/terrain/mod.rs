//! Terrain synthesis algorithms
//!
//! - Diamond-square: fractal height-map generation over a `2^n + 1` grid,
//!   available as sequential, threaded and accelerator-offloaded engines

pub mod diamond_square;

pub use diamond_square::{
    diamond_square, DiamondSquare, DiamondSquareEngine, DiamondSquareParams, HeightMapSynthesis,
    OffloadedDiamondSquare, Seed, SequentialDiamondSquare, ThreadedDiamondSquare, MAX,
};
