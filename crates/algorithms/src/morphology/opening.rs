//! Morphological opening (erosion followed by dilation)
//!
//! Removes small bright features (noise, spikes) while preserving
//! the overall shape and size of larger bright regions.

use hpcimg_core::{Algorithm, Error, PixelBuffer, Result};
use hpcimg_parallel::ExecutionStrategy;

use super::element::StructuringElement;
use super::{MorphologyContext, OpeningClosing};
use crate::strategy::StrategySelector;

/// Parameters for morphological opening
#[derive(Debug, Clone, Default)]
pub struct OpeningParams {
    /// Structuring element shape
    pub element: StructuringElement,
    /// Engine to run on
    pub strategy: ExecutionStrategy,
}

/// Opening algorithm
#[derive(Debug, Clone, Default)]
pub struct Opening;

impl Algorithm for Opening {
    type Input = PixelBuffer;
    type Output = PixelBuffer;
    type Params = OpeningParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Opening"
    }

    fn description(&self) -> &'static str {
        "Morphological opening (erosion then dilation) to remove small bright features"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        opening(&input, &params.element, params.strategy)
    }
}

/// Perform morphological opening on an RGB image
///
/// Opening = erode then dilate, per channel. Removes small bright features
/// (spots, thin protrusions) while preserving the overall shape of larger
/// structures. The result is always B, G, R, A with alpha 255.
///
/// # Arguments
/// * `image` - Input image, either channel order
/// * `element` - Structuring element defining the neighborhood shape
/// * `strategy` - Engine to run on
pub fn opening(image: &PixelBuffer, element: &StructuringElement, strategy: ExecutionStrategy) -> Result<PixelBuffer> {
    let context = MorphologyContext::new(Some(image), Some(element.clone()));
    StrategySelector::default()
        .morphology(strategy, context)?
        .opening()
}
