//! Morphological closing (dilation followed by erosion)
//!
//! Fills small dark gaps and holes while preserving the overall
//! shape and size of larger dark regions.

use hpcimg_core::{Algorithm, Error, PixelBuffer, Result};
use hpcimg_parallel::ExecutionStrategy;

use super::element::StructuringElement;
use super::{MorphologyContext, OpeningClosing};
use crate::strategy::StrategySelector;

/// Parameters for morphological closing
#[derive(Debug, Clone, Default)]
pub struct ClosingParams {
    /// Structuring element shape
    pub element: StructuringElement,
    /// Engine to run on
    pub strategy: ExecutionStrategy,
}

/// Closing algorithm
#[derive(Debug, Clone, Default)]
pub struct Closing;

impl Algorithm for Closing {
    type Input = PixelBuffer;
    type Output = PixelBuffer;
    type Params = ClosingParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Closing"
    }

    fn description(&self) -> &'static str {
        "Morphological closing (dilation then erosion) to fill small dark gaps"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        closing(&input, &params.element, params.strategy)
    }
}

/// Perform morphological closing on an RGB image
///
/// Closing = dilate then erode, per channel. The result is always
/// B, G, R, A with alpha 255.
pub fn closing(image: &PixelBuffer, element: &StructuringElement, strategy: ExecutionStrategy) -> Result<PixelBuffer> {
    let context = MorphologyContext::new(Some(image), Some(element.clone()));
    StrategySelector::default()
        .morphology(strategy, context)?
        .closing()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpcimg_core::ChannelOrder;

    #[test]
    fn test_closing_fills_dark_pit() {
        let mut image = PixelBuffer::filled(11, 11, ChannelOrder::Bgra, [50, 60, 70]).unwrap();
        // Single dark pixel
        image.set_rgb(5, 5, [0, 0, 0]).unwrap();
        let result = closing(&image, &StructuringElement::default(), ExecutionStrategy::Sequential).unwrap();
        assert_eq!(result.rgb(5, 5).unwrap(), [50, 60, 70]);
    }

    #[test]
    fn test_closing_preserves_large_dark_region() {
        let mut image = PixelBuffer::filled(11, 11, ChannelOrder::Bgra, [100, 100, 100]).unwrap();
        for r in 4..7 {
            for c in 4..7 {
                image.set_rgb(r, c, [5, 5, 5]).unwrap();
            }
        }
        let result = closing(&image, &StructuringElement::default(), ExecutionStrategy::Threaded(3)).unwrap();
        assert_eq!(result.rgb(5, 5).unwrap(), [5, 5, 5]);
        assert_eq!(result, image);
    }

    #[test]
    fn test_algorithm_trait() {
        let mut image = PixelBuffer::filled(9, 9, ChannelOrder::Bgra, [40, 40, 40]).unwrap();
        image.set_rgb(4, 4, [0, 0, 0]).unwrap();
        let params = ClosingParams {
            element: StructuringElement::cross(3).unwrap(),
            strategy: ExecutionStrategy::Offloaded,
        };
        let result = Closing.execute(image, params).unwrap();
        assert_eq!(result.rgb(4, 4).unwrap(), [40, 40, 40]);
        assert_eq!(Closing.name(), "Closing");
    }
}
