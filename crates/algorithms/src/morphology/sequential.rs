//! Single-threaded opening and closing

use hpcimg_core::{PixelBuffer, Result};
use hpcimg_parallel::ExecutionStrategy;

use super::pipeline::{self, InOrder};
use super::{MorphologyContext, OpeningClosing, Operation};

/// Runs every stage in program order on the calling thread
#[derive(Debug, Clone)]
pub struct SequentialMorphology<'a> {
    context: MorphologyContext<'a>,
}

impl<'a> SequentialMorphology<'a> {
    pub fn new(context: MorphologyContext<'a>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &MorphologyContext<'a> {
        &self.context
    }
}

impl OpeningClosing for SequentialMorphology<'_> {
    fn execute(&self, operation: Operation) -> Result<PixelBuffer> {
        let job = self.context.job()?;
        tracing::debug!(
            width = job.image.width(),
            height = job.image.height(),
            ?operation,
            "sequential morphology"
        );
        pipeline::run(&InOrder, &job, operation)
    }

    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Sequential
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::StructuringElement;
    use hpcimg_core::{ChannelOrder, Error};

    fn engine(image: &PixelBuffer) -> SequentialMorphology<'_> {
        SequentialMorphology::new(MorphologyContext::new(
            Some(image),
            Some(StructuringElement::square(3).unwrap()),
        ))
    }

    #[test]
    fn test_opening_uniform() {
        let image = PixelBuffer::filled(4, 4, ChannelOrder::Bgra, [100, 100, 100]).unwrap();
        let result = engine(&image).opening().unwrap();
        // Uniform input comes back unchanged
        assert_eq!(result, image);
    }

    #[test]
    fn test_opening_removes_bright_spot() {
        let mut image = PixelBuffer::filled(7, 7, ChannelOrder::Rgba, [5, 6, 7]).unwrap();
        image.set_rgb(3, 3, [200, 200, 200]).unwrap();
        let result = engine(&image).opening().unwrap();
        assert_eq!(result.order(), ChannelOrder::Bgra);
        assert_eq!(result.rgb(3, 3).unwrap(), [5, 6, 7]);
    }

    #[test]
    fn test_closing_fills_dark_gap() {
        let mut image = PixelBuffer::filled(7, 7, ChannelOrder::Bgra, [90, 90, 90]).unwrap();
        image.set_rgb(2, 4, [0, 10, 0]).unwrap();
        let result = engine(&image).closing().unwrap();
        assert_eq!(result.rgb(2, 4).unwrap(), [90, 90, 90]);
    }

    #[test]
    fn test_opening_preserves_large_bright_region() {
        let mut image = PixelBuffer::filled(9, 9, ChannelOrder::Bgra, [5, 5, 5]).unwrap();
        for r in 3..6 {
            for c in 3..6 {
                image.set_rgb(r, c, [100, 100, 100]).unwrap();
            }
        }
        let result = engine(&image).opening().unwrap();
        assert_eq!(result, image);
    }

    #[test]
    fn test_border_pixels_see_only_real_samples() {
        // A bright left column survives opening: ghost cells never win.
        let mut image = PixelBuffer::filled(5, 5, ChannelOrder::Bgra, [0, 0, 0]).unwrap();
        for r in 0..5 {
            image.set_rgb(r, 0, [255, 255, 255]).unwrap();
            image.set_rgb(r, 1, [255, 255, 255]).unwrap();
        }
        let result = engine(&image).opening().unwrap();
        assert_eq!(result, image);
    }

    #[test]
    fn test_alpha_is_opaque() {
        let raw = vec![10, 20, 30, 0, 40, 50, 60, 7];
        let image = PixelBuffer::from_raw(2, 1, ChannelOrder::Bgra, raw).unwrap();
        let result = engine(&image).closing().unwrap();
        assert!(result.as_raw().chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_missing_image() {
        let engine = SequentialMorphology::new(MorphologyContext::new(
            None,
            Some(StructuringElement::default()),
        ));
        assert!(matches!(engine.opening(), Err(Error::MissingInput(_))));
        assert_eq!(engine.strategy(), ExecutionStrategy::Sequential);
    }
}
