//! Mathematical morphology on RGB images
//!
//! Opening and closing are applied independently to the red, green and blue
//! channels against a flat structuring element:
//! - **Erosion**: minimum over the element (shrinks bright regions)
//! - **Dilation**: maximum over the reflected element (expands bright regions)
//! - **Opening**: erosion then dilation (removes small bright features)
//! - **Closing**: dilation then erosion (fills small dark gaps)
//!
//! Each channel is copied into a plane padded by the element's half extents.
//! The padding ("ghost cells") holds a sentinel that can never win the
//! reduction of the pass reading it, so border pixels only see real samples.
//! The result is cropped back and interleaved as B, G, R, A.

mod closing;
mod element;
mod offloaded;
mod offsets;
mod opening;
mod pipeline;
mod sequential;
mod threaded;

use hpcimg_core::{Error, PixelBuffer, Result};
use hpcimg_parallel::ExecutionStrategy;

pub use closing::{closing, Closing, ClosingParams};
pub use element::{ElementLoader, ElementShape, StructuringElement, SynthesizedElement};
pub use offloaded::OffloadedMorphology;
pub use offsets::OffsetTable;
pub use opening::{opening, Opening, OpeningParams};
pub use sequential::SequentialMorphology;
pub use threaded::ThreadedMorphology;

pub(crate) use pipeline::{Job, Padding};

/// Ghost value that never wins a minimum
pub const WHITE: u8 = 255;
/// Ghost value that never wins a maximum
pub const BLACK: u8 = 0;
/// Bitmap sample marking a foreground element cell
pub const FOREGROUND: u8 = 255;

/// Which composite operation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Opening,
    Closing,
}

impl Operation {
    /// Ghost value of the planes split from the source
    pub fn split_sentinel(self) -> u8 {
        match self {
            Operation::Opening => WHITE,
            Operation::Closing => BLACK,
        }
    }

    /// Ghost value of the planes written by the first pass
    pub fn ghost_sentinel(self) -> u8 {
        match self {
            Operation::Opening => BLACK,
            Operation::Closing => WHITE,
        }
    }

    /// The two passes in execution order
    pub fn passes(self) -> [Pass; 2] {
        match self {
            Operation::Opening => [Pass::Erosion, Pass::Dilation],
            Operation::Closing => [Pass::Dilation, Pass::Erosion],
        }
    }
}

/// A single morphological primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Erosion,
    Dilation,
}

impl Pass {
    /// Identity of the reduction; also the result over an empty element
    pub fn seed(self) -> u8 {
        match self {
            Pass::Erosion => WHITE,
            Pass::Dilation => BLACK,
        }
    }

    #[inline]
    pub fn combine(self, a: u8, b: u8) -> u8 {
        match self {
            Pass::Erosion => a.min(b),
            Pass::Dilation => a.max(b),
        }
    }

    /// Reduce `plane` over `offsets` around `center`
    #[inline]
    pub fn reduce(self, plane: &[u8], center: usize, offsets: &[isize]) -> u8 {
        offsets.iter().fold(self.seed(), |acc, &offset| {
            self.combine(acc, plane[center.wrapping_add_signed(offset)])
        })
    }
}

/// Input image and structuring element for one engine, plus the offset
/// tables derived from them.
///
/// Either input may be absent; engines then fail with
/// [`Error::MissingInput`] before allocating anything.
#[derive(Debug, Clone)]
pub struct MorphologyContext<'a> {
    input: Option<&'a PixelBuffer>,
    element: Option<StructuringElement>,
    tables: Option<(OffsetTable, OffsetTable)>,
}

impl<'a> MorphologyContext<'a> {
    pub fn new(input: Option<&'a PixelBuffer>, element: Option<StructuringElement>) -> Self {
        let tables = match (input, &element) {
            (Some(image), Some(element)) => {
                let padded_width = image.width() + element.width() - 1;
                Some((
                    OffsetTable::erosion(element, padded_width),
                    OffsetTable::dilation(element, padded_width),
                ))
            }
            _ => None,
        };
        Self {
            input,
            element,
            tables,
        }
    }

    /// Context whose element comes from `loader`.
    ///
    /// A failed load leaves the element absent; it is reported when an
    /// operation is attempted.
    pub fn load(input: Option<&'a PixelBuffer>, loader: &dyn ElementLoader, size: usize) -> Self {
        let element = match loader.load(size) {
            Ok(element) => Some(element),
            Err(err) => {
                tracing::warn!(size, %err, "structuring element unavailable");
                None
            }
        };
        Self::new(input, element)
    }

    pub fn input(&self) -> Option<&'a PixelBuffer> {
        self.input
    }

    pub fn element(&self) -> Option<&StructuringElement> {
        self.element.as_ref()
    }

    /// Erosion table, once both inputs are present
    pub fn erosion_table(&self) -> Option<&OffsetTable> {
        self.tables.as_ref().map(|(erosion, _)| erosion)
    }

    /// Dilation table, once both inputs are present
    pub fn dilation_table(&self) -> Option<&OffsetTable> {
        self.tables.as_ref().map(|(_, dilation)| dilation)
    }

    pub(crate) fn job(&self) -> Result<Job<'_>> {
        let image = self.input.ok_or(Error::MissingInput("image"))?;
        match (&self.element, &self.tables) {
            (Some(element), Some((erosion, dilation))) => Ok(Job {
                image,
                padding: Padding::new(image.width(), image.height(), element.width(), element.height()),
                erosion,
                dilation,
            }),
            _ => Err(Error::MissingInput("structuring element")),
        }
    }
}

/// Capability shared by every morphology engine
pub trait OpeningClosing {
    /// Run `operation` on the engine's image, returning a fresh BGRA image
    fn execute(&self, operation: Operation) -> Result<PixelBuffer>;

    /// Strategy this engine implements
    fn strategy(&self) -> ExecutionStrategy;

    fn opening(&self) -> Result<PixelBuffer> {
        self.execute(Operation::Opening)
    }

    fn closing(&self) -> Result<PixelBuffer> {
        self.execute(Operation::Closing)
    }
}

/// One of the three morphology engines
#[derive(Debug)]
pub enum MorphologyEngine<'a> {
    Sequential(SequentialMorphology<'a>),
    Threaded(ThreadedMorphology<'a>),
    Offloaded(OffloadedMorphology<'a>),
}

impl OpeningClosing for MorphologyEngine<'_> {
    fn execute(&self, operation: Operation) -> Result<PixelBuffer> {
        match self {
            MorphologyEngine::Sequential(engine) => engine.execute(operation),
            MorphologyEngine::Threaded(engine) => engine.execute(operation),
            MorphologyEngine::Offloaded(engine) => engine.execute(operation),
        }
    }

    fn strategy(&self) -> ExecutionStrategy {
        match self {
            MorphologyEngine::Sequential(engine) => engine.strategy(),
            MorphologyEngine::Threaded(engine) => engine.strategy(),
            MorphologyEngine::Offloaded(engine) => engine.strategy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpcimg_core::ChannelOrder;

    #[test]
    fn test_sentinel_table() {
        assert_eq!(Operation::Opening.split_sentinel(), WHITE);
        assert_eq!(Operation::Opening.ghost_sentinel(), BLACK);
        assert_eq!(Operation::Closing.split_sentinel(), BLACK);
        assert_eq!(Operation::Closing.ghost_sentinel(), WHITE);
        assert_eq!(Operation::Closing.passes(), [Pass::Dilation, Pass::Erosion]);
    }

    #[test]
    fn test_empty_reduction_yields_seed() {
        let plane = [7u8; 9];
        assert_eq!(Pass::Erosion.reduce(&plane, 4, &[]), 255);
        assert_eq!(Pass::Dilation.reduce(&plane, 4, &[]), 0);
        assert_eq!(Pass::Erosion.reduce(&plane, 4, &[-4, 0, 4]), 7);
    }

    #[test]
    fn test_context_builds_tables() {
        let image = PixelBuffer::filled(6, 4, ChannelOrder::Bgra, [1, 2, 3]).unwrap();
        let context = MorphologyContext::new(Some(&image), Some(StructuringElement::default()));
        assert_eq!(context.erosion_table().unwrap().count(), 9);
        assert_eq!(context.dilation_table().unwrap().count(), 9);
        assert!(context.job().is_ok());
    }

    #[test]
    fn test_context_guards_missing_inputs() {
        let context = MorphologyContext::new(None, Some(StructuringElement::default()));
        assert!(matches!(context.job(), Err(Error::MissingInput("image"))));
        assert!(context.erosion_table().is_none());

        let image = PixelBuffer::filled(2, 2, ChannelOrder::Bgra, [0, 0, 0]).unwrap();
        let context = MorphologyContext::load(Some(&image), &SynthesizedElement::default(), 4);
        assert!(context.element().is_none());
        assert!(matches!(
            context.job(),
            Err(Error::MissingInput("structuring element"))
        ));
    }
}
