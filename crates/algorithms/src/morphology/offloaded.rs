//! Opening and closing delegated to an accelerator

use std::sync::Arc;

use hpcimg_core::{ChannelOrder, PixelBuffer, Result};
use hpcimg_parallel::ExecutionStrategy;

use super::{MorphologyContext, OpeningClosing, Operation};
use crate::accel::{default_accelerator, Accelerator, MorphologyJob};

/// Hands the image, element geometry and both offset tables to the device
/// in one synchronous call.
#[derive(Debug, Clone)]
pub struct OffloadedMorphology<'a> {
    context: MorphologyContext<'a>,
    device: Arc<dyn Accelerator>,
}

impl<'a> OffloadedMorphology<'a> {
    pub fn new(context: MorphologyContext<'a>, device: Arc<dyn Accelerator>) -> Self {
        Self { context, device }
    }

    /// Engine on the bundled host device
    pub fn on_host(context: MorphologyContext<'a>) -> Self {
        Self::new(context, default_accelerator())
    }
}

impl OpeningClosing for OffloadedMorphology<'_> {
    fn execute(&self, operation: Operation) -> Result<PixelBuffer> {
        let job = self.context.job()?;
        let image = job.image;
        let element_width = job.padding.width - image.width() + 1;
        let element_height = job.padding.height - image.height() + 1;
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            device = self.device.name(),
            ?operation,
            "offloaded morphology"
        );

        let output = self.device.open_close(&MorphologyJob {
            element_width,
            element_height,
            image: image.as_raw(),
            order: image.order(),
            width: image.width(),
            height: image.height(),
            erosion: job.erosion.as_slice(),
            dilation: job.dilation.as_slice(),
            operation,
        })?;
        PixelBuffer::from_raw(image.width(), image.height(), ChannelOrder::Bgra, output)
    }

    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Offloaded
    }
}
