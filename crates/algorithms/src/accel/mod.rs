//! Accelerator collaborator for the offloaded strategies
//!
//! An offloaded engine prepares its inputs on the host, then makes one
//! synchronous call into an [`Accelerator`]. How the device tiles and
//! schedules the work is its own business; the engine only relies on the
//! pre/post-conditions documented on each method.
//!
//! [`HostAccelerator`] is the bundled device. It runs kernels on the CPU,
//! one logical thread per output cell, in fixed-size blocks.

mod host;

use std::fmt;
use std::sync::Arc;

use hpcimg_core::{ChannelOrder, Grid, Result};

use crate::morphology::Operation;

pub use host::{HostAccelerator, BLOCK_SIZE};

/// Everything the device needs for one opening or closing
#[derive(Debug, Clone, Copy)]
pub struct MorphologyJob<'a> {
    /// Structuring element width
    pub element_width: usize,
    /// Structuring element height
    pub element_height: usize,
    /// Raw interleaved source pixels
    pub image: &'a [u8],
    /// Channel order of `image`
    pub order: ChannelOrder,
    /// Source width in pixels
    pub width: usize,
    /// Source height in pixels
    pub height: usize,
    /// Erosion offsets into the padded plane
    pub erosion: &'a [isize],
    /// Dilation offsets into the padded plane
    pub dilation: &'a [isize],
    /// Opening or closing
    pub operation: Operation,
}

impl MorphologyJob<'_> {
    /// Width of the ghost-padded plane the offsets were computed for
    pub fn padded_width(&self) -> usize {
        self.width + self.element_width - 1
    }

    /// Height of the ghost-padded plane
    pub fn padded_height(&self) -> usize {
        self.height + self.element_height - 1
    }
}

/// A massively-parallel device the offloaded engines delegate to
pub trait Accelerator: Send + Sync + fmt::Debug {
    /// Human-readable device name
    fn name(&self) -> &str;

    /// Fill `grid` by diamond-square, in place.
    ///
    /// The four corners are already set when this is called and must be
    /// left as they are. Every other cell must end up in `[0, 255]`.
    fn diamond_square(&self, grid: &mut Grid, seed: u64, max_value: u32) -> Result<()>;

    /// Run a whole opening or closing and return the composed image as
    /// `width * height` interleaved B, G, R, A pixels with alpha 255.
    fn open_close(&self, job: &MorphologyJob<'_>) -> Result<Vec<u8>>;
}

/// The bundled host device
pub fn default_accelerator() -> Arc<dyn Accelerator> {
    Arc::new(HostAccelerator::default())
}
