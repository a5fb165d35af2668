//! Single-channel working plane

use crate::error::{Error, Result};
use crate::raster::try_filled;

/// One color channel laid out row-major over a (possibly padded) footprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl ChannelBuffer {
    /// Allocate a `width x height` plane with every sample set to `value`
    pub fn try_filled(width: usize, height: usize, value: u8) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let len = width
            .checked_mul(height)
            .ok_or(Error::Allocation { bytes: usize::MAX })?;
        Ok(Self {
            data: try_filled(len, value)?,
            width,
            height,
        })
    }

    /// Plane width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Plane height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<u8> {
        if row >= self.height || col >= self.width {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.height,
                cols: self.width,
            });
        }
        Ok(self.data[row * self.width + col])
    }

    /// Raw samples
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw samples
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
