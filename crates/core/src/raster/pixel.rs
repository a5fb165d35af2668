//! Interleaved 4-channel image buffer

use crate::error::{Error, Result};
use crate::raster::try_filled;

/// Number of interleaved channels per pixel
pub const CHANNELS: usize = 4;

/// Alpha written into every produced pixel
pub const ALPHA: u8 = 255;

/// Byte order of the four interleaved channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    /// R, G, B, A
    Rgba,
    /// B, G, R, A
    #[default]
    Bgra,
}

impl ChannelOrder {
    /// Position of the red sample inside a pixel
    pub const fn red(self) -> usize {
        match self {
            ChannelOrder::Rgba => 0,
            ChannelOrder::Bgra => 2,
        }
    }

    /// Position of the green sample inside a pixel
    pub const fn green(self) -> usize {
        1
    }

    /// Position of the blue sample inside a pixel
    pub const fn blue(self) -> usize {
        match self {
            ChannelOrder::Rgba => 2,
            ChannelOrder::Bgra => 0,
        }
    }
}

/// A `width x height` image of interleaved 8-bit pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
    order: ChannelOrder,
}

impl PixelBuffer {
    /// Wrap raw interleaved bytes
    pub fn from_raw(width: usize, height: usize, order: ChannelOrder, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let expected = width * height * CHANNELS;
        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            order,
        })
    }

    /// Image where every pixel has the same color and alpha 255
    pub fn filled(width: usize, height: usize, order: ChannelOrder, rgb: [u8; 3]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let mut data = try_filled(width * height * CHANNELS, ALPHA)?;
        for px in data.chunks_exact_mut(CHANNELS) {
            px[order.red()] = rgb[0];
            px[order.green()] = rgb[1];
            px[order.blue()] = rgb[2];
        }
        Ok(Self {
            data,
            width,
            height,
            order,
        })
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Channel order of the raw bytes
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Raw interleaved bytes
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Consume the image and return the raw bytes
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// `[r, g, b]` of the pixel at `(row, col)`
    pub fn rgb(&self, row: usize, col: usize) -> Result<[u8; 3]> {
        if row >= self.height || col >= self.width {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.height,
                cols: self.width,
            });
        }
        Ok(self.rgb_at(row * self.width + col))
    }

    /// `[r, g, b]` of the `index`-th pixel in row-major order
    #[inline]
    pub fn rgb_at(&self, index: usize) -> [u8; 3] {
        let px = &self.data[index * CHANNELS..(index + 1) * CHANNELS];
        [
            px[self.order.red()],
            px[self.order.green()],
            px[self.order.blue()],
        ]
    }

    /// Overwrite the color of the pixel at `(row, col)`, leaving alpha alone
    pub fn set_rgb(&mut self, row: usize, col: usize, rgb: [u8; 3]) -> Result<()> {
        if row >= self.height || col >= self.width {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.height,
                cols: self.width,
            });
        }
        let start = (row * self.width + col) * CHANNELS;
        let px = &mut self.data[start..start + CHANNELS];
        px[self.order.red()] = rgb[0];
        px[self.order.green()] = rgb[1];
        px[self.order.blue()] = rgb[2];
        Ok(())
    }

    /// Copy of this image with its channels reordered
    pub fn to_order(&self, order: ChannelOrder) -> PixelBuffer {
        if order == self.order {
            return self.clone();
        }
        // Both orders keep G and A in place; swapping R and B converts either way.
        let mut data = self.data.clone();
        for px in data.chunks_exact_mut(CHANNELS) {
            px.swap(0, 2);
        }
        PixelBuffer {
            data,
            width: self.width,
            height: self.height,
            order,
        }
    }
}
