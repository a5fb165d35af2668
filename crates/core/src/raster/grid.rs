//! Square height-map grid

use crate::error::{Error, Result};
use crate::raster::{try_filled, ChannelOrder, PixelBuffer, ALPHA, CHANNELS};
use ndarray::ArrayView2;

/// A square grid of unsigned 8-bit samples.
///
/// Samples are stored row-major, so the cell at `(row, col)` lives at
/// `row * size + col`. Diamond-square expects `size = 2^n + 1`, but the
/// buffer itself only requires a non-zero side.
///
/// # Example
///
/// ```ignore
/// use hpcimg_core::Grid;
///
/// let mut grid = Grid::try_new(5)?;
/// grid.set(2, 2, 128)?;
/// assert_eq!(grid.get(2, 2)?, 128);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    data: Vec<u8>,
    size: usize,
}

impl Grid {
    /// Allocate a zeroed `size x size` grid
    pub fn try_new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidDimensions {
                width: size,
                height: size,
            });
        }
        let len = size
            .checked_mul(size)
            .ok_or(Error::Allocation { bytes: usize::MAX })?;
        Ok(Self {
            data: try_filled(len, 0)?,
            size,
        })
    }

    /// Wrap existing samples
    pub fn from_vec(data: Vec<u8>, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidDimensions {
                width: size,
                height: size,
            });
        }
        if data.len() != size * size {
            return Err(Error::SizeMismatch {
                expected: size * size,
                actual: data.len(),
            });
        }
        Ok(Self { data, size })
    }

    /// Side length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the grid holds no cells
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat index of `(row, col)`
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<u8> {
        if row >= self.size || col >= self.size {
            return Err(self.out_of_bounds(row, col));
        }
        Ok(self.data[self.index(row, col)])
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> Result<()> {
        if row >= self.size || col >= self.size {
            return Err(self.out_of_bounds(row, col));
        }
        let idx = self.index(row, col);
        self.data[idx] = value;
        Ok(())
    }

    /// The four corner samples: top-left, top-right, bottom-left, bottom-right
    pub fn corners(&self) -> [u8; 4] {
        let last = self.size - 1;
        [
            self.data[0],
            self.data[last],
            self.data[last * self.size],
            self.data[last * self.size + last],
        ]
    }

    /// Overwrite the four corner samples, in [`Grid::corners`] order
    pub fn set_corners(&mut self, corners: [u8; 4]) {
        let last = self.size - 1;
        let size = self.size;
        self.data[0] = corners[0];
        self.data[last] = corners[1];
        self.data[last * size] = corners[2];
        self.data[last * size + last] = corners[3];
    }

    /// Raw samples, row-major
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw samples, row-major
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the grid and return the raw samples
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Two-dimensional view, indexed `[(row, col)]`
    pub fn view(&self) -> Result<ArrayView2<'_, u8>> {
        ArrayView2::from_shape((self.size, self.size), &self.data)
            .map_err(|e| Error::Other(e.to_string()))
    }

    /// Basic statistics over all cells
    pub fn statistics(&self) -> Result<GridStatistics> {
        let view = self.view()?;
        let (min, max, sum) = view.fold((u8::MAX, u8::MIN, 0u64), |(lo, hi, sum), &v| {
            (lo.min(v), hi.max(v), sum + u64::from(v))
        });
        Ok(GridStatistics {
            min,
            max,
            mean: sum as f64 / self.len() as f64,
        })
    }

    /// Expand into a gray 4-channel image, alpha fixed at 255
    pub fn to_bgra(&self) -> Result<PixelBuffer> {
        let mut data = try_filled(self.len() * CHANNELS, ALPHA)?;
        for (px, &v) in data.chunks_exact_mut(CHANNELS).zip(&self.data) {
            px[..3].fill(v);
        }
        PixelBuffer::from_raw(self.size, self.size, ChannelOrder::Bgra, data)
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> Error {
        Error::IndexOutOfBounds {
            row,
            col,
            rows: self.size,
            cols: self.size,
        }
    }
}

/// Basic statistics for a grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStatistics {
    pub min: u8,
    pub max: u8,
    pub mean: f64,
}
