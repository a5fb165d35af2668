//! Structuring element definitions for morphological operations
//!
//! A structuring element is a small binary mask. Foreground cells define
//! the neighborhood each erosion or dilation reduces over; the mask center
//! is the cell at `((height-1)/2, (width-1)/2)`.

use std::fmt;
use std::str::FromStr;

use hpcimg_core::{Error, PixelBuffer, Result};

use super::FOREGROUND;

/// Binary mask with odd width and height
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    mask: Vec<bool>,
    width: usize,
    height: usize,
}

impl Default for StructuringElement {
    /// Full 3x3 square
    fn default() -> Self {
        Self {
            mask: vec![true; 9],
            width: 3,
            height: 3,
        }
    }
}

impl StructuringElement {
    /// Wrap a row-major mask, rejecting empty or even-sided shapes
    pub fn from_mask(width: usize, height: usize, mask: Vec<bool>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        if width % 2 == 0 || height % 2 == 0 {
            return Err(Error::InvalidParameter {
                name: "element",
                value: format!("{}x{}", width, height),
                reason: "structuring element sides must be odd".to_string(),
            });
        }
        if mask.len() != width * height {
            return Err(Error::SizeMismatch {
                expected: width * height,
                actual: mask.len(),
            });
        }
        Ok(Self {
            mask,
            width,
            height,
        })
    }

    /// Build from nested rows, all of the same length
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some(row) = rows.iter().find(|row| row.len() != width) {
            return Err(Error::InvalidParameter {
                name: "element",
                value: format!("row length {}", row.len()),
                reason: format!("rows must all have length {}", width),
            });
        }
        Self::from_mask(width, height, rows.concat())
    }

    /// Decode a bitmap: a pixel is foreground iff its red sample is 255
    pub fn from_pixels(image: &PixelBuffer) -> Result<Self> {
        let mask = (0..image.width() * image.height())
            .map(|i| image.rgb_at(i)[0] == FOREGROUND)
            .collect();
        Self::from_mask(image.width(), image.height(), mask)
    }

    /// Every cell foreground
    pub fn square(size: usize) -> Result<Self> {
        Self::from_fn(size, |_, _| true)
    }

    /// Center row and center column
    pub fn cross(size: usize) -> Result<Self> {
        let center = size.saturating_sub(1) / 2;
        Self::from_fn(size, |row, col| row == center || col == center)
    }

    /// Cells within Euclidean distance `(size-1)/2` of the center
    pub fn disk(size: usize) -> Result<Self> {
        let radius = (size.saturating_sub(1) / 2) as isize;
        Self::from_fn(size, |row, col| {
            let dr = row as isize - radius;
            let dc = col as isize - radius;
            dr * dr + dc * dc <= radius * radius
        })
    }

    /// Build a `size x size` element of the given shape
    pub fn synthesize(shape: ElementShape, size: usize) -> Result<Self> {
        match shape {
            ElementShape::Square => Self::square(size),
            ElementShape::Cross => Self::cross(size),
            ElementShape::Disk => Self::disk(size),
        }
    }

    fn from_fn<F: Fn(usize, usize) -> bool>(size: usize, f: F) -> Result<Self> {
        let mask = (0..size * size).map(|i| f(i / size, i % size)).collect();
        Self::from_mask(size, size, mask)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Columns on each side of the center
    pub fn half_width(&self) -> usize {
        (self.width - 1) / 2
    }

    /// Rows above and below the center
    pub fn half_height(&self) -> usize {
        (self.height - 1) / 2
    }

    /// Whether `(row, col)` is foreground
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.mask[row * self.width + col]
    }

    /// Foreground cells in row-major order
    pub fn foreground(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.mask
            .iter()
            .enumerate()
            .filter(|&(_, &on)| on)
            .map(move |(i, _)| (i / width, i % width))
    }

    /// Number of foreground cells
    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&on| on).count()
    }

    /// The mask rotated 180 degrees
    pub fn reflected(&self) -> Self {
        Self {
            mask: self.mask.iter().rev().copied().collect(),
            width: self.width,
            height: self.height,
        }
    }
}

/// Shapes the library can synthesize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementShape {
    #[default]
    Square,
    Cross,
    Disk,
}

impl FromStr for ElementShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "square" | "box" => Ok(ElementShape::Square),
            "cross" | "plus" => Ok(ElementShape::Cross),
            "disk" | "circle" => Ok(ElementShape::Disk),
            _ => Err(Error::InvalidParameter {
                name: "shape",
                value: s.to_string(),
                reason: "use square, cross or disk".to_string(),
            }),
        }
    }
}

impl fmt::Display for ElementShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementShape::Square => write!(f, "square"),
            ElementShape::Cross => write!(f, "cross"),
            ElementShape::Disk => write!(f, "disk"),
        }
    }
}

/// Source of structuring elements by requested size.
///
/// A failed load means the operation is unavailable; callers report it
/// rather than proceed with an empty element.
pub trait ElementLoader {
    fn load(&self, size: usize) -> Result<StructuringElement>;
}

/// Loader that builds elements in memory
#[derive(Debug, Clone, Copy, Default)]
pub struct SynthesizedElement {
    pub shape: ElementShape,
}

impl SynthesizedElement {
    pub fn new(shape: ElementShape) -> Self {
        Self { shape }
    }
}

impl ElementLoader for SynthesizedElement {
    fn load(&self, size: usize) -> Result<StructuringElement> {
        StructuringElement::synthesize(self.shape, size)
    }
}
