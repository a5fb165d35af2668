//! Flat offset tables for erosion and dilation
//!
//! Each table lists, for every foreground cell of the element, the index
//! delta from a padded-plane pixel to the sample that cell covers. A table
//! is built once per image width and applied at every pixel with one add.

use super::element::StructuringElement;

/// Signed index deltas into a padded plane, in row-major mask order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OffsetTable {
    offsets: Vec<isize>,
}

impl OffsetTable {
    /// Table for erosion: the mask as-is
    pub fn erosion(element: &StructuringElement, padded_width: usize) -> Self {
        Self::build(element, padded_width, |row, col| (row, col))
    }

    /// Table for dilation: the mask rotated 180 degrees
    pub fn dilation(element: &StructuringElement, padded_width: usize) -> Self {
        let (height, width) = (element.height(), element.width());
        Self::build(element, padded_width, |row, col| {
            (height - 1 - row, width - 1 - col)
        })
    }

    fn build<F>(element: &StructuringElement, padded_width: usize, place: F) -> Self
    where
        F: Fn(usize, usize) -> (usize, usize),
    {
        let half_rows = element.half_height() as isize;
        let half_cols = element.half_width() as isize;
        let stride = padded_width as isize;
        let offsets = element
            .foreground()
            .map(|(row, col)| {
                let (r, c) = place(row, col);
                (r as isize - half_rows) * stride + (c as isize - half_cols)
            })
            .collect();
        Self { offsets }
    }

    /// Number of entries, equal to the element's foreground count
    pub fn count(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn as_slice(&self) -> &[isize] {
        &self.offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_square_offsets() {
        let se = StructuringElement::square(3).unwrap();
        let table = OffsetTable::erosion(&se, 10);
        assert_eq!(table.count(), 9);
        assert_eq!(
            table.as_slice(),
            &[-11, -10, -9, -1, 0, 1, 9, 10, 11]
        );
        // A symmetric element reflects onto itself, in reverse order.
        let mut reflected = OffsetTable::dilation(&se, 10).as_slice().to_vec();
        reflected.sort_unstable();
        assert_eq!(reflected, table.as_slice());
    }

    #[test]
    fn test_count_matches_foreground() {
        for size in [1, 3, 5, 7] {
            let se = StructuringElement::disk(size).unwrap();
            assert_eq!(OffsetTable::erosion(&se, 64).count(), se.count());
            assert_eq!(OffsetTable::dilation(&se, 64).count(), se.count());
        }
    }

    #[test]
    fn test_empty_mask_gives_empty_tables() {
        let se = StructuringElement::from_mask(5, 5, vec![false; 25]).unwrap();
        assert!(OffsetTable::erosion(&se, 9).is_empty());
        assert_eq!(OffsetTable::dilation(&se, 9).count(), 0);
    }

    #[test]
    fn test_dilation_reflects() {
        // Only the top-left cell is foreground.
        let mut mask = vec![false; 9];
        mask[0] = true;
        let se = StructuringElement::from_mask(3, 3, mask).unwrap();
        assert_eq!(OffsetTable::erosion(&se, 7).as_slice(), &[-8]);
        assert_eq!(OffsetTable::dilation(&se, 7).as_slice(), &[8]);
    }

    #[test]
    fn test_rectangular_element() {
        // 1 row by 3 columns: horizontal neighbors only.
        let se = StructuringElement::from_mask(3, 1, vec![true; 3]).unwrap();
        assert_eq!(OffsetTable::erosion(&se, 12).as_slice(), &[-1, 0, 1]);
        assert_eq!(OffsetTable::dilation(&se, 12).as_slice(), &[1, 0, -1]);
    }
}
