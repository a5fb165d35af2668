//! Cell rules and pass geometry shared by every diamond-square engine

use std::iter::StepBy;
use std::ops::Range;

use hpcimg_core::Grid;
use rand::Rng;

use super::MAX;

/// Perturbation amplitude of one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Amplitude {
    max_value: u32,
    enabled: bool,
}

impl Amplitude {
    pub(crate) fn new(max_value: u32) -> Self {
        Self {
            max_value,
            enabled: max_value > 0,
        }
    }

    /// Half-width of the perturbation range: draws fall in `[-bound, bound)`.
    ///
    /// Never below 1 once enabled, so deep levels keep a little noise.
    pub(crate) fn bound(self) -> i32 {
        if !self.enabled {
            return 0;
        }
        (self.max_value / 2).max(1) as i32
    }

    /// Amplitude of the next level
    pub(crate) fn halved(self) -> Self {
        Self {
            max_value: self.max_value / 2,
            ..self
        }
    }

    /// Uniform draw from `[-bound, bound)`
    pub(crate) fn draw<R: Rng>(self, rng: &mut R) -> i32 {
        let bound = self.bound();
        if bound == 0 {
            return 0;
        }
        rng.gen_range(-bound..bound)
    }

    /// Draw from `[-bound, bound)` taken from an already mixed 64-bit key
    /// instead of a generator, for stateless kernels.
    pub(crate) fn hashed(self, key: u64) -> i32 {
        let bound = self.bound();
        if bound == 0 {
            return 0;
        }
        let span = 2 * bound as u64;
        (key % span) as i32 - bound
    }
}

/// One refinement level: squares of side `step` are split around `step / 2`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Level {
    pub index: u32,
    pub step: usize,
    pub amplitude: Amplitude,
}

impl Level {
    pub(crate) fn half(&self) -> usize {
        self.step / 2
    }
}

/// Levels from the whole grid down to unit squares
pub(crate) fn levels(size: usize, max_value: u32) -> impl Iterator<Item = Level> {
    let mut step = size - 1;
    let mut amplitude = Amplitude::new(max_value);
    let mut index = 0;
    std::iter::from_fn(move || {
        if step <= 1 {
            return None;
        }
        let level = Level {
            index,
            step,
            amplitude,
        };
        step /= 2;
        amplitude = amplitude.halved();
        index += 1;
        Some(level)
    })
}

/// Set the four corners, drawing any that are not preset
pub(crate) fn seed_corners<R: Rng>(grid: &mut Grid, preset: Option<[u8; 4]>, rng: &mut R) {
    let corners = preset.unwrap_or_else(|| {
        [
            rng.gen_range(0..MAX) as u8,
            rng.gen_range(0..MAX) as u8,
            rng.gen_range(0..MAX) as u8,
            rng.gen_range(0..MAX) as u8,
        ]
    });
    grid.set_corners(corners);
}

/// Rows holding diamond centers
pub(crate) fn diamond_rows(size: usize, step: usize) -> StepBy<Range<usize>> {
    (step / 2..size - 1).step_by(step)
}

/// Columns of the diamond centers on any diamond row
pub(crate) fn diamond_cols(size: usize, step: usize) -> StepBy<Range<usize>> {
    (step / 2..size - 1).step_by(step)
}

/// Rows holding square-pass targets
pub(crate) fn square_rows(size: usize, step: usize) -> StepBy<Range<usize>> {
    (0..size).step_by(step / 2)
}

/// Columns of the square-pass targets on `row`.
///
/// Rows that carry corners only need their edge midpoints; rows through
/// diamond centers need every column that lines up with a corner.
pub(crate) fn square_cols(size: usize, step: usize, row: usize) -> StepBy<Range<usize>> {
    if row % step == 0 {
        (step / 2..size - 1).step_by(step)
    } else {
        (0..size).step_by(step)
    }
}

/// New value of the diamond center at `(row, col)`
#[inline]
pub(crate) fn diamond_value(cells: &[u8], size: usize, row: usize, col: usize, half: usize, noise: i32) -> u8 {
    let up = (row - half) * size;
    let down = (row + half) * size;
    let sum = i32::from(cells[up + col - half])
        + i32::from(cells[up + col + half])
        + i32::from(cells[down + col - half])
        + i32::from(cells[down + col + half]);
    settle(sum + noise, 4)
}

/// New value of the square-pass target at `(row, col)`
#[inline]
pub(crate) fn square_value(cells: &[u8], size: usize, row: usize, col: usize, half: usize, noise: i32) -> u8 {
    let mut sum = 0i32;
    let mut count = 0i32;
    if row != 0 {
        sum += i32::from(cells[(row - half) * size + col]);
        count += 1;
    }
    if row != size - 1 {
        sum += i32::from(cells[(row + half) * size + col]);
        count += 1;
    }
    if col != 0 {
        sum += i32::from(cells[row * size + col - half]);
        count += 1;
    }
    if col != size - 1 {
        sum += i32::from(cells[row * size + col + half]);
        count += 1;
    }
    settle(sum + noise, count)
}

/// Average and clamp into the sample range
#[inline]
fn settle(total: i32, count: i32) -> u8 {
    (total / count).clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_amplitude_halves_with_floor() {
        let bounds: Vec<i32> = levels(257, MAX).map(|l| l.amplitude.bound()).collect();
        assert_eq!(bounds, vec![128, 64, 32, 16, 8, 4, 2, 1]);

        let deep: Vec<i32> = levels(2049, MAX).map(|l| l.amplitude.bound()).collect();
        assert_eq!(deep.len(), 11);
        assert_eq!(&deep[8..], &[1, 1, 1]);
    }

    #[test]
    fn test_zero_amplitude_never_draws() {
        let mut rng = StdRng::seed_from_u64(0);
        let amplitude = Amplitude::new(0);
        assert_eq!(amplitude.bound(), 0);
        assert!((0..100).all(|_| amplitude.draw(&mut rng) == 0));
        assert_eq!(amplitude.halved().bound(), 0);
    }

    #[test]
    fn test_draw_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        let amplitude = Amplitude::new(8);
        for _ in 0..1000 {
            let v = amplitude.draw(&mut rng);
            assert!((-4..4).contains(&v), "{}", v);
        }
    }

    #[test]
    fn test_hashed_in_range() {
        let amplitude = Amplitude::new(64);
        for key in (0..5000u64).map(|k| k.wrapping_mul(0x9E37_79B9_7F4A_7C15)) {
            let v = amplitude.hashed(key);
            assert!((-32..32).contains(&v), "{}", v);
        }
        assert_eq!(Amplitude::new(0).hashed(u64::MAX), 0);
    }

    #[test]
    fn test_levels() {
        let steps: Vec<usize> = levels(17, MAX).map(|l| l.step).collect();
        assert_eq!(steps, vec![16, 8, 4, 2]);
        assert_eq!(levels(2, MAX).count(), 0);
    }

    #[test]
    fn test_pass_geometry_covers_every_cell_once() {
        let size = 17;
        let mut hits = vec![0u32; size * size];
        for corner in [0, size - 1, (size - 1) * size, size * size - 1] {
            hits[corner] += 1;
        }
        for level in levels(size, MAX) {
            for row in diamond_rows(size, level.step) {
                for col in diamond_cols(size, level.step) {
                    hits[row * size + col] += 1;
                }
            }
            for row in square_rows(size, level.step) {
                for col in square_cols(size, level.step, row) {
                    hits[row * size + col] += 1;
                }
            }
        }
        assert!(hits.iter().all(|&h| h == 1));
    }

    #[test]
    fn test_diamond_value_averages_corners() {
        let size = 3;
        let cells = vec![10, 0, 20, 0, 0, 0, 30, 0, 40];
        assert_eq!(diamond_value(&cells, size, 1, 1, 1, 0), 25);
        assert_eq!(diamond_value(&cells, size, 1, 1, 1, 4), 26);
    }

    #[test]
    fn test_square_value_on_edges() {
        let size = 3;
        let cells = vec![10, 0, 20, 0, 60, 0, 30, 0, 40];
        // Top edge midpoint: left, right and the center below.
        assert_eq!(square_value(&cells, size, 0, 1, 1, 0), 30);
        // Left edge midpoint: top, bottom and the center to the right.
        assert_eq!(square_value(&cells, size, 1, 0, 1, 2), 34);
    }

    #[test]
    fn test_values_clamp() {
        let size = 3;
        let low = vec![0u8; 9];
        assert_eq!(diamond_value(&low, size, 1, 1, 1, -128), 0);
        let high = vec![255u8; 9];
        assert_eq!(diamond_value(&high, size, 1, 1, 1, 127), 255);
        assert_eq!(square_value(&high, size, 0, 1, 1, 127), 255);
    }
}
