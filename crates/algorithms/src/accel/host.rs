//! CPU emulation of a massively-parallel device
//!
//! Kernels are launched over a flat range of logical thread indices. Each
//! logical thread derives its work item from its index alone and writes
//! exactly one output slot, so the launch needs no synchronization beyond
//! the join at its end. Rayon schedules the threads in blocks of
//! [`BLOCK_SIZE`].

use std::mem::size_of;

use hpcimg_core::raster::{ALPHA, CHANNELS};
use hpcimg_core::{Error, Grid, Result};
use hpcimg_parallel::worker_seed;
use rayon::prelude::*;

use super::{Accelerator, MorphologyJob};
use crate::morphology::{Padding, Pass};
use crate::terrain::diamond_square::step::{diamond_value, levels, square_value, Level};

/// Logical threads per scheduling block
pub const BLOCK_SIZE: usize = 256;

/// The bundled accelerator: runs every kernel on the host's cores
#[derive(Debug, Clone, Default)]
pub struct HostAccelerator;

impl HostAccelerator {
    pub fn new() -> Self {
        Self
    }
}

/// Device buffer of `len` copies of `value`
fn device_alloc<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| Error::Allocation {
            bytes: len.saturating_mul(size_of::<T>()),
        })?;
    buffer.resize(len, value);
    Ok(buffer)
}

/// Run `kernel` once per slot of `out`, passing the logical thread index
fn launch<T, K>(out: &mut [T], kernel: K)
where
    T: Send,
    K: Fn(usize) -> T + Sync + Send,
{
    out.par_iter_mut()
        .with_min_len(BLOCK_SIZE)
        .enumerate()
        .for_each(|(thread, slot)| *slot = kernel(thread));
}

/// Cell written by diamond thread `t`, with `n` squares per side
#[inline]
fn diamond_cell(t: usize, n: usize, step: usize) -> (usize, usize) {
    let half = step / 2;
    (half + (t / n) * step, half + (t % n) * step)
}

/// Cell written by square thread `t`.
///
/// Targets come in bands of `2n + 1`: `n` edge midpoints on a corner row
/// followed by `n + 1` on the diamond row below it. The last corner row has
/// no diamond row after it.
#[inline]
fn square_cell(t: usize, n: usize, step: usize) -> (usize, usize) {
    let half = step / 2;
    let band = 2 * n + 1;
    let (m, r) = (t / band, t % band);
    if r < n {
        (m * step, half + r * step)
    } else {
        (m * step + half, (r - n) * step)
    }
}

impl HostAccelerator {
    fn refine(&self, grid: &mut Grid, level: Level, seed: u64) -> Result<()> {
        let size = grid.size();
        let step = level.step;
        let half = level.half();
        let n = (size - 1) / step;
        let amplitude = level.amplitude;

        let diamond_pass = level.index * 2;
        let mut scratch = device_alloc(n * n, 0u8)?;
        {
            let cells = grid.as_slice();
            launch(&mut scratch, |t| {
                let (row, col) = diamond_cell(t, n, step);
                let noise = amplitude.hashed(worker_seed(seed, diamond_pass, t));
                diamond_value(cells, size, row, col, half, noise)
            });
        }
        let cells = grid.as_mut_slice();
        for (t, value) in scratch.into_iter().enumerate() {
            let (row, col) = diamond_cell(t, n, step);
            cells[row * size + col] = value;
        }

        let square_pass = level.index * 2 + 1;
        let mut scratch = device_alloc(2 * n * (n + 1), 0u8)?;
        {
            let cells = grid.as_slice();
            launch(&mut scratch, |t| {
                let (row, col) = square_cell(t, n, step);
                let noise = amplitude.hashed(worker_seed(seed, square_pass, t));
                square_value(cells, size, row, col, half, noise)
            });
        }
        let cells = grid.as_mut_slice();
        for (t, value) in scratch.into_iter().enumerate() {
            let (row, col) = square_cell(t, n, step);
            cells[row * size + col] = value;
        }
        Ok(())
    }
}

#[inline]
fn reduce(pass: Pass, plane: &[[u8; 3]], center: usize, offsets: &[isize]) -> [u8; 3] {
    let seed = pass.seed();
    offsets.iter().fold([seed; 3], |acc, &offset| {
        let rgb = plane[center.wrapping_add_signed(offset)];
        [
            pass.combine(acc[0], rgb[0]),
            pass.combine(acc[1], rgb[1]),
            pass.combine(acc[2], rgb[2]),
        ]
    })
}

impl Accelerator for HostAccelerator {
    fn name(&self) -> &str {
        "host"
    }

    fn diamond_square(&self, grid: &mut Grid, seed: u64, max_value: u32) -> Result<()> {
        let size = grid.size();
        if size < 2 || !(size - 1).is_power_of_two() {
            return Err(Error::Accelerator(format!(
                "grid side {} is not 2^n + 1",
                size
            )));
        }
        tracing::debug!(size, block = BLOCK_SIZE, "host diamond-square launch");
        for level in levels(size, max_value) {
            self.refine(grid, level, seed)?;
        }
        Ok(())
    }

    fn open_close(&self, job: &MorphologyJob<'_>) -> Result<Vec<u8>> {
        let expected = job.width * job.height * CHANNELS;
        if job.image.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: job.image.len(),
            });
        }
        let padding = Padding::new(job.width, job.height, job.element_width, job.element_height);
        let [first, second] = job.operation.passes();
        let table = |pass: Pass| match pass {
            Pass::Erosion => job.erosion,
            Pass::Dilation => job.dilation,
        };
        let (red, green, blue) = (job.order.red(), job.order.green(), job.order.blue());
        tracing::debug!(
            width = job.width,
            height = job.height,
            operation = ?job.operation,
            "host morphology launch"
        );

        let split = job.operation.split_sentinel();
        let mut source = device_alloc(padding.len(), [0u8; 3])?;
        launch(&mut source, |t| {
            let (row, col) = (t / padding.width, t % padding.width);
            if !padding.is_interior(row, col) {
                return [split; 3];
            }
            let px = ((row - padding.first_row) * job.width + col - padding.first_col) * CHANNELS;
            [job.image[px + red], job.image[px + green], job.image[px + blue]]
        });

        let ghost = job.operation.ghost_sentinel();
        let mut staged = device_alloc(padding.len(), [0u8; 3])?;
        {
            let source = &source;
            launch(&mut staged, |t| {
                let (row, col) = (t / padding.width, t % padding.width);
                if !padding.is_interior(row, col) {
                    return [ghost; 3];
                }
                reduce(first, source, t, table(first))
            });
        }

        // Second pass fused with composition: one thread per output pixel.
        let mut output = device_alloc(expected, 0u8)?;
        let staged = &staged;
        output
            .par_chunks_exact_mut(CHANNELS)
            .with_min_len(BLOCK_SIZE)
            .enumerate()
            .for_each(|(t, px)| {
                let center = padding.padded_index(t / job.width, t % job.width);
                let [r, g, b] = reduce(second, staged, center, table(second));
                px.copy_from_slice(&[b, g, r, ALPHA]);
            });
        Ok(output)
    }
}
