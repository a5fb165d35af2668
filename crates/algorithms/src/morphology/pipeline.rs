//! Split, pad, erode/dilate and compose, one row at a time
//!
//! Every stage writes whole rows of its output plane and reads only planes
//! produced by earlier stages, so a stage can hand its rows to workers in
//! any order. The CPU engines differ only in the [`RowScheduler`] they run
//! the stages on.

use std::ops::Range;

use hpcimg_core::raster::{ALPHA, CHANNELS};
use hpcimg_core::{try_filled, ChannelBuffer, ChannelOrder, PixelBuffer, Result};
use hpcimg_parallel::WorkerPool;

use super::offsets::OffsetTable;
use super::{Operation, Pass};

/// Geometry of the ghost-padded planes for one image and element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Padding {
    /// Padded plane width
    pub width: usize,
    /// Padded plane height
    pub height: usize,
    /// Ghost rows above the image
    pub first_row: usize,
    /// Ghost columns left of the image
    pub first_col: usize,
    pub image_width: usize,
    pub image_height: usize,
}

impl Padding {
    pub fn new(image_width: usize, image_height: usize, element_width: usize, element_height: usize) -> Self {
        Self {
            width: image_width + element_width - 1,
            height: image_height + element_height - 1,
            first_row: (element_height - 1) / 2,
            first_col: (element_width - 1) / 2,
            image_width,
            image_height,
        }
    }

    /// Samples per padded plane
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Padded rows covered by the image
    pub fn interior_rows(&self) -> Range<usize> {
        self.first_row..self.first_row + self.image_height
    }

    /// Padded columns covered by the image
    pub fn interior_cols(&self) -> Range<usize> {
        self.first_col..self.first_col + self.image_width
    }

    #[inline]
    pub fn is_interior(&self, row: usize, col: usize) -> bool {
        self.interior_rows().contains(&row) && self.interior_cols().contains(&col)
    }

    /// Padded index of image pixel `(y, x)`
    #[inline]
    pub fn padded_index(&self, y: usize, x: usize) -> usize {
        (y + self.first_row) * self.width + x + self.first_col
    }
}

/// Runs a row kernel over every row of a buffer
pub(crate) trait RowScheduler {
    fn rows<F>(&self, data: &mut [u8], width: usize, kernel: F)
    where
        F: Fn(usize, &mut [u8]) + Sync + Send;
}

/// Rows in program order on the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct InOrder;

impl RowScheduler for InOrder {
    fn rows<F>(&self, data: &mut [u8], width: usize, kernel: F)
    where
        F: Fn(usize, &mut [u8]) + Sync + Send,
    {
        for (row, chunk) in data.chunks_mut(width).enumerate() {
            kernel(row, chunk);
        }
    }
}

impl RowScheduler for WorkerPool {
    fn rows<F>(&self, data: &mut [u8], width: usize, kernel: F)
    where
        F: Fn(usize, &mut [u8]) + Sync + Send,
    {
        self.for_each_row(data, width, kernel);
    }
}

/// A validated input with its precomputed tables
#[derive(Debug, Clone, Copy)]
pub(crate) struct Job<'a> {
    pub image: &'a PixelBuffer,
    pub padding: Padding,
    pub erosion: &'a OffsetTable,
    pub dilation: &'a OffsetTable,
}

impl Job<'_> {
    pub fn table(&self, pass: Pass) -> &[isize] {
        match pass {
            Pass::Erosion => self.erosion.as_slice(),
            Pass::Dilation => self.dilation.as_slice(),
        }
    }
}

/// Copy one channel of the source into padded `row`, ghost cells set to `ghost`
pub(crate) fn split_row(job: &Job<'_>, channel: usize, ghost: u8, row: usize, out: &mut [u8]) {
    let padding = &job.padding;
    if !padding.interior_rows().contains(&row) {
        out.fill(ghost);
        return;
    }
    let cols = padding.interior_cols();
    out[..cols.start].fill(ghost);
    out[cols.end..].fill(ghost);

    let stride = padding.image_width * CHANNELS;
    let y = row - padding.first_row;
    let source = &job.image.as_raw()[y * stride..(y + 1) * stride];
    for (sample, px) in out[cols].iter_mut().zip(source.chunks_exact(CHANNELS)) {
        *sample = px[channel];
    }
}

/// Set the ghost cells of padded `row` to `value`, leaving the interior alone
pub(crate) fn fill_ghost_row(padding: &Padding, value: u8, row: usize, out: &mut [u8]) {
    if !padding.interior_rows().contains(&row) {
        out.fill(value);
        return;
    }
    let cols = padding.interior_cols();
    out[..cols.start].fill(value);
    out[cols.end..].fill(value);
}

/// Erode or dilate the interior of padded `row` from `input`
pub(crate) fn pass_row(pass: Pass, input: &[u8], padding: &Padding, offsets: &[isize], row: usize, out: &mut [u8]) {
    if !padding.interior_rows().contains(&row) {
        return;
    }
    let base = row * padding.width;
    for col in padding.interior_cols() {
        out[col] = pass.reduce(input, base + col, offsets);
    }
}

/// Interleave image row `y` of the three padded planes as B, G, R, A
pub(crate) fn compose_row(padding: &Padding, [red, green, blue]: [&[u8]; 3], y: usize, out: &mut [u8]) {
    let base = padding.padded_index(y, 0);
    for (x, px) in out.chunks_exact_mut(CHANNELS).enumerate() {
        let i = base + x;
        px.copy_from_slice(&[blue[i], green[i], red[i], ALPHA]);
    }
}

/// Whole opening or closing on `scheduler`
pub(crate) fn run<S: RowScheduler>(scheduler: &S, job: &Job<'_>, operation: Operation) -> Result<PixelBuffer> {
    let padding = job.padding;
    let order = job.image.order();
    let channels = [order.red(), order.green(), order.blue()];
    let [first, second] = operation.passes();

    let mut planes = [
        ChannelBuffer::try_filled(padding.width, padding.height, 0)?,
        ChannelBuffer::try_filled(padding.width, padding.height, 0)?,
        ChannelBuffer::try_filled(padding.width, padding.height, 0)?,
    ];
    let mut staged = [
        ChannelBuffer::try_filled(padding.width, padding.height, 0)?,
        ChannelBuffer::try_filled(padding.width, padding.height, 0)?,
        ChannelBuffer::try_filled(padding.width, padding.height, 0)?,
    ];

    let split = operation.split_sentinel();
    for (plane, &channel) in planes.iter_mut().zip(&channels) {
        scheduler.rows(plane.as_mut_slice(), padding.width, |row, out| {
            split_row(job, channel, split, row, out)
        });
    }

    let ghost = operation.ghost_sentinel();
    for plane in staged.iter_mut() {
        scheduler.rows(plane.as_mut_slice(), padding.width, |row, out| {
            fill_ghost_row(&padding, ghost, row, out)
        });
    }
    tracing::trace!(?operation, width = padding.width, height = padding.height, "planes split");

    // The second pass writes back over the split plane; only its interior is
    // read after that.
    for (plane, stage) in planes.iter_mut().zip(staged.iter_mut()) {
        let input = plane.as_slice();
        scheduler.rows(stage.as_mut_slice(), padding.width, |row, out| {
            pass_row(first, input, &padding, job.table(first), row, out)
        });
        let input = stage.as_slice();
        scheduler.rows(plane.as_mut_slice(), padding.width, |row, out| {
            pass_row(second, input, &padding, job.table(second), row, out)
        });
    }

    let stride = padding.image_width * CHANNELS;
    let mut output = try_filled(stride * padding.image_height, 0)?;
    let [red, green, blue] = &planes;
    let sources = [red.as_slice(), green.as_slice(), blue.as_slice()];
    scheduler.rows(&mut output, stride, |y, out| compose_row(&padding, sources, y, out));

    PixelBuffer::from_raw(padding.image_width, padding.image_height, ChannelOrder::Bgra, output)
}
