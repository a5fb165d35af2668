//! Raw byte buffers the engines read from and write into

mod alloc;
mod channel;
mod grid;
mod pixel;

pub use alloc::try_filled;
pub use channel::ChannelBuffer;
pub use grid::{Grid, GridStatistics};
pub use pixel::{ChannelOrder, PixelBuffer, ALPHA, CHANNELS};
