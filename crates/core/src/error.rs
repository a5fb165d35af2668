//! Error types for hpcimg

use thiserror::Error;

/// Main error type for hpcimg operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Allocation of {bytes} bytes failed")]
    Allocation { bytes: usize },

    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    #[error("Invalid buffer dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in buffer of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Worker pool error: {0}")]
    ThreadPool(String),

    #[error("Accelerator error: {0}")]
    Accelerator(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for hpcimg operations
pub type Result<T> = std::result::Result<T, Error>;
