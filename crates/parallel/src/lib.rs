//! # hpcimg Parallel
//!
//! Execution strategies for the hpcimg engines.
//!
//! This crate provides:
//! - `ExecutionStrategy`: the caller-facing choice between sequential,
//!   threaded and accelerator-offloaded execution
//! - `WorkerPool`: a fixed-size fork-join pool that lives for one call
//! - Per-worker seed derivation so workers never share generator state

pub mod seed;
pub mod strategy;

pub use seed::worker_seed;
pub use strategy::{available_threads, ExecutionStrategy, WorkerPool};
