//! Execution strategies and the fork-join worker pool

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use hpcimg_core::{Error, Result};
use rayon::prelude::*;

/// How an engine runs its passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Single-threaded, program order
    #[default]
    Sequential,
    /// Shared-memory workers; `0` uses every available core
    Threaded(usize),
    /// Handed to an accelerator collaborator as one synchronous call
    Offloaded,
}

impl ExecutionStrategy {
    /// Build a strategy from its name and a worker count.
    ///
    /// The worker count is only consulted for the threaded strategy.
    pub fn parse(name: &str, threads: usize) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "sequential" | "serial" => Ok(ExecutionStrategy::Sequential),
            "threaded" | "parallel" | "openmp" => Ok(ExecutionStrategy::Threaded(threads)),
            "offloaded" | "cuda" | "gpu" => Ok(ExecutionStrategy::Offloaded),
            _ => Err(Error::InvalidParameter {
                name: "strategy",
                value: name.to_string(),
                reason: "use sequential, threaded or offloaded".to_string(),
            }),
        }
    }

    /// Worker count requested by the threaded strategy
    pub fn threads(&self) -> Option<usize> {
        match self {
            ExecutionStrategy::Threaded(n) => Some(*n),
            _ => None,
        }
    }
}

impl FromStr for ExecutionStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, 0)
    }
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStrategy::Sequential => write!(f, "sequential"),
            ExecutionStrategy::Threaded(0) => write!(f, "threaded (all cores)"),
            ExecutionStrategy::Threaded(n) => write!(f, "threaded ({} workers)", n),
            ExecutionStrategy::Offloaded => write!(f, "offloaded"),
        }
    }
}

/// Fixed-size pool of workers owned by a single engine call.
///
/// Every method blocks until all workers are done, so returning from one
/// call is the barrier before the next pass starts.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    /// Spawn `threads` workers (`0` = one per available core)
    pub fn new(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("hpcimg-worker-{}", i))
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;
        tracing::debug!(threads = pool.current_num_threads(), "worker pool ready");
        Ok(Self { pool })
    }

    /// Number of workers in the pool
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `op` inside the pool so rayon iterators use its workers
    pub fn install<R, OP>(&self, op: OP) -> R
    where
        R: Send,
        OP: FnOnce() -> R + Send,
    {
        self.pool.install(op)
    }

    /// Map each listed row through `f`, partitioned across workers.
    ///
    /// `init` builds per-worker state (typically a random generator) and
    /// receives a stream number unique within this call. Results come back
    /// in the order of `rows`.
    pub fn map_rows<T, S, I, F>(&self, rows: &[usize], init: I, f: F) -> Vec<T>
    where
        T: Send,
        I: Fn(usize) -> S + Sync + Send,
        F: Fn(&mut S, usize) -> T + Sync + Send,
    {
        let streams = AtomicUsize::new(0);
        self.pool.install(|| {
            rows.par_iter()
                .map_init(
                    || init(streams.fetch_add(1, Ordering::Relaxed)),
                    |state, &row| f(state, row),
                )
                .collect()
        })
    }

    /// Hand every `width`-long row of `data` to `f`, partitioned across workers
    pub fn for_each_row<F>(&self, data: &mut [u8], width: usize, f: F)
    where
        F: Fn(usize, &mut [u8]) + Sync + Send,
    {
        self.pool.install(|| {
            data.par_chunks_mut(width)
                .enumerate()
                .for_each(|(row, chunk)| f(row, chunk));
        });
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.threads())
            .finish()
    }
}

/// Number of workers the global pool would use
pub fn available_threads() -> usize {
    rayon::current_num_threads()
}
