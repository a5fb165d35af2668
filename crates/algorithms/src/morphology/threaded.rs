//! Opening and closing with every stage partitioned by row

use hpcimg_core::{PixelBuffer, Result};
use hpcimg_parallel::{ExecutionStrategy, WorkerPool};

use super::pipeline;
use super::{MorphologyContext, OpeningClosing, Operation};

/// Shared-memory opening and closing.
///
/// Split, ghost fill, each channel's two passes and composition each run
/// as one data-parallel stage; the pool joins between stages because each
/// stage reads what the previous one wrote.
#[derive(Debug)]
pub struct ThreadedMorphology<'a> {
    context: MorphologyContext<'a>,
    pool: WorkerPool,
}

impl<'a> ThreadedMorphology<'a> {
    /// Engine with its own pool of `threads` workers (`0` = all cores)
    pub fn new(context: MorphologyContext<'a>, threads: usize) -> Result<Self> {
        Ok(Self::with_pool(context, WorkerPool::new(threads)?))
    }

    pub fn with_pool(context: MorphologyContext<'a>, pool: WorkerPool) -> Self {
        Self { context, pool }
    }

    pub fn threads(&self) -> usize {
        self.pool.threads()
    }
}

impl OpeningClosing for ThreadedMorphology<'_> {
    fn execute(&self, operation: Operation) -> Result<PixelBuffer> {
        let job = self.context.job()?;
        tracing::debug!(
            width = job.image.width(),
            height = job.image.height(),
            threads = self.threads(),
            ?operation,
            "threaded morphology"
        );
        pipeline::run(&self.pool, &job, operation)
    }

    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Threaded(self.threads())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::{SequentialMorphology, StructuringElement};
    use hpcimg_core::{ChannelOrder, Error};

    fn noisy(width: usize, height: usize) -> PixelBuffer {
        let data = (0..width * height * 4)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 7) as u8)
            .collect();
        PixelBuffer::from_raw(width, height, ChannelOrder::Rgba, data).unwrap()
    }

    #[test]
    fn test_threaded_matches_sequential() {
        let image = noisy(23, 17);
        for element in [
            StructuringElement::square(3).unwrap(),
            StructuringElement::cross(5).unwrap(),
            StructuringElement::disk(7).unwrap(),
        ] {
            let context = MorphologyContext::new(Some(&image), Some(element));
            let threaded = ThreadedMorphology::new(context.clone(), 4).unwrap();
            let sequential = SequentialMorphology::new(context);
            assert_eq!(threaded.opening().unwrap(), sequential.opening().unwrap());
            assert_eq!(threaded.closing().unwrap(), sequential.closing().unwrap());
        }
    }

    #[test]
    fn test_threaded_missing_element() {
        let image = noisy(4, 4);
        let engine = ThreadedMorphology::new(MorphologyContext::new(Some(&image), None), 2).unwrap();
        assert!(matches!(engine.closing(), Err(Error::MissingInput(_))));
        assert_eq!(engine.strategy(), ExecutionStrategy::Threaded(2));
    }
}
