use std::num::NonZeroUsize;

use crate::error::{BatchError, Result};

/// Worker cap when the count comes from the CPU count.
pub const MAX_DEFAULT_WORKERS: usize = 8;

/// Ordered per-worker queues; the index is the worker id.
pub type PartitionSet<T> = Vec<Vec<T>>;

pub fn default_workers() -> usize {
    num_cpus::get().clamp(1, MAX_DEFAULT_WORKERS) // Cap at 8 for (probably) diminishing returns
}

/// Static round-robin assignment of jobs to workers.
#[derive(Debug, Clone, Copy)]
pub struct Partitioner {
    workers: NonZeroUsize,
}

impl Partitioner {
    pub fn new(workers: usize) -> Result<Self> {
        let workers = NonZeroUsize::new(workers)
            .ok_or_else(|| BatchError::config("worker count must be at least 1"))?;
        Ok(Self { workers })
    }

    pub fn num_workers(&self) -> usize {
        self.workers.get()
    }

    pub fn worker_for(&self, job_index: usize) -> usize {
        job_index % self.workers
    }

    /// Job indices per worker.
    pub fn assign(&self, total_jobs: usize) -> PartitionSet<usize> {
        self.split((0..total_jobs).collect())
    }

    /// Move each item into the queue of the worker that owns its index.
    pub fn split<T>(&self, items: Vec<T>) -> PartitionSet<T> {
        let n = self.num_workers();
        let per_worker = items.len() / n + 1;
        let mut parts: PartitionSet<T> = (0..n).map(|_| Vec::with_capacity(per_worker)).collect();

        for (i, item) in items.into_iter().enumerate() {
            parts[self.worker_for(i)].push(item);
        }

        parts
    }

    /// Flatten in worker-index order, then queue order.
    pub fn gather<T>(parts: PartitionSet<T>) -> Vec<T> {
        parts.into_iter().flatten().collect()
    }

    /// Undo [`Partitioner::split`], restoring the original item order.
    pub fn interleave<T>(&self, parts: PartitionSet<T>) -> Vec<T> {
        let total = parts.iter().map(Vec::len).sum();
        let mut queues: Vec<_> = parts.into_iter().map(Vec::into_iter).collect();
        let mut out = Vec::with_capacity(total);

        for i in 0..total {
            match queues.get_mut(self.worker_for(i)).and_then(Iterator::next) {
                Some(item) => out.push(item),
                None => break,
            }
        }

        out
    }
}
