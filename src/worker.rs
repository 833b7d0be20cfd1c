use std::time::Instant;

use tracing::debug;

use crate::error::Result;
use crate::integrate::Computation;
use crate::job::{Job, JobResult};
use crate::log::LogSink;

/// When a worker reports progress: every `step` finished jobs, where the step
/// is 1% of the partition. Partitions under 100 jobs report after every job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSchedule {
    total: usize,
    step: usize,
}

impl ProgressSchedule {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            step: (total / 100).max(1),
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Percentage to report once `processed` jobs are done, if any.
    pub fn checkpoint(&self, processed: usize) -> Option<f64> {
        if self.total == 0 || processed == 0 || processed % self.step != 0 {
            return None;
        }
        Some(processed as f64 / self.total as f64 * 100.0)
    }
}

/// Run one partition to completion, in order, on the calling thread.
pub fn execute(
    partition: &[Job],
    worker_id: usize,
    computation: &dyn Computation,
    log: &dyn LogSink,
) -> Result<Vec<JobResult>> {
    let start = Instant::now();
    let schedule = ProgressSchedule::new(partition.len());
    let mut results = Vec::with_capacity(partition.len());

    log.emit(&format!(
        "worker {} starting up with {} jobs",
        worker_id,
        partition.len()
    ));

    for (i, job) in partition.iter().enumerate() {
        let result = computation
            .evaluate(job)
            .map_err(|e| e.in_worker(worker_id, i))?;
        results.push(result);
        log.job_finished();

        if let Some(pct) = schedule.checkpoint(i + 1) {
            log.emit(&format!("worker {} is {:.1}% complete", worker_id, pct));
        }
    }

    debug!(
        worker = worker_id,
        jobs = results.len(),
        "partition finished in {:.2?}",
        start.elapsed()
    );

    Ok(results)
}
