use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::ThreadPoolBuilder;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::integrate::{Computation, Trapezoid};
use crate::io::{JobSource, OutputSink};
use crate::job::{Job, JobResult};
use crate::log::{ConsoleLog, LogSink};
use crate::partition::Partitioner;
use crate::worker;

#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub jobs: usize,
    pub workers: usize,
    pub elapsed: Duration,
}

/// Runs a batch: generate, partition, execute on a fixed pool, gather, write.
pub struct Coordinator {
    partitioner: Partitioner,
    computation: Arc<dyn Computation>,
    log: Arc<dyn LogSink>,
}

impl Coordinator {
    pub fn new(workers: usize) -> Result<Self> {
        Ok(Self {
            partitioner: Partitioner::new(workers)?,
            computation: Arc::new(Trapezoid),
            log: Arc::new(ConsoleLog::stdout()),
        })
    }

    pub fn with_computation(mut self, computation: Arc<dyn Computation>) -> Self {
        self.computation = computation;
        self
    }

    pub fn with_log(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = log;
        self
    }

    pub fn num_workers(&self) -> usize {
        self.partitioner.num_workers()
    }

    /// Compute every job and hand the results to `sink` in worker-index order.
    ///
    /// All workers run to completion. If any failed, the error of the
    /// lowest-indexed failing worker is returned and `sink` is not written.
    pub fn run(&self, source: &mut dyn JobSource, sink: &mut dyn OutputSink) -> Result<RunSummary> {
        let start = Instant::now();
        let workers = self.num_workers();

        let jobs = source.generate()?;
        let total = jobs.len();
        let partitions = self.partitioner.split(jobs);
        self.log.run_started(total);
        info!(jobs = total, workers, "partitioned jobs");

        let results = self.execute_all(&partitions)?;
        sink.write(&results)?;

        let elapsed = start.elapsed();
        info!(results = results.len(), "run finished in {:.2?}", elapsed);

        Ok(RunSummary {
            jobs: total,
            workers,
            elapsed,
        })
    }

    fn execute_all(&self, partitions: &[Vec<Job>]) -> Result<Vec<JobResult>> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.num_workers())
            .thread_name(|i| format!("parbatch-worker-{i}"))
            .build()?;

        let computation = self.computation.as_ref();
        let log = self.log.as_ref();

        // One call per pool thread; the thread index is the worker id
        let outcomes: Vec<Result<Vec<JobResult>>> = pool.broadcast(|ctx| {
            let worker_id = ctx.index();
            worker::execute(&partitions[worker_id], worker_id, computation, log)
        });
        debug!(workers = outcomes.len(), "all workers joined");

        let failed = outcomes.iter().filter(|o| o.is_err()).count();
        if failed > 0 {
            warn!(failed, "workers reported errors");
        }

        let mut per_worker = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            per_worker.push(outcome?);
        }

        Ok(Partitioner::gather(per_worker))
    }
}
