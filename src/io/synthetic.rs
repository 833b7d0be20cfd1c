use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::JobSource;
use crate::error::{BatchError, Result};
use crate::job::Job;

pub const DEFAULT_JOB_COUNT: usize = 10_000;

/// Random jobs, reproducible when seeded.
#[derive(Debug, Clone)]
pub struct SyntheticJobs {
    count: usize,
    seed: Option<u64>,
}

impl SyntheticJobs {
    pub fn new(count: usize, seed: Option<u64>) -> Self {
        Self { count, seed }
    }

    pub fn seeded(count: usize, seed: u64) -> Self {
        Self::new(count, Some(seed))
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Default for SyntheticJobs {
    fn default() -> Self {
        Self::new(DEFAULT_JOB_COUNT, None)
    }
}

impl JobSource for SyntheticJobs {
    fn generate(&mut self) -> Result<Vec<Job>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let jobs = (0..self.count)
            .map(|i| {
                let amplitude = rng.random_range(0.0..10.0);
                let frequency = rng.random_range(0.0..10.0);
                let t0: f64 = rng.random_range(0.0..10.0);
                let t1 = t0 + rng.random_range(0..3u32) as f64;
                let subdivisions = rng.random_range(1..500u32);
                Job::new(amplitude, frequency, t0, t1, subdivisions)
                    .map_err(|e| BatchError::invalid_job(i, e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(jobs = jobs.len(), seed = ?self.seed, "generated synthetic jobs");
        Ok(jobs)
    }
}
