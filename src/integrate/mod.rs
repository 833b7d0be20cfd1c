use std::f64::consts::PI;

use crate::error::{BatchError, Result};
use crate::job::{Job, JobResult};

/// The per-job unit of work a worker runs.
pub trait Computation: Send + Sync {
    fn evaluate(&self, job: &Job) -> Result<JobResult>;
}

/// Trapezoidal rule over `A * sin(2*pi*f*t)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trapezoid;

impl Trapezoid {
    fn sample(job: &Job, t: f64) -> f64 {
        job.amplitude() * (2.0 * PI * job.frequency() * t).sin()
    }
}

impl Computation for Trapezoid {
    fn evaluate(&self, job: &Job) -> Result<JobResult> {
        let ts = job.step();
        let mut integral = 0.0;

        // Sample points come from the index so a zero step still terminates
        for k in 1..=job.subdivisions() {
            let t = job.t0() + k as f64 * ts;
            integral += ts * (Self::sample(job, t) + Self::sample(job, t - ts)) / 2.0;
        }

        if !integral.is_finite() {
            return Err(BatchError::evaluation(format!(
                "integral over [{}, {}] is not finite",
                job.t0(),
                job.t1()
            )));
        }

        Ok(JobResult::new(integral))
    }
}

pub fn integrate(job: &Job) -> Result<JobResult> {
    Trapezoid.evaluate(job)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_amplitude_is_exactly_zero() {
        for n in [1, 7, 499] {
            let job = Job::new(0.0, 3.3, 0.25, 2.25, n).unwrap();
            assert_eq!(integrate(&job).unwrap().integral, 0.0);
        }
    }

    #[test]
    fn test_single_interval_zero_frequency() {
        let job = Job::new(1.0, 0.0, 0.0, 1.0, 1).unwrap();
        assert_eq!(integrate(&job).unwrap().integral, 0.0);
    }

    #[test]
    fn test_quarter_wave_matches_analytic() {
        // integral of sin(pi/2 * t) on [0, 1] is 2/pi
        let job = Job::new(1.0, 0.25, 0.0, 1.0, 1000).unwrap();
        let got = integrate(&job).unwrap().integral;
        assert!((got - 2.0 / PI).abs() < 1e-5, "got {got}");
    }

    #[test]
    fn test_full_period_cancels() {
        let job = Job::new(4.0, 1.0, 0.0, 1.0, 200).unwrap();
        assert!(integrate(&job).unwrap().integral.abs() < 1e-9);
    }

    #[test]
    fn test_empty_interval_terminates() {
        let job = Job::new(2.0, 1.0, 3.0, 3.0, 50).unwrap();
        assert_eq!(integrate(&job).unwrap().integral, 0.0);
    }
}
