use thiserror::Error;

/// Why a set of job parameters was refused.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JobParamError {
    #[error("subdivision count must be at least 1")]
    ZeroSubdivisions,

    #[error("{0} is not a finite number")]
    NonFinite(&'static str),

    #[error("interval end {t1} lies before start {t0}")]
    ReversedInterval { t0: f64, t1: f64 },

    #[error("amplitude {amplitude} over an interval of {width} overflows the integral")]
    Unbounded { amplitude: f64, width: f64 },
}

/// One integration problem: `A * sin(2*pi*f*t)` over `[t0, t1]` in `N` steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Job {
    amplitude: f64,
    frequency: f64,
    t0: f64,
    t1: f64,
    subdivisions: u32,
    step: f64,
}

impl Job {
    pub fn new(
        amplitude: f64,
        frequency: f64,
        t0: f64,
        t1: f64,
        subdivisions: u32,
    ) -> Result<Self, JobParamError> {
        for (name, value) in [
            ("amplitude", amplitude),
            ("frequency", frequency),
            ("t0", t0),
            ("t1", t1),
        ] {
            if !value.is_finite() {
                return Err(JobParamError::NonFinite(name));
            }
        }

        if subdivisions == 0 {
            return Err(JobParamError::ZeroSubdivisions);
        }

        if t1 < t0 {
            return Err(JobParamError::ReversedInterval { t0, t1 });
        }

        // |integral| <= |A| * (t1 - t0); every partial sum stays below this bound
        let width = t1 - t0;
        if !(2.0 * amplitude.abs() * width.max(1.0)).is_finite() {
            return Err(JobParamError::Unbounded { amplitude, width });
        }

        Ok(Self {
            amplitude,
            frequency,
            t0,
            t1,
            subdivisions,
            step: (t1 - t0) / subdivisions as f64,
        })
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn t0(&self) -> f64 {
        self.t0
    }

    pub fn t1(&self) -> f64 {
        self.t1
    }

    pub fn subdivisions(&self) -> u32 {
        self.subdivisions
    }

    /// Step size `Ts`, fixed when the job was built.
    pub fn step(&self) -> f64 {
        self.step
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JobResult {
    pub integral: f64,
}

impl JobResult {
    pub fn new(integral: f64) -> Self {
        Self { integral }
    }
}
