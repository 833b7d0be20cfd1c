mod synthetic;

pub use synthetic::{SyntheticJobs, DEFAULT_JOB_COUNT};

use memmap2::{Mmap, MmapOptions};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{BatchError, Result};
use crate::job::{Job, JobResult};

/// Where a run gets its jobs from.
pub trait JobSource {
    fn generate(&mut self) -> Result<Vec<Job>>;
}

/// Where a run's ordered results end up.
pub trait OutputSink {
    fn write(&mut self, results: &[JobResult]) -> Result<()>;
}

/// An in-memory job list, handed over once.
impl JobSource for Vec<Job> {
    fn generate(&mut self) -> Result<Vec<Job>> {
        Ok(std::mem::take(self))
    }
}

impl OutputSink for Vec<JobResult> {
    fn write(&mut self, results: &[JobResult]) -> Result<()> {
        self.extend_from_slice(results);
        Ok(())
    }
}

/// Text job file, one `A f t0 t1 N` job per line.
pub struct JobFile {
    path: PathBuf,
    mmap: Option<Mmap>,
}

impl JobFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| BatchError::io(&path, e))?;
        let file_size = file.metadata().map_err(|e| BatchError::io(&path, e))?.len();

        // Zero-length maps are rejected on some platforms
        let mmap = if file_size == 0 {
            None
        } else {
            let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(|e| BatchError::io(&path, e))?;
            Some(mmap)
        };

        Ok(Self { path, mmap })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }
}

impl JobSource for JobFile {
    fn generate(&mut self) -> Result<Vec<Job>> {
        let jobs = parse_jobs(self.bytes())?;
        info!(path = %self.path.display(), jobs = jobs.len(), "loaded job file");
        Ok(jobs)
    }
}

pub fn parse_jobs(bytes: &[u8]) -> Result<Vec<Job>> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        let line = bytes[..e.valid_up_to()].iter().filter(|&&b| b == b'\n').count() + 1;
        BatchError::parse(line, "invalid UTF-8")
    })?;

    let mut jobs = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(BatchError::parse(
                line,
                format!("expected 5 fields (A f t0 t1 N), got {}", fields.len()),
            ));
        }

        let mut params = [0.0f64; 4];
        for (slot, (name, field)) in params
            .iter_mut()
            .zip(["A", "f", "t0", "t1"].into_iter().zip(&fields))
        {
            *slot = field
                .parse()
                .map_err(|_| BatchError::parse(line, format!("{name}: '{field}' is not a number")))?;
        }

        let subdivisions: u32 = fields[4]
            .parse()
            .map_err(|_| BatchError::parse(line, format!("N: '{}' is not a count", fields[4])))?;

        let [a, f, t0, t1] = params;
        let job = Job::new(a, f, t0, t1, subdivisions)
            .map_err(|e| BatchError::invalid_job(jobs.len(), format!("line {line}: {e}")))?;
        jobs.push(job);
    }

    Ok(jobs)
}

/// Line-per-result output file.
///
/// The file is created (or truncated) only when results arrive, so a run
/// that fails during computation leaves any previous output untouched.
pub struct ResultFile {
    path: PathBuf,
    results_written: usize,
}

impl ResultFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            results_written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn results_written(&self) -> usize {
        self.results_written
    }
}

impl OutputSink for ResultFile {
    fn write(&mut self, results: &[JobResult]) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| BatchError::io(&self.path, e))?;
        let mut writer = BufWriter::with_capacity(1024 * 1024, file); // 1MB buffer

        for result in results {
            writeln!(writer, "{}", result.integral).map_err(|e| BatchError::io(&self.path, e))?;
        }
        writer.flush().map_err(|e| BatchError::io(&self.path, e))?;

        self.results_written = results.len();
        debug!(path = %self.path.display(), results = self.results_written, "results written");
        Ok(())
    }
}
