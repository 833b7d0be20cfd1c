//! Progress channel shared by all workers.
//!
//! Every sink serializes its writes, so a message always lands as one
//! complete line no matter how many workers emit at once.

use std::io::{self, Stdout, Write};
use std::sync::{Mutex, PoisonError};

use indicatif::{ProgressBar, ProgressStyle};

pub trait LogSink: Send + Sync {
    fn emit(&self, message: &str);

    /// Called once per run, after the jobs are known.
    fn run_started(&self, _total_jobs: usize) {}

    /// Called once per finished job.
    fn job_finished(&self) {}
}

/// Line-per-message writer behind a mutex.
pub struct ConsoleLog<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleLog<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> LogSink for ConsoleLog<W> {
    fn emit(&self, message: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        // Progress output is advisory; a closed stdout must not fail the run
        let _ = writeln!(out, "{message}").and_then(|_| out.flush());
    }
}

/// Prints messages above an indicatif bar that counts finished jobs.
pub struct BarLog {
    bar: ProgressBar,
    lock: Mutex<()>,
}

impl BarLog {
    pub fn new() -> Self {
        Self {
            bar: create_progress_bar(0),
            lock: Mutex::new(()),
        }
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

impl Default for BarLog {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for BarLog {
    fn run_started(&self, total_jobs: usize) {
        self.bar.set_length(total_jobs as u64);
    }

    fn emit(&self, message: &str) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.bar.println(message);
    }

    fn job_finished(&self) {
        self.bar.inc(1);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentLog;

impl LogSink for SilentLog {
    fn emit(&self, _message: &str) {}
}

pub fn create_progress_bar(total_jobs: usize) -> ProgressBar {
    let pb = ProgressBar::new(total_jobs as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} jobs ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}
