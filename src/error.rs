//! Error types shared by every stage of a batch run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    /// Invalid run configuration (zero workers and the like)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A job whose parameters cannot be integrated
    #[error("Invalid job #{index}: {message}")]
    InvalidJob { index: usize, message: String },

    /// A job that failed while a worker was evaluating it
    #[error("Worker {worker} failed on job {position} of its partition: {message}")]
    Computation {
        worker: usize,
        position: usize,
        message: String,
    },

    /// A job evaluation failure before it is tied to a worker
    #[error("Evaluation failed: {message}")]
    Evaluation { message: String },

    /// Malformed line in a job file
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, BatchError>;

impl BatchError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_job(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidJob {
            index,
            message: message.into(),
        }
    }

    /// Evaluation failure; workers attach their id with [`BatchError::in_worker`].
    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::Evaluation {
            message: message.into(),
        }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the failing worker and position to an evaluation failure.
    pub fn in_worker(self, worker: usize, position: usize) -> Self {
        match self {
            Self::Evaluation { message } => Self::Computation {
                worker,
                position,
                message,
            },
            other => Self::Computation {
                worker,
                position,
                message: other.to_string(),
            },
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}
