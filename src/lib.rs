pub mod coordinator;
pub mod error;
pub mod integrate;
pub mod io;
pub mod job;
pub mod log;
pub mod partition;
pub mod worker;

pub use coordinator::{Coordinator, RunSummary};
pub use error::{BatchError, Result};
pub use job::{Job, JobResult};
