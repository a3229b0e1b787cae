//! Structured error types for aggregation jobs
//!
//! Failures here are coarse by design: a job either runs to completion or
//! surfaces the first worker-level failure it observed. After a failure the
//! output store is partial and callers must not read meaning into it.

use thiserror::Error;

/// Main error type for aggregation jobs.
#[derive(Debug, Error)]
pub enum KeyfoldError {
    /// A job was asked to run with zero workers.
    #[error("invalid worker count {requested}: a job needs at least one worker")]
    InvalidWorkerCount { requested: usize },

    /// The OS refused to start a worker thread.
    #[error("failed to spawn worker {worker}")]
    WorkerSpawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    /// A worker panicked while mapping or combining. Records after the panic
    /// point in that worker's range were never processed.
    #[error("worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },
}

/// Result type alias for aggregation operations.
pub type Result<T> = std::result::Result<T, KeyfoldError>;
