//! forkbench - process vs thread fan-out benchmark
//!
//! Runs the same synthetic workload (CPU, memory latency or durable storage
//! writes) across N execution contexts, created either by forking processes
//! or by spawning threads, and reports the wall-clock time until all of them
//! have finished.

use thiserror::Error;

pub mod bench;
pub mod cli;
pub mod config;
pub mod io;
pub mod models;
pub mod util;
pub mod workload;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum BenchError {
    /// Bad command line (wrong arity, unknown type, count out of range)
    #[error("usage error: {0}")]
    Usage(String),

    /// Run configuration failed validation
    #[error("configuration error: {0}")]
    Config(String),

    /// A workload buffer could not be allocated
    #[error("allocation failed: {0}")]
    Allocation(String),

    /// The OS refused to create an execution context
    #[error("failed to spawn {kind} #{index}: {source}")]
    Spawn {
        kind: &'static str,
        index: usize,
        source: std::io::Error,
    },

    /// Waiting for a child process failed for a reason other than EINTR
    #[error("wait failed: {0}")]
    Wait(std::io::Error),

    /// Temporary file could not be created
    #[error("temporary file error: {0}")]
    TempFile(String),

    /// A unit of work failed inside its execution context
    #[error("worker error: {0}")]
    Worker(String),
}

impl BenchError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        if self.is_usage() {
            2
        } else {
            1
        }
    }

    /// Whether the error was detected before any unit was configured
    pub fn is_usage(&self) -> bool {
        matches!(self, BenchError::Usage(_) | BenchError::Config(_))
    }
}

/// Result type alias for forkbench operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Fixed per-unit iteration budget, identical for every unit in a run
pub const LOOP_COUNT: usize = 8000;
/// Smallest accepted replica count
pub const MIN_UNITS: usize = 1;
/// Largest accepted replica count
pub const MAX_UNITS: usize = 100;
/// First candidate examined by the prime search
pub const PRIME_SEARCH_START: u64 = 10_000;
/// Elements in the pointer-chase buffer (64 MiB of `u32`)
pub const CHASE_ELEMENTS: usize = 16 * 1024 * 1024;
/// Chase steps per unit of iteration budget
pub const CHASE_STEPS_PER_ITERATION: usize = 10_000;
/// Prefix of the files written by the I/O workload
pub const TEMP_FILE_PREFIX: &str = "io_test_";
