//! Run configuration
//!
//! Holds the work-type tag and replica count derived once from the command
//! line, and validates them before any unit of work is configured.

use std::fmt;

use clap::ValueEnum;

use crate::{BenchError, Result, LOOP_COUNT, MAX_UNITS, MIN_UNITS};

pub mod cli;

pub use cli::CliArgs;

/// Which hardware subsystem a workload stresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum WorkType {
    /// Trial-division prime search (ALU bound)
    #[value(name = "cpu")]
    Cpu,
    /// Random pointer chase over a large buffer (memory latency bound)
    #[value(name = "mem")]
    Mem,
    /// Small writes each followed by fsync (storage bound)
    #[value(name = "io")]
    Io,
}

impl WorkType {
    /// Command-line token for this work type
    pub fn token(&self) -> &'static str {
        match self {
            WorkType::Cpu => "cpu",
            WorkType::Mem => "mem",
            WorkType::Io => "io",
        }
    }

    /// Get a human-readable description of the work type
    pub fn description(&self) -> &'static str {
        match self {
            WorkType::Cpu => "CPU-bound prime search",
            WorkType::Mem => "Memory-bound pointer chase",
            WorkType::Io => "I/O-bound synchronous writes",
        }
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Immutable description of one benchmark run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    /// Workload every unit executes
    pub work_type: WorkType,
    /// Number of execution contexts to spawn
    pub count: usize,
    /// Iteration budget handed to every unit
    pub iterations: usize,
}

impl RunConfiguration {
    /// Create a configuration using the fixed iteration budget
    pub fn new(work_type: WorkType, count: usize) -> Self {
        Self {
            work_type,
            count,
            iterations: LOOP_COUNT,
        }
    }

    /// Override the per-unit iteration budget
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !(MIN_UNITS..=MAX_UNITS).contains(&self.count) {
            return Err(BenchError::Config(format!(
                "Count must be between {} and {} (got {})",
                MIN_UNITS, MAX_UNITS, self.count
            )));
        }

        if self.iterations == 0 {
            return Err(BenchError::Config(
                "Iteration budget must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
