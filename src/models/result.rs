//! Run and workload result models
//!
//! A run is timed once around the whole spawn + join phase; per-unit
//! outcomes are only logged, never aggregated into the report.

use std::time::{Duration, Instant};

use crate::config::WorkType;
use crate::util::units::format_seconds;

/// Outcome of one workload invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadReport {
    /// Workload that produced this report
    pub work_type: WorkType,
    /// Iterations actually completed (primes found, chase steps, durable writes)
    pub completed: usize,
    /// Value folded from the computed results so the work stays observable
    pub checksum: u64,
}

impl WorkloadReport {
    pub fn new(work_type: WorkType, completed: usize, checksum: u64) -> Self {
        Self {
            work_type,
            completed,
            checksum,
        }
    }
}

/// Start and end timestamps taken around the entire spawn + join phase
#[derive(Debug, Clone, Copy)]
pub struct TimingRecord {
    start: Instant,
    end: Option<Instant>,
}

impl TimingRecord {
    /// Start the clock
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            end: None,
        }
    }

    /// Stop the clock. Later calls keep the first end timestamp.
    pub fn stop(&mut self) {
        if self.end.is_none() {
            self.end = Some(Instant::now());
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.end.is_some()
    }

    /// Elapsed time between start and end, or up to now while still running
    pub fn elapsed(&self) -> Duration {
        let end = self.end.unwrap_or_else(Instant::now);
        end.saturating_duration_since(self.start)
    }
}

/// Result of one orchestrated run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Workload every unit executed
    pub work_type: WorkType,
    /// Number of execution contexts spawned
    pub count: usize,
    /// Wall-clock timing of the spawn + join phase
    pub timing: TimingRecord,
    /// Unit ids in the order they were reaped or joined
    pub completion_order: Vec<usize>,
    /// Units whose workload reported a failure
    pub failed_units: usize,
}

impl RunReport {
    pub fn elapsed(&self) -> Duration {
        self.timing.elapsed()
    }

    /// Completion line printed by the binaries
    pub fn summary(&self, noun: &str) -> String {
        format!(
            "[Manager] All {} {} finished. Total time: {} seconds.",
            self.count,
            noun,
            format_seconds(self.elapsed())
        )
    }
}
