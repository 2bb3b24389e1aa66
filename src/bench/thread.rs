//! Thread model: one OS thread per unit of work
//!
//! Units live in a pre-sized, immutable slot array shared with the workers;
//! worker `i` only ever reads slot `i`. Threads are joined strictly in spawn
//! order.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use super::{completion_bar, report_error, ContextKind, Orchestrator, WorkerStatus};
use crate::config::RunConfiguration;
use crate::models::{RunReport, TimingRecord, WorkUnit, WorkloadReport};
use crate::{BenchError, Result};

/// Thread-based orchestrator
#[derive(Debug, Clone)]
pub struct ThreadOrchestrator {
    config: RunConfiguration,
}

impl ThreadOrchestrator {
    /// Build the per-unit slots, fully populated before any thread starts
    fn build_slots(&self) -> Arc<[WorkUnit]> {
        (0..self.config.count)
            .map(|i| WorkUnit::for_run(&self.config, i))
            .collect()
    }
}

impl Orchestrator for ThreadOrchestrator {
    const KIND: ContextKind = ContextKind::Thread;

    fn new(config: RunConfiguration) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    fn config(&self) -> &RunConfiguration {
        &self.config
    }

    fn run_with<F>(&self, job: F) -> Result<RunReport>
    where
        F: Fn(&WorkUnit) -> Result<WorkloadReport> + Send + Sync + 'static,
    {
        let count = self.config.count;
        let job = Arc::new(job);

        let mut timing = TimingRecord::start();
        let slots = self.build_slots();
        let mut handles: Vec<JoinHandle<Result<WorkloadReport>>> = Vec::with_capacity(count);

        for i in 0..count {
            let slots = Arc::clone(&slots);
            let job = Arc::clone(&job);

            let handle = thread::Builder::new()
                .name(format!("unit-{}", i))
                .spawn(move || job(&slots[i]))
                .map_err(|source| {
                    warn!(
                        "thread spawn failed after {} of {} threads; running ones continue",
                        i, count
                    );
                    BenchError::Spawn {
                        kind: Self::KIND.name(),
                        index: i,
                        source,
                    }
                })?;

            debug!("spawned unit {} on thread {:?}", i, handle.thread().id());
            handles.push(handle);
        }
        info!("spawned {} threads, joining in spawn order", count);

        let progress = completion_bar(count, Self::KIND);
        let mut completion_order = Vec::with_capacity(count);
        let mut failed_units = 0usize;

        for (i, handle) in handles.into_iter().enumerate() {
            let status = match handle.join() {
                Ok(Ok(report)) => {
                    debug!("joined unit {} ({} iterations)", i, report.completed);
                    WorkerStatus::Completed
                }
                Ok(Err(e)) => {
                    report_error(format_args!("unit {}: {}", i, e));
                    WorkerStatus::Failed(e.to_string())
                }
                Err(_) => {
                    report_error(format_args!("join failed for unit {}: thread panicked", i));
                    WorkerStatus::Failed("panicked".to_string())
                }
            };

            if status.is_failed() {
                failed_units += 1;
            }
            completion_order.push(i);
            progress.inc(1);
        }

        timing.stop();
        progress.finish_and_clear();

        Ok(RunReport {
            work_type: self.config.work_type,
            count,
            timing,
            completion_order,
            failed_units,
        })
    }
}
