//! Orchestration module
//!
//! Fan-out / fan-in over N execution contexts: spawn one context per unit of
//! work, then block until every one of them has finished. The process model
//! forks and waits for any child; the thread model spawns OS threads and
//! joins them in spawn order.

#[cfg(unix)]
pub mod process;
pub mod thread;

#[cfg(unix)]
pub use process::ProcessOrchestrator;
pub use thread::ThreadOrchestrator;

use std::fmt;

use indicatif::{ProgressBar, ProgressStyle};

use crate::config::RunConfiguration;
use crate::models::{RunReport, WorkUnit, WorkloadReport};
use crate::{workload, Result};

/// Kind of OS execution context an orchestrator creates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Process,
    Thread,
}

impl ContextKind {
    /// Singular name, used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            ContextKind::Process => "process",
            ContextKind::Thread => "thread",
        }
    }

    /// Plural name, used in the status lines
    pub fn noun(&self) -> &'static str {
        match self {
            ContextKind::Process => "processes",
            ContextKind::Thread => "threads",
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle of one spawned execution context
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerStatus {
    /// Spawned and not yet reaped or joined
    Running,
    /// Workload returned normally
    Completed,
    /// Workload failed or the context died abnormally
    Failed(String),
}

impl WorkerStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, WorkerStatus::Running)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, WorkerStatus::Failed(_))
    }
}

/// A fan-out / fan-in runner for one execution model
pub trait Orchestrator: Sized {
    /// Execution context this orchestrator creates
    const KIND: ContextKind;

    /// Create an orchestrator for a validated configuration
    fn new(config: RunConfiguration) -> Result<Self>;

    fn config(&self) -> &RunConfiguration;

    /// Spawn one context per unit, each running `job` on its own unit, then
    /// wait for all of them. Timing covers exactly the spawn + wait phase.
    fn run_with<F>(&self, job: F) -> Result<RunReport>
    where
        F: Fn(&WorkUnit) -> Result<WorkloadReport> + Send + Sync + 'static;

    /// Run the configured workload in every context
    fn run(&self) -> Result<RunReport> {
        self.run_with(workload::run)
    }
}

/// Print an operational failure on stderr
pub fn report_error(message: impl fmt::Display) {
    eprintln!("[ERROR] {}", message);
}

/// Counter of finished units, drawn on stderr while the orchestrator waits
pub(crate) fn completion_bar(count: usize, kind: ContextKind) -> ProgressBar {
    let pb = ProgressBar::new(count as u64);
    let template = "{spinner} {pos}/{len} {msg} finished [{elapsed}]";
    if let Ok(style) = ProgressStyle::with_template(template) {
        pb.set_style(style);
    }
    pb.set_message(kind.noun());
    pb
}
