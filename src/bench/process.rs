//! Process model: one forked child per unit of work
//!
//! Each child is a copy-on-write duplicate of the orchestrator, builds its
//! own `WorkUnit`, runs it and exits without returning into the parent's
//! code. The parent then waits for *any* child until none are left.

use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};

use libc::{c_int, pid_t};
use tracing::{debug, info, warn};

use super::{completion_bar, report_error, ContextKind, Orchestrator, WorkerStatus};
use crate::config::RunConfiguration;
use crate::models::{RunReport, TimingRecord, WorkUnit, WorkloadReport};
use crate::{BenchError, Result};

/// Exit status of a child whose workload returned an error
pub const CHILD_FAILURE: c_int = 1;
/// Exit status of a child whose workload panicked
pub const CHILD_PANIC: c_int = 101;

/// A forked child tracked by the parent
#[derive(Debug)]
pub struct ChildInfo {
    /// Unit id the child is running
    pub id: usize,
    /// OS process id
    pub pid: pid_t,
    pub status: WorkerStatus,
}

impl ChildInfo {
    pub fn new(id: usize, pid: pid_t) -> Self {
        Self {
            id,
            pid,
            status: WorkerStatus::Running,
        }
    }
}

/// Fork-based orchestrator
#[derive(Debug, Clone)]
pub struct ProcessOrchestrator {
    config: RunConfiguration,
}

impl Orchestrator for ProcessOrchestrator {
    const KIND: ContextKind = ContextKind::Process;

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

        // Anything still buffered would otherwise be written once per child
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();

        let mut timing = TimingRecord::start();
        let mut children: Vec<ChildInfo> = Vec::with_capacity(count);

        for i in 0..count {
            // SAFETY: the child only runs `job` on a unit it builds itself and
            // then leaves through `_exit`, never returning into this loop.
            let pid = unsafe { libc::fork() };

            if pid < 0 {
                let source = io::Error::last_os_error();
                warn!(
                    "fork failed after {} of {} processes; {} already running are left to finish",
                    i, count, i
                );
                return Err(BenchError::Spawn {
                    kind: Self::KIND.name(),
                    index: i,
                    source,
                });
            }

            if pid == 0 {
                let unit = WorkUnit::for_run(&self.config, i);
                let code = run_child(&job, &unit);
                // SAFETY: terminates the child immediately, skipping the
                // parent's atexit handlers and buffered stdio.
                unsafe { libc::_exit(code) };
            }

            debug!("spawned unit {} as pid {}", i, pid);
            children.push(ChildInfo::new(i, pid));
        }
        info!("spawned {} processes, waiting for them to exit", count);

        let progress = completion_bar(count, Self::KIND);
        let mut completion_order = Vec::with_capacity(count);
        let mut failed_units = 0usize;
        let mut active = children.len();

        while active > 0 {
            let mut status: c_int = 0;
            // SAFETY: `status` is a valid out-pointer for the duration of the call.
            let pid = unsafe { libc::wait(&mut status) };

            if pid < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    debug!("wait interrupted, retrying");
                    continue;
                }
                progress.abandon();
                return Err(BenchError::Wait(err));
            }

            let Some(child) = children
                .iter_mut()
                .find(|c| c.pid == pid && c.status.is_active())
            else {
                warn!("reaped pid {} which is not one of this run's children", pid);
                continue;
            };

            child.status = decode_wait_status(status);
            if let WorkerStatus::Failed(reason) = &child.status {
                failed_units += 1;
                warn!("unit {} (pid {}) {}", child.id, pid, reason);
            } else {
                debug!("reaped unit {} (pid {})", child.id, pid);
            }

            completion_order.push(child.id);
            active -= 1;
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

/// Body of a forked child; returns the status it should exit with
fn run_child<F>(job: &F, unit: &WorkUnit) -> c_int
where
    F: Fn(&WorkUnit) -> Result<WorkloadReport>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| job(unit))) {
        Ok(Ok(_)) => 0,
        Ok(Err(e)) => {
            report_error(format_args!("unit {}: {}", unit.id, e));
            CHILD_FAILURE
        }
        Err(_) => {
            report_error(format_args!("unit {} panicked", unit.id));
            CHILD_PANIC
        }
    }
}

/// Map a raw `wait` status to the child's final state
pub fn decode_wait_status(status: c_int) -> WorkerStatus {
    if libc::WIFEXITED(status) {
        match libc::WEXITSTATUS(status) {
            0 => WorkerStatus::Completed,
            code => WorkerStatus::Failed(format!("exited with status {}", code)),
        }
    } else if libc::WIFSIGNALED(status) {
        WorkerStatus::Failed(format!("killed by signal {}", libc::WTERMSIG(status)))
    } else {
        WorkerStatus::Failed(format!("stopped with raw status {:#x}", status))
    }
}
