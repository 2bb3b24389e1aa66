//! Workload library
//!
//! Three synthetic workloads, each stressing one hardware subsystem. They
//! operate only on private memory or private files and need no coordination
//! between concurrent callers.

pub mod cpu;
pub mod memory;
pub mod storage;

use std::time::Instant;

use tracing::debug;

use crate::config::WorkType;
use crate::models::{WorkUnit, WorkloadReport};
use crate::util::units::format_duration;
use crate::Result;

pub use cpu::run_cpu_intensive;
pub use memory::run_mem_intensive;
pub use storage::run_io_intensive;

/// Run the workload described by `unit` to completion
pub fn run(unit: &WorkUnit) -> Result<WorkloadReport> {
    let start = Instant::now();

    let report = match unit.work_type {
        WorkType::Cpu => run_cpu_intensive(unit.iterations),
        WorkType::Mem => run_mem_intensive(unit.iterations)?,
        WorkType::Io => run_io_intensive(unit.id, unit.iterations)?,
    };

    debug!(
        "unit {} ({}) finished in {}: {} iterations, checksum {}",
        unit.id,
        unit.work_type,
        format_duration(start.elapsed()),
        report.completed,
        report.checksum
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SyncDiskIO;

    #[test]
    fn test_dispatch_cpu() {
        let unit = WorkUnit::new(0, WorkType::Cpu, 10);
        let report = run(&unit).unwrap();
        assert_eq!(report.work_type, WorkType::Cpu);
        assert_eq!(report.completed, 10);
    }

    #[test]
    fn test_io_unit_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let unit = WorkUnit::new(3, WorkType::Io, 2);

        let report =
            storage::run_sync_writes(&SyncDiskIO::new(), dir.path(), unit.id, unit.iterations)
                .unwrap();
        assert_eq!(report.work_type, WorkType::Io);
        assert_eq!(report.completed, 2);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
