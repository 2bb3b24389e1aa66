//! Fork-based orchestration, observed from the parent through a pipe.
//!
//! `wait` reaps any child of the test process, so every test here holds
//! `FORK_LOCK` while it forks.
#![cfg(unix)]

use std::sync::{Mutex, MutexGuard};

use forkbench::bench::{Orchestrator, ProcessOrchestrator};
use forkbench::config::{RunConfiguration, WorkType};
use forkbench::io::SyncDiskIO;
use forkbench::models::WorkloadReport;
use forkbench::workload::storage::run_sync_writes;
use forkbench::BenchError;
use libc::c_int;

static FORK_LOCK: Mutex<()> = Mutex::new(());

fn fork_lock() -> MutexGuard<'static, ()> {
    FORK_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Side channel: each child writes its unit id as one byte
struct Pipe {
    read: c_int,
    write: c_int,
}

impl Pipe {
    fn new() -> Self {
        let mut fds = [0 as c_int; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        Self {
            read: fds[0],
            write: fds[1],
        }
    }

    /// Close the parent's write end and read everything the children sent
    fn drain(self) -> Vec<u8> {
        unsafe { libc::close(self.write) };
        let mut received = Vec::new();
        let mut buf = [0u8; 256];
        loop {
            let n = unsafe { libc::read(self.read, buf.as_mut_ptr().cast(), buf.len()) };
            if n <= 0 {
                break;
            }
            received.extend_from_slice(&buf[..n as usize]);
        }
        unsafe { libc::close(self.read) };
        received
    }
}

fn send_id(fd: c_int, id: usize) {
    let byte = id as u8;
    let n = unsafe { libc::write(fd, (&byte as *const u8).cast(), 1) };
    assert_eq!(n, 1);
}

fn orchestrator(work_type: WorkType, count: usize) -> ProcessOrchestrator {
    ProcessOrchestrator::new(RunConfiguration::new(work_type, count).with_iterations(10)).unwrap()
}

#[test]
fn test_spawns_exactly_count_children() {
    let _guard = fork_lock();

    for count in [1usize, 4, 100] {
        let pipe = Pipe::new();
        let fd = pipe.write;

        let report = orchestrator(WorkType::Cpu, count)
            .run_with(move |unit| {
                send_id(fd, unit.id);
                Ok(WorkloadReport::new(unit.work_type, 0, 0))
            })
            .unwrap();

        let mut ids = pipe.drain();
        ids.sort_unstable();
        let expected: Vec<u8> = (0..count as u8).collect();
        assert_eq!(ids, expected);

        let mut order = report.completion_order.clone();
        order.sort_unstable();
        assert_eq!(order, (0..count).collect::<Vec<_>>());
        assert_eq!(report.failed_units, 0);
        assert!(report.timing.is_stopped());
    }
}

#[test]
fn test_children_get_their_own_unit() {
    let _guard = fork_lock();

    let pipe = Pipe::new();
    let fd = pipe.write;
    let report = orchestrator(WorkType::Mem, 8)
        .run_with(move |unit| {
            if unit.work_type == WorkType::Mem && unit.iterations == 10 {
                send_id(fd, unit.id);
            }
            Ok(WorkloadReport::new(unit.work_type, 0, 0))
        })
        .unwrap();

    assert_eq!(pipe.drain().len(), 8);
    assert_eq!(report.count, 8);
}

#[test]
fn test_failed_children_are_counted() {
    let _guard = fork_lock();

    let report = orchestrator(WorkType::Cpu, 6)
        .run_with(|unit| {
            if unit.id % 2 == 1 {
                Err(BenchError::Worker(format!("unit {} failed on purpose", unit.id)))
            } else {
                Ok(WorkloadReport::new(unit.work_type, 0, 0))
            }
        })
        .unwrap();

    assert_eq!(report.completion_order.len(), 6);
    assert_eq!(report.failed_units, 3);
}

#[test]
fn test_real_cpu_workload() {
    let _guard = fork_lock();

    let report = orchestrator(WorkType::Cpu, 4).run().unwrap();
    assert_eq!(report.count, 4);
    assert_eq!(report.failed_units, 0);
}

#[test]
fn test_io_children_clean_up_their_files() {
    let _guard = fork_lock();

    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let report = orchestrator(WorkType::Io, 20)
        .run_with(move |unit| run_sync_writes(&SyncDiskIO::new(), &dir, unit.id, 3))
        .unwrap();

    assert_eq!(report.failed_units, 0);
    assert!(std::fs::read_dir(temp_dir.path()).unwrap().next().is_none());
}
