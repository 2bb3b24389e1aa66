//! I/O workload: small writes, each forced to the device
//!
//! Every iteration blocks until the payload is durable, so the context spends
//! most of its time waiting on the storage completion path.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, warn};

use crate::config::WorkType;
use crate::io::{unique_temp_name, DiskIO, SyncDiskIO};
use crate::models::WorkloadReport;
use crate::util::units::calculate_rate;
use crate::{BenchError, Result};

/// Bytes written per iteration
pub const PAYLOAD: &[u8; 10] = b"FORKBENCH\n";

/// Write `limit` payloads into a fresh temp file under `dir`, syncing after
/// each one. A short or failed write ends the loop early without error. The
/// file is removed before returning on every path.
pub fn run_sync_writes<D: DiskIO + ?Sized>(
    disk_io: &D,
    dir: &Path,
    unit_id: usize,
    limit: usize,
) -> Result<WorkloadReport> {
    let name = unique_temp_name(unit_id);
    let mut temp_file = disk_io.create_temp_file(dir, &name).map_err(|e| {
        BenchError::TempFile(format!(
            "IOWorker open failed for {}: {}",
            dir.join(&name).display(),
            e
        ))
    })?;

    let start = Instant::now();
    let mut completed = 0usize;
    while completed < limit {
        match temp_file.file.write_direct(PAYLOAD) {
            Ok(n) if n == PAYLOAD.len() => {}
            Ok(n) => {
                warn!(
                    "unit {}: short write ({} of {} bytes), stopping after {} iterations",
                    unit_id,
                    n,
                    PAYLOAD.len(),
                    completed
                );
                break;
            }
            Err(e) => {
                warn!("unit {}: write failed after {} iterations: {}", unit_id, completed, e);
                break;
            }
        }

        if let Err(e) = temp_file.file.sync_all() {
            warn!("unit {}: fsync failed after {} iterations: {}", unit_id, completed, e);
            break;
        }
        completed += 1;
    }

    drop(temp_file);
    debug!(
        "unit {}: {} durable writes ({:.0}/s)",
        unit_id,
        completed,
        calculate_rate(completed as u64, start.elapsed())
    );

    let bytes = (completed * PAYLOAD.len()) as u64;
    Ok(WorkloadReport::new(WorkType::Io, completed, bytes))
}

/// I/O-bound workload writing into the working directory
pub fn run_io_intensive(unit_id: usize, limit: usize) -> Result<WorkloadReport> {
    run_sync_writes(&SyncDiskIO::new(), Path::new("."), unit_id, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::DirectFile;
    use std::fs::File;
    use std::io::{self, Write};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::tempdir;

    /// Accepts `full_writes` whole payloads, then starts returning short writes
    struct ShortWriteFile {
        file: File,
        full_writes: usize,
        syncs: Arc<AtomicUsize>,
    }

    impl DirectFile for ShortWriteFile {
        fn write_direct(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.full_writes == 0 {
                return self.file.write(&buf[..buf.len() / 2]);
            }
            self.full_writes -= 1;
            self.file.write(buf)
        }

        fn sync_all(&mut self) -> io::Result<()> {
            self.syncs.fetch_add(1, Ordering::SeqCst);
            self.file.sync_all()
        }
    }

    struct ShortWriteDisk {
        full_writes: usize,
        syncs: Arc<AtomicUsize>,
    }

    impl DiskIO for ShortWriteDisk {
        fn open_sync_write(&self, path: &Path) -> io::Result<Box<dyn DirectFile>> {
            Ok(Box::new(ShortWriteFile {
                file: File::create(path)?,
                full_writes: self.full_writes,
                syncs: Arc::clone(&self.syncs),
            }))
        }
    }

    fn dir_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[test]
    fn test_sync_writes_complete_and_clean_up() {
        let temp_dir = tempdir().unwrap();
        let report = run_sync_writes(&SyncDiskIO::new(), temp_dir.path(), 0, 25).unwrap();

        assert_eq!(report.work_type, WorkType::Io);
        assert_eq!(report.completed, 25);
        assert_eq!(report.checksum, 250);
        assert!(dir_is_empty(temp_dir.path()));
    }

    #[test]
    fn test_short_write_stops_early_without_error() {
        let temp_dir = tempdir().unwrap();
        let syncs = Arc::new(AtomicUsize::new(0));
        let disk = ShortWriteDisk {
            full_writes: 3,
            syncs: Arc::clone(&syncs),
        };

        let report = run_sync_writes(&disk, temp_dir.path(), 7, 100).unwrap();
        assert_eq!(report.completed, 3);
        assert_eq!(syncs.load(Ordering::SeqCst), 3);
        assert!(dir_is_empty(temp_dir.path()));
    }

    #[test]
    fn test_open_failure_is_reported() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let err = run_sync_writes(&SyncDiskIO::new(), &missing, 0, 1).unwrap_err();
        assert!(matches!(err, BenchError::TempFile(_)));
    }

    #[test]
    fn test_concurrent_units_do_not_collide() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path().to_path_buf();

        let handles: Vec<_> = (0..16)
            .map(|id| {
                let dir = dir.clone();
                std::thread::spawn(move || run_sync_writes(&SyncDiskIO::new(), &dir, id, 5))
            })
            .collect();

        for handle in handles {
            let report = handle.join().unwrap().unwrap();
            assert_eq!(report.completed, 5);
        }
        assert!(dir_is_empty(&dir));
    }
}
