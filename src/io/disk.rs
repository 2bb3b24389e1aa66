use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::TEMP_FILE_PREFIX;

/// Opens files whose writes can be forced to the device
pub trait DiskIO {
    /// Create a new file for synchronous writes; fails if it already exists
    fn open_sync_write(&self, path: &Path) -> io::Result<Box<dyn DirectFile>>;

    /// Create a temporary file named `name` inside `target_dir`
    fn create_temp_file(&self, target_dir: &Path, name: &str) -> io::Result<TempFile> {
        let path = target_dir.join(name);
        let file = self.open_sync_write(&path)?;
        Ok(TempFile::new(path, file, true))
    }
}

/// Write handle with an explicit flush-to-device
pub trait DirectFile: Send {
    /// Write data, returning how many bytes were accepted
    fn write_direct(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Block until written data is on the device
    fn sync_all(&mut self) -> io::Result<()>;
}

/// Temporary file wrapper with automatic cleanup
pub struct TempFile {
    pub path: PathBuf,
    pub file: Box<dyn DirectFile>,
    cleanup_on_drop: bool,
}

impl TempFile {
    pub fn new(path: PathBuf, file: Box<dyn DirectFile>, cleanup: bool) -> Self {
        Self {
            path,
            file,
            cleanup_on_drop: cleanup,
        }
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if self.cleanup_on_drop {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Collision-resistant temp file name for one unit of work.
///
/// Combines the process id, the unit's sequence number within the run and a
/// random token, so neither sibling processes nor sibling threads collide.
pub fn unique_temp_name(unit_id: usize) -> String {
    let token: u64 = SmallRng::from_entropy().gen();
    format!(
        "{}{}_{}_{:016x}.tmp",
        TEMP_FILE_PREFIX,
        std::process::id(),
        unit_id,
        token
    )
}

/// File opened for data-synchronous writes
pub struct SyncFile {
    file: File,
}

impl SyncFile {
    pub fn new(file: File) -> Self {
        Self { file }
    }
}

impl DirectFile for SyncFile {
    fn write_direct(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn sync_all(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }
}

/// Platform disk I/O: `O_DSYNC` on unix, plain writes plus fsync elsewhere
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncDiskIO;

impl SyncDiskIO {
    pub fn new() -> Self {
        Self
    }
}

impl DiskIO for SyncDiskIO {
    fn open_sync_write(&self, path: &Path) -> io::Result<Box<dyn DirectFile>> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644).custom_flags(libc::O_DSYNC);
        }

        let file = options.open(path)?;
        Ok(Box::new(SyncFile::new(file)))
    }
}
