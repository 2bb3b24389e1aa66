//! I/O operations module
//!
//! Durable-write file handles and self-deleting temporary files used by the
//! storage workload.

pub mod disk;

pub use disk::{unique_temp_name, DirectFile, DiskIO, SyncDiskIO, TempFile};
