//! Data models module
//!
//! Work unit descriptions, per-unit workload outcomes and the per-run
//! timing record.

pub mod result;
pub mod unit;

pub use result::{RunReport, TimingRecord, WorkloadReport};
pub use unit::WorkUnit;
