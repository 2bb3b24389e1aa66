//! Utility functions module
//!
//! Formatting helpers for elapsed times, sizes and rates.

pub mod units;

pub use units::{calculate_rate, format_bytes, format_duration, format_seconds};
