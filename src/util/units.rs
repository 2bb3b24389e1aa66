//! Units formatting utilities
//!
//! Human-readable rendering of sizes, durations and operation rates used in
//! the status lines and diagnostics.

use std::time::Duration;

/// Format an elapsed time as seconds with four decimal places
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use forkbench::util::units::format_seconds;
///
/// assert_eq!(format_seconds(Duration::from_millis(1500)), "1.5000");
/// assert_eq!(format_seconds(Duration::from_micros(260)), "0.0003");
/// ```
pub fn format_seconds(duration: Duration) -> String {
    format!("{:.4}", duration.as_secs_f64())
}

/// Format bytes into human-readable size with appropriate units
///
/// # Examples
/// ```
/// use forkbench::util::units::format_bytes;
///
/// assert_eq!(format_bytes(1024), "1.0 KiB");
/// assert_eq!(format_bytes(64 * 1024 * 1024), "64.0 MiB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Format a duration for diagnostics, truncated to milliseconds
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use forkbench::util::units::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1s 500ms");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let truncated = Duration::from_millis(duration.as_millis() as u64);
    humantime::format_duration(truncated).to_string()
}

/// Operations per second over the given duration; zero for an empty interval
pub fn calculate_rate(operations: u64, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 0.0;
    }

    operations as f64 / duration.as_secs_f64()
}
