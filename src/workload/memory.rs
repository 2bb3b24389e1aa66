//! Memory workload: random pointer chase
//!
//! The buffer is far larger than a last-level cache and is shuffled into a
//! single random cycle, so each step of the chase depends on a load the
//! prefetcher cannot predict.

use rand::{rngs::SmallRng, Rng, SeedableRng};
use tracing::debug;

use crate::config::WorkType;
use crate::models::WorkloadReport;
use crate::util::units::format_bytes;
use crate::{BenchError, Result, CHASE_ELEMENTS, CHASE_STEPS_PER_ITERATION};

/// Allocate `len` elements initialised to the identity `arr[i] = i`
pub fn allocate_chain(len: usize) -> Result<Vec<u32>> {
    if len == 0 || len > u32::MAX as usize {
        return Err(BenchError::Allocation(format!(
            "chase buffer length {} out of range",
            len
        )));
    }

    let mut arr = Vec::new();
    arr.try_reserve_exact(len).map_err(|e| {
        BenchError::Allocation(format!(
            "MemWorker could not allocate {}: {}",
            format_bytes((len * std::mem::size_of::<u32>()) as u64),
            e
        ))
    })?;
    arr.extend(0..len as u32);
    Ok(arr)
}

/// Shuffle `arr` in place into one random cycle.
///
/// Walks from the end, swapping each slot with a uniformly chosen strictly
/// earlier slot. Applied to the identity this yields a permutation where
/// following `arr[idx]` from any start visits every index.
pub fn shuffle_cycle<R: Rng + ?Sized>(arr: &mut [u32], rng: &mut R) {
    for i in (1..arr.len()).rev() {
        let j = rng.gen_range(0..i);
        arr.swap(i, j);
    }
}

/// Follow `idx = arr[idx]` for `steps` dependent loads starting at index 0
pub fn chase(arr: &[u32], steps: usize) -> u32 {
    let mut idx = 0u32;
    for _ in 0..steps {
        idx = arr[idx as usize];
    }
    idx
}

/// Build a shuffled chain of `len` elements and chase it `steps` times
pub fn run_chase(len: usize, steps: usize) -> Result<WorkloadReport> {
    let mut arr = allocate_chain(len)?;
    let mut rng = SmallRng::from_entropy();
    shuffle_cycle(&mut arr, &mut rng);

    debug!(
        "chasing {} buffer for {} steps",
        format_bytes((arr.len() * std::mem::size_of::<u32>()) as u64),
        steps
    );
    let last = chase(&arr, steps);

    Ok(WorkloadReport::new(WorkType::Mem, steps, u64::from(last)))
}

/// Memory-bound workload with the fixed buffer size
pub fn run_mem_intensive(limit: usize) -> Result<WorkloadReport> {
    let steps = limit.saturating_mul(CHASE_STEPS_PER_ITERATION);
    run_chase(CHASE_ELEMENTS, steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_identity() {
        let arr = allocate_chain(8).unwrap();
        assert_eq!(arr, vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(allocate_chain(0).is_err());
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = SmallRng::from_entropy();
        for len in [1usize, 2, 3, 17, 1000, 4096] {
            let mut arr = allocate_chain(len).unwrap();
            shuffle_cycle(&mut arr, &mut rng);

            let mut sorted = arr.clone();
            sorted.sort_unstable();
            let identity: Vec<u32> = (0..len as u32).collect();
            assert_eq!(sorted, identity, "len {}", len);
        }
    }

    #[test]
    fn test_every_index_reachable_from_zero() {
        let mut rng = SmallRng::from_entropy();
        for _ in 0..20 {
            let len = 2048;
            let mut arr = allocate_chain(len).unwrap();
            shuffle_cycle(&mut arr, &mut rng);

            let mut seen = vec![false; len];
            let mut idx = 0usize;
            for _ in 0..len {
                assert!(!seen[idx], "index {} revisited before full cycle", idx);
                seen[idx] = true;
                idx = arr[idx] as usize;
            }
            assert_eq!(idx, 0);
            assert!(seen.iter().all(|&s| s));
        }
    }

    #[test]
    fn test_chase_follows_links() {
        // 0 -> 2 -> 3 -> 1 -> 0
        let arr = vec![2u32, 0, 3, 1];
        assert_eq!(chase(&arr, 0), 0);
        assert_eq!(chase(&arr, 1), 2);
        assert_eq!(chase(&arr, 3), 1);
        assert_eq!(chase(&arr, 4), 0);
    }

    #[test]
    fn test_run_chase_small_buffer() {
        let report = run_chase(1024, 5000).unwrap();
        assert_eq!(report.work_type, WorkType::Mem);
        assert_eq!(report.completed, 5000);
        assert!(report.checksum < 1024);
    }
}
