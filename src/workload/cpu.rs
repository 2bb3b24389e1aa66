//! CPU workload: trial-division prime search
//!
//! Division is used on purpose; it keeps the ALU busy for tens of cycles per
//! step while touching almost no memory.

use crate::config::WorkType;
use crate::models::WorkloadReport;
use crate::PRIME_SEARCH_START;

/// Trial division up to the integer square root of `n`
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }

    let mut i = 2u64;
    while divisor_in_range(i, n) {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// `i * i <= n`, without overflowing once `i` passes 2^32
fn divisor_in_range(i: u64, n: u64) -> bool {
    i <= n / i
}

/// Successive primes, starting at a given candidate
#[derive(Debug, Clone)]
pub struct PrimeSearch {
    candidate: u64,
}

impl PrimeSearch {
    /// Search primes greater than or equal to `start`
    pub fn starting_at(start: u64) -> Self {
        Self { candidate: start }
    }
}

impl Iterator for PrimeSearch {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        loop {
            let candidate = self.candidate;
            self.candidate = self.candidate.checked_add(1)?;
            if is_prime(candidate) {
                return Some(candidate);
            }
        }
    }
}

/// Find `limit` successive primes from the fixed search offset.
///
/// Every prime found is folded into the report checksum so the search cannot
/// be discarded as dead code.
pub fn run_cpu_intensive(limit: usize) -> WorkloadReport {
    let (found, checksum) = PrimeSearch::starting_at(PRIME_SEARCH_START)
        .take(limit)
        .fold((0usize, 0u64), |(found, sum), prime| {
            (found + 1, sum.wrapping_add(prime))
        });

    WorkloadReport::new(WorkType::Cpu, found, checksum)
}
