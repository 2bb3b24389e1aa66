use crate::config::{RunConfiguration, WorkType};

/// Immutable description of one workload invocation.
///
/// Built immediately before its execution context is spawned and owned by
/// that context for its whole life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkUnit {
    /// Sequence number within the run
    pub id: usize,
    /// Workload to execute
    pub work_type: WorkType,
    /// Iteration budget, identical across the run
    pub iterations: usize,
}

impl WorkUnit {
    pub fn new(id: usize, work_type: WorkType, iterations: usize) -> Self {
        Self {
            id,
            work_type,
            iterations,
        }
    }

    /// Unit `id` of the given run
    pub fn for_run(config: &RunConfiguration, id: usize) -> Self {
        Self::new(id, config.work_type, config.iterations)
    }
}
