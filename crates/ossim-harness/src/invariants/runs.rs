//! Captured engine runs: input paired with output.

use ossim_core::{
    DeadlockReport, DetectionTrace, InputError, PageId, Policy, ReferenceTrace, ResourceGraph,
    ResourceState, SafetyTrace, deadlock::matrix, paging,
};

/// A Banker's scan together with the state it ran on.
#[derive(Debug, Clone)]
pub struct SafetyRun {
    /// Validated input
    pub state: ResourceState,
    /// Scan output
    pub trace: SafetyTrace,
}

impl SafetyRun {
    /// Run the safety scan over `state`.
    pub fn execute(state: ResourceState) -> Self {
        let trace = state.check_safety();
        Self { state, trace }
    }
}

/// A graph deadlock check together with the graph it ran on.
#[derive(Debug, Clone)]
pub struct DeadlockRun {
    /// Input graph
    pub graph: ResourceGraph,
    /// Detector output
    pub report: DeadlockReport,
}

impl DeadlockRun {
    /// Run cycle detection over `graph`.
    pub fn execute(graph: ResourceGraph) -> Self {
        let report = graph.detect();
        Self { graph, report }
    }
}

/// A matrix detection run together with its matrices.
#[derive(Debug, Clone)]
pub struct DetectionRun {
    /// Free instances on entry
    pub available: Vec<i64>,
    /// Held instances per process
    pub allocation: Vec<Vec<i64>>,
    /// Outstanding requests per process
    pub request: Vec<Vec<i64>>,
    /// Detector output
    pub trace: DetectionTrace,
}

impl DetectionRun {
    /// Validate and run matrix detection.
    pub fn execute(
        available: Vec<i64>,
        allocation: Vec<Vec<i64>>,
        request: Vec<Vec<i64>>,
    ) -> Result<Self, InputError> {
        let trace = matrix::detect(&available, &allocation, &request)?;
        Ok(Self { available, allocation, request, trace })
    }
}

/// A page replacement replay together with its reference string.
#[derive(Debug, Clone)]
pub struct EvictionRun {
    /// Reference string
    pub references: Vec<PageId>,
    /// Replay output
    pub trace: ReferenceTrace,
}

impl EvictionRun {
    /// Validate and replay `references`.
    pub fn execute(
        references: Vec<PageId>,
        frame_count: usize,
        policy: Policy,
    ) -> Result<Self, InputError> {
        let trace = paging::simulate(&references, frame_count, policy)?;
        Ok(Self { references, trace })
    }
}
