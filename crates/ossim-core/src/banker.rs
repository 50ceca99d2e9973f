//! Banker's safety algorithm.
//!
//! Given the free vector, per-process maximum demand and current allocation,
//! searches for an order in which every process can obtain its remaining
//! need, run to completion and release what it holds.
//!
//! Flow: validate shape and values, derive `need = maximum - allocation`, then
//! scan all unfinished processes from index 0 in repeated passes, admitting
//! any process whose need fits in `work`. A pass that admits nothing ends the
//! run. Within a pass ties go to the lower process index, so the admission
//! order is a pure function of the input.

use crate::{
    error::{
        InputError, Matrix, check_len, check_non_negative, check_row_non_negative, check_shape,
        check_totals,
    },
    limits::Limits,
};

/// Validated Banker's problem instance.
///
/// Holds private copies of the caller's vectors; running the scan never
/// mutates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceState {
    available: Vec<i64>,
    maximum: Vec<Vec<i64>>,
    allocation: Vec<Vec<i64>>,
    need: Vec<Vec<i64>>,
}

/// One admission in the safe-sequence search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyStep {
    /// Admitted process index
    pub process: usize,
    /// Work vector before the process released its allocation
    pub work_before: Vec<i64>,
    /// Work vector after the release
    pub work_after: Vec<i64>,
}

/// Result of the safety scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyTrace {
    /// Whether every process could be admitted
    pub safe: bool,
    /// Admission order; empty when the state is unsafe
    pub safe_sequence: Vec<usize>,
    /// One record per admission, in admission order
    pub steps: Vec<SafetyStep>,
    /// Scans over the process list; an unsafe run counts its final empty scan
    pub passes: usize,
    processes: usize,
}

impl SafetyTrace {
    /// Processes that were never admitted, in index order.
    ///
    /// Empty for a safe state. For an unsafe state these are the processes
    /// whose remaining need can never be met.
    pub fn blocked(&self) -> Vec<usize> {
        let mut admitted = vec![false; self.processes];
        for step in &self.steps {
            admitted[step.process] = true;
        }
        (0..self.processes).filter(|&process| !admitted[process]).collect()
    }

    /// Final work vector (equals `available` when nothing was admitted).
    pub fn final_work(&self) -> Option<&[i64]> {
        self.steps.last().map(|step| step.work_after.as_slice())
    }
}

impl ResourceState {
    /// Validate and build a problem instance.
    ///
    /// The number of resource types is taken from `available`, the number of
    /// processes from `maximum`.
    pub fn new(
        available: Vec<i64>,
        maximum: Vec<Vec<i64>>,
        allocation: Vec<Vec<i64>>,
    ) -> Result<Self, InputError> {
        Self::new_with_limits(available, maximum, allocation, &Limits::default())
    }

    /// Like [`ResourceState::new`] with explicit size bounds.
    pub fn new_with_limits(
        available: Vec<i64>,
        maximum: Vec<Vec<i64>>,
        allocation: Vec<Vec<i64>>,
        limits: &Limits,
    ) -> Result<Self, InputError> {
        let processes = maximum.len();
        let resources = available.len();

        limits.check_processes(processes)?;
        limits.check_resources(resources)?;

        check_shape(Matrix::Maximum, &maximum, processes, resources)?;
        check_shape(Matrix::Allocation, &allocation, processes, resources)?;

        check_row_non_negative(Matrix::Available, 0, &available)?;
        check_non_negative(Matrix::Maximum, &maximum)?;
        check_non_negative(Matrix::Allocation, &allocation)?;
        check_totals(&available, &allocation)?;

        let mut need = Vec::with_capacity(processes);
        for (process, (max_row, alloc_row)) in maximum.iter().zip(&allocation).enumerate() {
            let mut row = Vec::with_capacity(resources);
            for (resource, (&max, &alloc)) in max_row.iter().zip(alloc_row).enumerate() {
                if alloc > max {
                    return Err(InputError::AllocationExceedsMaximum {
                        process,
                        resource,
                        allocation: alloc,
                        maximum: max,
                    });
                }
                row.push(max - alloc);
            }
            need.push(row);
        }

        Ok(Self { available, maximum, allocation, need })
    }

    /// Validate against declared process and resource counts as well.
    pub fn with_dimensions(
        processes: usize,
        resources: usize,
        available: Vec<i64>,
        maximum: Vec<Vec<i64>>,
        allocation: Vec<Vec<i64>>,
        limits: &Limits,
    ) -> Result<Self, InputError> {
        limits.check_processes(processes)?;
        limits.check_resources(resources)?;

        check_len(Matrix::Available, &available, resources)?;
        check_shape(Matrix::Maximum, &maximum, processes, resources)?;
        check_shape(Matrix::Allocation, &allocation, processes, resources)?;

        Self::new_with_limits(available, maximum, allocation, limits)
    }

    /// Number of processes.
    pub fn processes(&self) -> usize {
        self.maximum.len()
    }

    /// Number of resource types.
    pub fn resources(&self) -> usize {
        self.available.len()
    }

    /// Free instances per resource type.
    pub fn available(&self) -> &[i64] {
        &self.available
    }

    /// Declared maximum demand of `process`.
    pub fn maximum(&self, process: usize) -> &[i64] {
        &self.maximum[process]
    }

    /// Instances held by `process`.
    pub fn allocation(&self, process: usize) -> &[i64] {
        &self.allocation[process]
    }

    /// Remaining need of `process` (`maximum - allocation`).
    pub fn need(&self, process: usize) -> &[i64] {
        &self.need[process]
    }

    /// Run the safety scan.
    ///
    /// # Invariants
    ///
    /// - Post: `safe` iff every process appears exactly once in the steps
    /// - Post: each step's `work_after` is `work_before + allocation[process]`
    /// - Post: `safe_sequence` is empty when `safe` is false
    pub fn check_safety(&self) -> SafetyTrace {
        let processes = self.processes();
        let mut work = self.available.clone();
        let mut finished = vec![false; processes];
        let mut sequence = Vec::with_capacity(processes);
        let mut steps = Vec::with_capacity(processes);
        let mut passes = 0;

        while sequence.len() < processes {
            passes += 1;
            let admitted_before = sequence.len();

            for process in 0..processes {
                if finished[process] || !fits(&self.need[process], &work) {
                    continue;
                }

                let work_before = work.clone();
                for (free, held) in work.iter_mut().zip(&self.allocation[process]) {
                    *free += held;
                }

                tracing::trace!(
                    process,
                    pass = passes,
                    ?work_before,
                    work_after = ?work,
                    "admitted"
                );

                steps.push(SafetyStep { process, work_before, work_after: work.clone() });
                finished[process] = true;
                sequence.push(process);
            }

            if sequence.len() == admitted_before {
                break;
            }
        }

        let safe = sequence.len() == processes;
        debug_assert_eq!(steps.len(), sequence.len());

        tracing::debug!(processes, admitted = sequence.len(), passes, safe, "safety scan complete");

        if !safe {
            sequence.clear();
        }

        SafetyTrace { safe, safe_sequence: sequence, steps, passes, processes }
    }
}

/// Whether `need` fits component-wise into `work`.
fn fits(need: &[i64], work: &[i64]) -> bool {
    need.iter().zip(work).all(|(need, free)| need <= free)
}

/// Validate the inputs and run the safety scan.
pub fn check(
    available: &[i64],
    maximum: &[Vec<i64>],
    allocation: &[Vec<i64>],
) -> Result<SafetyTrace, InputError> {
    let state = ResourceState::new(available.to_vec(), maximum.to_vec(), allocation.to_vec())?;
    Ok(state.check_safety())
}
