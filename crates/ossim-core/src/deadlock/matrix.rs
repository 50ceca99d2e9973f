//! Deadlock detection for resources with multiple instances.
//!
//! A cycle in the allocation graph is only sufficient for deadlock when every
//! resource has a single instance. With counted resources the detector
//! instead simulates optimistic completion: any process whose outstanding
//! request fits in `work` is assumed to finish and release its allocation.
//! Processes left unfinished when a pass makes no progress are deadlocked.

use crate::{
    error::{
        InputError, Matrix, check_non_negative, check_row_non_negative, check_shape, check_totals,
    },
    limits::Limits,
};

/// What happened to a process when it was visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionAction {
    /// Request satisfied; allocation released into `work`
    Executed,
    /// Request exceeds `work`; process keeps waiting
    Waiting,
}

/// One visit of an unfinished process during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionStep {
    /// Process index
    pub process: usize,
    /// Whether the request fit in `work`
    pub can_run: bool,
    /// Outcome of the visit
    pub action: DetectionAction,
    /// Work vector on entry
    pub work_before: Vec<i64>,
    /// Work vector on exit (unchanged when waiting)
    pub work_after: Vec<i64>,
}

/// Result of matrix deadlock detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionTrace {
    /// Whether any process is deadlocked
    pub deadlock: bool,
    /// Processes that can never finish, in index order
    pub deadlocked: Vec<usize>,
    /// Every visit of an unfinished process, pass by pass
    pub steps: Vec<DetectionStep>,
}

/// Run detection with default limits.
pub fn detect(
    available: &[i64],
    allocation: &[Vec<i64>],
    request: &[Vec<i64>],
) -> Result<DetectionTrace, InputError> {
    detect_with_limits(available, allocation, request, &Limits::default())
}

/// Validate the inputs and run detection.
///
/// The number of processes is taken from `allocation`, the number of
/// resource types from `available`.
pub fn detect_with_limits(
    available: &[i64],
    allocation: &[Vec<i64>],
    request: &[Vec<i64>],
    limits: &Limits,
) -> Result<DetectionTrace, InputError> {
    let processes = allocation.len();
    let resources = available.len();

    limits.check_processes(processes)?;
    limits.check_resources(resources)?;

    check_shape(Matrix::Allocation, allocation, processes, resources)?;
    check_shape(Matrix::Request, request, processes, resources)?;
    check_row_non_negative(Matrix::Available, 0, available)?;
    check_non_negative(Matrix::Allocation, allocation)?;
    check_non_negative(Matrix::Request, request)?;
    check_totals(available, allocation)?;

    let mut work = available.to_vec();
    let mut finished = vec![false; processes];
    let mut steps = Vec::new();

    loop {
        let mut progress = false;

        for process in 0..processes {
            if finished[process] {
                continue;
            }

            let can_run = request[process].iter().zip(&work).all(|(want, free)| want <= free);
            let work_before = work.clone();

            let action = if can_run {
                for (free, held) in work.iter_mut().zip(&allocation[process]) {
                    *free += held;
                }
                finished[process] = true;
                progress = true;
                DetectionAction::Executed
            } else {
                DetectionAction::Waiting
            };

            steps.push(DetectionStep {
                process,
                can_run,
                action,
                work_before,
                work_after: work.clone(),
            });
        }

        if !progress {
            break;
        }
    }

    let deadlocked: Vec<usize> = (0..processes).filter(|&p| !finished[p]).collect();

    tracing::debug!(processes, ?deadlocked, visits = steps.len(), "matrix detection complete");

    Ok(DetectionTrace { deadlock: !deadlocked.is_empty(), deadlocked, steps })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_processes_finish() {
        // Silberschatz detection example, no deadlock
        let trace = detect(
            &[0, 0, 0],
            &[vec![0, 1, 0], vec![2, 0, 0], vec![3, 0, 3], vec![2, 1, 1], vec![0, 0, 2]],
            &[vec![0, 0, 0], vec![2, 0, 2], vec![0, 0, 0], vec![1, 0, 0], vec![0, 0, 2]],
        )
        .unwrap();

        assert!(!trace.deadlock);
        assert!(trace.deadlocked.is_empty());
        let executed: Vec<usize> = trace
            .steps
            .iter()
            .filter(|s| s.action == DetectionAction::Executed)
            .map(|s| s.process)
            .collect();
        assert_eq!(executed, vec![0, 2, 3, 4, 1]);
    }

    #[test]
    fn extra_request_deadlocks_the_rest() {
        // Same system, but P2 now requests one more C
        let trace = detect(
            &[0, 0, 0],
            &[vec![0, 1, 0], vec![2, 0, 0], vec![3, 0, 3], vec![2, 1, 1], vec![0, 0, 2]],
            &[vec![0, 0, 0], vec![2, 0, 2], vec![0, 0, 1], vec![1, 0, 0], vec![0, 0, 2]],
        )
        .unwrap();

        assert!(trace.deadlock);
        assert_eq!(trace.deadlocked, vec![1, 2, 3, 4]);
    }

    #[test]
    fn waiting_visits_leave_work_unchanged() {
        let trace = detect(&[0], &[vec![1]], &[vec![1]]).unwrap();

        assert_eq!(trace.steps.len(), 1);
        let step = &trace.steps[0];
        assert!(!step.can_run);
        assert_eq!(step.action, DetectionAction::Waiting);
        assert_eq!(step.work_before, step.work_after);
        assert_eq!(trace.deadlocked, vec![0]);
    }

    #[test]
    fn every_unfinished_process_is_visited_each_pass() {
        // Pass 1: P0 waits, P1 runs. Pass 2: P0 runs. Pass 3 visits nothing.
        let trace = detect(&[0], &[vec![0], vec![1]], &[vec![1], vec![0]]).unwrap();

        let visits: Vec<(usize, DetectionAction)> =
            trace.steps.iter().map(|s| (s.process, s.action)).collect();
        assert_eq!(
            visits,
            vec![
                (0, DetectionAction::Waiting),
                (1, DetectionAction::Executed),
                (0, DetectionAction::Executed),
            ]
        );
        assert!(!trace.deadlock);
    }

    #[test]
    fn request_shape_is_validated() {
        let err = detect(&[1, 1], &[vec![0, 0]], &[vec![0]]).unwrap_err();
        assert_eq!(
            err,
            InputError::RowLength { matrix: Matrix::Request, row: 0, expected: 2, actual: 1 }
        );
    }

    #[test]
    fn overflowing_total_is_rejected_up_front() {
        let err = detect(&[i64::MAX], &[vec![1]], &[vec![0]]).unwrap_err();
        assert_eq!(err, InputError::ResourceOverflow { resource: 0 });
    }

    #[test]
    fn negative_request_is_rejected() {
        let err = detect(&[1], &[vec![0]], &[vec![-2]]).unwrap_err();
        assert_eq!(
            err,
            InputError::NegativeValue { matrix: Matrix::Request, row: 0, column: 0, value: -2 }
        );
    }
}
