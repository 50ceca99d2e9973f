//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true of a trace, not a specific trace.

use std::collections::{HashMap, HashSet};

use ossim_core::{DetectionAction, PageId, Status};

use super::{DeadlockRun, DetectionRun, EvictionRun, Invariant, InvariantResult, SafetyRun};

fn fits(demand: &[i64], work: &[i64]) -> bool {
    demand.iter().zip(work).all(|(want, free)| want <= free)
}

fn released(work: &[i64], held: &[i64]) -> Vec<i64> {
    work.iter().zip(held).map(|(free, held)| free + held).collect()
}

/// Admissions replay from `available`.
///
/// Starting from `available`, each step's `work_before` must equal the
/// running work vector, the admitted process's need must fit in it, and
/// `work_after` must add back exactly that process's allocation. No process
/// is admitted twice.
pub struct AdmissionsReplay;

impl Invariant<SafetyRun> for AdmissionsReplay {
    fn name(&self) -> &'static str {
        "AdmissionsReplay"
    }

    fn check(&self, run: &SafetyRun) -> InvariantResult {
        let state = &run.state;
        let mut work = state.available().to_vec();
        let mut admitted = HashSet::new();

        for (index, step) in run.trace.steps.iter().enumerate() {
            if !admitted.insert(step.process) {
                return Err(self.violation(format!(
                    "step {index}: process {} admitted twice",
                    step.process
                )));
            }
            if step.work_before != work {
                return Err(self.violation(format!(
                    "step {index}: work_before {:?}, replay has {work:?}",
                    step.work_before
                )));
            }
            if !fits(state.need(step.process), &work) {
                return Err(self.violation(format!(
                    "step {index}: process {} need {:?} exceeds work {work:?}",
                    step.process,
                    state.need(step.process)
                )));
            }
            work = released(&work, state.allocation(step.process));
            if step.work_after != work {
                return Err(self.violation(format!(
                    "step {index}: work_after {:?}, expected {work:?}",
                    step.work_after
                )));
            }
        }
        Ok(())
    }
}

/// Verdict agrees with the admissions.
///
/// A state is safe iff every process was admitted, in which case the safe
/// sequence is the admission order. An unsafe state has an empty sequence
/// and every blocked process genuinely cannot fit in the final work vector.
pub struct VerdictMatchesAdmissions;

impl Invariant<SafetyRun> for VerdictMatchesAdmissions {
    fn name(&self) -> &'static str {
        "VerdictMatchesAdmissions"
    }

    fn check(&self, run: &SafetyRun) -> InvariantResult {
        let trace = &run.trace;
        let state = &run.state;
        let complete = trace.steps.len() == state.processes();

        if trace.safe != complete {
            return Err(self.violation(format!(
                "safe={} but {} of {} processes admitted",
                trace.safe,
                trace.steps.len(),
                state.processes()
            )));
        }

        if trace.safe {
            let order: Vec<usize> = trace.steps.iter().map(|s| s.process).collect();
            if trace.safe_sequence != order {
                return Err(self.violation(format!(
                    "safe sequence {:?} differs from admission order {order:?}",
                    trace.safe_sequence
                )));
            }
            return Ok(());
        }

        if !trace.safe_sequence.is_empty() {
            return Err(self.violation(format!(
                "unsafe verdict with non-empty sequence {:?}",
                trace.safe_sequence
            )));
        }

        let work = trace.final_work().unwrap_or(state.available());
        for process in trace.blocked() {
            if fits(state.need(process), work) {
                return Err(self.violation(format!(
                    "blocked process {process} need {:?} fits final work {work:?}",
                    state.need(process)
                )));
            }
        }
        Ok(())
    }
}

/// A reported cycle is a real closed walk.
///
/// If `deadlock` is set the cycle has at least two entries, starts and ends
/// on the same node, visits no other node twice, and every consecutive pair
/// is an edge of the graph. If `deadlock` is clear the cycle is empty.
pub struct CycleFollowsEdges;

impl Invariant<DeadlockRun> for CycleFollowsEdges {
    fn name(&self) -> &'static str {
        "CycleFollowsEdges"
    }

    fn check(&self, run: &DeadlockRun) -> InvariantResult {
        let cycle = &run.report.cycle;

        if !run.report.deadlock {
            if cycle.is_empty() {
                return Ok(());
            }
            return Err(self.violation(format!("no deadlock but cycle {cycle:?}")));
        }

        if cycle.len() < 2 || cycle.first() != cycle.last() {
            return Err(self.violation(format!("cycle {cycle:?} is not closed")));
        }

        let mut seen = HashSet::new();
        for node in run.report.members() {
            if !seen.insert(node.as_str()) {
                return Err(self.violation(format!("cycle {cycle:?} repeats {node}")));
            }
        }

        for pair in cycle.windows(2) {
            if !run.graph.contains_edge(&pair[0], &pair[1]) {
                return Err(self.violation(format!(
                    "cycle {cycle:?} uses missing edge {} -> {}",
                    pair[0], pair[1]
                )));
            }
        }
        Ok(())
    }
}

/// No report means no cycle.
///
/// When `deadlock` is clear, Kahn's algorithm must be able to remove every
/// node of the graph.
pub struct AcyclicWhenClear;

impl Invariant<DeadlockRun> for AcyclicWhenClear {
    fn name(&self) -> &'static str {
        "AcyclicWhenClear"
    }

    fn check(&self, run: &DeadlockRun) -> InvariantResult {
        if run.report.deadlock {
            return Ok(());
        }

        let graph = &run.graph;
        let mut indegree: HashMap<&str, usize> = graph.nodes().map(|node| (node, 0)).collect();
        for node in graph.nodes() {
            for next in graph.successors(node) {
                *indegree.entry(next).or_default() += 1;
            }
        }

        let mut ready: Vec<&str> =
            indegree.iter().filter(|&(_, &degree)| degree == 0).map(|(&node, _)| node).collect();
        let mut removed = 0;

        while let Some(node) = ready.pop() {
            removed += 1;
            for next in graph.successors(node) {
                if let Some(degree) = indegree.get_mut(next) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(next);
                    }
                }
            }
        }

        if removed == graph.node_count() {
            Ok(())
        } else {
            Err(self.violation(format!(
                "no deadlock reported but only {removed} of {} nodes are acyclic",
                graph.node_count()
            )))
        }
    }
}

/// Every visit is consistent with the running work vector.
///
/// Replaying from `available`, each visit's `work_before` matches, `can_run`
/// is true exactly when the request fits, executed visits release the
/// allocation, and waiting visits leave work untouched.
pub struct ExecutedProcessesFit;

impl Invariant<DetectionRun> for ExecutedProcessesFit {
    fn name(&self) -> &'static str {
        "ExecutedProcessesFit"
    }

    fn check(&self, run: &DetectionRun) -> InvariantResult {
        let mut work = run.available.clone();

        for (index, step) in run.trace.steps.iter().enumerate() {
            if step.work_before != work {
                return Err(self.violation(format!(
                    "visit {index}: work_before {:?}, replay has {work:?}",
                    step.work_before
                )));
            }

            let request = &run.request[step.process];
            if step.can_run != fits(request, &work) {
                return Err(self.violation(format!(
                    "visit {index}: can_run={} for request {request:?} against {work:?}",
                    step.can_run
                )));
            }

            match (step.can_run, step.action) {
                (true, DetectionAction::Executed) => {
                    work = released(&work, &run.allocation[step.process]);
                },
                (false, DetectionAction::Waiting) => {},
                (can_run, action) => {
                    return Err(self.violation(format!(
                        "visit {index}: can_run={can_run} with action {action:?}"
                    )));
                },
            }

            if step.work_after != work {
                return Err(self.violation(format!(
                    "visit {index}: work_after {:?}, expected {work:?}",
                    step.work_after
                )));
            }
        }
        Ok(())
    }
}

/// Deadlocked processes are exactly the ones that never executed.
///
/// Every process either executes once or ends up deadlocked, and each
/// deadlocked process's request still exceeds the final work vector.
pub struct DeadlockedCannotRun;

impl Invariant<DetectionRun> for DeadlockedCannotRun {
    fn name(&self) -> &'static str {
        "DeadlockedCannotRun"
    }

    fn check(&self, run: &DetectionRun) -> InvariantResult {
        let trace = &run.trace;
        if trace.deadlock == trace.deadlocked.is_empty() {
            return Err(self.violation(format!(
                "deadlock={} with deadlocked {:?}",
                trace.deadlock, trace.deadlocked
            )));
        }

        let executed: Vec<usize> = trace
            .steps
            .iter()
            .filter(|s| s.action == DetectionAction::Executed)
            .map(|s| s.process)
            .collect();

        for process in 0..run.allocation.len() {
            let ran = executed.iter().filter(|&&p| p == process).count();
            let stuck = trace.deadlocked.contains(&process);
            if ran + usize::from(stuck) != 1 {
                return Err(self.violation(format!(
                    "process {process} executed {ran} times, deadlocked={stuck}"
                )));
            }
        }

        let work =
            trace.steps.last().map_or(run.available.as_slice(), |s| s.work_after.as_slice());
        for &process in &trace.deadlocked {
            if fits(&run.request[process], work) {
                return Err(self.violation(format!(
                    "deadlocked process {process} request {:?} fits final work {work:?}",
                    run.request[process]
                )));
            }
        }
        Ok(())
    }
}

/// One step per reference and the counters agree with the steps.
pub struct CountersAddUp;

impl Invariant<EvictionRun> for CountersAddUp {
    fn name(&self) -> &'static str {
        "CountersAddUp"
    }

    fn check(&self, run: &EvictionRun) -> InvariantResult {
        let trace = &run.trace;
        if trace.steps.len() != run.references.len() {
            return Err(self.violation(format!(
                "{} steps for {} references",
                trace.steps.len(),
                run.references.len()
            )));
        }

        let hits = trace.steps.iter().filter(|s| s.status == Status::Hit).count();
        if hits != trace.hits || trace.hits + trace.page_faults != trace.steps.len() {
            return Err(self.violation(format!(
                "hits={} faults={} but {hits} HIT steps of {}",
                trace.hits,
                trace.page_faults,
                trace.steps.len()
            )));
        }
        Ok(())
    }
}

/// Snapshots never exceed capacity and never hold a page twice.
pub struct FramesWithinCapacity;

impl Invariant<EvictionRun> for FramesWithinCapacity {
    fn name(&self) -> &'static str {
        "FramesWithinCapacity"
    }

    fn check(&self, run: &EvictionRun) -> InvariantResult {
        for (index, step) in run.trace.steps.iter().enumerate() {
            if step.frames.len() > run.trace.frame_count {
                return Err(self.violation(format!(
                    "step {index}: {} resident pages in {} frames",
                    step.frames.len(),
                    run.trace.frame_count
                )));
            }
            let distinct: HashSet<PageId> = step.frames.iter().copied().collect();
            if distinct.len() != step.frames.len() {
                return Err(self.violation(format!(
                    "step {index}: duplicate page in {:?}",
                    step.frames
                )));
            }
        }
        Ok(())
    }
}

/// HIT iff the page was resident before the step; hits change nothing.
pub struct HitMeansResident;

impl Invariant<EvictionRun> for HitMeansResident {
    fn name(&self) -> &'static str {
        "HitMeansResident"
    }

    fn check(&self, run: &EvictionRun) -> InvariantResult {
        let mut previous: &[PageId] = &[];

        for (index, step) in run.trace.steps.iter().enumerate() {
            let resident = previous.contains(&step.page);
            match (step.status, resident) {
                (Status::Hit, true) if step.frames != previous => {
                    return Err(self.violation(format!(
                        "step {index}: hit on {} changed frames {previous:?} -> {:?}",
                        step.page, step.frames
                    )));
                },
                (Status::Hit, true) | (Status::Miss, false) => {},
                (status, _) => {
                    return Err(self.violation(format!(
                        "step {index}: {} on page {} with frames {previous:?}",
                        status.name(),
                        step.page
                    )));
                },
            }
            previous = step.frames.as_slice();
        }
        Ok(())
    }
}

/// The referenced page sits in the reported slot after its step.
pub struct PageResidentAfterStep;

impl Invariant<EvictionRun> for PageResidentAfterStep {
    fn name(&self) -> &'static str {
        "PageResidentAfterStep"
    }

    fn check(&self, run: &EvictionRun) -> InvariantResult {
        for (index, (step, &page)) in run.trace.steps.iter().zip(&run.references).enumerate() {
            if step.page != page || step.frames.get(step.slot) != Some(&page) {
                return Err(self.violation(format!(
                    "step {index}: page {page} expected in slot {} of {:?}",
                    step.slot, step.frames
                )));
            }
        }
        Ok(())
    }
}

/// Evictions happen exactly on misses against a full frame table.
///
/// The evicted page must be the one that previously occupied the slot.
pub struct EvictionOnlyWhenFull;

impl Invariant<EvictionRun> for EvictionOnlyWhenFull {
    fn name(&self) -> &'static str {
        "EvictionOnlyWhenFull"
    }

    fn check(&self, run: &EvictionRun) -> InvariantResult {
        let capacity = run.trace.frame_count;
        let mut previous: &[PageId] = &[];

        for (index, step) in run.trace.steps.iter().enumerate() {
            let must_evict = step.status == Status::Miss && previous.len() == capacity;
            match step.evicted {
                Some(page) if must_evict && previous.get(step.slot) == Some(&page) => {},
                None if !must_evict => {},
                evicted => {
                    return Err(self.violation(format!(
                        "step {index}: evicted {evicted:?} from slot {} with frames {previous:?}",
                        step.slot
                    )));
                },
            }
            previous = step.frames.as_slice();
        }
        Ok(())
    }
}
