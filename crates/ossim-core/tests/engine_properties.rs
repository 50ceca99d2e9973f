//! Property tests for engine-level guarantees.
//!
//! Every engine is a pure function of its input. These tests check
//! determinism, insensitivity to unrelated input, and the relationships
//! between the single- and multi-process paging entry points.

use ossim_core::{
    Limits, Policy, ProcessReferences, ResourceGraph, banker, deadlock::matrix, paging,
};
use ossim_harness::{WorkloadGen, node_name};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Running the safety scan twice yields identical traces.
    #[test]
    fn prop_safety_scan_is_deterministic(seed in any::<u64>(), processes in 0..8usize) {
        let workload = WorkloadGen::with_seed(seed).banker(processes, 3);

        let first = banker::check(&workload.available, &workload.maximum, &workload.allocation);
        let second = banker::check(&workload.available, &workload.maximum, &workload.allocation);

        prop_assert_eq!(first, second);
    }

    /// More free resources never turn a safe state unsafe.
    #[test]
    fn prop_extra_resources_preserve_safety(seed in any::<u64>(), processes in 1..8usize) {
        let workload = WorkloadGen::with_seed(seed).banker(processes, 3);
        let before =
            banker::check(&workload.available, &workload.maximum, &workload.allocation).unwrap();

        let richer: Vec<i64> = workload.available.iter().map(|free| free + 1).collect();
        let after = banker::check(&richer, &workload.maximum, &workload.allocation).unwrap();

        prop_assert!(!before.safe || after.safe);
    }

    /// Rebuilding the same graph reports the same cycle.
    #[test]
    fn prop_cycle_report_is_stable(seed in any::<u64>(), nodes in 0..16usize) {
        let graph = WorkloadGen::with_seed(seed).graph(nodes, 0.15);
        let rebuilt = ResourceGraph::from_edges(
            graph
                .nodes()
                .flat_map(|node| graph.successors(node).map(move |next| (node, next)))
                .collect::<Vec<_>>(),
        );

        prop_assert_eq!(graph.detect(), graph.detect());
        prop_assert_eq!(graph.detect().deadlock, rebuilt.detect().deadlock);
    }

    /// A process whose request is zero always executes.
    #[test]
    fn prop_zero_request_never_deadlocks(seed in any::<u64>(), processes in 1..8usize) {
        let mut workload = WorkloadGen::with_seed(seed).detection(processes, 2);
        workload.request[0] = vec![0, 0];

        let trace =
            matrix::detect(&workload.available, &workload.allocation, &workload.request).unwrap();

        prop_assert!(!trace.deadlocked.contains(&0));
    }

    /// A single process through the multi-process entry point replays
    /// exactly like the plain entry point, apart from the owner tag.
    #[test]
    fn prop_single_process_matches_plain_replay(
        seed in any::<u64>(),
        frames in 1..5usize,
        len in 0..40usize,
    ) {
        let mut workload = WorkloadGen::with_seed(seed);
        let policy = workload.policy();
        let pages = workload.references(len, 6);

        let plain = paging::simulate(&pages, frames, policy).unwrap();
        let processes = [ProcessReferences { pid: 7, pages }];
        let tagged =
            paging::simulate_processes(&processes, frames, policy, &Limits::default()).unwrap();

        prop_assert_eq!(plain.hits, tagged.hits);
        prop_assert_eq!(plain.page_faults, tagged.page_faults);
        for (a, b) in plain.steps.iter().zip(&tagged.steps) {
            prop_assert_eq!(&a.frames, &b.frames);
            prop_assert_eq!(b.process, Some(7));
        }
    }
}

#[test]
fn long_cycle_is_found_without_recursion() {
    let length = 100_000;
    let mut graph = ResourceGraph::new();
    for i in 0..length {
        graph.add_edge(node_name(i), node_name((i + 1) % length));
    }

    let report = graph.detect();

    assert!(report.deadlock);
    assert_eq!(report.members().len(), length);
    assert_eq!(report.cycle.first(), report.cycle.last());
}

#[test]
fn unbounded_limits_accept_large_reference_strings() {
    let references: Vec<i64> = (0..100_000).map(|i| i % 17).collect();

    let trace =
        paging::simulate_with_limits(&references, 16, Policy::Lru, &Limits::unbounded()).unwrap();

    assert_eq!(trace.steps.len(), references.len());
    assert!(paging::simulate(&references, 16, Policy::Lru).is_err());
}
