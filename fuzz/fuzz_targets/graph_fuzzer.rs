//! Fuzz target for cycle detection
//!
//! # Strategy
//!
//! - Arbitrary edge lists over up to 256 nodes
//! - Self loops and duplicate edges
//!
//! # Invariants
//!
//! - A reported cycle is closed and follows real edges
//! - No report means the graph is acyclic
//! - Detection is stable across repeated runs

#![no_main]

use libfuzzer_sys::fuzz_target;
use ossim_harness::{GraphScenario, InvariantRegistry};

fuzz_target!(|scenario: GraphScenario| {
    let run = scenario.run();

    if let Err(violations) = InvariantRegistry::deadlock().check_all(&run) {
        panic!("{scenario:?}: {violations:?}");
    }
    assert_eq!(run.report, run.graph.detect());
});
