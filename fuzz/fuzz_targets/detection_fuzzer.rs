//! Fuzz target for matrix deadlock detection
//!
//! # Strategy
//!
//! - Ragged allocation and request matrices
//! - Arbitrary counts per resource
//!
//! # Invariants
//!
//! - Every visit is consistent with the running work vector
//! - Deadlocked processes are exactly the ones that never executed

#![no_main]

use libfuzzer_sys::fuzz_target;
use ossim_harness::{DetectionScenario, InvariantRegistry};

fuzz_target!(|scenario: DetectionScenario| {
    let Ok(run) = scenario.run() else {
        return;
    };

    if let Err(violations) = InvariantRegistry::detection().check_all(&run) {
        panic!("{scenario:?}: {violations:?}");
    }
});
