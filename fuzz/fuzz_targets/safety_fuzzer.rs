//! Fuzz target for the Banker's safety scan
//!
//! # Strategy
//!
//! - Ragged matrices and mismatched row counts
//! - Allocation above the declared maximum
//! - Well-formed states of arbitrary size
//!
//! # Invariants
//!
//! - Malformed input returns an error, never a trace
//! - Every admission in a trace replays against `available`
//! - The verdict agrees with the admissions

#![no_main]

use libfuzzer_sys::fuzz_target;
use ossim_harness::{InvariantRegistry, SafetyScenario};

fuzz_target!(|scenario: SafetyScenario| {
    let Ok(run) = scenario.run() else {
        return;
    };

    if let Err(violations) = InvariantRegistry::safety().check_all(&run) {
        panic!("{scenario:?}: {violations:?}");
    }
});
