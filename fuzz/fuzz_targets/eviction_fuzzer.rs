//! Fuzz target for page replacement replay
//!
//! # Strategy
//!
//! - Arbitrary frame counts, including zero
//! - Arbitrary reference strings over a small page alphabet
//! - All three policies
//!
//! # Invariants
//!
//! - Zero frames and oversized strings are rejected, anything else replays
//!   to completion
//! - Every standard eviction invariant holds on the trace
//! - NEVER panic inside victim selection

#![no_main]

use libfuzzer_sys::fuzz_target;
use ossim_core::InputError;
use ossim_harness::{EvictionScenario, InvariantRegistry};

fuzz_target!(|scenario: EvictionScenario| {
    match scenario.run() {
        Ok(run) => {
            if let Err(violations) = InvariantRegistry::eviction().check_all(&run) {
                panic!("{scenario:?}: {violations:?}");
            }
        }
        Err(InputError::ZeroFrames) => assert_eq!(scenario.frames, 0),
        Err(InputError::TooLarge { .. }) => {}
        Err(err) => panic!("unexpected error for {scenario:?}: {err}"),
    }
});
