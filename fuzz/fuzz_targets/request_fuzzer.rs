//! Fuzz target for the request dispatcher
//!
//! # Strategy
//!
//! - Completely arbitrary bytes as the request body
//! - Valid JSON prefixes with arbitrary sections
//!
//! # Invariants
//!
//! - Decoding and dispatch either succeed or return an error
//! - A successful response always encodes as valid JSON
//! - NEVER panic on malformed requests

#![no_main]

use libfuzzer_sys::fuzz_target;
use ossim_cli::{OutputFormat, handle};
use ossim_core::Limits;

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_processes: 64,
        max_resources: 16,
        max_nodes: 256,
        max_frames: 64,
        max_references: 1024,
    };

    if let Ok(encoded) = handle(data, &limits, OutputFormat::Json, true) {
        assert!(std::str::from_utf8(&encoded).is_ok());
    }
});
