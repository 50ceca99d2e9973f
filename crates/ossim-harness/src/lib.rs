//! Property and model-based testing harness for the ossim engines.
//!
//! # Invariant Testing
//!
//! The `invariants` module captures engine runs (input plus trace) and
//! checks behavioral properties over them. Invariants verify WHAT must be
//! true of any trace, not specific scenarios. Use the standard registries
//! ([`InvariantRegistry::safety`], [`InvariantRegistry::eviction`], ...) for
//! the common checks.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a naive page replacement oracle. Reference
//! strings are applied to both the model and the real engine, and their
//! observable outcomes are compared.
//!
//! # Workloads
//!
//! [`WorkloadGen`] produces seeded, well-formed inputs for every engine.
//! [`scenario`] types decode arbitrary bytes into possibly malformed input
//! for fuzzing.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod model;
pub mod scenario;
pub mod workload;

pub use invariants::{
    DeadlockRun, DetectionRun, EvictionRun, Invariant, InvariantRegistry, InvariantResult,
    SafetyRun, Violation,
};
pub use model::{ModelMemory, ModelStep};
pub use scenario::{DetectionScenario, EvictionScenario, GraphScenario, SafetyScenario};
pub use workload::{BankerWorkload, DetectionWorkload, WorkloadGen, node_name};
