//! Deterministic engines for three classical resource-management algorithms.
//!
//! Each engine is a pure function from a fully-known workload to a
//! step-by-step trace plus a final verdict. Engines validate their whole
//! input up front and either fail with an [`InputError`] or return a complete
//! trace; there is no partial result.
//!
//! # Engines
//!
//! - [`banker`]: Banker's safety check. Searches for a safe completion order
//!   and records the work vector around every admission.
//! - [`deadlock`]: cycle detection over a resource-allocation graph, plus
//!   matrix-based detection for counted resources.
//! - [`paging`]: page replacement replay under FIFO, LRU or Optimal.
//!
//! # Determinism
//!
//! No engine reads the clock, draws randomness, or iterates a hash map in
//! an order that reaches the output. Identical input always produces an
//! identical trace.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod banker;
pub mod deadlock;
pub mod error;
pub mod limits;
pub mod paging;

pub use banker::{ResourceState, SafetyStep, SafetyTrace};
pub use deadlock::{
    DeadlockReport, DetectionAction, DetectionStep, DetectionTrace, ResourceGraph,
};
pub use error::{ErrorClass, InputError, Matrix};
pub use limits::Limits;
pub use paging::{PageId, Policy, ProcessReferences, ReferenceStep, ReferenceTrace, Status};
