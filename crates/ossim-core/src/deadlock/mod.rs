//! Deadlock detection.
//!
//! Two detectors share this module:
//!
//! - [`graph`]: single-instance resources, modelled as a directed
//!   resource-allocation graph; a cycle is a deadlock.
//! - [`matrix`]: counted resources, modelled as allocation and request
//!   matrices; processes that can never be satisfied are deadlocked.

pub mod graph;
pub mod matrix;

pub use graph::{DeadlockReport, ResourceGraph};
pub use matrix::{DetectionAction, DetectionStep, DetectionTrace};
