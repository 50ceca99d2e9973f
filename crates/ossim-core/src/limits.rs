//! Input size bounds.
//!
//! The engines are total for any well-formed input, but callers feeding
//! untrusted requests want to reject absurd sizes before allocating traces
//! proportional to them.

use crate::error::InputError;

/// Upper bounds applied to engine inputs before a run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of processes (rows) in a resource state
    pub max_processes: usize,
    /// Maximum number of resource types (columns)
    pub max_resources: usize,
    /// Maximum number of distinct nodes in a resource-allocation graph
    pub max_nodes: usize,
    /// Maximum number of physical frames
    pub max_frames: usize,
    /// Maximum length of a page-reference string
    pub max_references: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_processes: 1024,
            max_resources: 64,
            max_nodes: 4096,
            max_frames: 1024,
            max_references: 65_536,
        }
    }
}

impl Limits {
    /// Limits that accept any size.
    pub fn unbounded() -> Self {
        Self {
            max_processes: usize::MAX,
            max_resources: usize::MAX,
            max_nodes: usize::MAX,
            max_frames: usize::MAX,
            max_references: usize::MAX,
        }
    }

    pub(crate) fn check_processes(&self, actual: usize) -> Result<(), InputError> {
        bound("processes", actual, self.max_processes)
    }

    pub(crate) fn check_resources(&self, actual: usize) -> Result<(), InputError> {
        bound("resources", actual, self.max_resources)
    }

    pub(crate) fn check_nodes(&self, actual: usize) -> Result<(), InputError> {
        bound("nodes", actual, self.max_nodes)
    }

    pub(crate) fn check_frames(&self, actual: usize) -> Result<(), InputError> {
        bound("frames", actual, self.max_frames)
    }

    pub(crate) fn check_references(&self, actual: usize) -> Result<(), InputError> {
        bound("references", actual, self.max_references)
    }
}

fn bound(what: &'static str, actual: usize, limit: usize) -> Result<(), InputError> {
    if actual > limit {
        return Err(InputError::TooLarge { what, actual, limit });
    }
    Ok(())
}
