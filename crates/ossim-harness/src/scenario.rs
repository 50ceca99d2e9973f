//! Arbitrary scenarios for fuzzing.
//!
//! Scenarios are byte-level descriptions decoded with `arbitrary`. They are
//! not guaranteed to be valid input: ragged rows and over-allocation are
//! reachable, so fuzzing exercises validation as well as the
//! engines. Sizes are kept small by using `u8` throughout.

use arbitrary::Arbitrary;
use ossim_core::{InputError, PageId, Policy, ResourceGraph, ResourceState};

use crate::invariants::{DeadlockRun, DetectionRun, EvictionRun, SafetyRun};

/// Page replacement scenario.
#[derive(Debug, Clone, Arbitrary)]
pub struct EvictionScenario {
    /// Frame count (zero is reachable and must be rejected)
    pub frames: u8,
    /// Index into [`Policy::ALL`], taken modulo its length
    pub policy: u8,
    /// Reference string
    pub references: Vec<u8>,
}

impl EvictionScenario {
    /// Policy selected by this scenario.
    pub fn policy(&self) -> Policy {
        Policy::ALL[usize::from(self.policy) % Policy::ALL.len()]
    }

    /// Replay the scenario.
    pub fn run(&self) -> Result<EvictionRun, InputError> {
        let references: Vec<PageId> = self.references.iter().map(|&p| PageId::from(p)).collect();
        EvictionRun::execute(references, usize::from(self.frames), self.policy())
    }
}

/// Banker's scenario. Matrix rows may be ragged.
#[derive(Debug, Clone, Arbitrary)]
pub struct SafetyScenario {
    /// Free instances per resource type
    pub available: Vec<u8>,
    /// Maximum demand rows
    pub maximum: Vec<Vec<u8>>,
    /// Allocation rows
    pub allocation: Vec<Vec<u8>>,
}

impl SafetyScenario {
    /// Validate and scan the scenario.
    pub fn run(&self) -> Result<SafetyRun, InputError> {
        let state = ResourceState::new(
            widen(&self.available),
            widen_rows(&self.maximum),
            widen_rows(&self.allocation),
        )?;
        Ok(SafetyRun::execute(state))
    }
}

/// Graph scenario over at most 256 nodes.
#[derive(Debug, Clone, Arbitrary)]
pub struct GraphScenario {
    /// Edges as `(from, to)` node numbers
    pub edges: Vec<(u8, u8)>,
}

impl GraphScenario {
    /// Build the graph and run detection.
    pub fn run(&self) -> DeadlockRun {
        let graph = ResourceGraph::from_edges(
            self.edges.iter().map(|&(from, to)| (format!("N{from}"), format!("N{to}"))),
        );
        DeadlockRun::execute(graph)
    }
}

/// Matrix detection scenario. Matrix rows may be ragged.
#[derive(Debug, Clone, Arbitrary)]
pub struct DetectionScenario {
    /// Free instances per resource type
    pub available: Vec<u8>,
    /// Allocation rows
    pub allocation: Vec<Vec<u8>>,
    /// Request rows
    pub request: Vec<Vec<u8>>,
}

impl DetectionScenario {
    /// Validate and run detection.
    pub fn run(&self) -> Result<DetectionRun, InputError> {
        DetectionRun::execute(
            widen(&self.available),
            widen_rows(&self.allocation),
            widen_rows(&self.request),
        )
    }
}

fn widen(row: &[u8]) -> Vec<i64> {
    row.iter().map(|&v| i64::from(v)).collect()
}

fn widen_rows(rows: &[Vec<u8>]) -> Vec<Vec<i64>> {
    rows.iter().map(|row| widen(row)).collect()
}

#[cfg(test)]
mod tests {
    use arbitrary::Unstructured;

    use super::*;

    #[test]
    fn zero_frames_scenario_is_rejected() {
        let scenario = EvictionScenario { frames: 0, policy: 0, references: vec![1] };
        assert_eq!(scenario.run().unwrap_err(), InputError::ZeroFrames);
    }

    #[test]
    fn policy_index_wraps() {
        let scenario = EvictionScenario { frames: 1, policy: 4, references: vec![] };
        assert_eq!(scenario.policy(), Policy::Lru);
    }

    #[test]
    fn decodes_from_raw_bytes() {
        let bytes: Vec<u8> = (0..=255).collect();
        let mut u = Unstructured::new(&bytes);
        let scenario = GraphScenario::arbitrary(&mut u).unwrap();

        let run = scenario.run();
        assert!(run.graph.edge_count() <= scenario.edges.len());
    }

    #[test]
    fn ragged_banker_scenario_is_rejected() {
        let scenario = SafetyScenario {
            available: vec![1, 1],
            maximum: vec![vec![1]],
            allocation: vec![vec![0, 0]],
        };
        assert!(scenario.run().is_err());
    }
}
