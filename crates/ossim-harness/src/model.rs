//! Reference model for page replacement.
//!
//! A naive implementation used as an oracle in model-based
//! tests. It tracks resident pages as an ordered queue instead of slots:
//!
//! - FIFO: queue in arrival order; evict the front.
//! - LRU: queue in recency order; a hit moves the page to the back.
//! - Optimal: evict any page with the farthest next use.
//!
//! The model has no notion of slots, so only observable quantities are
//! compared: hit/miss per reference and the resident set after each step.
//! Optimal ties may legitimately resolve differently, so for Optimal only
//! the fault count is a valid comparison.

use std::collections::VecDeque;

use ossim_core::{PageId, Policy};

/// Observable outcome of one reference in the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStep {
    /// Whether the page was already resident
    pub hit: bool,
    /// Resident pages after the reference, sorted
    pub resident: Vec<PageId>,
}

/// Naive page replacement oracle.
#[derive(Debug, Clone)]
pub struct ModelMemory {
    capacity: usize,
    policy: Policy,
    queue: VecDeque<PageId>,
}

impl ModelMemory {
    /// Empty memory with `capacity` frames.
    pub fn new(capacity: usize, policy: Policy) -> Self {
        Self { capacity, policy, queue: VecDeque::with_capacity(capacity) }
    }

    /// Replay a whole reference string.
    pub fn run(capacity: usize, policy: Policy, references: &[PageId]) -> Vec<ModelStep> {
        let mut model = Self::new(capacity, policy);
        (0..references.len()).map(|position| model.reference(references, position)).collect()
    }

    /// Apply `references[position]`, looking ahead into the rest of the slice.
    pub fn reference(&mut self, references: &[PageId], position: usize) -> ModelStep {
        let page = references[position];
        let hit = match self.queue.iter().position(|&p| p == page) {
            Some(index) => {
                if self.policy == Policy::Lru {
                    self.queue.remove(index);
                    self.queue.push_back(page);
                }
                true
            },
            None => {
                if self.capacity > 0 && self.queue.len() == self.capacity {
                    let index = match self.policy {
                        Policy::Fifo | Policy::Lru => 0,
                        Policy::Optimal => self.farthest(&references[position + 1..]),
                    };
                    self.queue.remove(index);
                }
                self.queue.push_back(page);
                false
            },
        };

        let mut resident: Vec<PageId> = self.queue.iter().copied().collect();
        resident.sort_unstable();
        ModelStep { hit, resident }
    }

    /// Queue index of the page used farthest in the future (never counts as
    /// infinitely far).
    fn farthest(&self, future: &[PageId]) -> usize {
        let distance = |page: &PageId| future.iter().position(|p| p == page).unwrap_or(usize::MAX);
        self.queue
            .iter()
            .enumerate()
            .max_by_key(|&(_, page)| distance(page))
            .map_or(0, |(index, _)| index)
    }
}
