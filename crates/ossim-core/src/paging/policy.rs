//! Victim selection for the replacement policies.
//!
//! Each policy keeps its own bookkeeping keyed by frame slot. `victim` is
//! only called when every slot is occupied, and always returns an index in
//! `0..frames.len()`.

use std::{fmt, str::FromStr};

use super::PageId;
use crate::error::InputError;

/// Page replacement policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Evict the page that has been resident longest
    Fifo,
    /// Evict the page whose last use is oldest
    Lru,
    /// Evict the page whose next use is farthest away (or never comes)
    Optimal,
}

impl Policy {
    /// All policies, in canonical order.
    pub const ALL: [Self; 3] = [Self::Fifo, Self::Lru, Self::Optimal];

    /// Canonical upper-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fifo => "FIFO",
            Self::Lru => "LRU",
            Self::Optimal => "OPTIMAL",
        }
    }

    pub(crate) fn replacement(self, frame_count: usize) -> Box<dyn Replacement> {
        match self {
            Self::Fifo => Box::new(Fifo::default()),
            Self::Lru => Box::new(Lru { last_used: vec![0; frame_count] }),
            Self::Optimal => Box::new(Optimal),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FIFO" => Ok(Self::Fifo),
            "LRU" => Ok(Self::Lru),
            "OPTIMAL" | "OPT" => Ok(Self::Optimal),
            _ => Err(InputError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Per-run replacement bookkeeping.
pub(crate) trait Replacement {
    /// The page in `slot` was referenced at `position` and was resident.
    fn on_hit(&mut self, slot: usize, position: usize);

    /// A page was loaded into `slot` at `position`.
    fn on_load(&mut self, slot: usize, position: usize);

    /// Pick the slot to evict for the reference at `position`.
    ///
    /// Pre: `frames` is full and non-empty.
    fn victim(&mut self, frames: &[PageId], position: usize, references: &[PageId]) -> usize;
}

/// First-in first-out.
///
/// Slots fill left to right and every replacement makes the victim slot the
/// newest arrival, so arrival order over slots is a rotation. A cursor over
/// slot indices is the whole queue.
#[derive(Debug, Default)]
struct Fifo {
    oldest: usize,
}

impl Replacement for Fifo {
    fn on_hit(&mut self, _slot: usize, _position: usize) {}

    fn on_load(&mut self, _slot: usize, _position: usize) {}

    fn victim(&mut self, frames: &[PageId], _position: usize, _references: &[PageId]) -> usize {
        let slot = self.oldest;
        self.oldest = (self.oldest + 1) % frames.len();
        slot
    }
}

/// Least recently used, with ties going to the lowest slot.
#[derive(Debug)]
struct Lru {
    last_used: Vec<usize>,
}

impl Replacement for Lru {
    fn on_hit(&mut self, slot: usize, position: usize) {
        self.last_used[slot] = position;
    }

    fn on_load(&mut self, slot: usize, position: usize) {
        self.last_used[slot] = position;
    }

    fn victim(&mut self, frames: &[PageId], _position: usize, _references: &[PageId]) -> usize {
        (1..frames.len()).fold(0, |best, slot| {
            if self.last_used[slot] < self.last_used[best] { slot } else { best }
        })
    }
}

/// Belady's optimal policy.
///
/// Scans slots left to right. The first resident page that is never
/// referenced again is chosen immediately; otherwise the page with the
/// farthest next reference wins, ties going to the lowest slot.
#[derive(Debug)]
struct Optimal;

impl Replacement for Optimal {
    fn on_hit(&mut self, _slot: usize, _position: usize) {}

    fn on_load(&mut self, _slot: usize, _position: usize) {}

    fn victim(&mut self, frames: &[PageId], position: usize, references: &[PageId]) -> usize {
        let future = &references[position + 1..];
        let mut victim = 0;
        let mut farthest = None;

        for (slot, page) in frames.iter().enumerate() {
            match future.iter().position(|next| next == page) {
                None => return slot,
                Some(distance) => {
                    if farthest.is_none_or(|best| distance > best) {
                        farthest = Some(distance);
                        victim = slot;
                    }
                },
            }
        }
        victim
    }
}
