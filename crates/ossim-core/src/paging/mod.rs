//! Page replacement simulation.
//!
//! Replays a reference string against a fixed number of frames under one
//! [`Policy`], recording a full frame snapshot after every reference.
//!
//! Flow per reference: look the page up in the frames (linear scan). On a hit
//! only policy bookkeeping changes. On a miss the page goes into the first
//! empty slot if there is one, otherwise into the slot chosen by the policy.
//! Slots fill strictly left to right, so a snapshot is always the occupied
//! prefix of the frame table in slot order.

mod policy;

pub use policy::Policy;

use crate::{error::InputError, limits::Limits};

/// Page identifier.
pub type PageId = i64;

/// Whether a reference found its page resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Page was already resident
    Hit,
    /// Page had to be loaded (page fault)
    Miss,
}

impl Status {
    /// Canonical upper-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
        }
    }
}

/// State after one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceStep {
    /// Referenced page
    pub page: PageId,
    /// Hit or miss
    pub status: Status,
    /// Slot holding `page` after this step
    pub slot: usize,
    /// Page displaced to make room, if a full frame table was hit by a miss
    pub evicted: Option<PageId>,
    /// Owning process for multi-process workloads
    pub process: Option<u32>,
    /// Frame contents in slot order after this step
    pub frames: Vec<PageId>,
}

/// Complete replay of a reference string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTrace {
    /// Policy used for the whole run
    pub policy: Policy,
    /// Number of frames
    pub frame_count: usize,
    /// One record per reference, in order
    pub steps: Vec<ReferenceStep>,
    /// References that found their page resident
    pub hits: usize,
    /// References that had to load their page
    pub page_faults: usize,
}

impl ReferenceTrace {
    /// Fraction of references that hit, or 0 for an empty string.
    pub fn hit_ratio(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        self.hits as f64 / self.steps.len() as f64
    }

    /// Frame contents after the last reference.
    pub fn final_frames(&self) -> &[PageId] {
        self.steps.last().map_or(&[][..], |step| step.frames.as_slice())
    }
}

/// Reference string belonging to one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReferences {
    /// Process identifier carried into each step
    pub pid: u32,
    /// Pages referenced by the process, in order
    pub pages: Vec<PageId>,
}

/// Replay `references` with default limits.
pub fn simulate(
    references: &[PageId],
    frame_count: usize,
    policy: Policy,
) -> Result<ReferenceTrace, InputError> {
    simulate_with_limits(references, frame_count, policy, &Limits::default())
}

/// Replay `references` against `frame_count` frames under `policy`.
pub fn simulate_with_limits(
    references: &[PageId],
    frame_count: usize,
    policy: Policy,
    limits: &Limits,
) -> Result<ReferenceTrace, InputError> {
    validate(references.len(), frame_count, limits)?;
    Ok(replay(references, &[], frame_count, policy))
}

/// Replay several processes through one shared frame pool.
///
/// Processes run back to back in the given order. Policy state carries over
/// process boundaries and is never reset per process, and Optimal looks ahead
/// across the whole concatenated sequence, so a later process's reuse of a
/// page keeps it resident.
pub fn simulate_processes(
    processes: &[ProcessReferences],
    frame_count: usize,
    policy: Policy,
    limits: &Limits,
) -> Result<ReferenceTrace, InputError> {
    let total: usize = processes.iter().map(|p| p.pages.len()).sum();
    validate(total, frame_count, limits)?;

    let mut references = Vec::with_capacity(total);
    let mut owners = Vec::with_capacity(total);
    for process in processes {
        references.extend_from_slice(&process.pages);
        owners.extend(std::iter::repeat_n(process.pid, process.pages.len()));
    }

    Ok(replay(&references, &owners, frame_count, policy))
}

fn validate(references: usize, frame_count: usize, limits: &Limits) -> Result<(), InputError> {
    if frame_count == 0 {
        return Err(InputError::ZeroFrames);
    }
    limits.check_frames(frame_count)?;
    limits.check_references(references)
}

/// Shared replay loop. `owners` is either empty or parallel to `references`.
fn replay(
    references: &[PageId],
    owners: &[u32],
    frame_count: usize,
    policy: Policy,
) -> ReferenceTrace {
    debug_assert!(frame_count > 0);
    debug_assert!(owners.is_empty() || owners.len() == references.len());

    let mut replacement = policy.replacement(frame_count);
    let mut frames: Vec<PageId> = Vec::with_capacity(frame_count);
    let mut steps = Vec::with_capacity(references.len());
    let mut hits = 0;
    let mut page_faults = 0;

    for (position, &page) in references.iter().enumerate() {
        let (status, slot, evicted) = match frames.iter().position(|&resident| resident == page) {
            Some(slot) => {
                hits += 1;
                replacement.on_hit(slot, position);
                (Status::Hit, slot, None)
            },
            None if frames.len() < frame_count => {
                page_faults += 1;
                let slot = frames.len();
                frames.push(page);
                replacement.on_load(slot, position);
                (Status::Miss, slot, None)
            },
            None => {
                page_faults += 1;
                let slot = replacement.victim(&frames, position, references);
                let evicted = std::mem::replace(&mut frames[slot], page);
                replacement.on_load(slot, position);
                tracing::trace!(position, page, slot, evicted, %policy, "evicted");
                (Status::Miss, slot, Some(evicted))
            },
        };

        debug_assert!(frames.len() <= frame_count);
        debug_assert_eq!(frames[slot], page);

        steps.push(ReferenceStep {
            page,
            status,
            slot,
            evicted,
            process: owners.get(position).copied(),
            frames: frames.clone(),
        });
    }

    tracing::debug!(
        %policy,
        frame_count,
        references = references.len(),
        hits,
        page_faults,
        "replacement replay complete"
    );

    ReferenceTrace { policy, frame_count, steps, hits, page_faults }
}
