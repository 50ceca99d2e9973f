//! Invariant checking for engine runs.
//!
//! Invariants are properties that must hold for every run of an engine,
//! whatever the input. Unlike example-based tests that pin specific traces,
//! they verify behavioral properties across arbitrary workloads.
//!
//! # Architecture
//!
//! A run captures an engine's input together with its output (see
//! [`SafetyRun`], [`DeadlockRun`], [`DetectionRun`], [`EvictionRun`]). An
//! [`InvariantRegistry`] holds the checks for one kind of run and reports
//! every [`Violation`] found.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::eviction();
//! let run = EvictionRun::execute(vec![1, 2, 3, 1], 2, Policy::Lru)?;
//! registry.check_all(&run)?;
//! ```

mod checks;
mod runs;

pub use checks::{
    AcyclicWhenClear, AdmissionsReplay, CountersAddUp, CycleFollowsEdges, DeadlockedCannotRun,
    EvictionOnlyWhenFull, ExecutedProcessesFit, FramesWithinCapacity, HitMeansResident,
    PageResidentAfterStep, VerdictMatchesAdmissions,
};
pub use runs::{DeadlockRun, DetectionRun, EvictionRun, SafetyRun};

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Invariant violation with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// An invariant over runs of type `R`.
pub trait Invariant<R>: Send + Sync {
    /// Invariant name for error reporting.
    fn name(&self) -> &'static str;

    /// Check the invariant against a finished run.
    ///
    /// Returns `Ok(())` if the invariant holds, or a [`Violation`]
    /// describing what went wrong.
    fn check(&self, run: &R) -> InvariantResult;

    /// Build a violation attributed to this invariant.
    fn violation(&self, message: String) -> Violation {
        Violation { invariant: self.name(), message }
    }
}

/// Registry of invariants for one kind of run.
pub struct InvariantRegistry<R> {
    invariants: Vec<Box<dyn Invariant<R>>>,
}

impl<R> Default for InvariantRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> InvariantRegistry<R> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant<R> + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against the given run.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(&self, run: &R) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(run).err()).collect();

        for violation in &violations {
            tracing::warn!(
                invariant = violation.invariant,
                message = %violation.message,
                "invariant violated"
            );
        }

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Check all invariants, panicking with every violation.
    ///
    /// Use this in tests where you want immediate failure with context.
    pub fn assert_all(&self, run: &R, context: &str) {
        if let Err(violations) = self.check_all(run) {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("Invariant violation {context}:\n  {}", messages.join("\n  "));
        }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

impl InvariantRegistry<SafetyRun> {
    /// Standard Banker's invariants.
    ///
    /// Includes:
    /// - [`AdmissionsReplay`]: every admission fits and releases exactly its allocation
    /// - [`VerdictMatchesAdmissions`]: safe iff all admitted once; unsafe is genuine
    pub fn safety() -> Self {
        let mut registry = Self::new();
        registry.add(AdmissionsReplay);
        registry.add(VerdictMatchesAdmissions);
        registry
    }
}

impl InvariantRegistry<DeadlockRun> {
    /// Standard graph deadlock invariants.
    ///
    /// Includes:
    /// - [`CycleFollowsEdges`]: a reported cycle is closed and uses real edges
    /// - [`AcyclicWhenClear`]: no report means the graph really is acyclic
    pub fn deadlock() -> Self {
        let mut registry = Self::new();
        registry.add(CycleFollowsEdges);
        registry.add(AcyclicWhenClear);
        registry
    }
}

impl InvariantRegistry<DetectionRun> {
    /// Standard matrix detection invariants.
    ///
    /// Includes:
    /// - [`ExecutedProcessesFit`]: every executed process's request fit `work`
    /// - [`DeadlockedCannotRun`]: deadlocked processes stay blocked at the end
    pub fn detection() -> Self {
        let mut registry = Self::new();
        registry.add(ExecutedProcessesFit);
        registry.add(DeadlockedCannotRun);
        registry
    }
}

impl InvariantRegistry<EvictionRun> {
    /// Standard page replacement invariants.
    ///
    /// Includes:
    /// - [`CountersAddUp`]: one step per reference, hits + faults = steps
    /// - [`FramesWithinCapacity`]: snapshots never exceed the frame count
    /// - [`HitMeansResident`]: HIT iff the page was resident before the step
    /// - [`PageResidentAfterStep`]: the page sits in its reported slot
    /// - [`EvictionOnlyWhenFull`]: evictions happen exactly on full-table misses
    pub fn eviction() -> Self {
        let mut registry = Self::new();
        registry.add(CountersAddUp);
        registry.add(FramesWithinCapacity);
        registry.add(HitMeansResident);
        registry.add(PageResidentAfterStep);
        registry.add(EvictionOnlyWhenFull);
        registry
    }
}
