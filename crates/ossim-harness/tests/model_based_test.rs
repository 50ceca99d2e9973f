//! Model-based property tests for page replacement.
//!
//! Random reference strings are replayed through both the engine and the
//! naive queue model, and their observable outcomes are compared.
//!
//! ```text
//! proptest generates: Vec<PageId>
//!                          │
//!           ┌──────────────┼──────────────┐
//!           ▼              ▼              ▼
//!      ModelMemory     simulate()      Compare
//!      (reference)     (slots)         outcomes
//! ```

use ossim_core::{PageId, Policy, ReferenceTrace, Status, paging};
use ossim_harness::ModelMemory;
use proptest::prelude::*;

fn reference_strategy() -> impl Strategy<Value = Vec<PageId>> {
    prop::collection::vec(0..10i64, 0..80)
}

fn sorted_frames(trace: &ReferenceTrace) -> Vec<Vec<PageId>> {
    trace
        .steps
        .iter()
        .map(|step| {
            let mut frames = step.frames.clone();
            frames.sort_unstable();
            frames
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// FIFO and LRU match the model reference for reference.
    #[test]
    fn prop_queue_policies_match_model(
        references in reference_strategy(),
        frames in 1..6usize,
        lru in any::<bool>(),
    ) {
        let policy = if lru { Policy::Lru } else { Policy::Fifo };
        let trace = paging::simulate(&references, frames, policy).unwrap();
        let model = ModelMemory::run(frames, policy, &references);

        let real_hits: Vec<bool> = trace.steps.iter().map(|s| s.status == Status::Hit).collect();
        let model_hits: Vec<bool> = model.iter().map(|s| s.hit).collect();
        prop_assert_eq!(real_hits, model_hits, "hit/miss divergence under {}", policy);

        let model_resident: Vec<Vec<PageId>> = model.into_iter().map(|s| s.resident).collect();
        prop_assert_eq!(sorted_frames(&trace), model_resident, "resident set divergence");
    }

    /// Optimal reaches the same (minimal) fault count as the model.
    #[test]
    fn prop_optimal_fault_count_matches_model(
        references in reference_strategy(),
        frames in 1..6usize,
    ) {
        let trace = paging::simulate(&references, frames, Policy::Optimal).unwrap();
        let model = ModelMemory::run(frames, Policy::Optimal, &references);
        let model_faults = model.iter().filter(|s| !s.hit).count();

        prop_assert_eq!(trace.page_faults, model_faults);
    }

    /// Optimal never faults more than FIFO or LRU.
    #[test]
    fn prop_optimal_is_a_lower_bound(
        references in reference_strategy(),
        frames in 1..6usize,
    ) {
        let faults =
            |policy: Policy| paging::simulate(&references, frames, policy).unwrap().page_faults;
        let optimal = faults(Policy::Optimal);

        // ORACLE: Belady's algorithm is optimal over all policies
        prop_assert!(optimal <= faults(Policy::Fifo));
        prop_assert!(optimal <= faults(Policy::Lru));
    }

    /// LRU is a stack algorithm: more frames never means more faults.
    #[test]
    fn prop_lru_has_no_belady_anomaly(
        references in reference_strategy(),
        frames in 1..6usize,
    ) {
        let fewer = paging::simulate(&references, frames, Policy::Lru).unwrap().page_faults;
        let more = paging::simulate(&references, frames + 1, Policy::Lru).unwrap().page_faults;

        prop_assert!(more <= fewer);
    }
}
