//! Seeded workload generation.
//!
//! Every generator draws from a `ChaCha8Rng`, so a seed fully determines the
//! workload. Generated inputs are always well-formed: matrices are
//! rectangular, counts are non-negative, and allocation never exceeds the
//! declared maximum.

use ossim_core::{InputError, PageId, Policy, ResourceGraph, ResourceState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Largest per-resource maximum demand drawn.
const MAX_DEMAND: i64 = 9;

/// Largest free count drawn per resource.
const MAX_FREE: i64 = 6;

/// Raw Banker's input before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankerWorkload {
    /// Free instances per resource type
    pub available: Vec<i64>,
    /// Maximum demand per process
    pub maximum: Vec<Vec<i64>>,
    /// Current allocation per process
    pub allocation: Vec<Vec<i64>>,
}

impl BankerWorkload {
    /// Validate into a [`ResourceState`].
    pub fn into_state(self) -> Result<ResourceState, InputError> {
        ResourceState::new(self.available, self.maximum, self.allocation)
    }
}

/// Raw matrix-detection input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionWorkload {
    /// Free instances per resource type
    pub available: Vec<i64>,
    /// Current allocation per process
    pub allocation: Vec<Vec<i64>>,
    /// Outstanding request per process
    pub request: Vec<Vec<i64>>,
}

/// Deterministic workload generator.
#[derive(Debug, Clone)]
pub struct WorkloadGen {
    rng: ChaCha8Rng,
}

impl WorkloadGen {
    /// Create a generator from a seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Banker's instance with `processes` rows over `resources` types.
    pub fn banker(&mut self, processes: usize, resources: usize) -> BankerWorkload {
        let available = self.vector(resources, MAX_FREE);
        let maximum: Vec<Vec<i64>> =
            (0..processes).map(|_| self.vector(resources, MAX_DEMAND)).collect();
        let allocation = maximum
            .iter()
            .map(|row| row.iter().map(|&max| self.rng.gen_range(0..=max)).collect())
            .collect();

        BankerWorkload { available, maximum, allocation }
    }

    /// Detection instance with `processes` rows over `resources` types.
    pub fn detection(&mut self, processes: usize, resources: usize) -> DetectionWorkload {
        DetectionWorkload {
            available: self.vector(resources, MAX_FREE),
            allocation: (0..processes).map(|_| self.vector(resources, MAX_FREE)).collect(),
            request: (0..processes).map(|_| self.vector(resources, MAX_FREE)).collect(),
        }
    }

    /// Graph over `nodes` named nodes where each ordered pair (self loops
    /// included) is an edge with probability `density`.
    pub fn graph(&mut self, nodes: usize, density: f64) -> ResourceGraph {
        let mut graph = ResourceGraph::new();
        for from in 0..nodes {
            for to in 0..nodes {
                if self.rng.gen_bool(density) {
                    graph.add_edge(node_name(from), node_name(to));
                }
            }
        }
        graph
    }

    /// Graph whose edges only run from lower to higher node numbers.
    ///
    /// Edges are added in random order, so insertion order (and therefore
    /// traversal order) is not topological.
    pub fn acyclic_graph(&mut self, nodes: usize, density: f64) -> ResourceGraph {
        let mut edges = Vec::new();
        for from in 0..nodes {
            for to in from + 1..nodes {
                if self.rng.gen_bool(density) {
                    edges.push((from, to));
                }
            }
        }
        for i in (1..edges.len()).rev() {
            edges.swap(i, self.rng.gen_range(0..=i));
        }
        ResourceGraph::from_edges(edges.into_iter().map(|(a, b)| (node_name(a), node_name(b))))
    }

    /// Reference string of `len` pages drawn from `0..distinct`.
    ///
    /// Half the references repeat one of the last few pages so that hits
    /// and replacement decisions both occur.
    pub fn references(&mut self, len: usize, distinct: PageId) -> Vec<PageId> {
        let mut references: Vec<PageId> = Vec::with_capacity(len);
        for _ in 0..len {
            let recent = references.len().min(4);
            let page = if recent > 0 && self.rng.gen_bool(0.5) {
                references[references.len() - 1 - self.rng.gen_range(0..recent)]
            } else {
                self.rng.gen_range(0..distinct.max(1))
            };
            references.push(page);
        }
        references
    }

    /// Uniformly chosen policy.
    pub fn policy(&mut self) -> Policy {
        Policy::ALL[self.rng.gen_range(0..Policy::ALL.len())]
    }

    /// Value in `low..=high`.
    pub fn between(&mut self, low: usize, high: usize) -> usize {
        self.rng.gen_range(low..=high)
    }

    fn vector(&mut self, len: usize, max: i64) -> Vec<i64> {
        (0..len).map(|_| self.rng.gen_range(0..=max)).collect()
    }
}

/// Name of generated node `index`.
pub fn node_name(index: usize) -> String {
    format!("N{index}")
}
