//! Cycle detection over a resource-allocation (wait-for) graph.
//!
//! Nodes are interned in first-insertion order and every traversal visits
//! roots and successors in that order, so the reported cycle is stable across
//! runs for the same sequence of `add_edge` calls.
//!
//! The traversal uses an explicit stack instead of recursion. Each path entry
//! carries a cursor into its successor list; a node leaves the path only once
//! all successors are exhausted and is never pushed again, which bounds the
//! work at O(V + E).

use std::collections::HashMap;

use crate::{error::InputError, limits::Limits};

/// Outcome of a deadlock check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeadlockReport {
    /// Whether a cycle was found
    pub deadlock: bool,
    /// Closed cycle (first node repeated at the end); empty if none
    pub cycle: Vec<String>,
}

impl DeadlockReport {
    /// Report for an acyclic graph.
    pub fn none() -> Self {
        Self::default()
    }

    /// Distinct nodes on the cycle, without the closing repeat.
    pub fn members(&self) -> &[String] {
        match self.cycle.split_last() {
            Some((_, open)) => open,
            None => &[],
        }
    }
}

/// Directed graph over named nodes.
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    names: Vec<String>,
    index: HashMap<String, usize>,
    successors: Vec<Vec<usize>>,
    edges: usize,
}

impl ResourceGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(from, to)` pairs, in order.
    pub fn from_edges<I, A, B>(edges: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        let mut graph = Self::new();
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    /// Add the edge `from -> to`, creating either node if needed.
    ///
    /// Returns `false` if the edge was already present, in which case the
    /// graph is unchanged.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> bool {
        let from = self.intern(from.into());
        let to = self.intern(to.into());

        if self.successors[from].contains(&to) {
            return false;
        }
        self.successors[from].push(to);
        self.edges += 1;
        true
    }

    fn intern(&mut self, name: String) -> usize {
        if let Some(&id) = self.index.get(&name) {
            return id;
        }
        let id = self.names.len();
        self.index.insert(name.clone(), id);
        self.names.push(name);
        self.successors.push(Vec::new());
        id
    }

    /// Number of distinct nodes.
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.edges
    }

    /// Node names in first-insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Successors of `node` in insertion order (empty for unknown nodes).
    pub fn successors<'a>(&'a self, node: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        let ids = self.index.get(node).map_or(&[][..], |&id| self.successors[id].as_slice());
        ids.iter().map(|&id| self.names[id].as_str())
    }

    /// Whether the edge `from -> to` exists.
    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&from), Some(&to)) => self.successors[from].contains(&to),
            _ => false,
        }
    }

    /// Check the node count against `limits`, then detect.
    pub fn detect_with_limits(&self, limits: &Limits) -> Result<DeadlockReport, InputError> {
        limits.check_nodes(self.node_count())?;
        Ok(self.detect())
    }

    /// Find one cycle, if any.
    ///
    /// Roots are tried in insertion order. The first edge that reaches a node
    /// still on the active path closes the reported cycle: the path suffix
    /// from that node, followed by the node again. The search stops there.
    pub fn detect(&self) -> DeadlockReport {
        let count = self.names.len();
        let mut visited = vec![false; count];
        // Position of a node on the active path, if it is on it
        let mut on_path: Vec<Option<usize>> = vec![None; count];
        let mut path: Vec<usize> = Vec::new();
        let mut cursors: Vec<usize> = Vec::new();

        for root in 0..count {
            if visited[root] {
                continue;
            }

            visited[root] = true;
            on_path[root] = Some(0);
            path.push(root);
            cursors.push(0);

            while let Some(&node) = path.last() {
                let depth = path.len() - 1;
                let Some(&next) = self.successors[node].get(cursors[depth]) else {
                    on_path[node] = None;
                    path.pop();
                    cursors.pop();
                    continue;
                };
                cursors[depth] += 1;

                if let Some(start) = on_path[next] {
                    let mut cycle: Vec<String> =
                        path[start..].iter().map(|&id| self.names[id].clone()).collect();
                    cycle.push(self.names[next].clone());

                    tracing::debug!(?cycle, "deadlock cycle found");
                    return DeadlockReport { deadlock: true, cycle };
                }

                if !visited[next] {
                    visited[next] = true;
                    on_path[next] = Some(path.len());
                    path.push(next);
                    cursors.push(0);
                }
            }
        }

        tracing::debug!(nodes = count, edges = self.edges, "no deadlock cycle");
        DeadlockReport::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_cycle_is_reported_closed() {
        let graph = ResourceGraph::from_edges([("A", "B"), ("B", "C"), ("C", "A")]);
        let report = graph.detect();

        assert!(report.deadlock);
        assert_eq!(report.cycle, vec!["A", "B", "C", "A"]);
        assert_eq!(report.members(), ["A", "B", "C"]);
    }

    #[test]
    fn chain_has_no_cycle() {
        let graph = ResourceGraph::from_edges([("A", "B"), ("B", "C")]);
        let report = graph.detect();

        assert!(!report.deadlock);
        assert!(report.cycle.is_empty());
        assert!(report.members().is_empty());
    }

    #[test]
    fn cycle_starts_at_reentered_node() {
        // P1 -> R1 -> P2 -> R2 -> P3 -> R1: the tail R1, P2, R2, P3 loops
        let graph = ResourceGraph::from_edges([
            ("P1", "R1"),
            ("R1", "P2"),
            ("P2", "R2"),
            ("R2", "P3"),
            ("P3", "R1"),
        ]);
        assert_eq!(graph.detect().cycle, vec!["R1", "P2", "R2", "P3", "R1"]);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let graph = ResourceGraph::from_edges([("A", "A")]);
        assert_eq!(graph.detect().cycle, vec!["A", "A"]);
    }

    #[test]
    fn diamond_reconvergence_is_not_a_cycle() {
        let graph = ResourceGraph::from_edges([("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]);
        assert!(!graph.detect().deadlock);
    }

    #[test]
    fn only_first_cycle_is_reported() {
        let graph = ResourceGraph::from_edges([("A", "B"), ("B", "A"), ("C", "D"), ("D", "C")]);
        assert_eq!(graph.detect().cycle, vec!["A", "B", "A"]);
    }

    #[test]
    fn cycle_unreachable_from_first_root_is_found() {
        let graph = ResourceGraph::from_edges([("X", "Y"), ("A", "B"), ("B", "A")]);
        assert_eq!(graph.detect().cycle, vec!["A", "B", "A"]);
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let mut graph = ResourceGraph::new();
        assert!(graph.add_edge("A", "B"));
        assert!(!graph.add_edge("A", "B"));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.successors("A").collect::<Vec<_>>(), vec!["B"]);
    }

    #[test]
    fn sink_nodes_are_registered() {
        let graph = ResourceGraph::from_edges([("A", "B")]);
        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(graph.successors("B").count(), 0);
        assert_eq!(graph.successors("missing").count(), 0);
        assert!(graph.contains_edge("A", "B"));
        assert!(!graph.contains_edge("B", "A"));
    }

    #[test]
    fn empty_graph_has_no_deadlock() {
        assert_eq!(ResourceGraph::new().detect(), DeadlockReport::none());
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let names: Vec<String> = (0..50_000).map(|i| format!("N{i}")).collect();
        let graph =
            ResourceGraph::from_edges(names.windows(2).map(|w| (w[0].clone(), w[1].clone())));
        assert!(!graph.detect().deadlock);
    }

    #[test]
    fn node_limit_is_enforced() {
        let graph = ResourceGraph::from_edges([("A", "B"), ("B", "C")]);
        let limits = Limits { max_nodes: 2, ..Limits::default() };
        assert_eq!(
            graph.detect_with_limits(&limits),
            Err(InputError::TooLarge { what: "nodes", actual: 3, limit: 2 })
        );
    }
}
