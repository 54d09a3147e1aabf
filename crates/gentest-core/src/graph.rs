//! Step graph: ordered adjacency lists keyed by step label
//!
//! Provides [`StepGraph`], the input of [`walk`](crate::walk), along with a
//! handful of structural queries (sinks, entry nodes, cycles, dangling
//! references) used by callers to sanity-check a graph before walking it.

use crate::error::GraphError;
use indexmap::{IndexMap, IndexSet};
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::hash::Hash;

/// Identifier of a graph node.
///
/// Labels are opaque to the walker; they only need to be cloned, compared,
/// hashed, and rendered in error messages.
pub trait Label: Clone + Eq + Hash + Display {}

impl<T: Clone + Eq + Hash + Display> Label for T {}

/// Directed graph of steps with ordered successor lists
///
/// Node order and successor order are insertion order. A node with an empty
/// successor list is a sink. Cycles are allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "L: Serialize + Eq + Hash",
    deserialize = "L: Deserialize<'de> + Eq + Hash"
))]
pub struct StepGraph<L> {
    adjacency: IndexMap<L, Vec<L>>,
}

impl<L: Label> StepGraph<L> {
    /// Create an empty graph
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            adjacency: IndexMap::new(),
        }
    }

    /// Declare `node` with the given successors, replacing any previous list
    pub fn insert(&mut self, node: L, successors: impl IntoIterator<Item = L>) {
        self.adjacency
            .insert(node, successors.into_iter().collect());
    }

    /// Declare `node` as a sink unless it already exists
    pub fn add_node(&mut self, node: L) {
        self.adjacency.entry(node).or_default();
    }

    /// Append `to` to the successor list of `from`, declaring `from` if needed
    ///
    /// `to` is not declared; use [`add_node`](Self::add_node) for that.
    pub fn add_edge(&mut self, from: L, to: L) {
        self.adjacency.entry(from).or_default().push(to);
    }

    /// Successors of `node`, or `None` if `node` is not declared
    #[inline]
    #[must_use]
    pub fn successors(&self, node: &L) -> Option<&[L]> {
        self.adjacency.get(node).map(Vec::as_slice)
    }

    /// Check whether `node` is declared
    #[inline]
    #[must_use]
    pub fn contains(&self, node: &L) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Declared nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &L> {
        self.adjacency.keys()
    }

    /// `(node, successors)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&L, &[L])> {
        self.adjacency.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of declared nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Check if no node is declared
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Number of edges, counting duplicates
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Nodes with no successors (exit points)
    #[must_use]
    pub fn sinks(&self) -> Vec<&L> {
        self.adjacency
            .iter()
            .filter(|(_, successors)| successors.is_empty())
            .map(|(node, _)| node)
            .collect()
    }

    /// Nodes no other node points to (entry points)
    #[must_use]
    pub fn entry_nodes(&self) -> Vec<&L> {
        let g = self.index_graph();
        self.adjacency
            .keys()
            .enumerate()
            .filter(|(i, _)| {
                g.neighbors_directed(*i, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|(_, node)| node)
            .collect()
    }

    /// `(from, to)` pairs whose `to` label is not declared
    #[must_use]
    pub fn dangling(&self) -> Vec<(&L, &L)> {
        self.adjacency
            .iter()
            .flat_map(|(from, successors)| successors.iter().map(move |to| (from, to)))
            .filter(|(_, to)| !self.adjacency.contains_key(*to))
            .collect()
    }

    /// Check that every successor is declared and the graph is not empty
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.is_empty() {
            return Err(GraphError::Empty);
        }

        let dangling = self.dangling();
        if !dangling.is_empty() {
            return Err(GraphError::Dangling {
                references: dangling
                    .into_iter()
                    .map(|(from, to)| (from.to_string(), to.to_string()))
                    .collect(),
            });
        }

        Ok(())
    }

    /// Check whether any cycle exists among declared nodes
    ///
    /// A cyclic graph makes the walk output grow with the loop budget.
    #[must_use]
    pub fn is_cyclic(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.index_graph())
    }

    /// Declared nodes reachable from `start`, `start` included, in DFS order
    #[must_use]
    pub fn reachable_from(&self, start: &L) -> Vec<&L> {
        let Some(root) = self.adjacency.get_index_of(start) else {
            return Vec::new();
        };

        let g = self.index_graph();
        let mut dfs = Dfs::new(&g, root);
        let mut reached = Vec::new();
        while let Some(i) = dfs.next(&g) {
            if let Some((node, _)) = self.adjacency.get_index(i) {
                reached.push(node);
            }
        }
        reached
    }

    /// Graph over node positions; edges to undeclared labels are skipped
    fn index_graph(&self) -> DiGraphMap<usize, ()> {
        let mut g = DiGraphMap::new();
        for (i, (_, successors)) in self.adjacency.iter().enumerate() {
            g.add_node(i);
            let targets: IndexSet<usize> = successors
                .iter()
                .filter_map(|s| self.adjacency.get_index_of(s))
                .collect();
            for j in targets {
                g.add_edge(i, j, ());
            }
        }
        g
    }
}

impl<L: Eq + Hash> PartialEq for StepGraph<L> {
    fn eq(&self, other: &Self) -> bool {
        self.adjacency == other.adjacency
    }
}

impl<L: Eq + Hash> Eq for StepGraph<L> {}

impl<L: Label> Default for StepGraph<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L, S> FromIterator<(L, S)> for StepGraph<L>
where
    L: Label,
    S: IntoIterator<Item = L>,
{
    fn from_iter<I: IntoIterator<Item = (L, S)>>(iter: I) -> Self {
        let mut graph = Self::new();
        for (node, successors) in iter {
            graph.insert(node, successors);
        }
        graph
    }
}
