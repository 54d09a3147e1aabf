//! Bounded enumeration of maximal paths through a step graph
//!
//! [`walk`] performs an exhaustive depth-first search from a start node and
//! returns every maximal path, where revisits are limited by a
//! [`LoopBudget`].
//!
//! # Termination rules
//!
//! The walk runs in two stages. A depth-first pass grows each path until it
//! reaches a sink or revisits a node. A revisit closes the path and records
//! the cycle it just completed under the revisited node.
//!
//! With a budget of `n >= 2`, every path closed on a node is then extended by
//! `n - 1` of that node's recorded cycles, chained back to back in every
//! combination. Paths ending on a node with no cycle are kept as they are. No
//! node ever occurs more than `n + 1` times.
//!
//! With a budget of zero no revisit is allowed at all, so the walk degenerates
//! to simple-path enumeration.

use crate::error::WalkError;
use crate::graph::{Label, StepGraph};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;

/// Number of times a node may be revisited within one path
///
/// A budget of `n` lets each node occur at most `n + 1` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoopBudget(u32);

impl LoopBudget {
    /// Create budget allowing `revisits` revisits per node
    #[inline]
    #[must_use]
    pub const fn new(revisits: u32) -> Self {
        Self(revisits)
    }

    /// Allowed revisits per node
    #[inline]
    #[must_use]
    pub const fn revisits(self) -> u32 {
        self.0
    }

    /// Maximum occurrences of a single node in one path
    #[inline]
    #[must_use]
    pub fn max_occurrences(self) -> usize {
        usize::try_from(self.0).map_or(usize::MAX, |n| n.saturating_add(1))
    }
}

impl Default for LoopBudget {
    fn default() -> Self {
        Self(1)
    }
}

impl From<u32> for LoopBudget {
    fn from(revisits: u32) -> Self {
        Self(revisits)
    }
}

impl fmt::Display for LoopBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One maximal traversal, starting at the walk's start node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepPath<L>(Vec<L>);

impl<L> StepPath<L> {
    /// Labels in traversal order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[L] {
        &self.0
    }

    /// Consume the path, returning its labels
    #[inline]
    #[must_use]
    pub fn into_steps(self) -> Vec<L> {
        self.0
    }
}

impl<L: PartialEq> StepPath<L> {
    /// Number of occurrences of `label`
    #[must_use]
    pub fn occurrences(&self, label: &L) -> usize {
        self.0.iter().filter(|l| *l == label).count()
    }

    /// Check whether `prefix` is a prefix of this path (or equal to it)
    #[must_use]
    pub fn starts_with(&self, prefix: &[L]) -> bool {
        self.0.starts_with(prefix)
    }
}

impl<L> Deref for StepPath<L> {
    type Target = [L];

    fn deref(&self) -> &[L] {
        &self.0
    }
}

impl<L> AsRef<[L]> for StepPath<L> {
    fn as_ref(&self) -> &[L] {
        &self.0
    }
}

impl<L> From<Vec<L>> for StepPath<L> {
    fn from(steps: Vec<L>) -> Self {
        Self(steps)
    }
}

impl<L: fmt::Display> fmt::Display for StepPath<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

/// Distinct paths in discovery order
pub type PathSet<L> = IndexSet<StepPath<L>>;

/// Enumerate every maximal path from `start`
///
/// # Errors
/// - [`WalkError::UnknownStart`] if `start` is not a node of `graph`
/// - [`WalkError::UnknownNode`] when the search reaches a successor label
///   that has no adjacency entry
///
/// # Performance
/// Output size is exponential in the budget on graphs with branching
/// cycles. Bounding it is up to the caller.
pub fn walk<L: Label>(
    graph: &StepGraph<L>,
    start: &L,
    budget: LoopBudget,
) -> Result<PathSet<L>, WalkError> {
    if !graph.contains(start) {
        return Err(WalkError::UnknownStart {
            start: start.to_string(),
        });
    }

    let mut walker = Walker {
        graph,
        revisits: budget.revisits() > 0,
        path: vec![start.clone()],
        closed: Vec::new(),
        cycles: IndexMap::new(),
    };
    walker.expand()?;

    let limit = budget.max_occurrences();
    let rounds = usize::try_from(budget.revisits())
        .map_or(usize::MAX, |n| n.saturating_sub(1));
    let cycles = repeat_cycles(&walker.cycles, rounds);

    let mut found = PathSet::new();
    for path in walker.closed {
        match path.last().and_then(|last| cycles.get(last)) {
            Some(tails) if !tails.is_empty() => {
                for tail in tails {
                    let mut full = path.clone();
                    full.extend(tail.iter().cloned());
                    record(&mut found, full, limit);
                }
            }
            _ => record(&mut found, path, limit),
        }
    }

    tracing::debug!(
        start = %start,
        budget = budget.revisits(),
        paths = found.len(),
        "walk complete"
    );

    Ok(found)
}

fn record<L: Label>(found: &mut PathSet<L>, path: Vec<L>, limit: usize) {
    let mut counts: HashMap<&L, usize> = HashMap::new();
    for label in &path {
        let count = counts.entry(label).or_insert(0);
        *count += 1;
        if *count > limit {
            return;
        }
    }
    tracing::trace!(len = path.len(), "path recorded");
    found.insert(StepPath(path));
}

/// Cycles closed at each node, in discovery order
type Cycles<L> = IndexMap<L, IndexSet<Vec<L>>>;

/// Chain `rounds` cycles back to back for every node that closed one
fn repeat_cycles<L: Label>(cycles: &Cycles<L>, rounds: usize) -> Cycles<L> {
    if rounds == 0 {
        return Cycles::new();
    }

    let mut chained = cycles.clone();
    for _ in 1..rounds {
        chained = chained
            .iter()
            .map(|(node, tails)| {
                let single = cycles.get(node).into_iter().flatten();
                let longer: IndexSet<Vec<L>> = tails
                    .iter()
                    .flat_map(|tail| {
                        single.clone().map(move |cycle| {
                            let mut joined = tail.clone();
                            joined.extend(cycle.iter().cloned());
                            joined
                        })
                    })
                    .collect();
                (node.clone(), longer)
            })
            .collect();
    }
    chained
}

/// Depth-first pass that stops every branch at its first revisit
struct Walker<'g, L> {
    graph: &'g StepGraph<L>,
    revisits: bool,
    path: Vec<L>,
    closed: Vec<Vec<L>>,
    cycles: Cycles<L>,
}

impl<L: Label> Walker<'_, L> {
    /// Explore every continuation of the current path from its last node
    fn expand(&mut self) -> Result<(), WalkError> {
        let graph = self.graph;
        let Some(node) = self.path.last() else {
            return Ok(());
        };

        let successors = graph.successors(node).ok_or_else(|| WalkError::UnknownNode {
            node: node.to_string(),
            referenced_by: self
                .path
                .len()
                .checked_sub(2)
                .and_then(|i| self.path.get(i))
                .map_or_else(String::new, ToString::to_string),
        })?;

        let mut extended = false;
        for next in successors {
            match self.path.iter().position(|l| l == next) {
                Some(_) if !self.revisits => {}
                Some(at) => {
                    extended = true;
                    let mut cycle = self.path[at + 1..].to_vec();
                    cycle.push(next.clone());
                    self.cycles.entry(next.clone()).or_default().insert(cycle);

                    let mut closed = self.path.clone();
                    closed.push(next.clone());
                    self.closed.push(closed);
                }
                None => {
                    extended = true;
                    self.path.push(next.clone());
                    let result = self.expand();
                    self.path.pop();
                    result?;
                }
            }
        }

        // Sink, or every successor was a forbidden revisit.
        if !extended {
            self.closed.push(self.path.clone());
        }

        Ok(())
    }
}
