//! gentest Core
//!
//! Scenario enumeration over step graphs, plus a predicate algebra for
//! selecting the enumerated sequences.
//!
//! # Core Concepts
//!
//! - [`StepGraph`]: ordered adjacency lists keyed by step label
//! - [`walk`]: exhaustive DFS returning every maximal path under a
//!   [`LoopBudget`]
//! - [`Predicate`]: containment/recency tests composable with not/and/or
//! - [`MultiValueMap`]: mapping whose aliased keys accumulate values
//!
//! # Example
//!
//! ```rust
//! use gentest_core::{walk, LoopBudget, Predicate, StepGraph};
//!
//! let graph: StepGraph<&str> = StepGraph::from_iter([
//!     ("A", vec!["B"]),
//!     ("B", vec!["C", "G"]),
//!     ("C", vec!["G"]),
//!     ("G", vec![]),
//! ]);
//!
//! let paths = walk(&graph, &"A", LoopBudget::default()).unwrap();
//! assert_eq!(paths.len(), 2);
//!
//! let through_c = Predicate::contains(["B", "C"]);
//! assert_eq!(paths.iter().filter(|p| through_c.matches(p)).count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod graph;
mod multi_value;
mod predicate;
mod walk;

// Re-exports
pub use error::{GraphError, WalkError};
pub use graph::{Label, StepGraph};
pub use multi_value::{MultiValueMap, Slot};
pub use predicate::Predicate;
pub use walk::{walk, LoopBudget, PathSet, StepPath};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for scenario enumeration
    pub use crate::{walk, Label, LoopBudget, PathSet, Predicate, StepGraph, StepPath};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
