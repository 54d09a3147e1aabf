//! Error types for graph walking and graph analysis

/// Errors raised while enumerating paths through a step graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalkError {
    /// The start label is not a node of the graph
    #[error("start step '{start}' is not a node of the graph")]
    UnknownStart {
        /// Label passed as start
        start: String,
    },

    /// A successor label has no adjacency entry of its own
    #[error("step '{node}' (successor of '{referenced_by}') is not a node of the graph")]
    UnknownNode {
        /// The dangling label
        node: String,
        /// The node whose successor list named it
        referenced_by: String,
    },
}

/// Structural problems reported by [`StepGraph::validate`](crate::StepGraph::validate)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// One or more successor labels are never declared as nodes
    #[error("dangling successor references: {}", format_dangling(.references))]
    Dangling {
        /// `(from, to)` pairs whose `to` label is undeclared
        references: Vec<(String, String)>,
    },

    /// The graph has no nodes
    #[error("graph is empty")]
    Empty,
}

fn format_dangling(references: &[(String, String)]) -> String {
    references
        .iter()
        .map(|(from, to)| format!("{from} -> {to}"))
        .collect::<Vec<_>>()
        .join(", ")
}
