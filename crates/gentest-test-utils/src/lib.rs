//! Testing utilities for gentest workspace
//!
//! Shared fixture graphs, registries and assertions.

#![allow(missing_docs)]

use gentest_core::{PathSet, StepGraph};
use gentest_scenario::{Input, StepDef, StepRegistry};

/// Acyclic graph with five paths from `A` to the sink `G`
pub fn simple_graph() -> StepGraph<&'static str> {
    StepGraph::from_iter([
        ("A", vec!["B"]),
        ("B", vec!["C", "G"]),
        ("C", vec!["D", "E", "G"]),
        ("D", vec!["G"]),
        ("E", vec!["F", "G"]),
        ("F", vec!["G"]),
        ("G", vec![]),
    ])
}

/// Graph with two cycles through `B` and one exit at `G`
pub fn graph_with_loop() -> StepGraph<&'static str> {
    StepGraph::from_iter([
        ("A", vec!["B"]),
        ("B", vec!["C"]),
        ("C", vec!["D", "E"]),
        ("D", vec!["B"]),
        ("E", vec!["F", "G"]),
        ("F", vec!["D"]),
        ("G", vec![]),
    ])
}

/// Graph of nodes `N0`, `N1`, ... built from index pairs
///
/// Every node in `0..node_count` is declared; edges outside that range are
/// dropped.
pub fn graph_from_edges(node_count: usize, edges: &[(usize, usize)]) -> StepGraph<String> {
    let label = |i: usize| format!("N{i}");
    let mut graph = StepGraph::new();
    for i in 0..node_count {
        graph.add_node(label(i));
    }
    for &(from, to) in edges {
        if from < node_count && to < node_count {
            graph.add_edge(label(from), label(to));
        }
    }
    graph
}

/// Paths rendered as concatenated labels, sorted
pub fn rendered(paths: &PathSet<&'static str>) -> Vec<String> {
    let mut out: Vec<String> = paths.iter().map(|p| p.concat()).collect();
    out.sort();
    out
}

/// Sorted expectation from string literals
pub fn expected(paths: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = paths.iter().map(|p| (*p).to_string()).collect();
    out.sort();
    out
}

/// Registry mirroring `graph`, with `start` as start step
///
/// Each step's input appends the step name to the context, so a finished
/// context spells out the executed scenario.
pub fn registry_from_graph(
    graph: &StepGraph<&'static str>,
    start: &str,
) -> StepRegistry<Vec<String>> {
    let mut registry = StepRegistry::new();
    for node in graph.nodes() {
        let previous: Vec<&str> = graph
            .iter()
            .filter(|(_, successors)| successors.contains(node))
            .map(|(from, _)| *from)
            .collect();
        let name = (*node).to_string();
        let mut builder = StepDef::builder(*node).previous(previous).input(Input::new(
            move |log: &mut Vec<String>| {
                log.push(name.clone());
                Ok(())
            },
        ));
        if *node == start {
            builder = builder.start();
        }
        if let Err(err) = registry.register(builder.build()) {
            panic!("fixture registry rejected {node}: {err}");
        }
    }
    registry
}
