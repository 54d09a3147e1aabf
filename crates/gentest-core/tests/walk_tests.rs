use gentest_core::{walk, LoopBudget, StepGraph, WalkError};
use gentest_test_utils::{expected, graph_from_edges, graph_with_loop, rendered, simple_graph};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeMap;

#[test]
fn test_walk_simple_graph() {
    let paths = walk(&simple_graph(), &"A", LoopBudget::default()).unwrap();
    assert_eq!(
        rendered(&paths),
        expected(&["ABCDG", "ABCEFG", "ABCEG", "ABCG", "ABG"])
    );
}

#[test]
fn test_walk_graph_with_1_loop() {
    let paths = walk(&graph_with_loop(), &"A", LoopBudget::new(1)).unwrap();
    assert_eq!(rendered(&paths), expected(&["ABCDB", "ABCEFDB", "ABCEG"]));
}

#[test]
fn test_walk_graph_with_2_loop() {
    let paths = walk(&graph_with_loop(), &"A", LoopBudget::new(2)).unwrap();
    assert_eq!(
        rendered(&paths),
        expected(&[
            "ABCDBCDB",
            "ABCDBCEFDB",
            "ABCEFDBCDB",
            "ABCEFDBCEFDB",
            "ABCEG",
        ])
    );
}

#[test]
fn test_walk_graph_with_3_loop_chains_cycles() {
    let paths = walk(&graph_with_loop(), &"A", LoopBudget::new(3)).unwrap();
    // Two cycles through B, three times in a row, plus the exit.
    assert_eq!(paths.len(), 2 * 2 * 2 + 1);
    for path in &paths {
        assert!(path.occurrences(&"B") == 4 || path.last() == Some(&"G"));
    }
}

#[test]
fn test_cycle_back_to_start_is_not_mixed_with_inner_cycle() {
    let graph: StepGraph<&str> =
        StepGraph::from_iter([("S", vec!["A"]), ("A", vec!["B"]), ("B", vec!["A", "S"])]);
    let paths = walk(&graph, &"S", LoopBudget::new(2)).unwrap();
    assert_eq!(rendered(&paths), expected(&["SABABA", "SABSABS"]));
}

#[test]
fn test_acyclic_ignores_budget() {
    let graph = simple_graph();
    let base = rendered(&walk(&graph, &"A", LoopBudget::new(0)).unwrap());
    for budget in 1..4 {
        let paths = walk(&graph, &"A", LoopBudget::new(budget)).unwrap();
        assert_eq!(rendered(&paths), base);
    }
}

#[test]
fn test_walk_from_inner_node() {
    let paths = walk(&simple_graph(), &"E", LoopBudget::default()).unwrap();
    assert_eq!(rendered(&paths), expected(&["EFG", "EG"]));
}

#[test]
fn test_unknown_start_fails_fast() {
    let result = walk(&simple_graph(), &"Q", LoopBudget::default());
    assert!(matches!(result, Err(WalkError::UnknownStart { .. })));
}

#[test]
fn test_dangling_successor_reported_when_reached() {
    let mut graph = simple_graph();
    graph.add_edge("F", "X");

    // D's branch never reaches X
    let from_d = walk(&graph, &"D", LoopBudget::default()).unwrap();
    assert_eq!(from_d.len(), 1);

    let err = walk(&graph, &"A", LoopBudget::default()).unwrap_err();
    assert_eq!(
        err,
        WalkError::UnknownNode {
            node: "X".to_string(),
            referenced_by: "F".to_string(),
        }
    );
}

#[test]
fn test_walk_is_deterministic() {
    let graph = graph_with_loop();
    let first = walk(&graph, &"A", LoopBudget::new(2)).unwrap();
    let second = walk(&graph, &"A", LoopBudget::new(2)).unwrap();
    assert!(first.iter().eq(second.iter()));
}

#[test]
fn test_successor_order_does_not_change_set() {
    let reversed: StepGraph<&str> = graph_with_loop()
        .iter()
        .map(|(node, successors)| (*node, successors.iter().rev().copied().collect::<Vec<_>>()))
        .collect();
    let a = walk(&graph_with_loop(), &"A", LoopBudget::new(2)).unwrap();
    let b = walk(&reversed, &"A", LoopBudget::new(2)).unwrap();
    assert_eq!(rendered(&a), rendered(&b));
}

/// Simple paths from `node` to every sink, by plain recursion
fn simple_paths_to_sinks(
    graph: &StepGraph<String>,
    node: &String,
    prefix: &mut Vec<String>,
    out: &mut Vec<Vec<String>>,
) {
    prefix.push(node.clone());
    let successors = graph.successors(node).unwrap_or(&[]);
    if successors.is_empty() {
        out.push(prefix.clone());
    } else {
        for next in successors {
            simple_paths_to_sinks(graph, next, prefix, out);
        }
    }
    prefix.pop();
}

type Cycles = BTreeMap<String, Vec<Vec<String>>>;

fn close_on_revisit(
    graph: &StepGraph<String>,
    node: &String,
    path: &mut Vec<String>,
    closed: &mut Vec<Vec<String>>,
    cycles: &mut Cycles,
) {
    if let Some(index) = path.iter().position(|l| l == node) {
        let mut cycle = path[index + 1..].to_vec();
        cycle.push(node.clone());
        cycles.entry(node.clone()).or_default().push(cycle);
        let mut done = path.clone();
        done.push(node.clone());
        closed.push(done);
        return;
    }

    path.push(node.clone());
    let successors = graph.successors(node).unwrap_or(&[]);
    if successors.is_empty() {
        closed.push(path.clone());
    } else {
        for next in successors {
            close_on_revisit(graph, next, path, closed, cycles);
        }
    }
    path.pop();
}

/// Stop every branch at its first revisit, then append `budget - 1` rounds
/// of the cycles recorded per node
fn spliced_paths(graph: &StepGraph<String>, start: &String, budget: u32) -> Vec<Vec<String>> {
    let mut closed = Vec::new();
    let mut cycles = Cycles::new();
    close_on_revisit(graph, start, &mut Vec::new(), &mut closed, &mut cycles);

    let single = cycles.clone();
    for _ in 2..budget {
        cycles = cycles
            .iter()
            .map(|(node, tails)| {
                let longer: Vec<Vec<String>> = tails
                    .iter()
                    .flat_map(|tail| {
                        single[node]
                            .iter()
                            .map(move |cycle| [tail.clone(), cycle.clone()].concat())
                    })
                    .collect();
                (node.clone(), longer)
            })
            .collect();
    }

    let mut paths: Vec<Vec<String>> = if budget > 1 {
        closed
            .into_iter()
            .flat_map(|path| match path.last().and_then(|l| cycles.get(l)) {
                Some(tails) if !tails.is_empty() => tails
                    .iter()
                    .map(|tail| [path.clone(), tail.clone()].concat())
                    .collect::<Vec<_>>(),
                _ => vec![path],
            })
            .collect()
    } else {
        closed
    };

    let limit = budget as usize + 1;
    paths.retain(|path| path.iter().all(|l| path.iter().filter(|x| *x == l).count() <= limit));
    paths.sort();
    paths.dedup();
    paths
}

fn dag_edges() -> impl Strategy<Value = Vec<(usize, usize)>> {
    proptest::collection::vec((0..6usize, 0..6usize), 0..12).prop_map(|edges| {
        edges
            .into_iter()
            .filter(|(a, b)| a < b)
            .collect::<Vec<_>>()
    })
}

proptest! {
    #[test]
    fn prop_acyclic_walk_is_all_simple_paths(edges in dag_edges(), budget in 0..3u32) {
        let graph = graph_from_edges(6, &edges);
        let start = "N0".to_string();

        let mut expected = Vec::new();
        simple_paths_to_sinks(&graph, &start, &mut Vec::new(), &mut expected);
        expected.sort();
        expected.dedup();

        let mut actual: Vec<Vec<String>> = walk(&graph, &start, LoopBudget::new(budget))
            .unwrap()
            .into_iter()
            .map(|p| p.into_steps())
            .collect();
        actual.sort();

        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_no_node_exceeds_budget(
        edges in proptest::collection::vec((0..5usize, 0..5usize), 0..10),
        budget in 0..3u32,
    ) {
        let graph = graph_from_edges(5, &edges);
        let start = "N0".to_string();
        let paths = walk(&graph, &start, LoopBudget::new(budget)).unwrap();

        prop_assert!(!paths.is_empty());
        for path in &paths {
            prop_assert_eq!(path.first(), Some(&start));
            for label in path.iter() {
                prop_assert!(path.occurrences(label) <= budget as usize + 1);
            }
        }
    }

    #[test]
    fn prop_paths_are_maximal(
        edges in proptest::collection::vec((0..5usize, 0..5usize), 0..10),
        budget in 0..3u32,
    ) {
        let graph = graph_from_edges(5, &edges);
        let paths = walk(&graph, &"N0".to_string(), LoopBudget::new(budget)).unwrap();

        for shorter in &paths {
            for longer in &paths {
                if shorter.len() < longer.len() {
                    prop_assert!(!longer.starts_with(shorter));
                }
            }
        }
    }

    #[test]
    fn prop_larger_budget_extends_paths(
        edges in proptest::collection::vec((0..5usize, 0..5usize), 0..10),
        budget in 0..2u32,
    ) {
        let graph = graph_from_edges(5, &edges);
        let start = "N0".to_string();
        let small = walk(&graph, &start, LoopBudget::new(budget)).unwrap();
        let large = walk(&graph, &start, LoopBudget::new(budget + 1)).unwrap();

        for path in &small {
            prop_assert!(large.iter().any(|p| p.starts_with(path)));
        }
    }

    #[test]
    fn prop_cyclic_walk_splices_recorded_cycles(
        edges in proptest::collection::vec((0..5usize, 0..5usize), 1..9),
        budget in 1..=3u32,
    ) {
        let graph = graph_from_edges(5, &edges);
        let start = "N0".to_string();

        let mut actual: Vec<Vec<String>> = walk(&graph, &start, LoopBudget::new(budget))
            .unwrap()
            .into_iter()
            .map(|p| p.into_steps())
            .collect();
        actual.sort();

        prop_assert_eq!(actual, spliced_paths(&graph, &start, budget));
    }
}
