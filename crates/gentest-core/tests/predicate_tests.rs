use gentest_core::{walk, LoopBudget, Predicate};
use gentest_test_utils::simple_graph;
use proptest::prelude::*;

fn label() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("A"), Just("B"), Just("C"), Just("D")]
}

fn sequence() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::collection::vec(label(), 0..8)
}

fn predicate() -> impl Strategy<Value = Predicate<&'static str>> {
    let leaf = prop_oneof![
        proptest::collection::vec(label(), 1..3).prop_map(|run| Predicate::contains(run)),
        (label(), label()).prop_map(|(a, b)| Predicate::newer(a, b)),
    ];
    leaf.prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(Predicate::negate),
            (inner.clone(), inner.clone()).prop_map(|(p, q)| p & q),
            (inner.clone(), inner).prop_map(|(p, q)| p | q),
        ]
    })
}

/// Reference reading of "last(a) < last(b)"
fn newer_by_definition(seq: &[&str], a: &str, b: &str) -> bool {
    if !seq.contains(&b) {
        return false;
    }
    if !seq.contains(&a) {
        return true;
    }
    let last = |x: &str| seq.len() - 1 - seq.iter().rev().position(|l| *l == x).unwrap_or(0);
    last(a) < last(b)
}

proptest! {
    #[test]
    fn prop_de_morgan(p in predicate(), q in predicate(), seq in sequence()) {
        let lhs = !(p.clone() & q.clone());
        let rhs = !p.clone() | !q.clone();
        prop_assert_eq!(lhs.matches(&seq), rhs.matches(&seq));

        let lhs = !(p.clone() | q.clone());
        let rhs = !p & !q;
        prop_assert_eq!(lhs.matches(&seq), rhs.matches(&seq));
    }

    #[test]
    fn prop_double_negation(p in predicate(), seq in sequence()) {
        prop_assert_eq!(p.clone().negate().negate().matches(&seq), p.matches(&seq));
    }

    #[test]
    fn prop_combinators_follow_bool(p in predicate(), q in predicate(), seq in sequence()) {
        let (a, b) = (p.matches(&seq), q.matches(&seq));
        prop_assert_eq!(p.clone().and(q.clone()).matches(&seq), a && b);
        prop_assert_eq!(p.clone().or(q.clone()).matches(&seq), a || b);
        prop_assert_eq!(p.negate().matches(&seq), !a);
    }

    #[test]
    fn prop_pair_containment_is_adjacency(a in label(), b in label(), seq in sequence()) {
        let adjacent = seq.windows(2).any(|w| w[0] == a && w[1] == b);
        prop_assert_eq!(Predicate::contains([a, b]).matches(&seq), adjacent);
        prop_assert_eq!(Predicate::contains([a, b]).negate().matches(&seq), !adjacent);
    }

    #[test]
    fn prop_newer_matches_definition(a in label(), b in label(), seq in sequence()) {
        prop_assert_eq!(Predicate::newer(a, b).matches(&seq), newer_by_definition(&seq, a, b));
    }
}

#[test]
fn filters_select_walked_paths() {
    let paths = walk(&simple_graph(), &"A", LoopBudget::default()).unwrap();

    let via_e_not_f = Predicate::contains(["C", "E"]) & !Predicate::contains(["F"]);
    let selected: Vec<String> = paths
        .iter()
        .filter(|p| via_e_not_f.matches(p))
        .map(|p| p.concat())
        .collect();

    assert_eq!(selected, vec!["ABCEG".to_string()]);
}

#[test]
fn predicates_deserialize_from_tagged_json() {
    let json = r#"{"and": [{"contains": ["A", "B"]}, {"not": {"newer": {"older": "C", "newer": "D"}}}]}"#;
    let parsed: Predicate<String> = serde_json::from_str(json).unwrap();

    let expected = Predicate::contains(["A".to_string(), "B".to_string()])
        & !Predicate::newer("C".to_string(), "D".to_string());
    assert_eq!(parsed, expected);

    let seq: Vec<String> = ["A", "B", "D", "C"].iter().map(|s| (*s).to_string()).collect();
    assert!(parsed.matches(&seq));
}
