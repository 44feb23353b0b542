use indexmap::IndexMap;
use netmon_hub::edges::edges_of;
use netmon_hub::models::{Adjacency, Edge};
use std::collections::BTreeSet;

fn adjacency(entries: &[(&str, &[&str])]) -> Adjacency {
    entries
        .iter()
        .map(|(id, neighbours)| {
            (
                id.to_string(),
                neighbours.iter().map(|n| n.to_string()).collect(),
            )
        })
        .collect::<IndexMap<_, _>>()
}

fn pairs(edges: &[Edge]) -> BTreeSet<(String, String)> {
    edges
        .iter()
        .map(|e| {
            if e.from <= e.to {
                (e.from.clone(), e.to.clone())
            } else {
                (e.to.clone(), e.from.clone())
            }
        })
        .collect()
}

#[test]
fn test_symmetric_pair_yields_one_edge() {
    let edges = edges_of(&adjacency(&[("A", &["B"]), ("B", &["A"])]));
    assert_eq!(
        edges,
        vec![Edge {
            from: "A".to_string(),
            to: "B".to_string()
        }]
    );
}

#[test]
fn test_emission_follows_key_then_neighbour_order() {
    let edges = edges_of(&adjacency(&[
        ("A", &["C", "B"]),
        ("B", &["A", "C"]),
        ("C", &["A", "B"]),
    ]));
    let got: Vec<(&str, &str)> = edges
        .iter()
        .map(|e| (e.from.as_str(), e.to.as_str()))
        .collect();
    assert_eq!(got, vec![("A", "C"), ("A", "B"), ("B", "C")]);
}

#[test]
fn test_every_key_permutation_gives_each_pair_once() {
    let entries: Vec<(&str, &[&str])> = vec![
        ("A", &["B", "C"]),
        ("B", &["A", "D"]),
        ("C", &["A"]),
        ("D", &["B", "E"]),
        ("E", &[]),
    ];
    let expected: BTreeSet<(String, String)> = [("A", "B"), ("A", "C"), ("B", "D"), ("D", "E")]
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();

    // Heap's algorithm over the key order.
    let mut order: Vec<usize> = (0..entries.len()).collect();
    let mut c = vec![0; order.len()];
    let check = |order: &[usize]| {
        let permuted: Vec<(&str, &[&str])> = order.iter().map(|&i| entries[i]).collect();
        let edges = edges_of(&adjacency(&permuted));
        assert_eq!(edges.len(), expected.len(), "order {:?}", order);
        assert_eq!(pairs(&edges), expected, "order {:?}", order);
    };
    check(&order);
    let mut i = 0;
    while i < order.len() {
        if c[i] < i {
            if i % 2 == 0 {
                order.swap(0, i);
            } else {
                order.swap(c[i], i);
            }
            check(&order);
            c[i] += 1;
            i = 0;
        } else {
            c[i] = 0;
            i += 1;
        }
    }
}

#[test]
fn test_one_sided_entry_survives_either_order() {
    let forward = edges_of(&adjacency(&[("A", &["B"]), ("B", &[])]));
    let backward = edges_of(&adjacency(&[("B", &[]), ("A", &["B"])]));
    assert_eq!(forward.len(), 1);
    assert_eq!(backward.len(), 1);
    assert_eq!(pairs(&forward), pairs(&backward));
}

#[test]
fn test_self_loops_and_duplicate_neighbours_are_ignored() {
    let edges = edges_of(&adjacency(&[("A", &["A", "B", "B"]), ("B", &["A", "A"])]));
    assert_eq!(edges.len(), 1);
}

#[test]
fn test_deterministic_for_fixed_adjacency() {
    let graph = adjacency(&[("X", &["Y", "Z"]), ("Y", &["X"]), ("Z", &["X"])]);
    assert_eq!(edges_of(&graph), edges_of(&graph));
}

#[test]
fn test_empty_adjacency_has_no_edges() {
    assert!(edges_of(&Adjacency::new()).is_empty());
}
