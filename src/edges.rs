use crate::models::{Adjacency, Edge};
use std::collections::HashSet;

/// Collapses a (conceptually undirected) adjacency map into one edge per connected pair.
///
/// Nodes are walked in key order and marked visited before their neighbour list is read, so an
/// edge back towards a visited node is skipped when that node already listed us. A neighbour that
/// was visited without listing us (one-sided entry) still gets its edge here.
pub fn edges_of(adjacency: &Adjacency) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut visited: HashSet<&str> = HashSet::with_capacity(adjacency.len());

    for (node_id, neighbours) in adjacency {
        if !visited.insert(node_id.as_str()) {
            continue;
        }

        let mut emitted: HashSet<&str> = HashSet::new();
        for neighbour in neighbours {
            if neighbour == node_id || !emitted.insert(neighbour.as_str()) {
                continue;
            }
            if visited.contains(neighbour.as_str()) && lists(adjacency, neighbour, node_id) {
                continue;
            }
            edges.push(Edge {
                from: node_id.clone(),
                to: neighbour.clone(),
            });
        }
    }

    edges
}

fn lists(adjacency: &Adjacency, from: &str, to: &str) -> bool {
    adjacency
        .get(from)
        .is_some_and(|neighbours| neighbours.iter().any(|n| n == to))
}
