//! Connected-component community detection.
//!
//! Deliberately simple connectivity-based clustering: two nodes share a
//! community iff a path of co-occurrence edges connects them, edges treated
//! as undirected. Uses an explicit stack rather than recursion so large
//! graphs cannot overflow.
//!
//! Ids increment per traversal start, so they depend on node input order;
//! the partition into components does not.

use std::collections::{BTreeMap, BTreeSet};

use garden_types::NetworkEdge;

/// Assign a community id to every node.
///
/// Nodes are visited in input order; each unvisited node starts a traversal
/// that labels its whole component with the next id. Every node ends up with
/// exactly one id, including nodes without edges (singleton components).
pub fn detect_communities(node_ids: &[String], edges: &[NetworkEdge]) -> BTreeMap<String, usize> {
    let mut adjacency: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for edge in edges {
        adjacency
            .entry(edge.source.as_str())
            .or_default()
            .insert(edge.target.as_str());
        adjacency
            .entry(edge.target.as_str())
            .or_default()
            .insert(edge.source.as_str());
    }

    let mut communities: BTreeMap<String, usize> = BTreeMap::new();
    let mut visited: BTreeSet<&str> = BTreeSet::new();
    let mut next_id = 0usize;

    for node in node_ids {
        if visited.contains(node.as_str()) {
            continue;
        }

        let mut stack: Vec<&str> = vec![node.as_str()];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            communities.insert(current.to_string(), next_id);
            if let Some(neighbors) = adjacency.get(current) {
                for neighbor in neighbors {
                    if !visited.contains(neighbor) {
                        stack.push(neighbor);
                    }
                }
            }
        }
        next_id += 1;
    }

    communities
}
