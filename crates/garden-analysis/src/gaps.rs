//! Content-gap detection over one analysis network.
//!
//! Two kinds of gap: nodes with no incident edge, and pairs of communities
//! with no edge between their members. With connectivity-based communities
//! the second is every distinct pair, but the check stays explicit so the
//! function is correct for any partition handed to it.

use std::collections::{BTreeMap, BTreeSet};

use garden_types::{ContentGap, NetworkEdge, NetworkNode};

/// Report connectivity gaps, capped at `max_reports` total.
pub fn content_gaps(
    nodes: &[NetworkNode],
    edges: &[NetworkEdge],
    communities: &BTreeMap<String, usize>,
    max_reports: usize,
) -> Vec<ContentGap> {
    let mut gaps = Vec::new();

    let mut connected: BTreeSet<&str> = BTreeSet::new();
    for edge in edges {
        connected.insert(edge.source.as_str());
        connected.insert(edge.target.as_str());
    }

    let isolated: Vec<String> = nodes
        .iter()
        .filter(|n| !connected.contains(n.id.as_str()))
        .map(|n| n.label.clone())
        .collect();
    if !isolated.is_empty() {
        gaps.push(ContentGap::IsolatedConcepts { nodes: isolated });
    }

    // Count edges crossing each community pair.
    let mut crossings: BTreeMap<(usize, usize), usize> = BTreeMap::new();
    for edge in edges {
        if let (Some(&a), Some(&b)) = (
            communities.get(edge.source.as_str()),
            communities.get(edge.target.as_str()),
        ) {
            if a != b {
                *crossings.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
    }

    let ids: BTreeSet<usize> = communities.values().copied().collect();
    let ids: Vec<usize> = ids.into_iter().collect();
    'outer: for i in 0..ids.len() {
        for j in (i + 1)..ids.len() {
            if gaps.len() >= max_reports {
                break 'outer;
            }
            let pair = (ids[i], ids[j]);
            if !crossings.contains_key(&pair) {
                gaps.push(ContentGap::DisconnectedCommunities {
                    communities: [pair.0, pair.1],
                });
            }
        }
    }

    gaps.truncate(max_reports);
    gaps
}
