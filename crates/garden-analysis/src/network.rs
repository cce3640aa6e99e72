//! Sliding-window co-occurrence network construction.
//!
//! Every contiguous window of tokens contributes weighted directed edges
//! between its ordered pairs; closer tokens contribute more per occurrence
//! (`weight += window_size - distance`). Windows never span document
//! boundaries, so jointly analyzed documents only connect through terms they
//! actually share. A document shorter than the window size contributes a
//! single truncated window covering the whole document.
//!
//! Retention policy: every distinct token becomes a node; only edges with
//! accumulated weight > 1 are kept. Since all tokens are nodes, a retained
//! edge can never dangle.

use std::collections::BTreeMap;

use garden_types::{NetworkEdge, NetworkNode};

/// Intermediate output of network construction.
///
/// Nodes carry frequency and centrality; community ids and visual
/// attributes are filled in by the analyzer after community detection.
#[derive(Debug, Clone, Default)]
pub struct TokenGraph {
    /// One node per distinct token, in first-seen order
    pub nodes: Vec<NetworkNode>,
    /// Directed co-occurrence edges with accumulated weight > 1
    pub edges: Vec<NetworkEdge>,
}

/// Builds a co-occurrence network from token sequences.
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    window_size: usize,
}

impl NetworkBuilder {
    /// Create a builder with the given sliding-window size.
    ///
    /// A window size below 2 cannot form pairs and is clamped to 2.
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size: window_size.max(2),
        }
    }

    /// Build the network over one or more token sequences.
    ///
    /// Empty sequences contribute nothing; an entirely empty input yields an
    /// empty graph.
    pub fn build(&self, documents: &[Vec<String>]) -> TokenGraph {
        let mut order: Vec<String> = Vec::new();
        let mut frequency: BTreeMap<String, u32> = BTreeMap::new();
        // source -> target -> accumulated weight
        let mut connections: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();

        for tokens in documents {
            for token in tokens {
                let count = frequency.entry(token.clone()).or_insert(0);
                if *count == 0 {
                    order.push(token.clone());
                }
                *count += 1;
            }
            self.accumulate_windows(tokens, &mut connections);
        }

        let nodes = order
            .iter()
            .map(|token| NetworkNode {
                id: token.clone(),
                label: token.clone(),
                frequency: frequency[token],
                centrality: centrality(token, &connections),
                community_id: 0,
                visual_size: 0.0,
                visual_color: String::new(),
            })
            .collect();

        let mut edges = Vec::new();
        for (source, targets) in &connections {
            for (target, weight) in targets {
                if *weight > 1 {
                    edges.push(NetworkEdge::textual(source.clone(), target.clone(), *weight));
                }
            }
        }

        TokenGraph { nodes, edges }
    }

    /// Slide windows over one document, accumulating pair weights.
    fn accumulate_windows(
        &self,
        tokens: &[String],
        connections: &mut BTreeMap<String, BTreeMap<String, u32>>,
    ) {
        if tokens.len() < 2 {
            return;
        }

        let width = self.window_size.min(tokens.len());
        for window in tokens.windows(width) {
            for i in 0..window.len() {
                for j in (i + 1)..window.len() {
                    if window[i] == window[j] {
                        continue;
                    }
                    let distance = (j - i) as u32;
                    let contribution = (self.window_size as u32).saturating_sub(distance);
                    if contribution == 0 {
                        continue;
                    }
                    *connections
                        .entry(window[i].clone())
                        .or_default()
                        .entry(window[j].clone())
                        .or_insert(0) += contribution;
                }
            }
        }
    }
}

/// Distinct out-neighbors plus distinct in-neighbors of a token.
fn centrality(token: &str, connections: &BTreeMap<String, BTreeMap<String, u32>>) -> u32 {
    let outgoing = connections.get(token).map(|t| t.len()).unwrap_or(0);
    let incoming = connections
        .values()
        .filter(|targets| targets.contains_key(token))
        .count();
    (outgoing + incoming) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_empty_input_yields_empty_graph() {
        let graph = NetworkBuilder::new(4).build(&[]);
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());

        let graph = NetworkBuilder::new(4).build(&[Vec::new()]);
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_single_token_has_node_no_edges() {
        let graph = NetworkBuilder::new(4).build(&[tokens(&["rust"])]);
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].frequency, 1);
        assert_eq!(graph.nodes[0].centrality, 0);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_every_distinct_token_becomes_a_node() {
        let graph =
            NetworkBuilder::new(4).build(&[tokens(&["machine", "learning", "algorithms"])]);
        let labels: Vec<&str> = graph.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["machine", "learning", "algorithms"]);
    }

    #[test]
    fn test_pinned_example_frequencies_and_edges() {
        // "machine learning algorithms machine learning", window 4
        let graph = NetworkBuilder::new(4).build(&[tokens(&[
            "machine",
            "learning",
            "algorithms",
            "machine",
            "learning",
        ])]);

        let by_label = |label: &str| graph.nodes.iter().find(|n| n.label == label).unwrap();
        assert_eq!(by_label("machine").frequency, 2);
        assert_eq!(by_label("learning").frequency, 2);
        assert_eq!(by_label("algorithms").frequency, 1);

        // All three pairs must be connected in at least one direction.
        for (a, b) in [
            ("machine", "learning"),
            ("machine", "algorithms"),
            ("learning", "algorithms"),
        ] {
            assert!(
                graph
                    .edges
                    .iter()
                    .any(|e| (e.source == a && e.target == b) || (e.source == b && e.target == a)),
                "pair {a}-{b} not connected"
            );
        }

        // Fully connected triple: every node sees the other two both ways.
        for node in &graph.nodes {
            assert_eq!(node.centrality, 4, "centrality of {}", node.label);
        }
    }

    #[test]
    fn test_decay_weighting_accumulates_across_windows() {
        // Windows [m,l,a,m] and [l,a,m,l]:
        //   machine->learning: 3 (w1) + 3 (w2) = 6
        let graph = NetworkBuilder::new(4).build(&[tokens(&[
            "machine",
            "learning",
            "algorithms",
            "machine",
            "learning",
        ])]);
        let edge = graph
            .edges
            .iter()
            .find(|e| e.source == "machine" && e.target == "learning")
            .unwrap();
        assert_eq!(edge.weight, 6);
    }

    #[test]
    fn test_weight_one_edges_dropped() {
        // Window of 2 over ["apple", "banana", "cherry"] gives each adjacent
        // pair weight 1 per window; only repeated pairs survive.
        let graph = NetworkBuilder::new(2).build(&[tokens(&["apple", "banana", "cherry"])]);
        assert!(graph.edges.is_empty());

        let graph = NetworkBuilder::new(2).build(&[tokens(&[
            "apple", "banana", "apple", "banana",
        ])]);
        assert!(graph
            .edges
            .iter()
            .any(|e| e.source == "apple" && e.target == "banana" && e.weight >= 2));
    }

    #[test]
    fn test_self_pairs_skipped() {
        let graph = NetworkBuilder::new(4).build(&[tokens(&["rust", "rust", "rust", "rust"])]);
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_short_document_truncated_window() {
        // Two tokens with window 4: one truncated window, distance 1,
        // contribution 4 - 1 = 3 -> edge retained.
        let graph = NetworkBuilder::new(4).build(&[tokens(&["apple", "banana"])]);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].weight, 3);
    }

    #[test]
    fn test_windows_do_not_span_documents() {
        let graph = NetworkBuilder::new(4).build(&[
            tokens(&["apple", "banana"]),
            tokens(&["rocket", "engine"]),
        ]);
        assert_eq!(graph.nodes.len(), 4);
        // Edges exist only inside each document.
        for edge in &graph.edges {
            let fruit = |s: &str| s == "apple" || s == "banana";
            assert_eq!(fruit(&edge.source), fruit(&edge.target));
        }
        assert_eq!(graph.edges.len(), 2);
    }

    #[test]
    fn test_no_dangling_edges() {
        let graph = NetworkBuilder::new(4).build(&[tokens(&[
            "alpha", "beta", "gamma", "delta", "alpha", "beta",
        ])]);
        let labels: std::collections::BTreeSet<&str> =
            graph.nodes.iter().map(|n| n.label.as_str()).collect();
        for edge in &graph.edges {
            assert!(labels.contains(edge.source.as_str()));
            assert!(labels.contains(edge.target.as_str()));
        }
    }

    #[test]
    fn test_edge_kind_is_textual() {
        let graph = NetworkBuilder::new(4).build(&[tokens(&["apple", "banana"])]);
        assert!(graph.edges.iter().all(|e| e.kind == "textual"));
    }
}
