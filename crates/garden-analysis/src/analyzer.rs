//! The text-network analysis engine.
//!
//! Ties the pipeline stages together: tokenize -> build network -> detect
//! communities -> topics/key terms/diversity/gaps -> insights. One call, one
//! transient result; nothing is persisted here.

use std::collections::BTreeMap;

use tracing::debug;

use garden_types::{GraphMetrics, TextNetworkAnalysis};

use crate::community::detect_communities;
use crate::config::AnalyzerConfig;
use crate::network::NetworkBuilder;
use crate::tokenize::tokenize;
use crate::{gaps, insights, topics};

/// Fixed display palette, keyed by community id.
const PALETTE: &[&str] = &[
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD",
];

/// Display size derived from node frequency, clamped to a readable range.
fn visual_size(frequency: u32) -> f64 {
    ((frequency as f64) * 2.0).clamp(5.0, 20.0)
}

/// Synchronous, stateless analysis pipeline.
///
/// Cheap to clone; concurrent analyses share nothing.
#[derive(Debug, Clone, Default)]
pub struct TextNetworkAnalyzer {
    config: AnalyzerConfig,
}

impl TextNetworkAnalyzer {
    /// Create an analyzer with the given configuration.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Analyzer configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a single text submission.
    pub fn analyze(&self, text: &str) -> TextNetworkAnalysis {
        self.analyze_documents(&[text])
    }

    /// Analyze several documents as one network.
    ///
    /// Token frequencies and co-occurrence weights aggregate across all
    /// documents, but sliding windows never cross a document boundary, so
    /// unrelated documents surface as separate communities.
    ///
    /// Input that tokenizes to nothing yields a well-formed empty result.
    pub fn analyze_documents(&self, texts: &[&str]) -> TextNetworkAnalysis {
        let documents: Vec<Vec<String>> = texts
            .iter()
            .map(|text| tokenize(text, self.config.max_tokens))
            .filter(|tokens| !tokens.is_empty())
            .collect();

        if documents.is_empty() {
            return TextNetworkAnalysis::empty();
        }

        let graph = NetworkBuilder::new(self.config.window_size).build(&documents);
        let node_ids: Vec<String> = graph.nodes.iter().map(|n| n.id.clone()).collect();
        let communities = detect_communities(&node_ids, &graph.edges);

        let mut nodes = graph.nodes;
        for node in &mut nodes {
            let community = communities.get(&node.id).copied().unwrap_or(0);
            node.community_id = community;
            node.visual_size = visual_size(node.frequency);
            node.visual_color = PALETTE[community % PALETTE.len()].to_string();
        }

        let topics = topics::extract_topics(&nodes, &communities, self.config.max_topic_members);
        let key_terms = topics::key_terms(&nodes, self.config.max_key_terms);
        let diversity = topics::diversity(&communities);
        let content_gaps =
            gaps::content_gaps(&nodes, &graph.edges, &communities, self.config.max_gap_reports);
        let insights = insights::summarize(&topics, &content_gaps);

        let metrics = metrics(nodes.len(), graph.edges.len());

        debug!(
            nodes = nodes.len(),
            edges = graph.edges.len(),
            topics = topics.len(),
            gaps = content_gaps.len(),
            "analysis complete"
        );

        TextNetworkAnalysis {
            nodes,
            edges: graph.edges,
            topics,
            insights,
            content_gaps,
            key_terms,
            diversity,
            metrics,
            // Bridge suggestions are a contract placeholder; no revision of
            // the analyzer has populated them.
            structural_gaps: Vec::new(),
        }
    }
}

/// Whole-graph metrics; density is computed, the rest stay zero.
fn metrics(node_count: usize, edge_count: usize) -> GraphMetrics {
    let possible = (node_count * node_count.saturating_sub(1)) as f64 / 2.0;
    GraphMetrics {
        density: edge_count as f64 / possible.max(1.0),
        node_count,
        edge_count,
        ..GraphMetrics::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garden_types::ContentGap;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_text_returns_empty_result() {
        let analyzer = TextNetworkAnalyzer::default();
        for text in ["", "   ", "a of to", "hi ok"] {
            let result = analyzer.analyze(text);
            assert!(result.is_empty(), "expected empty result for {text:?}");
            assert_eq!(result.diversity, 0.0);
            assert!(result.edges.is_empty());
            assert!(result.topics.is_empty());
        }
    }

    #[test]
    fn test_pinned_end_to_end_example() {
        let analyzer = TextNetworkAnalyzer::default();
        let result = analyzer.analyze("machine learning algorithms machine learning");

        let labels: Vec<&str> = result.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["machine", "learning", "algorithms"]);

        let freq = |label: &str| {
            result
                .nodes
                .iter()
                .find(|n| n.label == label)
                .unwrap()
                .frequency
        };
        assert_eq!(freq("machine"), 2);
        assert_eq!(freq("learning"), 2);
        assert_eq!(freq("algorithms"), 1);

        // Fully connected: one community, zero diversity.
        let first = result.nodes[0].community_id;
        assert!(result.nodes.iter().all(|n| n.community_id == first));
        assert_eq!(result.diversity, 0.0);

        // Key terms ranked by frequency + centrality.
        assert_eq!(result.key_terms, vec!["machine", "learning", "algorithms"]);

        // One topic cluster holding all three terms.
        assert_eq!(result.topics.len(), 1);
        assert_eq!(result.topics[0].len(), 3);

        assert!(result.content_gaps.is_empty());
        assert!(result
            .insights
            .contains(&"Identified 1 main topic clusters".to_string()));
    }

    #[test]
    fn test_disjoint_texts_two_communities_and_gap() {
        let analyzer = TextNetworkAnalyzer::default();
        let result = analyzer.analyze_documents(&["apple banana", "rocket engine"]);

        let distinct: std::collections::BTreeSet<usize> =
            result.nodes.iter().map(|n| n.community_id).collect();
        assert_eq!(distinct.len(), 2);

        let pair: Vec<usize> = distinct.into_iter().collect();
        assert!(result.content_gaps.iter().any(|g| matches!(
            g,
            ContentGap::DisconnectedCommunities { communities } if *communities == [pair[0], pair[1]]
        )));

        // Two equal-sized communities: maximal diversity.
        assert!((result.diversity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_dangling_edges() {
        let analyzer = TextNetworkAnalyzer::default();
        let result =
            analyzer.analyze("graph theory algorithms graph theory structures graph theory");
        let labels: std::collections::BTreeSet<&str> =
            result.nodes.iter().map(|n| n.id.as_str()).collect();
        assert!(!result.edges.is_empty());
        for edge in &result.edges {
            assert!(labels.contains(edge.source.as_str()));
            assert!(labels.contains(edge.target.as_str()));
        }
    }

    #[test]
    fn test_retained_edge_weights_exceed_one() {
        let analyzer = TextNetworkAnalyzer::default();
        let result = analyzer.analyze("rust memory safety rust memory ownership rust safety");
        assert!(result.edges.iter().all(|e| e.weight > 1));
    }

    #[test]
    fn test_metrics_density() {
        let analyzer = TextNetworkAnalyzer::default();
        let result = analyzer.analyze("machine learning algorithms machine learning");
        let n = result.metrics.node_count as f64;
        let expected = result.metrics.edge_count as f64 / (n * (n - 1.0) / 2.0);
        assert!((result.metrics.density - expected).abs() < 1e-9);
        assert_eq!(result.metrics.modularity, 0.0);
        assert_eq!(result.metrics.diameter, 0.0);
    }

    #[test]
    fn test_visual_attributes_deterministic() {
        let analyzer = TextNetworkAnalyzer::default();
        let a = analyzer.analyze("machine learning algorithms machine learning");
        let b = analyzer.analyze("machine learning algorithms machine learning");
        assert_eq!(a, b);
        assert!(a.nodes.iter().all(|n| n.visual_size >= 5.0));
        assert!(a.nodes.iter().all(|n| !n.visual_color.is_empty()));
    }

    #[test]
    fn test_structural_gaps_placeholder_empty() {
        let analyzer = TextNetworkAnalyzer::default();
        let result = analyzer.analyze("machine learning algorithms machine learning");
        assert!(result.structural_gaps.is_empty());
    }
}
