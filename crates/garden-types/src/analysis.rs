//! Text-network analysis result types.
//!
//! These are the transient outputs of one analysis call. Field names follow
//! the wire contract consumed by UI and export layers: top-level keys are
//! `nodes`, `edges`, `topics`, `insights`, `contentGaps`, `keyTerms`,
//! `diversity`, `metrics`, `structuralGaps`.

use serde::{Deserialize, Serialize};

/// A concept extracted from one text submission.
///
/// Exists only for the duration of the analysis call; persisting concepts is
/// the caller's decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkNode {
    /// Node id (the token itself)
    pub id: String,
    /// Display label (same token)
    pub label: String,
    /// Occurrences in the token sequence
    pub frequency: u32,
    /// Distinct out-neighbors + distinct in-neighbors
    pub centrality: u32,
    /// Connected-component id assigned by community detection
    pub community_id: usize,
    /// Display size derived from frequency
    pub visual_size: f64,
    /// Display color keyed by community
    pub visual_color: String,
}

/// A weighted co-occurrence link between two tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkEdge {
    /// Earlier token of the window pair
    pub source: String,
    /// Later token of the window pair
    pub target: String,
    /// Accumulated across all windows containing the pair; retained edges
    /// always have weight > 1
    pub weight: u32,
    /// Always "textual" for co-occurrence edges
    pub kind: String,
}

impl NetworkEdge {
    /// Create a textual co-occurrence edge.
    pub fn textual(source: impl Into<String>, target: impl Into<String>, weight: u32) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
            kind: "textual".to_string(),
        }
    }
}

/// A reported absence of connectivity in the network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentGap {
    /// Nodes with no incident edge
    IsolatedConcepts {
        /// Labels of the isolated nodes
        nodes: Vec<String>,
    },
    /// Two communities with zero connecting edges
    DisconnectedCommunities {
        /// The pair of community ids, smaller first
        communities: [usize; 2],
    },
}

/// A structural gap between two communities with candidate bridge terms.
///
/// Kept for wire compatibility; the base analyzer emits an empty list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StructuralGap {
    pub community1: usize,
    pub community2: usize,
    pub bridging_concepts: Vec<String>,
}

/// Whole-graph metrics for one analysis.
///
/// `density`, `node_count` and `edge_count` are computed; the remaining
/// fields are contract placeholders and stay zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetrics {
    pub modularity: f64,
    pub density: f64,
    pub average_clustering: f64,
    pub average_path_length: f64,
    pub diameter: f64,
    pub node_count: usize,
    pub edge_count: usize,
}

/// Complete result of one text-network analysis call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextNetworkAnalysis {
    /// Concept nodes, one per distinct qualifying token
    pub nodes: Vec<NetworkNode>,
    /// Co-occurrence edges with accumulated weight > 1
    pub edges: Vec<NetworkEdge>,
    /// Community memberships, largest first, capped for display
    pub topics: Vec<Vec<String>>,
    /// Templated human-readable observations
    pub insights: Vec<String>,
    /// Isolated-node and disconnected-community reports
    pub content_gaps: Vec<ContentGap>,
    /// Top terms by frequency + centrality
    pub key_terms: Vec<String>,
    /// Normalized Shannon entropy of community sizes, in [0, 1]
    pub diversity: f64,
    /// Whole-graph metrics
    pub metrics: GraphMetrics,
    /// Placeholder for bridge suggestions between communities
    pub structural_gaps: Vec<StructuralGap>,
}

impl TextNetworkAnalysis {
    /// Well-formed empty result, returned for unanalyzable input.
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            topics: Vec::new(),
            insights: Vec::new(),
            content_gaps: Vec::new(),
            key_terms: Vec::new(),
            diversity: 0.0,
            metrics: GraphMetrics::default(),
            structural_gaps: Vec::new(),
        }
    }

    /// True when the analysis produced no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_is_well_formed() {
        let result = TextNetworkAnalysis::empty();
        assert!(result.is_empty());
        assert_eq!(result.diversity, 0.0);
        assert_eq!(result.metrics.node_count, 0);
    }

    #[test]
    fn test_contract_field_names() {
        let result = TextNetworkAnalysis::empty();
        let value = serde_json::to_value(&result).unwrap();
        for key in [
            "nodes",
            "edges",
            "topics",
            "insights",
            "contentGaps",
            "keyTerms",
            "diversity",
            "metrics",
            "structuralGaps",
        ] {
            assert!(value.get(key).is_some(), "missing contract field {key}");
        }
    }

    #[test]
    fn test_node_field_names() {
        let node = NetworkNode {
            id: "rust".to_string(),
            label: "rust".to_string(),
            frequency: 2,
            centrality: 3,
            community_id: 0,
            visual_size: 5.0,
            visual_color: "#3498db".to_string(),
        };
        let value = serde_json::to_value(&node).unwrap();
        assert!(value.get("communityId").is_some());
        assert!(value.get("visualSize").is_some());
        assert!(value.get("visualColor").is_some());
    }

    #[test]
    fn test_metrics_field_names() {
        let value = serde_json::to_value(GraphMetrics::default()).unwrap();
        assert!(value.get("averageClustering").is_some());
        assert!(value.get("averagePathLength").is_some());
        assert!(value.get("nodeCount").is_some());
        assert!(value.get("edgeCount").is_some());
    }

    #[test]
    fn test_content_gap_tagged_form() {
        let gap = ContentGap::IsolatedConcepts {
            nodes: vec!["rust".to_string()],
        };
        let value = serde_json::to_value(&gap).unwrap();
        assert_eq!(value["type"], "isolated_concepts");

        let gap = ContentGap::DisconnectedCommunities { communities: [0, 2] };
        let value = serde_json::to_value(&gap).unwrap();
        assert_eq!(value["type"], "disconnected_communities");
        assert_eq!(value["communities"][0], 0);
        assert_eq!(value["communities"][1], 2);
    }

    #[test]
    fn test_textual_edge_kind() {
        let edge = NetworkEdge::textual("machine", "learning", 10);
        assert_eq!(edge.kind, "textual");
        assert_eq!(edge.weight, 10);
    }
}
