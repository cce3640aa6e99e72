//! End-to-end analysis pipeline tests.
//!
//! Covers the full tokenize -> network -> communities -> analytics path and
//! the wire contract of the result object.

use pretty_assertions::assert_eq;

use e2e_tests::TestHarness;
use garden_types::ContentGap;

/// The pinned example: three concepts, one community, zero diversity.
#[tokio::test]
async fn test_full_pipeline_on_pinned_example() {
    let harness = TestHarness::new();
    let result = harness
        .service
        .analyze_text("machine learning algorithms machine learning");

    let labels: Vec<&str> = result.nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["machine", "learning", "algorithms"]);

    // Frequencies 2, 2, 1; all pairs connected; one community.
    assert_eq!(result.nodes[0].frequency, 2);
    assert_eq!(result.nodes[1].frequency, 2);
    assert_eq!(result.nodes[2].frequency, 1);
    let community = result.nodes[0].community_id;
    assert!(result.nodes.iter().all(|n| n.community_id == community));
    assert_eq!(result.diversity, 0.0);
    assert_eq!(result.key_terms, vec!["machine", "learning", "algorithms"]);
}

/// Unanalyzable input yields a well-formed empty result, never an error.
#[tokio::test]
async fn test_short_input_yields_empty_result() {
    let harness = TestHarness::new();
    for text in ["", "  ", "a", "of an a", "hi"] {
        let result = harness.service.analyze_text(text);
        assert!(result.nodes.is_empty(), "text {text:?}");
        assert!(result.edges.is_empty());
        assert!(result.content_gaps.is_empty());
        assert_eq!(result.diversity, 0.0);
        assert_eq!(result.metrics.node_count, 0);
    }
}

/// Disjoint documents split into two communities with a gap record naming
/// both, and maximal diversity.
#[tokio::test]
async fn test_disjoint_documents_gap_detection() {
    let harness = TestHarness::new();
    let result = harness
        .service
        .analyze_documents(&["apple banana", "rocket engine"]);

    let communities: std::collections::BTreeSet<usize> =
        result.nodes.iter().map(|n| n.community_id).collect();
    assert_eq!(communities.len(), 2);
    assert!((result.diversity - 1.0).abs() < 1e-9);

    let named: Vec<[usize; 2]> = result
        .content_gaps
        .iter()
        .filter_map(|g| match g {
            ContentGap::DisconnectedCommunities { communities } => Some(*communities),
            _ => None,
        })
        .collect();
    assert_eq!(named.len(), 1);
    let expected: Vec<usize> = communities.into_iter().collect();
    assert_eq!(named[0], [expected[0], expected[1]]);
}

/// The serialized result must keep the exact contract field names.
#[tokio::test]
async fn test_result_contract_serialization() {
    let harness = TestHarness::new();
    let result = harness
        .service
        .analyze_text("machine learning algorithms machine learning");
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
        assert!(value.get(key).is_some(), "missing {key}");
    }

    let node = &value["nodes"][0];
    for key in ["id", "label", "frequency", "centrality", "communityId"] {
        assert!(node.get(key).is_some(), "missing node field {key}");
    }
    let edge = &value["edges"][0];
    assert_eq!(edge["kind"], "textual");
}

/// Analysis is deterministic: the same input gives the same result.
#[tokio::test]
async fn test_analysis_deterministic() {
    let harness = TestHarness::new();
    let text = "graphs model knowledge, graphs connect concepts, knowledge flows";
    let first = harness.service.analyze_text(text);
    let second = harness.service.analyze_text(text);
    assert_eq!(first, second);
}

/// Concurrent analyses share no state and cannot interfere.
#[tokio::test]
async fn test_concurrent_analyses_independent() {
    let harness = TestHarness::new();
    let baseline = harness
        .service
        .analyze_text("machine learning algorithms machine learning");

    let analyzer = harness.service.analyzer().clone();
    let mut handles = Vec::new();
    for i in 0..8 {
        let analyzer = analyzer.clone();
        handles.push(tokio::spawn(async move {
            let own = format!("topic{i} subject{i} topic{i} subject{i}");
            (
                analyzer.analyze("machine learning algorithms machine learning"),
                analyzer.analyze(&own),
            )
        }));
    }
    for handle in handles {
        let (shared, own) = handle.await.unwrap();
        assert_eq!(shared, baseline);
        assert_eq!(own.nodes.len(), 2);
    }
}
