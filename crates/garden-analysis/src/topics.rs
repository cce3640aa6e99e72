//! Topic clusters, key terms and diversity scoring.

use std::collections::BTreeMap;

use garden_types::NetworkNode;

/// Group node ids into topic clusters by community.
///
/// Groups of one are dropped (a single term is not a topic); remaining
/// groups are ordered by descending size and capped at `max_members` per
/// group for display. Member order inside a group follows node input order.
pub fn extract_topics(
    nodes: &[NetworkNode],
    communities: &BTreeMap<String, usize>,
    max_members: usize,
) -> Vec<Vec<String>> {
    let mut groups: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for node in nodes {
        if let Some(&community) = communities.get(&node.id) {
            groups.entry(community).or_default().push(node.id.clone());
        }
    }

    let mut topics: Vec<Vec<String>> = groups.into_values().filter(|g| g.len() > 1).collect();
    topics.sort_by_key(|g| std::cmp::Reverse(g.len()));
    for topic in &mut topics {
        topic.truncate(max_members);
    }
    topics
}

/// Top terms ranked by `frequency + centrality`, descending.
///
/// The sort is stable, so ties keep node input order.
pub fn key_terms(nodes: &[NetworkNode], max_terms: usize) -> Vec<String> {
    let mut ranked: Vec<&NetworkNode> = nodes.iter().collect();
    ranked.sort_by_key(|n| std::cmp::Reverse(n.frequency + n.centrality));
    ranked
        .into_iter()
        .take(max_terms)
        .map(|n| n.label.clone())
        .collect()
}

/// Normalized Shannon entropy of the community-size distribution.
///
/// `H = -sum(p * log2(p))` over community proportions, divided by
/// `log2(#communities)` to land in [0, 1]. A graph with at most one
/// community has no diversity by definition, so the score is 0 rather than
/// the 0/0 the raw formula would produce.
pub fn diversity(communities: &BTreeMap<String, usize>) -> f64 {
    let total = communities.len();
    if total == 0 {
        return 0.0;
    }

    let mut sizes: BTreeMap<usize, usize> = BTreeMap::new();
    for id in communities.values() {
        *sizes.entry(*id).or_insert(0) += 1;
    }

    let count = sizes.len();
    if count <= 1 {
        return 0.0;
    }

    let entropy: f64 = sizes
        .values()
        .map(|&size| {
            let p = size as f64 / total as f64;
            -p * p.log2()
        })
        .sum();

    entropy / (count as f64).log2()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(label: &str, frequency: u32, centrality: u32) -> NetworkNode {
        NetworkNode {
            id: label.to_string(),
            label: label.to_string(),
            frequency,
            centrality,
            community_id: 0,
            visual_size: 0.0,
            visual_color: String::new(),
        }
    }

    fn communities(pairs: &[(&str, usize)]) -> BTreeMap<String, usize> {
        pairs.iter().map(|(n, c)| (n.to_string(), *c)).collect()
    }

    #[test]
    fn test_topics_drop_singleton_groups() {
        let nodes = vec![node("apple", 2, 1), node("banana", 2, 1), node("lone", 1, 0)];
        let assignment = communities(&[("apple", 0), ("banana", 0), ("lone", 1)]);
        let topics = extract_topics(&nodes, &assignment, 8);
        assert_eq!(topics, vec![vec!["apple".to_string(), "banana".to_string()]]);
    }

    #[test]
    fn test_topics_sorted_by_descending_size() {
        let nodes = vec![
            node("a1", 1, 1),
            node("a2", 1, 1),
            node("b1", 1, 1),
            node("b2", 1, 1),
            node("b3", 1, 1),
        ];
        let assignment =
            communities(&[("a1", 0), ("a2", 0), ("b1", 1), ("b2", 1), ("b3", 1)]);
        let topics = extract_topics(&nodes, &assignment, 8);
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].len(), 3);
        assert_eq!(topics[1].len(), 2);
    }

    #[test]
    fn test_topics_capped_per_group() {
        let nodes: Vec<NetworkNode> = (0..12).map(|i| node(&format!("t{i:02}"), 1, 1)).collect();
        let assignment: BTreeMap<String, usize> =
            nodes.iter().map(|n| (n.id.clone(), 0)).collect();
        let topics = extract_topics(&nodes, &assignment, 8);
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].len(), 8);
        // Input order preserved within the group.
        assert_eq!(topics[0][0], "t00");
    }

    #[test]
    fn test_key_terms_ranking() {
        let nodes = vec![
            node("machine", 2, 4),
            node("learning", 2, 4),
            node("algorithms", 1, 4),
        ];
        let terms = key_terms(&nodes, 10);
        assert_eq!(terms, vec!["machine", "learning", "algorithms"]);
    }

    #[test]
    fn test_key_terms_capped() {
        let nodes: Vec<NetworkNode> = (0..15).map(|i| node(&format!("t{i}"), i, 0)).collect();
        let terms = key_terms(&nodes, 10);
        assert_eq!(terms.len(), 10);
        assert_eq!(terms[0], "t14");
    }

    #[test]
    fn test_diversity_zero_for_single_community() {
        let assignment = communities(&[("a", 0), ("b", 0), ("c", 0)]);
        assert_eq!(diversity(&assignment), 0.0);
    }

    #[test]
    fn test_diversity_zero_for_empty() {
        assert_eq!(diversity(&BTreeMap::new()), 0.0);
    }

    #[test]
    fn test_diversity_one_for_equal_communities() {
        let assignment = communities(&[("a", 0), ("b", 0), ("c", 1), ("d", 1)]);
        assert!((diversity(&assignment) - 1.0).abs() < 1e-9);

        // Holds for k communities of equal size, not just two.
        let assignment =
            communities(&[("a", 0), ("b", 0), ("c", 1), ("d", 1), ("e", 2), ("f", 2)]);
        assert!((diversity(&assignment) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_diversity_below_one_for_skewed_communities() {
        let assignment = communities(&[("a", 0), ("b", 0), ("c", 0), ("d", 1)]);
        let score = diversity(&assignment);
        assert!(score > 0.0 && score < 1.0);
    }
}
