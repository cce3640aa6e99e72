//! Discovery queries over the persisted graph.
//!
//! Clusters, knowledge paths, neighborhoods, centrality ranking, gap
//! detection, similarity and temporal evolution. These read the accumulated
//! store state; they are distinct from the per-call analysis pipeline, which
//! never touches persisted data.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use garden_types::{Direction, GraphEdge, GraphNode, Timeframe};

use crate::data::GraphData;
use crate::store::GraphStore;

/// A cluster of nodes sharing a stored `community` property.
#[derive(Debug, Clone, Serialize)]
pub struct ConceptCluster {
    /// Member nodes
    pub cluster: Vec<GraphNode>,
    /// Label of the most-connected member
    pub centroid: String,
    /// Mean member frequency
    pub strength: f64,
}

/// A path between two labelled concepts with a strength score.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgePath {
    /// Nodes along the path, endpoints included
    pub path: Vec<GraphNode>,
    /// Mean edge weight along the path
    pub strength: f64,
}

/// Bounded-depth expansion around matching nodes.
#[derive(Debug, Clone, Serialize)]
pub struct Neighborhood {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Centrality ranking entry.
#[derive(Debug, Clone, Serialize)]
pub struct ConceptCentrality {
    pub concept: String,
    pub centrality: f64,
    pub connections: usize,
}

/// A weak connection between two concept clusters.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeGap {
    pub gap: String,
    #[serde(rename = "suggestedConnections")]
    pub suggested_connections: Vec<String>,
    pub reasoning: String,
}

/// A concept ranked by neighbor-set similarity to a target.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarConcept {
    pub concept: String,
    pub similarity: f64,
    #[serde(rename = "commonConnections")]
    pub common_connections: Vec<String>,
}

/// One temporal bucket of node creation.
#[derive(Debug, Clone, Serialize)]
pub struct EvolutionPeriod {
    /// Human-readable bucket label ("2 weeks ago")
    pub period: String,
    /// Labels of nodes created in the bucket
    pub concepts: Vec<String>,
    /// Percent population change versus the previous (older) bucket
    pub growth: f64,
}

/// Pairs of clusters with fewer connecting edges than this are gaps.
const GAP_CONNECTION_THRESHOLD: usize = 2;

/// At most this many gap reports are returned.
const MAX_GAP_REPORTS: usize = 5;

impl GraphStore {
    /// Recompute connected-component communities over the persisted graph
    /// and store each node's component id in its `community` property.
    ///
    /// Cluster and gap queries group by this stored property; run this after
    /// bulk ingestion to make them meaningful. Returns the component count.
    pub async fn assign_communities(&self) -> usize {
        let count = {
            let mut data = self.data().write().await;
            assign_components(&mut data)
        };
        self.schedule_save();
        info!(communities = count, "assigned persisted-graph communities");
        count
    }

    /// Group nodes by their stored `community` property.
    ///
    /// Clusters smaller than `min_size` are dropped. Centroid = the member
    /// with the most connections; strength = mean member frequency. Sorted
    /// by descending strength.
    pub async fn get_concept_clusters(&self, min_size: usize) -> Vec<ConceptCluster> {
        let data = self.data().read().await;

        let mut groups: BTreeMap<u64, Vec<GraphNode>> = BTreeMap::new();
        for node in data.nodes() {
            groups.entry(node.community()).or_default().push(node.clone());
        }

        let mut clusters = Vec::new();
        for members in groups.into_values() {
            if members.len() < min_size {
                continue;
            }

            let centroid = members
                .iter()
                .max_by_key(|n| data.connected_ids(&n.id, Direction::Both).len())
                .map(|n| n.label.clone())
                .unwrap_or_default();

            let strength = members.iter().map(|n| n.frequency() as f64).sum::<f64>()
                / members.len() as f64;

            clusters.push(ConceptCluster {
                cluster: members,
                centroid,
                strength,
            });
        }

        clusters.sort_by(|a, b| {
            b.strength
                .partial_cmp(&a.strength)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        clusters
    }

    /// All strongest paths between nodes matching the two label patterns.
    ///
    /// For every (source, target) pair the shortest path is scored by mean
    /// edge weight along it; results are sorted by descending strength.
    pub async fn get_knowledge_paths(
        &self,
        source_label: &str,
        target_label: &str,
    ) -> Vec<KnowledgePath> {
        let data = self.data().read().await;
        let sources: Vec<String> = data
            .find_nodes_by_label(source_label)
            .iter()
            .map(|n| n.id.clone())
            .collect();
        let targets: Vec<String> = data
            .find_nodes_by_label(target_label)
            .iter()
            .map(|n| n.id.clone())
            .collect();

        let mut paths = Vec::new();
        for source in &sources {
            for target in &targets {
                let path: Vec<GraphNode> = data
                    .shortest_path(source, target)
                    .into_iter()
                    .cloned()
                    .collect();
                if path.is_empty() {
                    continue;
                }

                let mut total = 0.0;
                for pair in path.windows(2) {
                    if let Some(edge) = data.edges_between(&pair[0].id, &pair[1].id).first() {
                        total += edge.weight;
                    }
                }
                let hops = (path.len() - 1).max(1) as f64;
                paths.push(KnowledgePath {
                    path,
                    strength: total / hops,
                });
            }
        }

        paths.sort_by(|a, b| {
            b.strength
                .partial_cmp(&a.strength)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        paths
    }

    /// Breadth-first expansion to `depth` hops around every node matching
    /// the label, collecting visited nodes and the edges between them.
    pub async fn get_concept_neighborhood(&self, label: &str, depth: usize) -> Neighborhood {
        let data = self.data().read().await;
        let start: Vec<String> = data
            .find_nodes_by_label(label)
            .iter()
            .map(|n| n.id.clone())
            .collect();
        if start.is_empty() {
            return Neighborhood {
                nodes: Vec::new(),
                edges: Vec::new(),
            };
        }

        let mut nodes: BTreeMap<String, GraphNode> = BTreeMap::new();
        let mut edges: BTreeMap<String, GraphEdge> = BTreeMap::new();
        let mut visited: BTreeSet<String> = BTreeSet::new();
        let mut queue: VecDeque<(String, usize)> = VecDeque::new();

        for id in start {
            if let Some(node) = data.node(&id) {
                nodes.insert(id.clone(), node.clone());
            }
            visited.insert(id.clone());
            queue.push_back((id, 0));
        }

        while let Some((current, current_depth)) = queue.pop_front() {
            if current_depth >= depth {
                continue;
            }
            for neighbor in data.connected_ids(&current, Direction::Both) {
                if let Some(node) = data.node(&neighbor) {
                    nodes.insert(neighbor.clone(), node.clone());
                }
                for edge in data.edges_between(&current, &neighbor) {
                    edges.insert(edge.id.clone(), edge.clone());
                }
                if visited.insert(neighbor.clone()) {
                    queue.push_back((neighbor, current_depth + 1));
                }
            }
        }

        Neighborhood {
            nodes: nodes.into_values().collect(),
            edges: edges.into_values().collect(),
        }
    }

    /// Every node ranked by `connections * ln(frequency + 1)`, descending.
    pub async fn get_concept_centrality(&self) -> Vec<ConceptCentrality> {
        let data = self.data().read().await;
        let mut scores: Vec<ConceptCentrality> = data
            .nodes()
            .map(|node| {
                let connections = data.connected_ids(&node.id, Direction::Both).len();
                let centrality = connections as f64 * ((node.frequency() as f64) + 1.0).ln();
                ConceptCentrality {
                    concept: node.label.clone(),
                    centrality,
                    connections,
                }
            })
            .collect();

        scores.sort_by(|a, b| {
            b.centrality
                .partial_cmp(&a.centrality)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scores
    }

    /// Report cluster pairs with fewer than two connecting edges.
    ///
    /// Based on [`Self::get_concept_clusters`]; capped at five reports.
    pub async fn detect_knowledge_gaps(&self) -> Vec<KnowledgeGap> {
        let clusters = self.get_concept_clusters(3).await;
        let data = self.data().read().await;

        let mut gaps = Vec::new();
        'outer: for i in 0..clusters.len() {
            for j in (i + 1)..clusters.len() {
                if gaps.len() >= MAX_GAP_REPORTS {
                    break 'outer;
                }
                let connections = cross_cluster_edges(&data, &clusters[i], &clusters[j]);
                if connections < GAP_CONNECTION_THRESHOLD {
                    gaps.push(KnowledgeGap {
                        gap: format!(
                            "Connection between {} and {}",
                            clusters[i].centroid, clusters[j].centroid
                        ),
                        suggested_connections: vec![
                            clusters[i].centroid.clone(),
                            clusters[j].centroid.clone(),
                        ],
                        reasoning:
                            "These concept clusters are weakly connected but may have hidden relationships"
                                .to_string(),
                    });
                }
            }
        }

        debug!(gaps = gaps.len(), "knowledge gap scan complete");
        gaps
    }

    /// Concepts ranked by Jaccard similarity of neighbor sets to the first
    /// node matching `label`.
    ///
    /// Zero-similarity concepts are excluded; at most `limit` results.
    pub async fn find_similar_concepts(&self, label: &str, limit: usize) -> Vec<SimilarConcept> {
        let data = self.data().read().await;
        let Some(target) = data.find_nodes_by_label(label).first().cloned().cloned() else {
            return Vec::new();
        };

        let target_neighbors = data.connected_ids(&target.id, Direction::Both);

        let mut similar = Vec::new();
        for node in data.nodes() {
            if node.id == target.id {
                continue;
            }
            let neighbors = data.connected_ids(&node.id, Direction::Both);
            let similarity = jaccard(&target_neighbors, &neighbors);
            if similarity > 0.0 {
                let common_connections = target_neighbors
                    .intersection(&neighbors)
                    .filter_map(|id| data.node(id).map(|n| n.label.clone()))
                    .collect();
                similar.push(SimilarConcept {
                    concept: node.label.clone(),
                    similarity,
                    common_connections,
                });
            }
        }

        similar.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        similar.truncate(limit);
        similar
    }

    /// Bucket nodes by age into day/week/month periods, oldest first, with
    /// percent growth versus the previous bucket.
    pub async fn get_temporal_evolution(&self, timeframe: Timeframe) -> Vec<EvolutionPeriod> {
        let data = self.data().read().await;
        let now = Utc::now();
        let bucket_ms = timeframe.bucket_ms();

        // bucket index (periods ago) -> labels
        let mut buckets: BTreeMap<i64, Vec<String>> = BTreeMap::new();
        for node in data.nodes() {
            let age_ms = (now - node.created_at).num_milliseconds().max(0);
            buckets
                .entry(age_ms / bucket_ms)
                .or_default()
                .push(node.label.clone());
        }

        // Oldest bucket first so growth reads as evolution toward now.
        let mut evolution = Vec::new();
        let mut previous: Option<usize> = None;
        for (index, concepts) in buckets.into_iter().rev() {
            let growth = match previous {
                Some(prev) if prev > 0 => {
                    ((concepts.len() as f64 - prev as f64) / prev as f64) * 100.0
                }
                _ => 0.0,
            };
            previous = Some(concepts.len());
            evolution.push(EvolutionPeriod {
                period: format!("{index} {}s ago", timeframe.unit()),
                concepts,
                growth,
            });
        }
        evolution
    }
}

/// Jaccard similarity of two id sets: |intersection| / |union|.
fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Count edges connecting members of two clusters, either direction.
fn cross_cluster_edges(data: &GraphData, a: &ConceptCluster, b: &ConceptCluster) -> usize {
    let mut count = 0;
    for node_a in &a.cluster {
        for node_b in &b.cluster {
            count += data.edges_between(&node_a.id, &node_b.id).len();
        }
    }
    count
}

/// Flood-fill component assignment over the whole persisted graph, writing
/// each node's component id into its `community` property.
fn assign_components(data: &mut GraphData) -> usize {
    let node_ids: Vec<String> = data.nodes().map(|n| n.id.clone()).collect();

    let mut visited: BTreeSet<String> = BTreeSet::new();
    let mut assignment: BTreeMap<String, u64> = BTreeMap::new();
    let mut next_id: u64 = 0;

    for start in &node_ids {
        if visited.contains(start) {
            continue;
        }
        let mut stack = vec![start.clone()];
        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            assignment.insert(current.clone(), next_id);
            for neighbor in data.connected_ids(&current, Direction::Both) {
                if !visited.contains(&neighbor) {
                    stack.push(neighbor);
                }
            }
        }
        next_id += 1;
    }

    for (id, community) in assignment {
        data.update_node_with(&id, |node| {
            node.properties
                .insert("community".to_string(), serde_json::json!(community));
        });
    }

    next_id as usize
}
