//! The shared knowledge graph store.
//!
//! One `GraphStore` is constructed at process start and handed around by
//! `Arc`. All mutations go through a single `RwLock`, so writers are
//! serialized and readers always see fully indexed state. Each mutation
//! reschedules a debounced snapshot flush: a pending flush task is aborted
//! and a fresh one sleeps for the debounce interval before writing, so rapid
//! write bursts coalesce into one disk write.

use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use garden_types::{
    Direction, EdgeType, GraphEdge, GraphNode, NodeType, Properties,
};

use crate::data::GraphData;
use crate::error::StoreError;
use crate::persistence;

/// Partial node update; unset fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct NodeUpdate {
    pub label: Option<String>,
    pub node_type: Option<NodeType>,
    pub properties: Option<Properties>,
}

impl NodeUpdate {
    /// Update only the label.
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Update only the properties map.
    pub fn properties(properties: Properties) -> Self {
        Self {
            properties: Some(properties),
            ..Self::default()
        }
    }
}

/// Partial edge update; source, target and id are immutable.
#[derive(Debug, Clone, Default)]
pub struct EdgeUpdate {
    pub weight: Option<f64>,
    pub properties: Option<Properties>,
}

impl EdgeUpdate {
    /// Update only the weight.
    pub fn weight(weight: f64) -> Self {
        Self {
            weight: Some(weight),
            ..Self::default()
        }
    }
}

/// Store-level counters.
#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    #[serde(rename = "totalNodes")]
    pub total_nodes: usize,
    #[serde(rename = "totalEdges")]
    pub total_edges: usize,
    #[serde(rename = "nodesByType")]
    pub nodes_by_type: std::collections::BTreeMap<String, usize>,
    #[serde(rename = "lastSaved")]
    pub last_saved: Option<DateTime<Utc>>,
}

/// Visualization-ready node.
#[derive(Debug, Clone, Serialize)]
pub struct VisNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub size: f64,
    pub color: String,
    #[serde(flatten)]
    pub properties: Properties,
}

/// Visualization-ready edge.
#[derive(Debug, Clone, Serialize)]
pub struct VisEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: EdgeType,
    pub weight: f64,
    pub color: String,
}

/// Visualization export of the whole persisted graph.
#[derive(Debug, Clone, Serialize)]
pub struct VisNetwork {
    pub nodes: Vec<VisNode>,
    pub edges: Vec<VisEdge>,
}

fn node_color(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Concept => "#3498db",
        NodeType::Text => "#2ecc71",
        NodeType::Note => "#e74c3c",
    }
}

fn edge_color(edge_type: EdgeType) -> &'static str {
    match edge_type {
        EdgeType::Contains => "#34495e",
        EdgeType::CoOccurs => "#9b59b6",
        EdgeType::Related => "#f39c12",
        EdgeType::Follows => "#1abc9c",
    }
}

/// Durable node/edge repository with typed indices and debounced snapshots.
pub struct GraphStore {
    data: Arc<RwLock<GraphData>>,
    snapshot_path: Option<PathBuf>,
    debounce: Duration,
    pending_flush: StdMutex<Option<JoinHandle<()>>>,
}

impl GraphStore {
    /// Store without persistence; state lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            data: Arc::new(RwLock::new(GraphData::new())),
            snapshot_path: None,
            debounce: Duration::from_secs(1),
            pending_flush: StdMutex::new(None),
        }
    }

    /// Open a store backed by the snapshot file at `path`.
    ///
    /// A missing or unreadable snapshot starts an empty graph; load failures
    /// are logged, never fatal.
    pub fn open(path: PathBuf, debounce: Duration) -> Self {
        let data = persistence::load(&path);
        info!(
            path = %path.display(),
            nodes = data.node_count(),
            edges = data.edge_count(),
            "graph store opened"
        );
        Self {
            data: Arc::new(RwLock::new(data)),
            snapshot_path: Some(path),
            debounce,
            pending_flush: StdMutex::new(None),
        }
    }

    /// Shared access to the raw graph for read-only analytics.
    pub(crate) fn data(&self) -> &Arc<RwLock<GraphData>> {
        &self.data
    }

    /// Cancel any pending flush and schedule a fresh one at now + debounce.
    pub(crate) fn schedule_save(&self) {
        let Some(path) = self.snapshot_path.clone() else {
            return;
        };
        let data = Arc::clone(&self.data);
        let debounce = self.debounce;

        let task = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let guard = data.read().await;
            if let Err(e) = persistence::save(&path, &guard) {
                // Best effort: the next mutation reschedules.
                warn!(error = %e, "debounced graph save failed");
            }
        });

        let mut pending = self
            .pending_flush
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = pending.replace(task) {
            previous.abort();
        }
    }

    /// Write the snapshot now, cancelling any pending debounced flush.
    ///
    /// Call on shutdown so the debounce window cannot drop trailing writes.
    pub async fn flush(&self) -> Result<(), StoreError> {
        {
            let mut pending = self
                .pending_flush
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(task) = pending.take() {
                task.abort();
            }
        }
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let guard = self.data.read().await;
        persistence::save(path, &guard)
    }

    // --- Node operations ---

    /// Create a node. Always succeeds; generates a fresh id.
    pub async fn create_node(
        &self,
        label: impl Into<String>,
        node_type: NodeType,
        properties: Properties,
    ) -> GraphNode {
        let node = GraphNode::new(label, node_type, properties);
        {
            let mut data = self.data.write().await;
            data.insert_node(node.clone());
        }
        self.schedule_save();
        node
    }

    /// Fetch a node by id.
    pub async fn get_node(&self, id: &str) -> Option<GraphNode> {
        self.data.read().await.node(id).cloned()
    }

    /// Merge a partial update into a node; `None` when the id is unknown.
    ///
    /// The id never changes; `updated_at` is bumped.
    pub async fn update_node(&self, id: &str, update: NodeUpdate) -> Option<GraphNode> {
        let updated = {
            let mut data = self.data.write().await;
            data.update_node_with(id, |node| {
                if let Some(label) = update.label {
                    node.label = label;
                }
                if let Some(node_type) = update.node_type {
                    node.node_type = node_type;
                }
                if let Some(properties) = update.properties {
                    node.properties = properties;
                }
                node.updated_at = Utc::now();
            })
        };
        if updated.is_some() {
            self.schedule_save();
        }
        updated
    }

    /// Delete a node and every edge touching it.
    pub async fn delete_node(&self, id: &str) -> bool {
        let removed = {
            let mut data = self.data.write().await;
            data.remove_node(id)
        };
        if removed {
            self.schedule_save();
        }
        removed
    }

    // --- Edge operations ---

    /// Create an edge. Always succeeds; endpoints are not validated, so an
    /// edge may reference nodes created later (or never).
    pub async fn create_edge(
        &self,
        source: impl Into<String>,
        target: impl Into<String>,
        edge_type: EdgeType,
        weight: f64,
        properties: Properties,
    ) -> GraphEdge {
        let edge = GraphEdge::new(source, target, edge_type, weight, properties);
        {
            let mut data = self.data.write().await;
            data.insert_edge(edge.clone());
        }
        self.schedule_save();
        edge
    }

    /// Fetch an edge by id.
    pub async fn get_edge(&self, id: &str) -> Option<GraphEdge> {
        self.data.read().await.edge(id).cloned()
    }

    /// Merge a partial update into an edge; `None` when the id is unknown.
    pub async fn update_edge(&self, id: &str, update: EdgeUpdate) -> Option<GraphEdge> {
        let updated = {
            let mut data = self.data.write().await;
            data.update_edge_with(id, |edge| {
                if let Some(weight) = update.weight {
                    edge.weight = weight;
                }
                if let Some(properties) = update.properties {
                    edge.properties = properties;
                }
            })
        };
        if updated.is_some() {
            self.schedule_save();
        }
        updated
    }

    /// Add `delta` to an edge's weight in one critical section.
    pub async fn increment_edge_weight(&self, id: &str, delta: f64) -> Option<GraphEdge> {
        let updated = {
            let mut data = self.data.write().await;
            data.update_edge_with(id, |edge| edge.weight += delta)
        };
        if updated.is_some() {
            self.schedule_save();
        }
        updated
    }

    /// Delete an edge.
    pub async fn delete_edge(&self, id: &str) -> bool {
        let removed = {
            let mut data = self.data.write().await;
            data.remove_edge(id)
        };
        if removed {
            self.schedule_save();
        }
        removed
    }

    // --- Query operations ---

    /// All nodes of one type.
    pub async fn get_nodes_by_type(&self, node_type: NodeType) -> Vec<GraphNode> {
        self.data
            .read()
            .await
            .nodes_by_type(node_type)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Distinct neighbors of a node in the given direction.
    pub async fn get_connected_nodes(&self, id: &str, direction: Direction) -> Vec<GraphNode> {
        self.data
            .read()
            .await
            .connected_nodes(id, direction)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Nodes whose label matches a case-insensitive pattern.
    pub async fn find_nodes_by_label(&self, pattern: &str) -> Vec<GraphNode> {
        self.data
            .read()
            .await
            .find_nodes_by_label(pattern)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Edges between two nodes, either direction.
    pub async fn get_edges_between(&self, a: &str, b: &str) -> Vec<GraphEdge> {
        self.data
            .read()
            .await
            .edges_between(a, b)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Breadth-first shortest path including both endpoints; empty when
    /// unreachable.
    pub async fn get_shortest_path(&self, source: &str, target: &str) -> Vec<GraphNode> {
        self.data
            .read()
            .await
            .shortest_path(source, target)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Node count.
    pub async fn node_count(&self) -> usize {
        self.data.read().await.node_count()
    }

    /// Edge count.
    pub async fn edge_count(&self) -> usize {
        self.data.read().await.edge_count()
    }

    /// Store-level counters plus last snapshot time (file mtime).
    pub async fn stats(&self) -> GraphStats {
        let data = self.data.read().await;
        let mut nodes_by_type = std::collections::BTreeMap::new();
        for node_type in [NodeType::Concept, NodeType::Note, NodeType::Text] {
            let count = data.nodes_by_type(node_type).len();
            if count > 0 {
                nodes_by_type.insert(node_type.as_str().to_string(), count);
            }
        }
        let last_saved = self.snapshot_path.as_deref().and_then(|path| {
            std::fs::metadata(path)
                .and_then(|m| m.modified())
                .ok()
                .map(DateTime::<Utc>::from)
        });
        GraphStats {
            total_nodes: data.node_count(),
            total_edges: data.edge_count(),
            nodes_by_type,
            last_saved,
        }
    }

    /// Export the whole graph with display attributes.
    pub async fn export_for_visualization(&self) -> VisNetwork {
        let data = self.data.read().await;
        let nodes = data
            .nodes()
            .map(|node| VisNode {
                id: node.id.clone(),
                label: node.label.clone(),
                node_type: node.node_type,
                size: ((node.frequency() as f64) * 2.0).clamp(5.0, 20.0),
                color: node_color(node.node_type).to_string(),
                properties: node.properties.clone(),
            })
            .collect();
        let edges = data
            .edges()
            .map(|edge| VisEdge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                label: edge.edge_type,
                weight: edge.weight,
                color: edge_color(edge.edge_type).to_string(),
            })
            .collect();
        VisNetwork { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_create_and_get_node() {
        let store = GraphStore::in_memory();
        let node = store
            .create_node("rust", NodeType::Concept, Properties::new())
            .await;
        let fetched = store.get_node(&node.id).await.unwrap();
        assert_eq!(fetched.label, "rust");
        assert_eq!(fetched.node_type, NodeType::Concept);
    }

    #[tokio::test]
    async fn test_update_node_merges_and_bumps_updated_at() {
        let store = GraphStore::in_memory();
        let node = store
            .create_node("rust", NodeType::Concept, Properties::new())
            .await;

        let mut props = Properties::new();
        props.insert("frequency".to_string(), serde_json::json!(3));
        let updated = store
            .update_node(&node.id, NodeUpdate::properties(props))
            .await
            .unwrap();

        assert_eq!(updated.id, node.id);
        assert_eq!(updated.label, "rust");
        assert_eq!(updated.frequency(), 3);
        assert!(updated.updated_at >= node.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_node_returns_none() {
        let store = GraphStore::in_memory();
        assert!(store
            .update_node("missing", NodeUpdate::label("x"))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_node_cascades() {
        let store = GraphStore::in_memory();
        let a = store
            .create_node("a", NodeType::Concept, Properties::new())
            .await;
        let b = store
            .create_node("b", NodeType::Concept, Properties::new())
            .await;
        store
            .create_edge(&a.id, &b.id, EdgeType::CoOccurs, 1.0, Properties::new())
            .await;
        store
            .create_edge(&b.id, &a.id, EdgeType::Related, 1.0, Properties::new())
            .await;

        assert!(store.delete_node(&a.id).await);
        assert_eq!(store.edge_count().await, 0);
        assert!(!store.delete_node(&a.id).await);
        assert!(store.get_node(&b.id).await.is_some());
    }

    #[tokio::test]
    async fn test_create_edge_without_endpoints() {
        // Endpoint validation is deliberately absent.
        let store = GraphStore::in_memory();
        let edge = store
            .create_edge("ghost-a", "ghost-b", EdgeType::Related, 2.0, Properties::new())
            .await;
        assert_eq!(store.get_edge(&edge.id).await.unwrap().weight, 2.0);
    }

    #[tokio::test]
    async fn test_update_edge_keeps_endpoints() {
        let store = GraphStore::in_memory();
        let edge = store
            .create_edge("a", "b", EdgeType::CoOccurs, 1.0, Properties::new())
            .await;

        let updated = store
            .update_edge(&edge.id, EdgeUpdate::weight(5.0))
            .await
            .unwrap();
        assert_eq!(updated.weight, 5.0);
        assert_eq!(updated.source, "a");
        assert_eq!(updated.target, "b");
        assert!(store.update_edge("missing", EdgeUpdate::weight(1.0)).await.is_none());
    }

    #[tokio::test]
    async fn test_increment_edge_weight() {
        let store = GraphStore::in_memory();
        let edge = store
            .create_edge("a", "b", EdgeType::CoOccurs, 1.0, Properties::new())
            .await;
        let updated = store.increment_edge_weight(&edge.id, 1.0).await.unwrap();
        assert_eq!(updated.weight, 2.0);
        assert!(store.increment_edge_weight("missing", 1.0).await.is_none());
    }

    #[tokio::test]
    async fn test_connected_nodes_and_path() {
        let store = GraphStore::in_memory();
        let a = store
            .create_node("a", NodeType::Concept, Properties::new())
            .await;
        let b = store
            .create_node("b", NodeType::Concept, Properties::new())
            .await;
        let c = store
            .create_node("c", NodeType::Concept, Properties::new())
            .await;
        store
            .create_edge(&a.id, &b.id, EdgeType::CoOccurs, 1.0, Properties::new())
            .await;
        store
            .create_edge(&b.id, &c.id, EdgeType::CoOccurs, 1.0, Properties::new())
            .await;

        let path = store.get_shortest_path(&a.id, &c.id).await;
        let labels: Vec<&str> = path.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);

        let lone = store
            .create_node("lone", NodeType::Concept, Properties::new())
            .await;
        assert!(store.get_shortest_path(&a.id, &lone.id).await.is_empty());

        let self_path = store.get_shortest_path(&a.id, &a.id).await;
        assert_eq!(self_path.len(), 1);
    }

    #[tokio::test]
    async fn test_stats_by_type() {
        let store = GraphStore::in_memory();
        store
            .create_node("rust", NodeType::Concept, Properties::new())
            .await;
        store
            .create_node("note one", NodeType::Note, Properties::new())
            .await;
        store
            .create_node("ownership", NodeType::Concept, Properties::new())
            .await;

        let stats = store.stats().await;
        assert_eq!(stats.total_nodes, 3);
        assert_eq!(stats.nodes_by_type["concept"], 2);
        assert_eq!(stats.nodes_by_type["note"], 1);
        assert!(stats.last_saved.is_none());
    }

    #[tokio::test]
    async fn test_visualization_export_colors_by_type() {
        let store = GraphStore::in_memory();
        let a = store
            .create_node("rust", NodeType::Concept, Properties::new())
            .await;
        let b = store
            .create_node("a note", NodeType::Note, Properties::new())
            .await;
        store
            .create_edge(&a.id, &b.id, EdgeType::Contains, 1.0, Properties::new())
            .await;

        let vis = store.export_for_visualization().await;
        assert_eq!(vis.nodes.len(), 2);
        assert_eq!(vis.edges.len(), 1);
        let concept = vis.nodes.iter().find(|n| n.label == "rust").unwrap();
        assert_eq!(concept.color, "#3498db");
        assert_eq!(vis.edges[0].color, "#34495e");
        assert!(concept.size >= 5.0 && concept.size <= 20.0);
    }

    #[tokio::test]
    async fn test_debounced_save_coalesces_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        let store = GraphStore::open(path.clone(), Duration::from_millis(50));

        for i in 0..10 {
            store
                .create_node(format!("n{i}"), NodeType::Concept, Properties::new())
                .await;
        }
        // Within the debounce window nothing has been written yet.
        assert!(!path.exists());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(path.exists());

        let reloaded = GraphStore::open(path, Duration::from_millis(50));
        assert_eq!(reloaded.node_count().await, 10);
    }

    #[tokio::test]
    async fn test_flush_writes_pending_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        let store = GraphStore::open(path.clone(), Duration::from_secs(60));

        store
            .create_node("rust", NodeType::Concept, Properties::new())
            .await;
        // Debounce is a minute out; flush must not wait for it.
        store.flush().await.unwrap();
        assert!(path.exists());

        let reloaded = GraphStore::open(path, Duration::from_secs(60));
        assert_eq!(reloaded.node_count().await, 1);
    }

    #[tokio::test]
    async fn test_persistence_round_trip_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");

        let store = GraphStore::open(path.clone(), Duration::from_secs(60));
        let a = store
            .create_node("rust", NodeType::Concept, Properties::new())
            .await;
        let b = store
            .create_node("memory", NodeType::Concept, Properties::new())
            .await;
        let edge = store
            .create_edge(&a.id, &b.id, EdgeType::CoOccurs, 3.0, Properties::new())
            .await;
        store.flush().await.unwrap();

        let reloaded = GraphStore::open(path, Duration::from_secs(60));
        let restored = reloaded.get_node(&a.id).await.unwrap();
        assert_eq!(restored.label, "rust");
        assert_eq!(restored.created_at.timestamp(), a.created_at.timestamp());
        let restored_edge = reloaded.get_edge(&edge.id).await.unwrap();
        assert_eq!(restored_edge.weight, 3.0);
        assert_eq!(restored_edge.edge_type, EdgeType::CoOccurs);
    }
}
