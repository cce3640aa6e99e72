//! Snapshot persistence for the knowledge graph.
//!
//! The whole graph is written as a single JSON document:
//! `{ "nodes": {id -> node}, "edges": {id -> edge}, "metadata": {...} }`
//! with RFC3339 timestamps. Loading is forward-compatible: unknown fields
//! are ignored, a missing file means an empty graph, and a malformed file is
//! logged and treated as empty rather than crashing the process.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use garden_types::{GraphEdge, GraphNode};

use crate::data::GraphData;
use crate::error::StoreError;

/// Snapshot bookkeeping block.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SnapshotMetadata {
    /// When the snapshot was written
    #[serde(rename = "savedAt")]
    pub saved_at: Option<DateTime<Utc>>,
    /// Node count at save time
    #[serde(rename = "nodeCount", default)]
    pub node_count: usize,
    /// Edge count at save time
    #[serde(rename = "edgeCount", default)]
    pub edge_count: usize,
}

/// On-disk snapshot document.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Snapshot {
    /// Node map keyed by id
    #[serde(default)]
    pub nodes: BTreeMap<String, GraphNode>,
    /// Edge map keyed by id
    #[serde(default)]
    pub edges: BTreeMap<String, GraphEdge>,
    /// Bookkeeping block
    #[serde(default)]
    pub metadata: SnapshotMetadata,
}

impl Snapshot {
    /// Capture the current graph state.
    pub fn capture(data: &GraphData) -> Self {
        Self {
            nodes: data.node_map().clone(),
            edges: data.edge_map().clone(),
            metadata: SnapshotMetadata {
                saved_at: Some(Utc::now()),
                node_count: data.node_count(),
                edge_count: data.edge_count(),
            },
        }
    }

    /// Rebuild graph state (including indices) from this snapshot.
    pub fn into_graph(self) -> GraphData {
        GraphData::from_parts(self.nodes, self.edges)
    }
}

/// Load graph state from `path`.
///
/// Missing file -> empty graph. Malformed file -> empty graph with a logged
/// error. Neither case is fatal.
pub fn load(path: &Path) -> GraphData {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no existing graph data found, starting with empty graph");
            return GraphData::new();
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to read graph data, starting with empty graph");
            return GraphData::new();
        }
    };

    match serde_json::from_str::<Snapshot>(&content) {
        Ok(snapshot) => {
            let data = snapshot.into_graph();
            info!(
                nodes = data.node_count(),
                edges = data.edge_count(),
                "loaded graph snapshot"
            );
            data
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "malformed graph snapshot, starting with empty graph");
            GraphData::new()
        }
    }
}

/// Write the snapshot to `path`, creating parent directories as needed.
///
/// Writes to a sibling temp file and renames it into place so a crash
/// mid-write never leaves a truncated snapshot behind.
pub fn save(path: &Path, data: &GraphData) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let snapshot = Snapshot::capture(data);
    let json = serde_json::to_string_pretty(&snapshot)?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;

    debug!(
        path = %path.display(),
        nodes = snapshot.metadata.node_count,
        edges = snapshot.metadata.edge_count,
        "graph snapshot saved"
    );
    Ok(())
}
