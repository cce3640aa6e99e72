//! Atomic notes and bidirectional links.
//!
//! Notes are persisted as `note`-typed graph nodes; explicit links between
//! notes are `related` edges. Link direction is an artifact of creation
//! order; every query here treats links as bidirectional.

use serde::Serialize;
use tracing::info;

use garden_types::{Direction, EdgeType, GraphEdge, GraphNode, NodeType, Properties};

use crate::import;
use crate::service::{excerpt, GardenService};

/// Length of the label excerpt taken from note content.
const NOTE_LABEL_LENGTH: usize = 50;

/// A note-centric view of the graph for visualization.
#[derive(Debug, Clone, Serialize)]
pub struct NoteGraph {
    /// The note and its linked notes
    pub nodes: Vec<GraphNode>,
    /// The `related` edges between them
    pub links: Vec<GraphEdge>,
}

impl GardenService {
    /// Create an atomic note.
    ///
    /// The label is a content excerpt; full content and tags live in
    /// properties.
    pub async fn create_note(&self, content: &str, tags: &[String]) -> GraphNode {
        let mut properties = Properties::new();
        properties.insert("content".to_string(), serde_json::json!(content));
        properties.insert("tags".to_string(), serde_json::json!(tags));

        let note = self
            .store()
            .create_node(excerpt(content, NOTE_LABEL_LENGTH), NodeType::Note, properties)
            .await;
        info!(note_id = %note.id, "created note");
        note
    }

    /// All notes, newest first.
    pub async fn all_notes(&self) -> Vec<GraphNode> {
        let mut notes = self.store().get_nodes_by_type(NodeType::Note).await;
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notes
    }

    /// Link two notes. Returns `None` when either id is unknown; linking
    /// never fails loudly.
    pub async fn link_notes(&self, note_a: &str, note_b: &str) -> Option<GraphEdge> {
        let store = self.store();
        if store.get_node(note_a).await.is_none() || store.get_node(note_b).await.is_none() {
            return None;
        }
        let edge = store
            .create_edge(note_a, note_b, EdgeType::Related, 1.0, Properties::new())
            .await;
        Some(edge)
    }

    /// Notes linked to the given note, in either direction.
    pub async fn connected_notes(&self, note_id: &str) -> Vec<GraphNode> {
        self.store()
            .get_connected_nodes(note_id, Direction::Both)
            .await
            .into_iter()
            .filter(|n| n.node_type == NodeType::Note)
            .collect()
    }

    /// The note, its linked notes, and the `related` edges between them.
    pub async fn note_graph(&self, note_id: &str) -> NoteGraph {
        let store = self.store();
        let Some(center) = store.get_node(note_id).await else {
            return NoteGraph {
                nodes: Vec::new(),
                links: Vec::new(),
            };
        };

        let neighbors = self.connected_notes(note_id).await;
        let mut links = Vec::new();
        for neighbor in &neighbors {
            links.extend(
                store
                    .get_edges_between(note_id, &neighbor.id)
                    .await
                    .into_iter()
                    .filter(|e| e.edge_type == EdgeType::Related),
            );
        }

        let mut nodes = vec![center];
        nodes.extend(neighbors);
        NoteGraph { nodes, links }
    }

    /// Notes whose content contains the query, case-insensitively.
    pub async fn search_notes(&self, query: &str) -> Vec<GraphNode> {
        let needle = query.to_lowercase();
        self.all_notes()
            .await
            .into_iter()
            .filter(|note| {
                note.properties
                    .get("content")
                    .and_then(|v| v.as_str())
                    .map(|content| content.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Import file content as notes, one per chunk, tagged with the source
    /// file name.
    pub async fn import_file(&self, content: &str, file_name: &str) -> Vec<GraphNode> {
        let tags = vec![format!("imported:{file_name}")];
        let mut notes = Vec::new();
        for chunk in import::split_notes(content, file_name) {
            notes.push(self.create_note(&chunk, &tags).await);
        }
        info!(count = notes.len(), file = file_name, "imported notes");
        notes
    }
}
