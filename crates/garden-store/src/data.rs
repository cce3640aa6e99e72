//! In-memory graph state and index maintenance.
//!
//! `GraphData` owns the node and edge maps plus three secondary indices:
//! `nodes_by_type`, `edges_by_source`, `edges_by_target`. Every mutation
//! keeps the indices consistent within the same call; there is no partially
//! indexed state observable between operations.
//!
//! All methods here are synchronous and lock-free; [`crate::store::GraphStore`]
//! serializes access.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::warn;

use garden_types::{Direction, GraphEdge, GraphNode, NodeType};

/// The shared graph structure behind the store lock.
#[derive(Debug, Default, Clone)]
pub struct GraphData {
    nodes: BTreeMap<String, GraphNode>,
    edges: BTreeMap<String, GraphEdge>,
    nodes_by_type: BTreeMap<NodeType, BTreeSet<String>>,
    edges_by_source: BTreeMap<String, BTreeSet<String>>,
    edges_by_target: BTreeMap<String, BTreeSet<String>>,
}

impl GraphData {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a graph (and its indices) from raw node/edge maps, as read
    /// from a snapshot.
    pub fn from_parts(
        nodes: BTreeMap<String, GraphNode>,
        edges: BTreeMap<String, GraphEdge>,
    ) -> Self {
        let mut data = Self {
            nodes,
            edges,
            ..Self::default()
        };
        for (id, node) in &data.nodes {
            data.nodes_by_type
                .entry(node.node_type)
                .or_default()
                .insert(id.clone());
        }
        let index: Vec<(String, String, String)> = data
            .edges
            .values()
            .map(|e| (e.id.clone(), e.source.clone(), e.target.clone()))
            .collect();
        for (id, source, target) in index {
            data.edges_by_source.entry(source).or_default().insert(id.clone());
            data.edges_by_target.entry(target).or_default().insert(id);
        }
        data
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All nodes, in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// All edges, in id order.
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.values()
    }

    /// Node map keyed by id (snapshot serialization).
    pub fn node_map(&self) -> &BTreeMap<String, GraphNode> {
        &self.nodes
    }

    /// Edge map keyed by id (snapshot serialization).
    pub fn edge_map(&self) -> &BTreeMap<String, GraphEdge> {
        &self.edges
    }

    // --- Mutations ---

    /// Insert a node and index it by type.
    pub fn insert_node(&mut self, node: GraphNode) {
        self.nodes_by_type
            .entry(node.node_type)
            .or_default()
            .insert(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
    }

    /// Mutable access to a node, keeping the type index consistent through
    /// the provided closure.
    pub fn update_node_with<F>(&mut self, id: &str, apply: F) -> Option<GraphNode>
    where
        F: FnOnce(&mut GraphNode),
    {
        let node = self.nodes.get_mut(id)?;
        let old_type = node.node_type;
        apply(node);
        node.id = id.to_string(); // id is immutable
        let new_type = node.node_type;
        let updated = node.clone();

        if old_type != new_type {
            if let Some(set) = self.nodes_by_type.get_mut(&old_type) {
                set.remove(id);
            }
            self.nodes_by_type
                .entry(new_type)
                .or_default()
                .insert(id.to_string());
        }
        Some(updated)
    }

    /// Remove a node and cascade through every incident edge.
    ///
    /// Returns false when the id is unknown.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };

        if let Some(set) = self.nodes_by_type.get_mut(&node.node_type) {
            set.remove(id);
        }

        let incident: Vec<String> = self
            .edges_by_source
            .get(id)
            .into_iter()
            .chain(self.edges_by_target.get(id))
            .flatten()
            .cloned()
            .collect();
        for edge_id in incident {
            self.remove_edge(&edge_id);
        }

        self.nodes.remove(id);
        true
    }

    /// Insert an edge and index it by source and target.
    ///
    /// Endpoint existence is not validated; the caller may create edges
    /// ahead of their nodes.
    pub fn insert_edge(&mut self, edge: GraphEdge) {
        self.edges_by_source
            .entry(edge.source.clone())
            .or_default()
            .insert(edge.id.clone());
        self.edges_by_target
            .entry(edge.target.clone())
            .or_default()
            .insert(edge.id.clone());
        self.edges.insert(edge.id.clone(), edge);
    }

    /// Mutable access to an edge. Source/target/id are immutable; only
    /// weight and properties may change, so the directional indices stay
    /// untouched.
    pub fn update_edge_with<F>(&mut self, id: &str, apply: F) -> Option<GraphEdge>
    where
        F: FnOnce(&mut GraphEdge),
    {
        let edge = self.edges.get_mut(id)?;
        let (source, target) = (edge.source.clone(), edge.target.clone());
        apply(edge);
        edge.id = id.to_string();
        edge.source = source;
        edge.target = target;
        Some(edge.clone())
    }

    /// Remove an edge and unindex it.
    ///
    /// Returns false when the id is unknown.
    pub fn remove_edge(&mut self, id: &str) -> bool {
        let Some(edge) = self.edges.remove(id) else {
            return false;
        };
        if let Some(set) = self.edges_by_source.get_mut(&edge.source) {
            set.remove(id);
        }
        if let Some(set) = self.edges_by_target.get_mut(&edge.target) {
            set.remove(id);
        }
        true
    }

    // --- Queries ---

    /// Node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Edge by id.
    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.get(id)
    }

    /// Nodes of one type, in id order.
    pub fn nodes_by_type(&self, node_type: NodeType) -> Vec<&GraphNode> {
        self.nodes_by_type
            .get(&node_type)
            .into_iter()
            .flatten()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    /// Distinct ids of nodes adjacent to `id` in the given direction.
    pub fn connected_ids(&self, id: &str, direction: Direction) -> BTreeSet<String> {
        let mut connected = BTreeSet::new();

        if matches!(direction, Direction::Out | Direction::Both) {
            for edge_id in self.edges_by_source.get(id).into_iter().flatten() {
                if let Some(edge) = self.edges.get(edge_id) {
                    connected.insert(edge.target.clone());
                }
            }
        }

        if matches!(direction, Direction::In | Direction::Both) {
            for edge_id in self.edges_by_target.get(id).into_iter().flatten() {
                if let Some(edge) = self.edges.get(edge_id) {
                    connected.insert(edge.source.clone());
                }
            }
        }

        connected
    }

    /// Nodes adjacent to `id` in the given direction, deduplicated.
    pub fn connected_nodes(&self, id: &str, direction: Direction) -> Vec<&GraphNode> {
        self.connected_ids(id, direction)
            .iter()
            .filter_map(|n| self.nodes.get(n))
            .collect()
    }

    /// Nodes whose label matches the pattern, case-insensitively.
    ///
    /// An invalid pattern yields no matches rather than an error.
    pub fn find_nodes_by_label(&self, pattern: &str) -> Vec<&GraphNode> {
        let regex = match regex::RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => regex,
            Err(e) => {
                warn!(pattern, error = %e, "invalid label pattern");
                return Vec::new();
            }
        };
        self.nodes
            .values()
            .filter(|n| regex.is_match(&n.label))
            .collect()
    }

    /// Edges between two nodes, either direction.
    pub fn edges_between(&self, a: &str, b: &str) -> Vec<&GraphEdge> {
        let mut result = Vec::new();
        for (from, to) in [(a, b), (b, a)] {
            for edge_id in self.edges_by_source.get(from).into_iter().flatten() {
                if let Some(edge) = self.edges.get(edge_id) {
                    if edge.target == to {
                        result.push(edge);
                    }
                }
            }
        }
        result
    }

    /// Breadth-first shortest path over undirected adjacency.
    ///
    /// Includes both endpoints; `[a]` when source equals target; empty when
    /// either id is unknown or the target is unreachable.
    pub fn shortest_path(&self, source: &str, target: &str) -> Vec<&GraphNode> {
        if !self.nodes.contains_key(source) || !self.nodes.contains_key(target) {
            return Vec::new();
        }

        let mut visited: BTreeSet<String> = BTreeSet::new();
        let mut queue: VecDeque<Vec<String>> = VecDeque::new();
        queue.push_back(vec![source.to_string()]);

        while let Some(path) = queue.pop_front() {
            let current = path.last().cloned().unwrap_or_default();
            if current == target {
                return path.iter().filter_map(|id| self.nodes.get(id)).collect();
            }
            if !visited.insert(current.clone()) {
                continue;
            }
            for neighbor in self.connected_ids(&current, Direction::Both) {
                if !visited.contains(&neighbor) {
                    let mut next = path.clone();
                    next.push(neighbor);
                    queue.push_back(next);
                }
            }
        }

        Vec::new()
    }
}
