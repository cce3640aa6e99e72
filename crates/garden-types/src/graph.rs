//! Persisted graph data types.
//!
//! Nodes and edges owned by the knowledge graph store. Unlike the transient
//! analysis types in [`crate::analysis`], these live across many calls and
//! are written to the JSON snapshot on disk.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Free-form node/edge properties, serialized as a JSON object.
///
/// BTreeMap keeps snapshot output stable across saves.
pub type Properties = BTreeMap<String, serde_json::Value>;

/// Kind of a persisted node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// An extracted concept (a term observed in analyzed text)
    Concept,
    /// An atomic note authored by the user
    Note,
    /// A stored raw-text submission
    Text,
}

impl NodeType {
    /// Stable string form used in the type index and snapshot file.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Concept => "concept",
            NodeType::Note => "note",
            NodeType::Text => "text",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a persisted edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    /// Explicit user-made link between notes
    Related,
    /// Text node containing a concept
    Contains,
    /// Sequential relation between concepts
    Follows,
    /// Concepts observed in the same text
    CoOccurs,
}

impl EdgeType {
    /// Stable string form used in the snapshot file.
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Related => "related",
            EdgeType::Contains => "contains",
            EdgeType::Follows => "follows",
            EdgeType::CoOccurs => "co_occurs",
        }
    }
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traversal direction for adjacency queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Edges pointing at the node
    In,
    /// Edges leaving the node
    Out,
    /// Union of both
    Both,
}

/// A durable node in the knowledge graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique identifier (ULID)
    pub id: String,
    /// Human-readable label
    pub label: String,
    /// Node kind
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Free-form properties (frequency, community, fullText, ...)
    #[serde(default)]
    pub properties: Properties,
    /// Creation timestamp
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl GraphNode {
    /// Create a new node with a fresh ULID and current timestamps.
    pub fn new(label: impl Into<String>, node_type: NodeType, properties: Properties) -> Self {
        let now = Utc::now();
        Self {
            id: Ulid::new().to_string(),
            label: label.into(),
            node_type,
            properties,
            created_at: now,
            updated_at: now,
        }
    }

    /// Occurrence count stored in properties; 1 when absent.
    pub fn frequency(&self) -> u64 {
        self.properties
            .get("frequency")
            .and_then(|v| v.as_u64())
            .unwrap_or(1)
    }

    /// Community id assigned by the persisted-graph community pass; 0 when absent.
    pub fn community(&self) -> u64 {
        self.properties
            .get("community")
            .and_then(|v| v.as_u64())
            .unwrap_or(0)
    }
}

/// A durable edge in the knowledge graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Unique identifier (ULID)
    pub id: String,
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
    /// Edge kind
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    /// Accumulated weight; co-occurrence edges increment in place
    pub weight: f64,
    /// Free-form properties
    #[serde(default)]
    pub properties: Properties,
    /// Creation timestamp
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl GraphEdge {
    /// Create a new edge with a fresh ULID and current timestamp.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        edge_type: EdgeType,
        weight: f64,
        properties: Properties,
    ) -> Self {
        Self {
            id: Ulid::new().to_string(),
            source: source.into(),
            target: target.into(),
            edge_type,
            weight,
            properties,
            created_at: Utc::now(),
        }
    }

    /// Check whether this edge connects the two nodes, in either direction.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// Bucket width for temporal evolution queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// 24-hour buckets
    Day,
    /// 7-day buckets (default)
    #[default]
    Week,
    /// 30-day buckets
    Month,
}

impl Timeframe {
    /// Bucket width in milliseconds.
    pub fn bucket_ms(&self) -> i64 {
        match self {
            Timeframe::Day => 24 * 60 * 60 * 1000,
            Timeframe::Week => 7 * 24 * 60 * 60 * 1000,
            Timeframe::Month => 30 * 24 * 60 * 60 * 1000,
        }
    }

    /// Unit name used in period labels ("2 weeks ago").
    pub fn unit(&self) -> &'static str {
        match self {
            Timeframe::Day => "day",
            Timeframe::Week => "week",
            Timeframe::Month => "month",
        }
    }
}

impl std::str::FromStr for Timeframe {
    type Err = crate::error::GardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Timeframe::Day),
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            other => Err(crate::error::GardenError::InvalidInput(format!(
                "unknown timeframe: {other}"
            ))),
        }
    }
}
