//! # garden-types
//!
//! Shared domain types for the knowledge-garden system.
//!
//! This crate defines the data structures used throughout the system:
//! - Persisted graph nodes and edges with their typed indices
//! - The text-network analysis result contract
//! - Settings: layered configuration loading
//!
//! ## Usage
//!
//! ```rust
//! use garden_types::{GraphNode, NodeType};
//!
//! let node = GraphNode::new("rust", NodeType::Concept, Default::default());
//! assert_eq!(node.label, "rust");
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod graph;

pub use analysis::{
    ContentGap, GraphMetrics, NetworkEdge, NetworkNode, StructuralGap, TextNetworkAnalysis,
};
pub use config::{AnalysisSettings, GenerationSettings, Settings};
pub use error::GardenError;
pub use graph::{Direction, EdgeType, GraphEdge, GraphNode, NodeType, Properties, Timeframe};
