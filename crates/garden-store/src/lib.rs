//! # garden-store
//!
//! The durable knowledge graph store for knowledge-garden.
//!
//! Holds a single in-memory graph (node map, edge map, three indices)
//! mutated synchronously under one lock, plus a debounced JSON snapshot
//! writer. Reads always observe the latest in-memory state; disk is only
//! consulted at load time.
//!
//! ## Guarantees
//! - Every mutation updates the typed indices in the same critical section.
//! - Deleting a node cascades through its incident edges.
//! - Persistence is best-effort: a failed save is logged and retried on the
//!   next debounced flush; a missing or malformed snapshot file loads as an
//!   empty graph, never an error.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use garden_store::GraphStore;
//! use garden_types::NodeType;
//!
//! let store = GraphStore::open(path, std::time::Duration::from_secs(1)).await;
//! let node = store.create_node("rust", NodeType::Concept, Default::default()).await;
//! ```

pub mod data;
pub mod discovery;
pub mod error;
pub mod persistence;
pub mod store;

pub use data::GraphData;
pub use discovery::{
    ConceptCentrality, ConceptCluster, EvolutionPeriod, KnowledgeGap, KnowledgePath, Neighborhood,
    SimilarConcept,
};
pub use error::StoreError;
pub use persistence::Snapshot;
pub use store::{EdgeUpdate, GraphStats, GraphStore, NodeUpdate, VisEdge, VisNetwork, VisNode};
