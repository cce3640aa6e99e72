//! # garden-analysis
//!
//! Text-to-network analysis for knowledge-garden.
//!
//! A single synchronous pipeline turns free-form text into a weighted
//! concept graph: tokenize -> sliding-window co-occurrence -> connected
//! component communities -> topics, key terms, diversity, content gaps ->
//! templated insights.
//!
//! The pipeline is a pure transform: no shared state, no suspension points,
//! deterministic for a given input and configuration. Bad input (empty or
//! too-short text) produces a well-formed empty result, never an error.
//!
//! ## Usage
//!
//! ```rust
//! use garden_analysis::TextNetworkAnalyzer;
//!
//! let analyzer = TextNetworkAnalyzer::default();
//! let result = analyzer.analyze("machine learning algorithms machine learning");
//! assert_eq!(result.nodes.len(), 3);
//! ```

pub mod analyzer;
pub mod community;
pub mod config;
pub mod gaps;
pub mod insights;
pub mod network;
pub mod tokenize;
pub mod topics;

pub use analyzer::TextNetworkAnalyzer;
pub use community::detect_communities;
pub use config::AnalyzerConfig;
pub use network::{NetworkBuilder, TokenGraph};
pub use tokenize::tokenize;
