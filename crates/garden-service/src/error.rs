//! Service error types.

use thiserror::Error;

/// Errors from service-layer operations.
///
/// Collaborator errors exist so trait implementations can report failure;
/// the service converts them to fallback values at the boundary rather than
/// letting them escape to callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Text-generation collaborator failure
    #[error("Generation error: {0}")]
    Generation(String),

    /// Web-search collaborator failure
    #[error("Search error: {0}")]
    Search(String),

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
