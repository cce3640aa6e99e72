//! Store error types.

use thiserror::Error;

/// Errors surfaced by persistence operations.
///
/// In-memory graph operations are infallible by design; only explicit
/// snapshot I/O returns errors, and callers on the debounced path log and
/// retry rather than propagate.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Snapshot file I/O error
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot serialization error
    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
