//! End-to-end test infrastructure for knowledge-garden.
//!
//! Provides a shared TestHarness and helpers for tests covering the full
//! analyze-to-store-to-discovery pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use garden_service::GardenService;
use garden_store::GraphStore;
use garden_types::Settings;

/// Shared test harness for E2E tests.
///
/// Owns a temp directory, a file-backed store with a short debounce, and a
/// service wired over it.
pub struct TestHarness {
    /// Keeps the temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Snapshot file path inside the temp dir
    pub snapshot_path: PathBuf,
    /// Shared store instance
    pub store: Arc<GraphStore>,
    /// Service wired over the store
    pub service: GardenService,
}

impl TestHarness {
    /// Create a harness with a fresh file-backed store.
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let snapshot_path = temp_dir.path().join("graph.json");
        let store = Arc::new(GraphStore::open(
            snapshot_path.clone(),
            Duration::from_millis(25),
        ));
        let service = GardenService::new(Arc::clone(&store), &test_settings(&snapshot_path));

        Self {
            _temp_dir: temp_dir,
            snapshot_path,
            store,
            service,
        }
    }

    /// Re-open the snapshot file as a fresh store, as a restart would.
    pub fn reopen(&self) -> Arc<GraphStore> {
        Arc::new(GraphStore::open(
            self.snapshot_path.clone(),
            Duration::from_millis(25),
        ))
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings pointing at the harness temp dir.
pub fn test_settings(snapshot_path: &Path) -> Settings {
    Settings {
        data_path: snapshot_path
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string()),
        debounce_ms: 25,
        ..Settings::default()
    }
}
