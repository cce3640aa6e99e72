//! The garden service: shared handles and collaborator plumbing.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use garden_analysis::{AnalyzerConfig, TextNetworkAnalyzer};
use garden_store::GraphStore;
use garden_types::{GenerationSettings, Settings};

use crate::error::ServiceError;
use crate::generate::{NoOpGenerator, TextGenerator, FALLBACK_TEXT};

/// Orchestrates the analysis pipeline, the graph store and the optional
/// collaborators. Constructed once at startup and shared by `Arc`.
pub struct GardenService {
    store: Arc<GraphStore>,
    analyzer: TextNetworkAnalyzer,
    generator: Arc<dyn TextGenerator>,
    generation: GenerationSettings,
}

impl GardenService {
    /// Create a service over an opened store, without a generation backend.
    pub fn new(store: Arc<GraphStore>, settings: &Settings) -> Self {
        Self {
            store,
            analyzer: TextNetworkAnalyzer::new(AnalyzerConfig::from(&settings.analysis)),
            generator: Arc::new(NoOpGenerator),
            generation: settings.generation.clone(),
        }
    }

    /// Attach a text-generation backend.
    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// The underlying graph store.
    pub fn store(&self) -> &Arc<GraphStore> {
        &self.store
    }

    /// The analysis pipeline.
    pub fn analyzer(&self) -> &TextNetworkAnalyzer {
        &self.analyzer
    }

    /// Call the generation collaborator under the configured timeout.
    ///
    /// Errors here are for callers that need to know enrichment failed;
    /// nothing above this layer propagates them to users.
    pub(crate) async fn try_generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let timeout = Duration::from_millis(self.generation.timeout_ms);
        match tokio::time::timeout(
            timeout,
            self.generator.generate(prompt, Some(&self.generation.model)),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ServiceError::Generation(format!(
                "generation timed out after {}ms",
                self.generation.timeout_ms
            ))),
        }
    }

    /// Fail-soft text generation: any error or timeout yields the fixed
    /// fallback string instead.
    pub async fn generate_text(&self, prompt: &str) -> String {
        match self.try_generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "text generation failed, using fallback");
                FALLBACK_TEXT.to_string()
            }
        }
    }
}

/// First `max` characters of a string, on char boundaries.
pub(crate) fn excerpt(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
