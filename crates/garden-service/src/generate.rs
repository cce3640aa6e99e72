//! Text-generation collaborator contract.
//!
//! The core never talks to a model backend directly; it depends on this
//! trait and treats every failure as recoverable. Implementations handle
//! transport, retries and model selection.

use async_trait::async_trait;

use crate::error::ServiceError;

/// Fixed fallback returned whenever generation is unavailable.
pub const FALLBACK_TEXT: &str = "AI enrichment is currently unavailable.";

/// Trait for text-generation backends.
///
/// Implementations should return promptly or error; the service applies its
/// own timeout on top and degrades to [`FALLBACK_TEXT`].
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the given prompt.
    ///
    /// `model_hint` names a preferred model; implementations may ignore it.
    async fn generate(&self, prompt: &str, model_hint: Option<&str>)
        -> Result<String, ServiceError>;
}

/// A generator for keyword-only mode and tests.
///
/// Always errors, forcing every enrichment path onto its fallback.
pub struct NoOpGenerator;

#[async_trait]
impl TextGenerator for NoOpGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _model_hint: Option<&str>,
    ) -> Result<String, ServiceError> {
        Err(ServiceError::Generation("no generator configured".to_string()))
    }
}
