//! Web-search enrichment collaborator contract.
//!
//! Optional enhancement only: on any failure the caller receives a degraded
//! response with empty result lists instead of an error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// One scored search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
    pub relevance_score: f64,
    pub concepts: Vec<String>,
}

/// Full enrichment payload for a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedSearchResponse {
    pub query: String,
    pub results: Vec<WebSearchResult>,
    pub synthesis: String,
    pub suggested_notes: Vec<String>,
    pub key_insights: Vec<String>,
    pub related_concepts: Vec<String>,
}

impl EnhancedSearchResponse {
    /// Degraded response used when the collaborator fails: the query echoes
    /// back, every list is empty.
    pub fn degraded(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            results: Vec::new(),
            synthesis: String::new(),
            suggested_notes: Vec::new(),
            key_insights: Vec::new(),
            related_concepts: Vec::new(),
        }
    }
}

/// Trait for web-search enrichment backends.
#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    /// Search the web and synthesize the results for note-taking.
    async fn search_and_enhance(
        &self,
        query: &str,
        context: Option<&str>,
    ) -> Result<EnhancedSearchResponse, ServiceError>;
}

/// Provider used when no search backend is configured.
pub struct NoOpWebSearch;

#[async_trait]
impl WebSearchProvider for NoOpWebSearch {
    async fn search_and_enhance(
        &self,
        _query: &str,
        _context: Option<&str>,
    ) -> Result<EnhancedSearchResponse, ServiceError> {
        Err(ServiceError::Search("no search provider configured".to_string()))
    }
}
