//! Analyzer configuration.

use garden_types::AnalysisSettings;
use serde::{Deserialize, Serialize};

/// Tunables for one analysis pipeline instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Sliding-window size for co-occurrence extraction
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Token-sequence cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Members shown per topic cluster
    #[serde(default = "default_max_topic_members")]
    pub max_topic_members: usize,

    /// Key terms returned per analysis
    #[serde(default = "default_max_key_terms")]
    pub max_key_terms: usize,

    /// Cap on content-gap reports
    #[serde(default = "default_max_gap_reports")]
    pub max_gap_reports: usize,
}

fn default_window_size() -> usize {
    4
}
fn default_max_tokens() -> usize {
    200
}
fn default_max_topic_members() -> usize {
    8
}
fn default_max_key_terms() -> usize {
    10
}
fn default_max_gap_reports() -> usize {
    5
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            max_tokens: default_max_tokens(),
            max_topic_members: default_max_topic_members(),
            max_key_terms: default_max_key_terms(),
            max_gap_reports: default_max_gap_reports(),
        }
    }
}

impl From<&AnalysisSettings> for AnalyzerConfig {
    fn from(settings: &AnalysisSettings) -> Self {
        Self {
            window_size: settings.window_size,
            max_tokens: settings.max_tokens,
            ..Self::default()
        }
    }
}
