//! Configuration loading for knowledge-garden.
//!
//! Layered precedence: built-in defaults -> config file
//! (~/.config/knowledge-garden/config.toml) -> environment variables
//! (GARDEN_*) -> CLI flags (applied by the caller).

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::GardenError;

/// Analysis pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Sliding-window size for co-occurrence extraction
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Token-sequence cap; bounds downstream cost
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_window_size() -> usize {
    4
}

fn default_max_tokens() -> usize {
    200
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Text-generation collaborator settings.
///
/// The collaborator itself is optional (attached at service construction);
/// these settings shape how it is called when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Model hint forwarded to the collaborator
    #[serde(default = "default_generation_model")]
    pub model: String,

    /// Hard timeout before falling back (ms)
    #[serde(default = "default_generation_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_generation_model() -> String {
    "codellama:7b-instruct".to_string()
}

fn default_generation_timeout_ms() -> u64 {
    10_000
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: default_generation_model(),
            timeout_ms: default_generation_timeout_ms(),
        }
    }
}

/// Main application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the graph snapshot file
    #[serde(default = "default_data_path")]
    pub data_path: String,

    /// Debounce interval for snapshot persistence (ms)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Analysis pipeline settings
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Text-generation collaborator settings
    #[serde(default)]
    pub generation: GenerationSettings,
}

fn default_data_path() -> String {
    ProjectDirs::from("", "", "knowledge-garden")
        .map(|p| p.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./data"))
        .to_string_lossy()
        .to_string()
}

fn default_debounce_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            debounce_ms: default_debounce_ms(),
            log_level: default_log_level(),
            analysis: AnalysisSettings::default(),
            generation: GenerationSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/knowledge-garden/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (GARDEN_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, GardenError> {
        let config_dir = ProjectDirs::from("", "", "knowledge-garden")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("data_path", default_data_path())
            .map_err(|e| GardenError::Config(e.to_string()))?
            .set_default("debounce_ms", default_debounce_ms() as i64)
            .map_err(|e| GardenError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| GardenError::Config(e.to_string()))?
            .set_default("analysis.window_size", default_window_size() as i64)
            .map_err(|e| GardenError::Config(e.to_string()))?
            .set_default("analysis.max_tokens", default_max_tokens() as i64)
            .map_err(|e| GardenError::Config(e.to_string()))?
            .set_default("generation.model", default_generation_model())
            .map_err(|e| GardenError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: GARDEN_DATA_PATH, GARDEN_DEBOUNCE_MS, GARDEN_LOG_LEVEL, ...
        builder = builder.add_source(
            Environment::with_prefix("GARDEN")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| GardenError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| GardenError::Config(e.to_string()))
    }

    /// Path of the JSON snapshot file inside `data_path`.
    pub fn snapshot_path(&self) -> PathBuf {
        PathBuf::from(&self.data_path).join("graph.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.debounce_ms, 1000);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.analysis.window_size, 4);
        assert_eq!(settings.analysis.max_tokens, 200);
        assert_eq!(settings.generation.timeout_ms, 10_000);
    }

    #[test]
    fn test_snapshot_path_under_data_dir() {
        let settings = Settings {
            data_path: "/tmp/garden".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            settings.snapshot_path(),
            PathBuf::from("/tmp/garden/graph.json")
        );
    }

    #[test]
    fn test_settings_serialization_round_trip() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings.debounce_ms, parsed.debounce_ms);
        assert_eq!(settings.analysis.window_size, parsed.analysis.window_size);
    }

    #[test]
    fn test_generation_defaults() {
        let generation = GenerationSettings::default();
        assert_eq!(generation.timeout_ms, 10_000);
        assert_eq!(generation.model, "codellama:7b-instruct");
    }
}
