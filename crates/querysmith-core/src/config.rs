//! Configuration management for Querysmith.
//!
//! Configuration is stored in TOML format in a platform-appropriate location.
//! Every section has defaults, so a missing file or a partial file is fine.

use crate::error::{QuerysmithError, Result};
use crate::locale::Language;
use crate::preview::DEFAULT_ENGINE_URL;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Main configuration structure for Querysmith.
///
/// ## Example Configuration File (querysmith.toml)
///
/// ```toml
/// [general]
/// log_level = "info"
/// language = "en"
///
/// [search]
/// engine_url = "https://www.google.com/search"
///
/// [generator]
/// api_base = "https://openrouter.ai/api/v1"
/// model = "openai/gpt-oss-20b:free"
/// api_key_env = "OPENROUTER_API_KEY"
/// generation_timeout_secs = 30
/// max_retries = 3
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub search: SearchConfig,

    /// Natural-language generation service
    pub generator: GeneratorConfig,
}

/// General configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// State directory (None = platform data directory)
    pub data_dir: Option<PathBuf>,

    /// Language used until the user picks one
    pub language: Language,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            log_level: "info".to_string(),
            data_dir: None,
            language: Language::En,
        }
    }
}

/// Search engine used for preview links
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub engine_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            engine_url: DEFAULT_ENGINE_URL.to_string(),
        }
    }
}

/// Chat-completions service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Base URL of the OpenAI-compatible API
    pub api_base: String,

    /// Default model id
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Deadline for one generation call
    pub generation_timeout_secs: u64,

    /// Deadline for one lookup call (model listing)
    pub lookup_timeout_secs: u64,

    /// Retries after the first generation attempt
    pub max_retries: u32,

    /// Retries after the first lookup attempt
    pub lookup_max_retries: u32,

    /// First backoff delay for generation calls, doubled per retry
    pub base_delay_ms: u64,

    /// First backoff delay for lookup calls, doubled per retry
    pub lookup_base_delay_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            api_base: "https://openrouter.ai/api/v1".to_string(),
            model: "openai/gpt-oss-20b:free".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            generation_timeout_secs: 30,
            lookup_timeout_secs: 10,
            max_retries: 3,
            lookup_max_retries: 2,
            base_delay_ms: 1000,
            lookup_base_delay_ms: 500,
        }
    }
}

impl GeneratorConfig {
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn lookup_base_delay(&self) -> Duration {
        Duration::from_millis(self.lookup_base_delay_ms)
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default config if no config file exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        info!(path = %path.display(), "Loading configuration");
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| QuerysmithError::config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs = project_dirs()?;
        Ok(dirs.config_dir().join("querysmith.toml"))
    }

    /// Get the default data directory path.
    pub fn default_data_dir() -> Result<PathBuf> {
        let dirs = project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Get the state directory (from config or default).
    pub fn data_dir(&self) -> Result<PathBuf> {
        match self.general.data_dir {
            Some(ref path) => Ok(path.clone()),
            None => Self::default_data_dir(),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "querysmith")
        .ok_or_else(|| QuerysmithError::config("Could not determine config directory"))
}
