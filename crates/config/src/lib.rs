//! Configuration loading, validation, and management for agentdist.
//!
//! Loads configuration from `~/.agentdist/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.agentdist/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Sampling temperature for classifier and reasoning calls
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Agent registry connection
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Hierarchical routing settings
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Reasoning loop settings
    #[serde(default)]
    pub executor: ExecutorConfig,
}

fn default_provider() -> String {
    "openrouter".into()
}
fn default_model() -> String {
    "anthropic/claude-sonnet-4".into()
}
fn default_temperature() -> f32 {
    0.0
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_true() -> bool {
    true
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("providers", &self.providers)
            .field("catalog", &self.catalog)
            .field("routing", &self.routing)
            .field("executor", &self.executor)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the agent registry (`/intents`, `/agents`, ...)
    #[serde(default = "default_catalog_url")]
    pub base_url: String,

    /// Per-request timeout for registry calls
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
}

fn default_catalog_url() -> String {
    "http://127.0.0.1:8000".into()
}
fn default_catalog_timeout() -> u64 {
    10
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_url(),
            timeout_secs: default_catalog_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Reuse routing decisions for identical query text
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Reasoning step budget per invocation
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// Timeout for a single agent invocation
    #[serde(default = "default_agent_timeout")]
    pub agent_timeout_secs: u64,

    /// Words that count as user confirmation for sensitive agents
    /// (case-insensitive substring match)
    #[serde(default = "default_confirmation_keywords")]
    pub confirmation_keywords: Vec<String>,
}

fn default_max_steps() -> u32 {
    10
}
fn default_agent_timeout() -> u64 {
    30
}
fn default_confirmation_keywords() -> Vec<String> {
    ["yes", "proceed", "confirm", "sure", "ok", "go ahead"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            agent_timeout_secs: default_agent_timeout(),
            confirmation_keywords: default_confirmation_keywords(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.agentdist/config.toml).
    ///
    /// Also checks environment variables:
    /// - `AGENTDIST_API_KEY` (highest priority), `OPENROUTER_API_KEY`, `OPENAI_API_KEY`
    /// - `AGENTDIST_PROVIDER`, `AGENTDIST_MODEL`, `AGENTDIST_CATALOG_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("AGENTDIST_API_KEY")
                .or_else(|| lookup("OPENROUTER_API_KEY"))
                .or_else(|| lookup("OPENAI_API_KEY"));
        }
        if let Some(provider) = lookup("AGENTDIST_PROVIDER") {
            self.default_provider = provider;
        }
        if let Some(model) = lookup("AGENTDIST_MODEL") {
            self.default_model = model;
        }
        if let Some(url) = lookup("AGENTDIST_CATALOG_URL") {
            self.catalog.base_url = url;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".agentdist")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.executor.max_steps == 0 {
            return Err(ConfigError::ValidationError(
                "executor.max_steps must be at least 1".into(),
            ));
        }

        if self.executor.agent_timeout_secs == 0 || self.catalog.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be greater than zero".into(),
            ));
        }

        if self
            .executor
            .confirmation_keywords
            .iter()
            .all(|k| k.trim().is_empty())
        {
            return Err(ConfigError::ValidationError(
                "executor.confirmation_keywords must contain at least one word".into(),
            ));
        }

        let url = &self.catalog.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "catalog.base_url must start with http:// or https:// (got '{url}')"
            )));
        }

        Ok(())
    }

    /// Check if an API key is available for the default provider.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
            || self
                .providers
                .get(&self.default_provider)
                .is_some_and(|p| p.api_key.is_some())
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            providers: HashMap::new(),
            catalog: CatalogConfig::default(),
            routing: RoutingConfig::default(),
            executor: ExecutorConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
