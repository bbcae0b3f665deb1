pub mod ask;
pub mod catalog;
pub mod init;
pub mod route;

use agentdist_catalog::{HttpCatalog, StaticCatalog};
use agentdist_config::AppConfig;
use agentdist_core::catalog::Catalog;
use agentdist_core::provider::Provider;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub fn load_config() -> CliResult<AppConfig> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Snapshot file when given, otherwise the configured registry.
pub fn open_catalog(config: &AppConfig, snapshot: Option<&Path>) -> CliResult<Arc<dyn Catalog>> {
    match snapshot {
        Some(path) => Ok(Arc::new(StaticCatalog::from_json_file(path)?)),
        None => Ok(Arc::new(HttpCatalog::new(
            &config.catalog.base_url,
            Duration::from_secs(config.catalog.timeout_secs),
        ))),
    }
}

pub fn open_provider(config: &AppConfig) -> CliResult<Arc<dyn Provider>> {
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    AGENTDIST_API_KEY   (generic)");
        eprintln!("    OPENROUTER_API_KEY  (OpenRouter)");
        eprintln!("    OPENAI_API_KEY      (OpenAI direct)");
        eprintln!();
        eprintln!("  Or add it to {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    Ok(agentdist_providers::build_oracle_provider(config)?)
}
