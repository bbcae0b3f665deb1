//! Resolves the configured oracle provider.

use crate::openai_compat::OpenAiCompatProvider;
use agentdist_config::AppConfig;
use agentdist_core::error::ProviderError;
use agentdist_core::provider::Provider;
use std::sync::Arc;
use tracing::debug;

/// Build the chat-completions client for `config.default_provider`.
///
/// The `[providers.<name>]` section overrides the top-level key and the
/// well-known endpoint. A provider with no known endpoint must set `api_url`.
pub fn build_oracle_provider(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let name = config.default_provider.as_str();
    let section = config.providers.get(name);

    let api_key = section
        .and_then(|p| p.api_key.clone())
        .or_else(|| config.api_key.clone())
        .ok_or_else(|| ProviderError::NotConfigured(format!("no API key for '{name}'")))?;

    let base_url = section
        .and_then(|p| p.api_url.clone())
        .or_else(|| well_known_url(name).map(str::to_string))
        .ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "unknown provider '{name}', set providers.{name}.api_url"
            ))
        })?;

    debug!(provider = name, url = %base_url, "Oracle provider resolved");
    Ok(Arc::new(OpenAiCompatProvider::new(name, base_url, api_key)))
}

/// Endpoints for the providers whose keys are read from the environment.
fn well_known_url(name: &str) -> Option<&'static str> {
    match name {
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "openai" => Some("https://api.openai.com/v1"),
        _ => None,
    }
}
