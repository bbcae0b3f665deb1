//! Provider trait, the abstraction over the language-model oracle.
//!
//! A Provider knows how to send a list of messages to an LLM and get a
//! text response back. Routing classifiers and the reasoning loop both
//! talk to the oracle through this trait only.

use crate::error::ProviderError;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration for a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "anthropic/claude-sonnet-4", "gpt-4o")
    pub model: String,

    /// The conversation messages
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Stop sequences
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

fn default_temperature() -> f32 {
    0.0
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated message
    pub message: Message,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// Every LLM backend implements this trait. The router and the reasoning
/// loop call `complete()` without knowing which backend is in use.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openrouter", "openai").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_request_defaults_to_deterministic_sampling() {
        let req: ProviderRequest =
            serde_json::from_str(r#"{"model":"gpt-4o","messages":[]}"#).unwrap();
        assert!(req.temperature.abs() < f32::EPSILON);
        assert!(req.max_tokens.is_none());
    }
}
