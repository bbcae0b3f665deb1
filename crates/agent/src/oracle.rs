//! Text-in/text-out view of a [`Provider`].

use agentdist_core::error::ProviderError;
use agentdist_core::message::Message;
use agentdist_core::provider::{Provider, ProviderRequest};
use std::sync::Arc;
use tracing::trace;

/// The language-model oracle used by the router and the reasoning loop.
///
/// Each `ask` sends the rendered prompt as a single user message and
/// returns the response text.
#[derive(Clone)]
pub struct Oracle {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl Oracle {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn ask(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: vec![Message::user(prompt)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stop: vec![],
        };
        let response = self.provider.complete(request).await?;
        trace!(model = %response.model, chars = response.message.content.len(), "Oracle replied");
        Ok(response.message.content)
    }
}
