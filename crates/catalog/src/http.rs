//! REST client for the agent registry.
//!
//! Endpoints:
//! - `GET /intents` → `{ "<intent>": { "description": "..." } }`
//! - `GET /intents/{intent}/capabilities` → `{ "<cluster>": "<description>" }`
//! - `GET /agents` → `[AgentDescriptor]`
//! - `GET /agents/{name}` → `AgentDescriptor`

use agentdist_core::catalog::{AgentDescriptor, Catalog, IntentGroup};
use agentdist_core::error::CatalogError;
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Registry client over HTTP.
pub struct HttpCatalog {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalog {
    /// Create a client for the registry at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL, escaping each path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CatalogError::Unavailable(format!("invalid registry URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| CatalogError::Unavailable("registry URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, CatalogError> {
        let url = self.endpoint(segments)?;
        debug!(%url, "Catalog request");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Unavailable(format!(
                "GET {url} returned {}: {body}",
                status.as_u16()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::InvalidResponse(format!("GET {url}: {e}")))
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn list_intents(&self) -> Result<BTreeMap<String, IntentGroup>, CatalogError> {
        self.get_json(&["intents"]).await
    }

    async fn list_capabilities(
        &self,
        intent: &str,
    ) -> Result<BTreeMap<String, String>, CatalogError> {
        self.get_json(&["intents", intent, "capabilities"]).await
    }

    async fn list_agents(&self) -> Result<Vec<AgentDescriptor>, CatalogError> {
        self.get_json(&["agents"]).await
    }

    async fn get_agent(&self, name: &str) -> Result<AgentDescriptor, CatalogError> {
        match self.get_json::<AgentDescriptor>(&["agents", name]).await {
            Ok(agent) => Ok(agent),
            Err(e) => {
                warn!(agent = name, error = %e, "Direct agent lookup failed, scanning full list");
                self.list_agents()
                    .await?
                    .into_iter()
                    .find(|a| a.name == name)
                    .ok_or_else(|| CatalogError::AgentNotFound(name.to_string()))
            }
        }
    }
}
