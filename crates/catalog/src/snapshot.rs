//! In-memory catalog serving a fixed snapshot.
//!
//! Used by tests and by the CLI's `--catalog-file` mode. The snapshot file
//! is JSON with the same shapes the registry serves:
//!
//! ```json
//! {
//!   "intents": { "Travel": { "description": "Trips" } },
//!   "capabilities": { "Travel": { "booking": "Book trips" } },
//!   "agents": [ { "name": "FlightBooker", "url": "http://...", ... } ]
//! }
//! ```

use agentdist_core::catalog::{AgentDescriptor, Catalog, IntentGroup};
use agentdist_core::error::CatalogError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Serializable catalog contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub intents: BTreeMap<String, IntentGroup>,

    /// Capability clusters keyed by intent, then by cluster name.
    #[serde(default)]
    pub capabilities: BTreeMap<String, BTreeMap<String, String>>,

    #[serde(default)]
    pub agents: Vec<AgentDescriptor>,
}

/// A catalog whose contents never change.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    snapshot: CatalogSnapshot,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Unavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        let snapshot = serde_json::from_str(&content).map_err(|e| {
            CatalogError::InvalidResponse(format!("{}: {e}", path.display()))
        })?;
        Ok(Self { snapshot })
    }

    pub fn with_intent(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.snapshot
            .intents
            .insert(name.into(), IntentGroup::new(description));
        self
    }

    pub fn with_capability(
        mut self,
        intent: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.snapshot
            .capabilities
            .entry(intent.into())
            .or_default()
            .insert(name.into(), description.into());
        self
    }

    pub fn with_agent(mut self, agent: AgentDescriptor) -> Self {
        self.snapshot.agents.push(agent);
        self
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn list_intents(&self) -> Result<BTreeMap<String, IntentGroup>, CatalogError> {
        Ok(self.snapshot.intents.clone())
    }

    async fn list_capabilities(
        &self,
        intent: &str,
    ) -> Result<BTreeMap<String, String>, CatalogError> {
        Ok(self
            .snapshot
            .capabilities
            .get(intent)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_agents(&self) -> Result<Vec<AgentDescriptor>, CatalogError> {
        Ok(self.snapshot.agents.clone())
    }
}
