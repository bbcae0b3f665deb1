//! Catalog trait and agent descriptors.
//!
//! The catalog is the registry of callable capability providers
//! ("agents"), grouped into intent groups and capability clusters. The
//! runtime only ever reads from it.

use crate::error::CatalogError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A top-level intent group as listed by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentGroup {
    #[serde(default)]
    pub description: String,
}

impl IntentGroup {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// What an agent consumes and produces.
///
/// `requires` and `provides` hold dotted context keys such as
/// `ctx.user.destination`; only the last segment is shown to the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapabilityContract {
    #[serde(default)]
    pub tasks: Vec<String>,

    #[serde(default)]
    pub input_types: Vec<String>,

    #[serde(default)]
    pub requires: Vec<String>,

    #[serde(default)]
    pub provides: Vec<String>,

    #[serde(default)]
    pub compliance: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<serde_json::Value>,
}

/// One callable capability provider.
///
/// `requires_confirmation` is resolved once when the record is loaded:
/// a missing or false top-level flag falls back to the flag nested inside
/// the capability contract, so either one set to true requires confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AgentRecord")]
pub struct AgentDescriptor {
    pub name: String,
    pub url: String,
    pub description: String,
    pub intent_group: String,
    pub capability_cluster: String,
    pub requires_confirmation: bool,
    pub capabilities: CapabilityContract,
}

/// Wire shape of an agent record, before the confirmation flag is resolved.
#[derive(Deserialize)]
struct AgentRecord {
    name: String,
    url: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    intent_group: String,
    #[serde(default)]
    capability_cluster: String,
    #[serde(default)]
    requires_confirmation: Option<bool>,
    #[serde(default)]
    capabilities: CapabilityRecord,
}

#[derive(Default, Deserialize)]
struct CapabilityRecord {
    #[serde(default)]
    requires_confirmation: Option<bool>,
    #[serde(flatten)]
    contract: CapabilityContract,
}

impl From<AgentRecord> for AgentDescriptor {
    fn from(record: AgentRecord) -> Self {
        let requires_confirmation = record.requires_confirmation.unwrap_or(false)
            || record.capabilities.requires_confirmation.unwrap_or(false);
        Self {
            name: record.name,
            url: record.url,
            description: record.description,
            intent_group: record.intent_group,
            capability_cluster: record.capability_cluster,
            requires_confirmation,
            capabilities: record.capabilities.contract,
        }
    }
}

impl AgentDescriptor {
    /// Build a descriptor with an empty capability contract.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
        intent_group: impl Into<String>,
        capability_cluster: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            description: description.into(),
            intent_group: intent_group.into(),
            capability_cluster: capability_cluster.into(),
            requires_confirmation: false,
            capabilities: CapabilityContract::default(),
        }
    }

    pub fn with_confirmation(mut self, required: bool) -> Self {
        self.requires_confirmation = required;
        self
    }

    pub fn with_contract(mut self, contract: CapabilityContract) -> Self {
        self.capabilities = contract;
        self
    }

    /// Required input field names with their context prefix stripped.
    pub fn input_fields(&self) -> Vec<&str> {
        self.capabilities.requires.iter().map(|f| last_segment(f)).collect()
    }

    /// Produced output field names with their context prefix stripped.
    pub fn output_fields(&self) -> Vec<&str> {
        self.capabilities.provides.iter().map(|f| last_segment(f)).collect()
    }
}

fn last_segment(field: &str) -> &str {
    field.rsplit('.').next().unwrap_or(field)
}

/// Read-only query interface of the agent registry.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// All intent groups, keyed by name.
    async fn list_intents(&self) -> Result<BTreeMap<String, IntentGroup>, CatalogError>;

    /// Capability clusters (name → description) under one intent group.
    async fn list_capabilities(
        &self,
        intent: &str,
    ) -> Result<BTreeMap<String, String>, CatalogError>;

    /// Every agent descriptor in the registry.
    async fn list_agents(&self) -> Result<Vec<AgentDescriptor>, CatalogError>;

    /// Look up a single agent.
    ///
    /// The default implementation scans the full agent list.
    async fn get_agent(&self, name: &str) -> Result<AgentDescriptor, CatalogError> {
        self.list_agents()
            .await?
            .into_iter()
            .find(|a| a.name == name)
            .ok_or_else(|| CatalogError::AgentNotFound(name.to_string()))
    }
}
