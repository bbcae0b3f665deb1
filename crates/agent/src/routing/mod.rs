//! Hierarchical routing: gate, intent, capability.

pub mod cache;
pub mod router;

pub use cache::{DecisionCache, fingerprint};
pub use router::HierarchicalRouter;

use agentdist_core::catalog::{AgentDescriptor, Catalog};
use agentdist_core::error::CatalogError;
use serde::{Deserialize, Serialize};

/// Answer of the intent classifier when no group fits.
pub const UNKNOWN_INTENT: &str = "UNKNOWN";

/// Answer of the capability classifier when the whole intent group applies.
pub const ALL_CAPABILITIES: &str = "ALL";

/// How a query is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Answer directly with the oracle, no agents.
    LlmOnly,
    /// Run the reasoning loop over a set of agents.
    React,
}

/// The agents a reasoning loop may call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "agents", rename_all = "snake_case")]
pub enum AgentScope {
    /// Exactly these agents (possibly none).
    Restricted(Vec<AgentDescriptor>),
    /// Whatever the catalog lists when the loop starts.
    Unrestricted,
}

impl AgentScope {
    /// Materialize the scope into a concrete agent list.
    pub async fn resolve(&self, catalog: &dyn Catalog) -> Result<Vec<AgentDescriptor>, CatalogError> {
        match self {
            Self::Restricted(agents) => Ok(agents.clone()),
            Self::Unrestricted => catalog.list_agents().await,
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }
}

/// Outcome of routing one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RoutingDecision {
    LlmOnly,
    React { scope: AgentScope },
}

impl RoutingDecision {
    pub fn mode(&self) -> Mode {
        match self {
            Self::LlmOnly => Mode::LlmOnly,
            Self::React { .. } => Mode::React,
        }
    }

    pub fn scope(&self) -> Option<&AgentScope> {
        match self {
            Self::LlmOnly => None,
            Self::React { scope } => Some(scope),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::travel_catalog;

    #[tokio::test]
    async fn unrestricted_scope_resolves_to_full_catalog() {
        let catalog = travel_catalog("http://agents.local");
        let agents = AgentScope::Unrestricted.resolve(&catalog).await.unwrap();
        assert_eq!(agents.len(), 4);
    }

    #[tokio::test]
    async fn restricted_scope_ignores_catalog() {
        let catalog = travel_catalog("http://agents.local");
        let agents = AgentScope::Restricted(vec![])
            .resolve(&catalog)
            .await
            .unwrap();
        assert!(agents.is_empty());
    }

    #[test]
    fn decision_serializes_with_mode_tag() {
        let json = serde_json::to_value(RoutingDecision::React {
            scope: AgentScope::Unrestricted,
        })
        .unwrap();
        assert_eq!(json["mode"], "react");
        assert_eq!(json["scope"]["kind"], "unrestricted");

        let json = serde_json::to_value(RoutingDecision::LlmOnly).unwrap();
        assert_eq!(json["mode"], "llm_only");
    }

    #[test]
    fn mode_and_scope_accessors() {
        assert_eq!(RoutingDecision::LlmOnly.mode(), Mode::LlmOnly);
        assert!(RoutingDecision::LlmOnly.scope().is_none());
        let decision = RoutingDecision::React {
            scope: AgentScope::Unrestricted,
        };
        assert_eq!(decision.mode(), Mode::React);
        assert!(decision.scope().unwrap().is_unrestricted());
    }
}
