//! The three-stage router.

use super::{ALL_CAPABILITIES, AgentScope, DecisionCache, RoutingDecision, UNKNOWN_INTENT};
use crate::oracle::Oracle;
use crate::prompts;
use agentdist_core::catalog::{Catalog, IntentGroup};
use agentdist_core::error::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Routes a query to `LlmOnly` or to a scoped reasoning loop.
///
/// 1. Gate: ask the oracle whether agents are needed. Only an answer of
///    `true` (trimmed, any case) proceeds.
/// 2. Intent: pick an intent group. An answer that is not a listed group
///    yields an unrestricted scope.
/// 3. Capability: pick a cluster inside the group. With a single cluster
///    it is chosen without asking; with none, or on `ALL` or an unknown
///    answer, the whole group is in scope.
///
/// Successful decisions are cached per query when a cache is attached.
pub struct HierarchicalRouter {
    oracle: Oracle,
    catalog: Arc<dyn Catalog>,
    cache: Option<Arc<DecisionCache>>,
}

impl HierarchicalRouter {
    pub fn new(oracle: Oracle, catalog: Arc<dyn Catalog>) -> Self {
        Self {
            oracle,
            catalog,
            cache: Some(Arc::new(DecisionCache::new())),
        }
    }

    /// Share a cache with other routers.
    pub fn with_cache(mut self, cache: Arc<DecisionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    pub fn cache(&self) -> Option<&Arc<DecisionCache>> {
        self.cache.as_ref()
    }

    pub async fn route(&self, query: &str) -> Result<Arc<RoutingDecision>> {
        match &self.cache {
            Some(cache) => cache.get_or_compute(query, || self.classify(query)).await,
            None => Ok(Arc::new(self.classify(query).await?)),
        }
    }

    async fn classify(&self, query: &str) -> Result<RoutingDecision> {
        if !self.needs_agents(query).await? {
            info!("Gate: answering without agents");
            return Ok(RoutingDecision::LlmOnly);
        }

        let intents = self.catalog.list_intents().await?;
        let Some(intent) = self.select_intent(query, &intents).await? else {
            info!("Intent unresolved, scope is the full catalog");
            return Ok(RoutingDecision::React {
                scope: AgentScope::Unrestricted,
            });
        };

        let capabilities = match self.catalog.list_capabilities(&intent).await {
            Ok(caps) => caps,
            Err(e) => {
                warn!(intent = %intent, error = %e, "Capability listing failed, using whole intent group");
                BTreeMap::new()
            }
        };
        let capability = self.select_capability(query, &intent, &capabilities).await?;

        let agents: Vec<_> = self
            .catalog
            .list_agents()
            .await?
            .into_iter()
            .filter(|a| a.intent_group == intent)
            .filter(|a| {
                capability
                    .as_deref()
                    .is_none_or(|cluster| a.capability_cluster == cluster)
            })
            .collect();

        info!(
            intent = %intent,
            capability = capability.as_deref().unwrap_or(ALL_CAPABILITIES),
            agents = agents.len(),
            "Routed"
        );
        Ok(RoutingDecision::React {
            scope: AgentScope::Restricted(agents),
        })
    }

    async fn needs_agents(&self, query: &str) -> Result<bool> {
        let answer = self.oracle.ask(&prompts::should_use_agents(query)).await?;
        debug!(answer = %answer.trim(), "Gate answer");
        Ok(answer.trim().eq_ignore_ascii_case("true"))
    }

    async fn select_intent(
        &self,
        query: &str,
        intents: &BTreeMap<String, IntentGroup>,
    ) -> Result<Option<String>> {
        if intents.is_empty() {
            return Ok(None);
        }

        let answer = self
            .oracle
            .ask(&prompts::intent_classifier(intents, query))
            .await?;
        let answer = answer.trim();

        if intents.contains_key(answer) {
            Ok(Some(answer.to_string()))
        } else {
            if answer != UNKNOWN_INTENT {
                warn!(answer, "Intent classifier returned an unlisted group");
            }
            Ok(None)
        }
    }

    /// `None` means the whole intent group.
    async fn select_capability(
        &self,
        query: &str,
        intent: &str,
        capabilities: &BTreeMap<String, String>,
    ) -> Result<Option<String>> {
        if capabilities.len() <= 1 {
            return Ok(capabilities.keys().next().cloned());
        }

        let answer = self
            .oracle
            .ask(&prompts::capability_classifier(intent, capabilities, query))
            .await?;
        let answer = answer.trim();

        if capabilities.contains_key(answer) {
            Ok(Some(answer.to_string()))
        } else {
            if answer != ALL_CAPABILITIES {
                warn!(answer, "Capability classifier returned an unlisted cluster");
            }
            Ok(None)
        }
    }
}
