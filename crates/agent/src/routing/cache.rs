//! Routing decision cache keyed by query fingerprint.

use super::RoutingDecision;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Lowercase hex SHA-256 of the exact query bytes.
pub fn fingerprint(query: &str) -> String {
    hex::encode(Sha256::digest(query.as_bytes()))
}

/// Thread-safe map from query fingerprint to routing decision.
///
/// Entries never expire on their own. Concurrent misses on the same query
/// may both compute; the last insert wins and both callers see an
/// equivalent decision.
#[derive(Debug, Default)]
pub struct DecisionCache {
    entries: RwLock<HashMap<String, Arc<RoutingDecision>>>,
}

impl DecisionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, query: &str) -> Option<Arc<RoutingDecision>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&fingerprint(query))
            .cloned()
    }

    pub fn insert(&self, query: &str, decision: RoutingDecision) -> Arc<RoutingDecision> {
        let decision = Arc::new(decision);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(fingerprint(query), decision.clone());
        decision
    }

    /// Return the cached decision, or compute and store it.
    ///
    /// Failed computations are not cached.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        query: &str,
        compute: F,
    ) -> Result<Arc<RoutingDecision>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RoutingDecision, E>>,
    {
        if let Some(hit) = self.get(query) {
            debug!("Routing cache hit");
            return Ok(hit);
        }
        let decision = compute().await?;
        Ok(self.insert(query, decision))
    }

    /// Drop one query's decision. Returns whether it was present.
    pub fn invalidate(&self, query: &str) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&fingerprint(query))
            .is_some()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
