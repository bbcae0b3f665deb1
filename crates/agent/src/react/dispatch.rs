//! HTTP invocation of agents.

use agentdist_core::catalog::AgentDescriptor;
use agentdist_core::error::ActionError;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};

/// Calls agents by POSTing the action arguments as a JSON body to the
/// agent's URL.
///
/// A 2xx response must carry a JSON body. Non-2xx responses, transport
/// failures and timeouts come back as [`ActionError`]s for the loop to
/// observe; they never abort it.
#[derive(Debug, Clone)]
pub struct AgentDispatcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl AgentDispatcher {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn invoke(
        &self,
        agent: &AgentDescriptor,
        arguments: &Map<String, Value>,
    ) -> Result<Value, ActionError> {
        info!(agent = %agent.name, url = %agent.url, "Calling agent");

        let response = self
            .client
            .post(&agent.url)
            .timeout(self.timeout)
            .json(arguments)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ActionError::Transport(format!(
                        "Agent '{}' timed out after {}s",
                        agent.name,
                        self.timeout.as_secs_f64()
                    ))
                } else {
                    ActionError::Transport(format!("Agent '{}' unreachable: {e}", agent.name))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ActionError::InvocationFailed {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.json::<Value>().await.map_err(|e| {
            ActionError::Transport(format!("Agent '{}' returned a non-JSON body: {e}", agent.name))
        })?;
        debug!(agent = %agent.name, "Agent responded");
        Ok(body)
    }
}
