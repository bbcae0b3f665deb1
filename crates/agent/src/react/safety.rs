//! Confirmation gate for sensitive agents.

use agentdist_config::ExecutorConfig;
use agentdist_core::catalog::AgentDescriptor;
use agentdist_core::error::ActionError;
use agentdist_core::message::{Message, Role};

/// Observation fed back when a sensitive call is held back.
pub const SAFETY_ALERT: &str = "Observation: SYSTEM ALERT: This action is sensitive. You MUST ask the user for confirmation before proceeding.";

/// Thought emitted right after [`SAFETY_ALERT`].
pub const BLOCKED_THOUGHT: &str = "Action blocked by Safety System. Asking user for confirmation.";

/// Decides whether agents flagged `requires_confirmation` may be called.
///
/// Confirmation is read once from the prior conversation: any user turn
/// containing one of the keywords (case-insensitive substring) counts.
/// Matching is by substring, so `"ok"` also matches inside `"book"`.
#[derive(Debug, Clone)]
pub struct ConfirmationPolicy {
    keywords: Vec<String>,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self::new(ExecutorConfig::default().confirmation_keywords)
    }
}

impl ConfirmationPolicy {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether any user turn in `history` confirms.
    pub fn is_confirmed(&self, history: &[Message]) -> bool {
        history
            .iter()
            .filter(|m| m.role == Role::User)
            .any(|m| {
                let content = m.content.to_lowercase();
                self.keywords.iter().any(|k| content.contains(k.as_str()))
            })
    }

    pub fn check(&self, agent: &AgentDescriptor, confirmed: bool) -> Result<(), ActionError> {
        if agent.requires_confirmation && !confirmed {
            return Err(ActionError::ConfirmationRequired(agent.name.clone()));
        }
        Ok(())
    }
}
