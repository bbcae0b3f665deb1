//! Per-invocation reasoning state.

use agentdist_core::message::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State of a single reasoning run: the goal, the prior conversation and
/// the trace of oracle responses and observations.
///
/// The scratchpad fed back to the oracle is always rendered from the
/// trace, so the two cannot drift apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningContext {
    pub query: String,
    pub history: Vec<Message>,
    pub trace: Vec<TraceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    pub step: usize,
    pub kind: TraceKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    /// Raw oracle output for a step.
    Response,
    /// Observation fed back after the response.
    Observation,
}

impl ReasoningContext {
    pub fn new(query: impl Into<String>, history: Vec<Message>) -> Self {
        Self {
            query: query.into(),
            history,
            trace: Vec::new(),
        }
    }

    pub fn record_response(&mut self, step: usize, content: &str) {
        self.push(step, TraceKind::Response, content);
    }

    pub fn record_observation(&mut self, step: usize, content: &str) {
        self.push(step, TraceKind::Observation, content);
    }

    fn push(&mut self, step: usize, kind: TraceKind, content: &str) {
        self.trace.push(TraceEntry {
            step,
            kind,
            content: content.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// The scratchpad: every response and observation so far, in order.
    pub fn scratchpad(&self) -> String {
        self.trace
            .iter()
            .map(|entry| match entry.kind {
                TraceKind::Response => format!("\nStep {}:\n{}\n", entry.step, entry.content),
                TraceKind::Observation => format!("\n{}\n", entry.content),
            })
            .collect()
    }

    pub fn chat_history(&self) -> String {
        render_history(&self.history)
    }

    pub fn observations(&self) -> impl Iterator<Item = &str> {
        self.trace
            .iter()
            .filter(|e| e.kind == TraceKind::Observation)
            .map(|e| e.content.as_str())
    }
}

/// Render prior turns as `Role: content` lines.
pub fn render_history(history: &[Message]) -> String {
    history
        .iter()
        .map(|m| format!("{}: {}\n", m.role.label(), m.content))
        .collect()
}
