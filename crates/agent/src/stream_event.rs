//! Events streamed while a query is answered.

use serde::{Deserialize, Serialize};

/// Events emitted by the reasoning loop, in the order they happen.
///
/// - `thought`: progress note or raw oracle output
/// - `action`: an agent is about to be called
/// - `observation`: what came back, results and failures alike
/// - `final`: the answer, always the last event of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReasoningEvent {
    Thought { content: String },

    Action {
        agent: String,
        input: serde_json::Value,
    },

    Observation { content: String },

    Final { content: String },
}

impl ReasoningEvent {
    pub fn thought(content: impl Into<String>) -> Self {
        Self::Thought {
            content: content.into(),
        }
    }

    pub fn observation(content: impl Into<String>) -> Self {
        Self::Observation {
            content: content.into(),
        }
    }

    pub fn final_answer(content: impl Into<String>) -> Self {
        Self::Final {
            content: content.into(),
        }
    }

    /// Event name as it appears in the `type` tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Thought { .. } => "thought",
            Self::Action { .. } => "action",
            Self::Observation { .. } => "observation",
            Self::Final { .. } => "final",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Self::Final { .. })
    }

    /// Text payload, if the event carries one.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Thought { content } | Self::Observation { content } | Self::Final { content } => {
                Some(content)
            }
            Self::Action { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serialization_thought() {
        let json = serde_json::to_string(&ReasoningEvent::thought("Step 1: Thinking...")).unwrap();
        assert!(json.contains(r#""type":"thought""#));
        assert!(json.contains(r#""content":"Step 1: Thinking...""#));
    }

    #[test]
    fn event_serialization_action() {
        let event = ReasoningEvent::Action {
            agent: "FlightBooker".into(),
            input: serde_json::json!({"destination": "Paris"}),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "action");
        assert_eq!(json["agent"], "FlightBooker");
        assert_eq!(json["input"]["destination"], "Paris");
        assert_eq!(event.content(), None);
    }

    #[test]
    fn event_types() {
        assert_eq!(ReasoningEvent::observation("x").event_type(), "observation");
        assert_eq!(ReasoningEvent::final_answer("x").event_type(), "final");
        assert!(ReasoningEvent::final_answer("x").is_final());
        assert!(!ReasoningEvent::thought("x").is_final());
    }

    #[test]
    fn event_deserializes_from_tagged_json() {
        let event: ReasoningEvent =
            serde_json::from_str(r#"{"type":"final","content":"done"}"#).unwrap();
        assert_eq!(event, ReasoningEvent::final_answer("done"));
    }
}
