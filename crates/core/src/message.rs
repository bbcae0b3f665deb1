//! Message types.
//!
//! A `Message` is one role/content turn. Conversation history handed to the
//! reasoning loop is an ordered `Vec<Message>`; prompts sent to the oracle
//! are built from the same type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System instructions
    System,
    /// Result of an agent invocation
    Tool,
}

impl Role {
    /// Lowercase wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
            Self::Tool => "tool",
        }
    }

    /// Capitalized label used when rendering history into a prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
            Self::System => "System",
            Self::Tool => "Tool",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    #[serde(default = "new_id")]
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    #[serde(default)]
    pub content: String,

    /// Timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Message {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }
}
