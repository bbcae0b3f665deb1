//! Parsing oracle output into final answers and agent actions.

use agentdist_core::error::ActionError;
use serde_json::{Map, Value};

pub const FINAL_ANSWER_PREFIX: &str = "Final Answer:";
pub const ACTION_PREFIX: &str = "Action:";

/// A requested agent call.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCall {
    pub agent: String,
    pub arguments: Map<String, Value>,
}

/// What one oracle response asks the loop to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    /// Stop with this answer.
    Final(String),
    /// Call an agent.
    Action(ActionCall),
    /// An `Action:` line was present but could not be parsed.
    InvalidAction(ActionError),
    /// Neither a final answer nor an action.
    Thought,
}

/// Classify an oracle response.
///
/// Lines are matched after stripping leading whitespace. The first
/// `Final Answer:` line wins over any `Action:` line, wherever it appears;
/// otherwise the first `Action:` line is parsed.
pub fn parse_response(content: &str) -> ParsedResponse {
    let mut action = None;

    for line in content.lines().map(str::trim_start) {
        if let Some(answer) = line.strip_prefix(FINAL_ANSWER_PREFIX) {
            return ParsedResponse::Final(answer.trim().to_string());
        }
        if action.is_none() {
            action = line.strip_prefix(ACTION_PREFIX);
        }
    }

    match action {
        Some(body) => match parse_action(body) {
            Ok(call) => ParsedResponse::Action(call),
            Err(e) => ParsedResponse::InvalidAction(e),
        },
        None => ParsedResponse::Thought,
    }
}

/// Parse `Name(json)` (the text after `Action:`).
///
/// The name is everything before the first `(`. Surrounding parentheses
/// are stripped from the rest; an empty remainder means no arguments,
/// otherwise it must be a JSON object.
pub fn parse_action(body: &str) -> Result<ActionCall, ActionError> {
    let body = body.trim();
    let (name, rest) = body.split_at(body.find('(').unwrap_or(body.len()));
    let agent = name.trim();
    if agent.is_empty() {
        return Err(ActionError::Parse(format!("missing agent name in '{body}'")));
    }

    let raw = rest.trim().trim_matches(|c| c == '(' || c == ')').trim();
    if raw.is_empty() {
        return Ok(ActionCall {
            agent: agent.to_string(),
            arguments: Map::new(),
        });
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(arguments)) => Ok(ActionCall {
            agent: agent.to_string(),
            arguments,
        }),
        Ok(other) => Err(ActionError::Parse(format!(
            "arguments for '{agent}' must be a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(ActionError::Parse(format!(
            "invalid JSON arguments for '{agent}': {e}"
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
