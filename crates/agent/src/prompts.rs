//! Prompt templates for routing and reasoning.
//!
//! The router and the reasoning loop depend on the oracle honoring the
//! literal tokens these prompts ask for: `TRUE`/`FALSE` from the gate,
//! [`UNKNOWN_INTENT`](crate::routing::UNKNOWN_INTENT) and
//! [`ALL_CAPABILITIES`](crate::routing::ALL_CAPABILITIES) from the
//! classifiers, and `Action:` / `Final Answer:` lines from the loop.

use agentdist_core::catalog::{AgentDescriptor, IntentGroup};
use std::collections::BTreeMap;

/// Gate prompt: does this query need external agents at all?
pub fn should_use_agents(query: &str) -> String {
    format!(
        r#"You decide whether a user query needs external tools or agents.

USER QUERY:
{query}

RULES:
- Answer "TRUE" when the query asks for specific data, an action in the world, or domain expertise (for example "price of wheat", "diagnose this patient", "send an email").
- Answer "FALSE" when it is a greeting, small talk, philosophy or general knowledge (for example "hi", "how are you", "what is the meaning of life").
- Output ONLY "TRUE" or "FALSE".

DECISION:
"#
    )
}

/// Intent classifier prompt over the catalog's intent groups.
pub fn intent_classifier(intents: &BTreeMap<String, IntentGroup>, query: &str) -> String {
    let listing = intents
        .iter()
        .map(|(name, group)| format!("- {name}: {}", group.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You route user queries to the intent group that should handle them.

INTENT GROUPS:
{listing}

USER QUERY:
{query}

RULES:
1. Pick exactly ONE intent group from the list above.
2. If the query is ambiguous or fits several groups, output "UNKNOWN".
3. Output ONLY the group name. No markdown, no explanation.

EXAMPLES:
Query: "I feel dizzy and have a sharp pain in my chest" -> Medical
Query: "Check the pulse of the database" -> System
Query: "What is the dosage for 500mg Paracetamol?" -> Medical
Query: "How is the health of the server?" -> System

Query: {query}
Intent:
"#
    )
}

/// Capability classifier prompt within one intent group.
pub fn capability_classifier(
    intent: &str,
    capabilities: &BTreeMap<String, String>,
    query: &str,
) -> String {
    let listing = capabilities
        .iter()
        .map(|(name, description)| format!("- {name}: {description}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You pick the capability needed for a query in the '{intent}' domain.

CAPABILITIES:
{listing}

USER QUERY:
{query}

RULES:
1. Pick exactly ONE capability from the list above.
2. If the query needs several capabilities or is unclear, output "ALL".
3. Output ONLY the capability name, or "ALL".

CAPABILITY:
"#
    )
}

/// One line per agent: `- Name(inputs) -> [outputs]: description`.
pub fn tool_catalog(agents: &[AgentDescriptor]) -> String {
    agents
        .iter()
        .map(|agent| {
            format!(
                "- {}({}) -> [{}]: {}",
                agent.name,
                agent.input_fields().join(", "),
                agent.output_fields().join(", "),
                agent.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The per-step ReAct prompt.
pub fn react(goal: &str, chat_history: &str, tools: &str, scratchpad: &str) -> String {
    format!(
        r#"You are a reasoning agent working in Thought / Action / Observation steps.

Goal: {goal}

Previous Conversation:
{chat_history}

Tools Available:
{tools}

How to respond:
1. Thought: reason about the situation and the history so far, then decide the next move.
2. Action: call one tool when you need it.
   Format: Action: ToolName(input_json)
   Example: Action: Search({{"query": "hospital hours"}})
3. Observation: the system replies with the tool result. Do not write it yourself.
4. Final Answer: once you know enough, stop.
   Format: Final Answer: <your response>

Constraints:
- Use only the tools listed above.
- When you have the answer, output "Final Answer: ...".
- You may take several steps if you need more information.

History:
{scratchpad}

Begin!
"#
    )
}

/// Prompt for queries the gate sends straight to the oracle.
pub fn direct_answer(query: &str, chat_history: &str) -> String {
    if chat_history.is_empty() {
        return query.to_string();
    }
    format!("Previous Conversation:\n{chat_history}\nUser: {query}\nAssistant:")
}
