//! `agentdist ask`: answer a query, printing the reasoning trace.

use super::{CliResult, load_config, open_catalog, open_provider};
use agentdist_agent::{Orchestrator, ReasoningEvent};
use agentdist_core::message::Message;
use std::path::Path;
use tracing::debug;

pub async fn run(query: &str, history_file: Option<&Path>, catalog_file: Option<&Path>) -> CliResult {
    let config = load_config()?;
    let provider = open_provider(&config)?;
    let catalog = open_catalog(&config, catalog_file)?;
    let history = match history_file {
        Some(path) => load_history(path)?,
        None => Vec::new(),
    };
    debug!(
        model = %config.default_model,
        history = history.len(),
        snapshot = catalog_file.is_some(),
        "Answering query"
    );

    let orchestrator = Orchestrator::from_config(&config, provider, catalog);
    let mut rx = orchestrator.handle(query, history).await?;

    while let Some(event) = rx.recv().await {
        let event = event?;
        if event.is_final() {
            if let Some(answer) = event.content() {
                println!("{answer}");
            }
        } else {
            eprintln!("{}", trace_line(&event));
        }
    }

    Ok(())
}

/// Prior turns as a JSON array of `{"role": ..., "content": ...}`.
fn load_history(path: &Path) -> CliResult<Vec<Message>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read history file {}: {e}", path.display()))?;
    let history = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid history file {}: {e}", path.display()))?;
    Ok(history)
}

fn trace_line(event: &ReasoningEvent) -> String {
    match event {
        ReasoningEvent::Thought { content } => format!("  [thought] {content}"),
        ReasoningEvent::Action { agent, input } => format!("  [action] {agent}({input})"),
        ReasoningEvent::Observation { content } => format!("  [observation] {content}"),
        ReasoningEvent::Final { content } => content.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdist_core::message::Role;
    use std::io::Write;

    #[test]
    fn history_file_needs_only_role_and_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"role": "user", "content": "Pay for my trip"}},
                {{"role": "assistant", "content": "Shall I continue?"}},
                {{"role": "user", "content": "yes"}}]"#
        )
        .unwrap();

        let history = load_history(file.path()).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[2].content, "yes");
    }

    #[test]
    fn invalid_history_file_names_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_history(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid history file"));
    }

    #[test]
    fn action_trace_shows_compact_json() {
        let line = trace_line(&ReasoningEvent::Action {
            agent: "FlightBooker".into(),
            input: serde_json::json!({"destination": "Paris"}),
        });
        assert_eq!(line, r#"  [action] FlightBooker({"destination":"Paris"})"#);
    }
}
