//! End-to-end pipeline tests: HTTP registry, scripted oracle, HTTP agents.

use agentdist_agent::{Orchestrator, ReasoningEvent};
use agentdist_catalog::HttpCatalog;
use agentdist_config::AppConfig;
use agentdist_core::error::ProviderError;
use agentdist_core::message::Message;
use agentdist_core::provider::{Provider, ProviderRequest, ProviderResponse};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Oracle that replays a script and records the prompts it saw.
struct ScriptedOracle {
    script: Mutex<VecDeque<&'static str>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    fn new(script: &[&'static str]) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.iter().copied().collect()),
            prompts: Mutex::new(vec![]),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedOracle {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.prompts
            .lock()
            .unwrap()
            .push(request.messages[0].content.clone());
        let text = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("oracle script exhausted");
        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage: None,
            model: request.model,
        })
    }
}

/// Registry with a Travel intent (booking + payments clusters).
async fn registry(agent_base: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/intents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Travel": {"description": "Trips, flights and hotels"},
            "Medical": {"description": "Health questions"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/intents/Travel/capabilities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "booking": "Book flights",
            "payments": "Pay for bookings"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": "FlightBooker",
                "url": format!("{agent_base}/flight"),
                "description": "Books flights",
                "intent_group": "Travel",
                "capability_cluster": "booking",
                "capabilities": {
                    "requires": ["ctx.user.destination"],
                    "provides": ["ctx.booking.reference"]
                }
            },
            {
                "name": "Payments",
                "url": format!("{agent_base}/pay"),
                "description": "Charges the card on file",
                "intent_group": "Travel",
                "capability_cluster": "payments",
                "capabilities": {"requires_confirmation": true}
            },
            {
                "name": "Triage",
                "url": format!("{agent_base}/triage"),
                "description": "Symptom triage",
                "intent_group": "Medical",
                "capability_cluster": "diagnosis"
            }
        ])))
        .mount(&server)
        .await;
    server
}

fn orchestrator(oracle: Arc<ScriptedOracle>, registry: &MockServer) -> Orchestrator {
    let catalog = Arc::new(HttpCatalog::new(registry.uri(), Duration::from_secs(5)));
    Orchestrator::from_config(&AppConfig::default(), oracle, catalog)
}

async fn drain(
    mut rx: tokio::sync::mpsc::Receiver<agentdist_core::Result<ReasoningEvent>>,
) -> Vec<ReasoningEvent> {
    let mut events = vec![];
    while let Some(event) = rx.recv().await {
        events.push(event.unwrap());
    }
    events
}

#[tokio::test]
async fn book_a_flight_end_to_end() {
    let agents = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/flight"))
        .and(body_json(json!({"destination": "Paris"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reference": "AF123"})))
        .expect(1)
        .mount(&agents)
        .await;
    let registry = registry(&agents.uri()).await;

    let oracle = ScriptedOracle::new(&[
        "TRUE",
        "Travel",
        "booking",
        "Thought: I should book it.\nAction: FlightBooker({\"destination\": \"Paris\"})",
        "Final Answer: Your flight to Paris is booked (AF123).",
    ]);
    let orchestrator = orchestrator(oracle.clone(), &registry);

    let events = drain(
        orchestrator
            .handle("Book a flight to Paris", vec![])
            .await
            .unwrap(),
    )
    .await;

    let kinds: Vec<_> = events.iter().map(|e| e.event_type()).collect();
    assert_eq!(
        kinds,
        vec![
            "thought",
            "thought",
            "action",
            "observation",
            "thought",
            "thought",
            "final"
        ]
    );
    assert_eq!(
        events[3],
        ReasoningEvent::observation(r#"Observation: {"reference":"AF123"}"#)
    );
    assert_eq!(
        events.last(),
        Some(&ReasoningEvent::final_answer(
            "Your flight to Paris is booked (AF123)."
        ))
    );

    let prompts = oracle.prompts();
    assert!(prompts[3].contains("- FlightBooker(destination) -> [reference]: Books flights"));
    assert!(!prompts[3].contains("Payments"));
}

#[tokio::test]
async fn greeting_skips_agents_entirely() {
    let agents = MockServer::start().await;
    let registry = registry(&agents.uri()).await;
    let oracle = ScriptedOracle::new(&["FALSE", "Hi! What can I do for you?"]);

    let answer = orchestrator(oracle.clone(), &registry)
        .answer("hello", vec![])
        .await
        .unwrap();

    assert_eq!(answer, "Hi! What can I do for you?");
    assert_eq!(oracle.prompts().len(), 2);
    assert!(registry.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn payment_needs_confirmation_across_turns() {
    let agents = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pay"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"charged": 420})))
        .expect(1)
        .mount(&agents)
        .await;
    let registry = registry(&agents.uri()).await;

    // First turn: blocked, the oracle asks the user.
    let oracle = ScriptedOracle::new(&[
        "TRUE",
        "Travel",
        "payments",
        "Action: Payments({\"amount\": 420})",
        "Final Answer: This will charge 420 EUR. Shall I continue?",
    ]);
    let first = drain(
        orchestrator(oracle, &registry)
            .handle("Pay for my trip", vec![])
            .await
            .unwrap(),
    )
    .await;
    assert!(first.iter().any(|e| e
        .content()
        .is_some_and(|c| c.contains("SYSTEM ALERT"))));
    assert!(!first.iter().any(|e| e.event_type() == "action"));

    // Second turn: the user confirmed in history, the call goes through.
    let history = vec![
        Message::user("Pay for my trip"),
        Message::assistant("This will charge 420 EUR. Shall I continue?"),
        Message::user("Yes, proceed"),
    ];
    let oracle = ScriptedOracle::new(&[
        "TRUE",
        "Travel",
        "payments",
        "Action: Payments({\"amount\": 420})",
        "Final Answer: Charged 420 EUR.",
    ]);
    let second = drain(
        orchestrator(oracle, &registry)
            .handle("Pay for my trip", history)
            .await
            .unwrap(),
    )
    .await;

    assert!(second.iter().any(|e| matches!(
        e,
        ReasoningEvent::Action { agent, .. } if agent == "Payments"
    )));
    assert_eq!(
        second.last(),
        Some(&ReasoningEvent::final_answer("Charged 420 EUR."))
    );
}

#[tokio::test]
async fn unknown_intent_reasons_over_whole_registry() {
    let agents = MockServer::start().await;
    let registry = registry(&agents.uri()).await;
    let oracle = ScriptedOracle::new(&["TRUE", "UNKNOWN", "Final Answer: Not sure."]);

    let answer = orchestrator(oracle.clone(), &registry)
        .answer("Do the thing", vec![])
        .await
        .unwrap();

    assert_eq!(answer, "Not sure.");
    let loop_prompt = &oracle.prompts()[2];
    for name in ["FlightBooker", "Payments", "Triage"] {
        assert!(loop_prompt.contains(name), "missing {name}");
    }
}
