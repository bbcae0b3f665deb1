//! Route → Plan → Reason/Act for a single query.

use crate::oracle::Oracle;
use crate::plan::PlanBuilder;
use crate::prompts;
use crate::react::ReactExecutor;
use crate::react::context::render_history;
use crate::routing::{DecisionCache, HierarchicalRouter, Mode, RoutingDecision};
use crate::stream_event::ReasoningEvent;
use agentdist_config::AppConfig;
use agentdist_core::catalog::Catalog;
use agentdist_core::error::{Error, Result};
use agentdist_core::message::Message;
use agentdist_core::provider::Provider;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Entry point for answering queries.
pub struct Orchestrator {
    router: HierarchicalRouter,
    executor: ReactExecutor,
    oracle: Oracle,
}

impl Orchestrator {
    pub fn new(router: HierarchicalRouter, executor: ReactExecutor, oracle: Oracle) -> Self {
        Self {
            router,
            executor,
            oracle,
        }
    }

    /// Wire router, executor and oracle from application config.
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        catalog: Arc<dyn Catalog>,
    ) -> Self {
        let oracle = Oracle::new(provider, &config.default_model)
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens);

        let router = HierarchicalRouter::new(oracle.clone(), catalog.clone());
        let router = if config.routing.cache_enabled {
            router.with_cache(Arc::new(DecisionCache::new()))
        } else {
            router.without_cache()
        };
        let executor = ReactExecutor::from_config(oracle.clone(), catalog, &config.executor);

        Self::new(router, executor, oracle)
    }

    pub fn router(&self) -> &HierarchicalRouter {
        &self.router
    }

    /// Route the query only.
    pub async fn route(&self, query: &str) -> Result<Arc<RoutingDecision>> {
        self.router.route(query).await
    }

    /// Answer a query, streaming reasoning events.
    ///
    /// Routing failures are returned directly. In `LlmOnly` mode the
    /// oracle answers once and the stream holds a single `Final` event.
    pub async fn handle(
        &self,
        query: &str,
        history: Vec<Message>,
    ) -> Result<mpsc::Receiver<Result<ReasoningEvent>>> {
        let decision = self.router.route(query).await?;
        let plan = PlanBuilder::build(&decision);
        info!(mode = ?plan.mode, "Plan built");

        match plan.mode {
            Mode::LlmOnly => {
                let prompt = prompts::direct_answer(query, &render_history(&history));
                let answer = self.oracle.ask(&prompt).await?;
                let (tx, rx) = mpsc::channel(1);
                let _ = tx.send(Ok(ReasoningEvent::final_answer(answer))).await;
                Ok(rx)
            }
            Mode::React => Ok(self.executor.run_stream(plan, query, history)),
        }
    }

    /// Answer a query and return only the final answer.
    pub async fn answer(&self, query: &str, history: Vec<Message>) -> Result<String> {
        let mut rx = self.handle(query, history).await?;
        while let Some(event) = rx.recv().await {
            if let ReasoningEvent::Final { content } = event? {
                return Ok(content);
            }
        }
        Err(Error::Internal("event stream ended without a final answer".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{CountingCatalog, DownCatalog, ScriptedProvider, travel_catalog};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn orchestrator(provider: Arc<ScriptedProvider>, catalog: Arc<dyn Catalog>) -> Orchestrator {
        Orchestrator::from_config(&AppConfig::default(), provider, catalog)
    }

    async fn collect(mut rx: mpsc::Receiver<Result<ReasoningEvent>>) -> Vec<ReasoningEvent> {
        let mut events = vec![];
        while let Some(event) = rx.recv().await {
            events.push(event.unwrap());
        }
        events
    }

    #[tokio::test]
    async fn llm_only_yields_single_final_event() {
        let catalog = Arc::new(CountingCatalog::new(travel_catalog("http://a")));
        let provider = Arc::new(ScriptedProvider::new(["FALSE", "Hello! How can I help?"]));
        let orchestrator = orchestrator(provider.clone(), catalog.clone());

        let events = collect(orchestrator.handle("hi", vec![]).await.unwrap()).await;
        assert_eq!(
            events,
            vec![ReasoningEvent::final_answer("Hello! How can I help?")]
        );
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.prompts()[1], "hi");
        assert_eq!(catalog.total_calls(), 0);
    }

    #[tokio::test]
    async fn llm_only_prompt_includes_history() {
        let provider = Arc::new(ScriptedProvider::new(["FALSE", "Fine, thanks."]));
        let orchestrator = orchestrator(provider.clone(), Arc::new(travel_catalog("http://a")));

        let answer = orchestrator
            .answer("and you?", vec![Message::user("hi"), Message::assistant("hello")])
            .await
            .unwrap();
        assert_eq!(answer, "Fine, thanks.");
        assert!(provider.prompts()[1].contains("User: hi\nAssistant: hello\n"));
    }

    #[tokio::test]
    async fn react_path_runs_scoped_loop() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/flight"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reference": "AF123"})))
            .expect(1)
            .mount(&server)
            .await;

        let provider = Arc::new(ScriptedProvider::new([
            "TRUE",
            "Travel",
            "booking",
            "Action: FlightBooker({\"destination\": \"Paris\"})",
            "Final Answer: Booked AF123.",
        ]));
        let orchestrator = orchestrator(provider.clone(), Arc::new(travel_catalog(&server.uri())));

        let events = collect(
            orchestrator
                .handle("Book a flight to Paris", vec![])
                .await
                .unwrap(),
        )
        .await;

        assert_eq!(events.last(), Some(&ReasoningEvent::final_answer("Booked AF123.")));
        let loop_prompt = &provider.prompts()[3];
        assert!(loop_prompt.contains("- FlightBooker()"));
        assert!(loop_prompt.contains("- HotelBooker()"));
        assert!(!loop_prompt.contains("Canceller"));
        assert!(!loop_prompt.contains("Triage"));
    }

    #[tokio::test]
    async fn routing_failure_is_returned_before_streaming() {
        let provider = Arc::new(ScriptedProvider::new(["TRUE"]));
        let orchestrator = orchestrator(provider, Arc::new(DownCatalog));
        assert!(matches!(
            orchestrator.handle("Book a flight", vec![]).await,
            Err(Error::Catalog(_))
        ));
    }

    #[tokio::test]
    async fn cache_can_be_disabled_from_config() {
        let mut config = AppConfig::default();
        config.routing.cache_enabled = false;
        let provider = Arc::new(ScriptedProvider::new(["FALSE", "FALSE"]));
        let orchestrator =
            Orchestrator::from_config(&config, provider.clone(), Arc::new(travel_catalog("http://a")));

        orchestrator.route("hi").await.unwrap();
        orchestrator.route("hi").await.unwrap();
        assert!(orchestrator.router().cache().is_none());
        assert_eq!(provider.call_count(), 2);
    }
}
