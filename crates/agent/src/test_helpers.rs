//! Shared test helpers for routing and reasoning tests.

use agentdist_core::catalog::{AgentDescriptor, Catalog, IntentGroup};
use agentdist_core::error::{CatalogError, ProviderError};
use agentdist_core::message::Message;
use agentdist_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A mock provider that replays scripted text responses in order.
///
/// Records every prompt it receives. Once the script is used up it keeps
/// returning the `repeat` text if one was given, and panics otherwise.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<String>>,
    repeat: Option<String>,
    fail: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            repeat: None,
            fail: false,
            prompts: Mutex::new(vec![]),
        }
    }

    /// A provider that answers every call with the same text.
    pub fn repeating(text: &str) -> Self {
        let mut provider = Self::new(Vec::<String>::new());
        provider.repeat = Some(text.to_string());
        provider
    }

    /// A provider whose every call fails.
    pub fn failing() -> Self {
        let mut provider = Self::new(Vec::<String>::new());
        provider.fail = true;
        provider
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let prompt = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let call = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt);
            prompts.len()
        };

        if self.fail {
            return Err(ProviderError::Network("scripted failure".into()));
        }

        let text = match self.responses.lock().unwrap().pop_front() {
            Some(text) => text,
            None => match &self.repeat {
                Some(text) => text.clone(),
                None => panic!("ScriptedProvider: no more responses (call #{call})"),
            },
        };

        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock-model".into(),
        })
    }
}

/// Wraps a catalog and counts reads; can be told to fail capability listings.
pub struct CountingCatalog<C> {
    inner: C,
    fail_capabilities: bool,
    pub intent_calls: AtomicUsize,
    pub capability_calls: AtomicUsize,
    pub agent_calls: AtomicUsize,
}

impl<C: Catalog> CountingCatalog<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            fail_capabilities: false,
            intent_calls: AtomicUsize::new(0),
            capability_calls: AtomicUsize::new(0),
            agent_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_failing_capabilities(mut self) -> Self {
        self.fail_capabilities = true;
        self
    }

    pub fn total_calls(&self) -> usize {
        self.intent_calls.load(Ordering::SeqCst)
            + self.capability_calls.load(Ordering::SeqCst)
            + self.agent_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<C: Catalog> Catalog for CountingCatalog<C> {
    async fn list_intents(&self) -> Result<BTreeMap<String, IntentGroup>, CatalogError> {
        self.intent_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_intents().await
    }

    async fn list_capabilities(
        &self,
        intent: &str,
    ) -> Result<BTreeMap<String, String>, CatalogError> {
        self.capability_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_capabilities {
            return Err(CatalogError::Unavailable("capability listing down".into()));
        }
        self.inner.list_capabilities(intent).await
    }

    async fn list_agents(&self) -> Result<Vec<AgentDescriptor>, CatalogError> {
        self.agent_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_agents().await
    }
}

/// A catalog whose every listing fails.
pub struct DownCatalog;

#[async_trait]
impl Catalog for DownCatalog {
    async fn list_intents(&self) -> Result<BTreeMap<String, IntentGroup>, CatalogError> {
        Err(CatalogError::Unavailable("registry down".into()))
    }

    async fn list_capabilities(
        &self,
        _intent: &str,
    ) -> Result<BTreeMap<String, String>, CatalogError> {
        Err(CatalogError::Unavailable("registry down".into()))
    }

    async fn list_agents(&self) -> Result<Vec<AgentDescriptor>, CatalogError> {
        Err(CatalogError::Unavailable("registry down".into()))
    }
}

/// Travel/Medical catalog used across tests. Booking agents point at
/// `agent_base`.
pub fn travel_catalog(agent_base: &str) -> agentdist_catalog::StaticCatalog {
    agentdist_catalog::StaticCatalog::new()
        .with_intent("Travel", "Trips, flights and hotels")
        .with_intent("Medical", "Health questions")
        .with_capability("Travel", "booking", "Book flights and hotels")
        .with_capability("Travel", "cancellation", "Cancel existing bookings")
        .with_capability("Medical", "diagnosis", "Symptom triage")
        .with_agent(AgentDescriptor::new(
            "FlightBooker",
            format!("{agent_base}/flight"),
            "Books flights",
            "Travel",
            "booking",
        ))
        .with_agent(AgentDescriptor::new(
            "HotelBooker",
            format!("{agent_base}/hotel"),
            "Books hotels",
            "Travel",
            "booking",
        ))
        .with_agent(AgentDescriptor::new(
            "Canceller",
            format!("{agent_base}/cancel"),
            "Cancels bookings",
            "Travel",
            "cancellation",
        ))
        .with_agent(AgentDescriptor::new(
            "Triage",
            format!("{agent_base}/triage"),
            "Symptom triage",
            "Medical",
            "diagnosis",
        ))
}
