//! ReAct (Reason + Act) loop over catalog agents.
//!
//! ```text
//! Step N: Thinking...  →  oracle  →  Thought (raw output)
//!                                      │
//!              ┌──────────────┬────────┴────────┬────────────────┐
//!        Final Answer       Action          bad Action        nothing
//!              │              │                 │                │
//!            stop      gate → dispatch     Observation      "No action
//!                             Observation   (parse error)     found"
//! ```
//!
//! Every observation is streamed as an event and appended to the
//! scratchpad the oracle sees on the next step. Action failures are
//! observations, not errors; only oracle and catalog failures end a run
//! early.

pub mod context;
pub mod dispatch;
pub mod parser;
pub mod safety;

pub use context::{ReasoningContext, TraceEntry, TraceKind};
pub use dispatch::AgentDispatcher;
pub use parser::{ActionCall, ParsedResponse, parse_response};
pub use safety::ConfirmationPolicy;

use crate::oracle::Oracle;
use crate::plan::{ExecutionPlan, PlanStep, StepStatus};
use crate::prompts;
use crate::stream_event::ReasoningEvent;
use agentdist_config::ExecutorConfig;
use agentdist_core::catalog::{AgentDescriptor, Catalog};
use agentdist_core::error::{ActionError, Error, Result};
use agentdist_core::message::Message;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Final answer emitted when the step budget runs out.
pub const GIVE_UP_MESSAGE: &str = "Goal not reached max steps.";

const NO_ACTION_OBSERVATION: &str = "Observation: No action found. Waiting for next thought.";
const NO_ACTION_THOUGHT: &str = "No action found. Continuing...";

/// Buffered events per streaming run.
const STREAM_BUFFER: usize = 64;

/// Runs the reasoning loop for one execution plan.
#[derive(Clone)]
pub struct ReactExecutor {
    oracle: Oracle,
    catalog: Arc<dyn Catalog>,
    dispatcher: AgentDispatcher,
    policy: ConfirmationPolicy,
    max_steps: usize,
}

/// Result of a non-streaming run.
#[derive(Debug, Clone)]
pub struct ReactOutcome {
    /// Content of the final event.
    pub answer: String,
    /// Every event, in emission order; the last one is `Final`.
    pub events: Vec<ReasoningEvent>,
    /// The plan with the agent calls that were made.
    pub plan: ExecutionPlan,
    pub steps_used: usize,
    /// True when the loop gave up at the step budget.
    pub exhausted: bool,
}

/// How a run ended.
enum LoopEnd {
    Answered { answer: String, steps: usize },
    Exhausted,
    /// The stream receiver went away.
    Cancelled,
}

/// Where events go: a channel for streaming runs, a buffer otherwise.
enum EventSink {
    Stream(mpsc::Sender<Result<ReasoningEvent>>),
    Buffer(Vec<ReasoningEvent>),
}

impl EventSink {
    /// Returns false once nobody is listening.
    async fn emit(&mut self, event: ReasoningEvent) -> bool {
        match self {
            Self::Stream(tx) => tx.send(Ok(event)).await.is_ok(),
            Self::Buffer(events) => {
                events.push(event);
                true
            }
        }
    }

    /// Buffered events; a stream sink has none.
    fn into_events(self) -> Vec<ReasoningEvent> {
        match self {
            Self::Stream(_) => Vec::new(),
            Self::Buffer(events) => events,
        }
    }
}

macro_rules! emit {
    ($sink:expr, $event:expr) => {
        if !$sink.emit($event).await {
            debug!("Event receiver dropped, stopping reasoning loop");
            return Ok(LoopEnd::Cancelled);
        }
    };
}

impl ReactExecutor {
    pub fn new(oracle: Oracle, catalog: Arc<dyn Catalog>) -> Self {
        let defaults = ExecutorConfig::default();
        Self {
            oracle,
            catalog,
            dispatcher: AgentDispatcher::new(Duration::from_secs(defaults.agent_timeout_secs)),
            policy: ConfirmationPolicy::new(&defaults.confirmation_keywords),
            max_steps: defaults.max_steps as usize,
        }
    }

    pub fn from_config(oracle: Oracle, catalog: Arc<dyn Catalog>, config: &ExecutorConfig) -> Self {
        Self::new(oracle, catalog)
            .with_max_steps(config.max_steps as usize)
            .with_agent_timeout(Duration::from_secs(config.agent_timeout_secs))
            .with_confirmation_policy(ConfirmationPolicy::new(&config.confirmation_keywords))
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.dispatcher = AgentDispatcher::new(timeout);
        self
    }

    pub fn with_confirmation_policy(mut self, policy: ConfirmationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Run to completion and collect every event.
    pub async fn run(
        &self,
        plan: ExecutionPlan,
        query: &str,
        history: Vec<Message>,
    ) -> Result<ReactOutcome> {
        let mut plan = plan;
        let mut ctx = ReasoningContext::new(query, history);
        let mut sink = EventSink::Buffer(Vec::new());

        let end = self.drive(&mut plan, &mut ctx, &mut sink).await?;
        let events = sink.into_events();

        let (answer, steps_used, exhausted) = match end {
            LoopEnd::Answered { answer, steps } => (answer, steps, false),
            LoopEnd::Exhausted => (GIVE_UP_MESSAGE.to_string(), self.max_steps, true),
            // A buffer sink has no receiver to drop.
            LoopEnd::Cancelled => {
                return Err(Error::Internal("buffered run reported cancellation".into()));
            }
        };

        Ok(ReactOutcome {
            answer,
            events,
            plan,
            steps_used,
            exhausted,
        })
    }

    /// Run in a background task, streaming events as they happen.
    ///
    /// A fatal failure (oracle or catalog) arrives as a single `Err` item
    /// and ends the stream. Dropping the receiver stops the loop at its
    /// next event.
    pub fn run_stream(
        &self,
        plan: ExecutionPlan,
        query: impl Into<String>,
        history: Vec<Message>,
    ) -> mpsc::Receiver<Result<ReasoningEvent>> {
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let executor = self.clone();
        let query = query.into();

        tokio::spawn(async move {
            let mut plan = plan;
            let mut ctx = ReasoningContext::new(query, history);
            let mut sink = EventSink::Stream(tx.clone());

            if let Err(e) = executor.drive(&mut plan, &mut ctx, &mut sink).await {
                error!(error = %e, "Reasoning loop failed");
                let _ = tx.send(Err(e)).await;
            }
        });

        rx
    }

    async fn drive(
        &self,
        plan: &mut ExecutionPlan,
        ctx: &mut ReasoningContext,
        sink: &mut EventSink,
    ) -> Result<LoopEnd> {
        let agents = match &plan.scope {
            Some(scope) => scope.resolve(self.catalog.as_ref()).await?,
            None => self.catalog.list_agents().await?,
        };
        let tools = prompts::tool_catalog(&agents);
        let by_name: HashMap<&str, &AgentDescriptor> =
            agents.iter().map(|a| (a.name.as_str(), a)).collect();
        let confirmed = self.policy.is_confirmed(&ctx.history);
        let chat_history = ctx.chat_history();

        info!(
            agents = agents.len(),
            confirmed,
            max_steps = self.max_steps,
            "ReAct loop starting"
        );

        for step in 1..=self.max_steps {
            let prompt = prompts::react(&ctx.query, &chat_history, &tools, &ctx.scratchpad());
            emit!(sink, ReasoningEvent::thought(format!("Step {step}: Thinking...")));

            let content = self.oracle.ask(&prompt).await?;
            debug!(step, response = %preview(&content), "Oracle response");
            emit!(sink, ReasoningEvent::thought(content.clone()));
            ctx.record_response(step, &content);

            match parse_response(&content) {
                ParsedResponse::Final(answer) => {
                    info!(step, "Final answer reached");
                    emit!(sink, ReasoningEvent::final_answer(answer.clone()));
                    return Ok(LoopEnd::Answered {
                        answer,
                        steps: step,
                    });
                }

                ParsedResponse::Action(call) => {
                    let input = Value::Object(call.arguments.clone());

                    let outcome = match by_name.get(call.agent.as_str()) {
                        None => Err(ActionError::AgentNotFound(call.agent.clone())),
                        Some(agent) => match self.policy.check(agent, confirmed) {
                            Err(blocked) => Err(blocked),
                            Ok(()) => {
                                emit!(
                                    sink,
                                    ReasoningEvent::Action {
                                        agent: agent.name.clone(),
                                        input: input.clone(),
                                    }
                                );
                                self.dispatcher.invoke(agent, &call.arguments).await
                            }
                        },
                    };

                    let observation = observe(&outcome);
                    log_outcome(step, &call.agent, &outcome);
                    if let Some(status) = step_status(&outcome) {
                        plan.record(PlanStep {
                            step,
                            agent: call.agent.clone(),
                            input,
                            status,
                        });
                    }

                    ctx.record_observation(step, &observation);
                    emit!(sink, ReasoningEvent::observation(observation));
                    if matches!(outcome, Err(ActionError::ConfirmationRequired(_))) {
                        emit!(sink, ReasoningEvent::thought(safety::BLOCKED_THOUGHT));
                    }
                }

                ParsedResponse::InvalidAction(e) => {
                    warn!(step, error = %e, "Unparseable action");
                    ctx.record_observation(
                        step,
                        &format!("Observation: Error parsing action: {e}"),
                    );
                    emit!(sink, ReasoningEvent::observation(format!("Error: {e}")));
                }

                ParsedResponse::Thought => {
                    debug!(step, "No action in response");
                    ctx.record_observation(step, NO_ACTION_OBSERVATION);
                    emit!(sink, ReasoningEvent::thought(NO_ACTION_THOUGHT));
                }
            }
        }

        warn!(max_steps = self.max_steps, "ReAct: step budget exhausted");
        emit!(sink, ReasoningEvent::final_answer(GIVE_UP_MESSAGE));
        Ok(LoopEnd::Exhausted)
    }
}

/// Observation text for an action outcome.
fn observe(outcome: &std::result::Result<Value, ActionError>) -> String {
    match outcome {
        Ok(body) => format!("Observation: {body}"),
        Err(ActionError::ConfirmationRequired(_)) => safety::SAFETY_ALERT.to_string(),
        Err(e @ ActionError::InvocationFailed { .. }) => format!("Observation: Error {e}"),
        Err(e) => format!("Observation: Error: {e}"),
    }
}

/// Plan log entry for an outcome; lookups of unknown agents are not logged.
fn step_status(outcome: &std::result::Result<Value, ActionError>) -> Option<StepStatus> {
    match outcome {
        Ok(_) => Some(StepStatus::Completed),
        Err(ActionError::AgentNotFound(_)) => None,
        Err(ActionError::ConfirmationRequired(_)) => Some(StepStatus::Blocked),
        Err(e) => Some(StepStatus::Failed(e.to_string())),
    }
}

fn log_outcome(step: usize, agent: &str, outcome: &std::result::Result<Value, ActionError>) {
    match outcome {
        Ok(_) => info!(step, agent, "Agent call succeeded"),
        Err(ActionError::ConfirmationRequired(_)) => {
            warn!(step, agent, "Sensitive agent blocked pending user confirmation")
        }
        Err(ActionError::AgentNotFound(_)) => warn!(step, agent, "Unknown agent requested"),
        Err(e) => error!(step, agent, error = %e, "Agent call failed"),
    }
}

fn preview(content: &str) -> String {
    content.chars().take(100).collect()
}
