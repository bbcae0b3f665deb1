//! Query routing and the reasoning loop for agentdist.
//!
//! An invocation follows a **Route → Plan → Reason/Act** pipeline:
//!
//! 1. **Route** the query through the hierarchical router: a gate call
//!    decides whether agents are needed at all, then intent and capability
//!    classifiers narrow the catalog to a scope. Decisions are cached by
//!    query fingerprint.
//! 2. **Plan**: the decision becomes an execution plan carrying mode and
//!    scope.
//! 3. **Reason/Act**: the ReAct loop prompts the oracle, parses its output
//!    into a final answer or an agent action, dispatches actions over HTTP
//!    and feeds every observation (including failures) back into the next
//!    step, until a final answer or the step budget runs out.
//!
//! Every step is streamed to the caller as a [`ReasoningEvent`].

pub mod oracle;
pub mod orchestrator;
pub mod plan;
pub mod prompts;
pub mod react;
pub mod routing;
pub mod stream_event;

pub use oracle::Oracle;
pub use orchestrator::Orchestrator;
pub use plan::{ExecutionPlan, PlanBuilder, PlanStep, StepStatus};
pub use react::{
    AgentDispatcher, ConfirmationPolicy, ParsedResponse, ReactExecutor, ReactOutcome,
    ReasoningContext,
};
pub use routing::{AgentScope, DecisionCache, HierarchicalRouter, Mode, RoutingDecision};
pub use stream_event::ReasoningEvent;

#[cfg(test)]
pub(crate) mod test_helpers;
