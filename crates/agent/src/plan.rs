//! Execution plans built from routing decisions.

use crate::routing::{AgentScope, Mode, RoutingDecision};
use serde::{Deserialize, Serialize};

/// What the orchestrator will run for one query, plus a log of the agent
/// calls the reasoning loop made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub mode: Mode,

    /// `None` in `LlmOnly` mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<AgentScope>,

    #[serde(default)]
    pub steps: Vec<PlanStep>,
}

/// One agent call attempted by the reasoning loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Loop step (1-based) in which the call was made.
    pub step: usize,
    pub agent: String,
    pub input: serde_json::Value,
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Failed(String),
    /// Held back by the confirmation gate.
    Blocked,
}

impl ExecutionPlan {
    pub fn record(&mut self, step: PlanStep) {
        self.steps.push(step);
    }

    pub fn completed_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Completed)
            .count()
    }
}

/// Turns routing decisions into execution plans.
pub struct PlanBuilder;

impl PlanBuilder {
    pub fn build(decision: &RoutingDecision) -> ExecutionPlan {
        ExecutionPlan {
            mode: decision.mode(),
            scope: decision.scope().cloned(),
            steps: Vec::new(),
        }
    }
}

impl From<&RoutingDecision> for ExecutionPlan {
    fn from(decision: &RoutingDecision) -> Self {
        PlanBuilder::build(decision)
    }
}
