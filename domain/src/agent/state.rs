//! Agent run state
//!
//! ```text
//! AwaitingModel ──(tool calls)──▶ ExecutingTools
//!      ▲                               │
//!      └────────(results appended)─────┘
//! AwaitingModel ──(text only)──▶ Done
//! AwaitingModel / ExecutingTools ──▶ Failed
//! ```

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Default number of decision engine round trips per run.
pub const DEFAULT_MAX_TURNS: usize = 20;

/// Current phase of an agent run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPhase {
    /// Waiting for the decision engine to answer
    AwaitingModel,
    /// Running the tool calls of the current turn
    ExecutingTools,
    /// The model produced a final answer
    Done,
    /// Terminated without a final answer
    Failed,
}

impl AgentPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentPhase::AwaitingModel => "awaiting_model",
            AgentPhase::ExecutingTools => "executing_tools",
            AgentPhase::Done => "done",
            AgentPhase::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentPhase::Done | AgentPhase::Failed)
    }

    pub fn can_transition_to(&self, next: AgentPhase) -> bool {
        use AgentPhase::*;
        matches!(
            (self, next),
            (AwaitingModel, ExecutingTools)
                | (AwaitingModel, Done)
                | (AwaitingModel, Failed)
                | (ExecutingTools, AwaitingModel)
                | (ExecutingTools, Failed)
        )
    }
}

impl std::fmt::Display for AgentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a run ended without a final answer.
///
/// Maps one-to-one onto the process exit status in the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The decision engine errored or answered with nothing usable
    UpstreamFailure,
    /// The turn cap was reached
    BudgetExhausted,
    /// The user interrupted the run
    Cancelled,
    /// A broken invariant inside the agent itself
    Internal,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::UpstreamFailure => "upstream_failure",
            FailureKind::BudgetExhausted => "budget_exhausted",
            FailureKind::Cancelled => "cancelled",
            FailureKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bounded count of decision engine round trips.
///
/// `count` never exceeds `cap`: [`try_increment`](Self::try_increment)
/// refuses once the cap is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnCounter {
    count: usize,
    cap: usize,
}

impl TurnCounter {
    pub fn new(cap: usize) -> Self {
        Self { count: 0, cap }
    }

    /// Consume one turn. Returns `false` without changing anything when
    /// the budget is spent.
    pub fn try_increment(&mut self) -> bool {
        if self.count >= self.cap {
            return false;
        }
        self.count += 1;
        true
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}

impl Default for TurnCounter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS)
    }
}

/// State of a single agent run (Entity)
#[derive(Debug, Clone)]
pub struct AgentState {
    phase: AgentPhase,
    turns: TurnCounter,
    failure: Option<FailureKind>,
}

impl AgentState {
    pub fn new(max_turns: usize) -> Self {
        Self {
            phase: AgentPhase::AwaitingModel,
            turns: TurnCounter::new(max_turns),
            failure: None,
        }
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    pub fn turns(&self) -> &TurnCounter {
        &self.turns
    }

    pub fn failure(&self) -> Option<FailureKind> {
        self.failure
    }

    /// Start a new turn, if the budget allows it.
    pub fn begin_turn(&mut self) -> bool {
        self.turns.try_increment()
    }

    pub fn transition(&mut self, next: AgentPhase) -> Result<(), DomainError> {
        if !self.phase.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }

    /// Move to `Failed`, recording why.
    pub fn fail(&mut self, kind: FailureKind) -> Result<(), DomainError> {
        self.transition(AgentPhase::Failed)?;
        self.failure = Some(kind);
        Ok(())
    }
}

impl Default for AgentState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS)
    }
}
