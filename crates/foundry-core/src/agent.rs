//! Agents and their execution bookkeeping.
//!
//! An [`Agent`] owns its private partition, its goal, the remainder of its
//! current plan, and a trace of everything it has executed. Only the
//! coordinator advances an agent; everything else reads it.

use std::collections::VecDeque;

use foundry_actions::Cost;
use foundry_planner::{Plan, PlanStep};
use foundry_types::{AgentId, Condition, Coord, Merged, StateView, WorldState};
use serde::{Deserialize, Serialize};

/// Where an agent is in its plan/execute cycle between turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentStatus {
    /// No plan held; the next turn plans.
    NoPlan,
    /// Holding a plan with at least one remaining step.
    Planned,
    /// The last planning attempt found no plan. Retried on the next turn,
    /// since other agents may still change the shared state.
    Stuck,
    /// The goal has been satisfied. Permanent.
    GoalMet,
}

impl AgentStatus {
    /// Whether the agent will act no further.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::GoalMet)
    }
}

impl core::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::NoPlan => "no plan",
            Self::Planned => "planned",
            Self::Stuck => "stuck",
            Self::GoalMet => "goal met",
        };
        f.write_str(label)
    }
}

/// A planning agent with its own private state.
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    name: String,
    private: WorldState,
    goal: Condition,
    status: AgentStatus,
    plan: VecDeque<PlanStep>,
    executed: Vec<PlanStep>,
    path: Vec<Coord>,
}

impl Agent {
    /// Create an agent that has not planned yet.
    pub fn new(name: impl Into<String>, private: WorldState, goal: Condition) -> Self {
        let path = private.position().into_iter().collect();
        Self {
            id: AgentId::new(),
            name: name.into(),
            private,
            goal,
            status: AgentStatus::NoPlan,
            plan: VecDeque::new(),
            executed: Vec::new(),
            path,
        }
    }

    /// Unique identifier.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The agent's private partition.
    pub const fn private(&self) -> &WorldState {
        &self.private
    }

    /// The goal predicate, evaluated over shared + private state.
    pub const fn goal(&self) -> &Condition {
        &self.goal
    }

    /// Current status.
    pub const fn status(&self) -> AgentStatus {
        self.status
    }

    /// Steps of the current plan not yet executed.
    pub fn remaining_plan(&self) -> impl Iterator<Item = &PlanStep> {
        self.plan.iter()
    }

    /// Every step executed so far, with the cost actually incurred.
    pub fn executed(&self) -> &[PlanStep] {
        &self.executed
    }

    /// Positions visited, starting with the initial one. Consecutive
    /// duplicates are not recorded.
    pub fn path(&self) -> &[Coord] {
        &self.path
    }

    /// Sum of the costs of every executed step.
    pub fn executed_cost(&self) -> Cost {
        self.executed
            .iter()
            .fold(0, |total: Cost, step| total.saturating_add(step.cost))
    }

    /// Whether the goal holds against `shared` merged with this agent's
    /// private state.
    pub fn goal_satisfied(&self, shared: &WorldState) -> bool {
        self.goal.is_satisfied_by(&Merged::new(shared, &self.private))
    }

    /// Snapshot of this agent for reporting.
    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            id: self.id,
            name: self.name.clone(),
            status: self.status,
            executed: self.executed.clone(),
            total_cost: self.executed_cost(),
            path: self.path.clone(),
        }
    }

    pub(crate) fn adopt_plan(&mut self, plan: Plan) {
        self.plan = plan.steps.into();
        self.status = if self.plan.is_empty() {
            AgentStatus::NoPlan
        } else {
            AgentStatus::Planned
        };
    }

    pub(crate) fn next_step(&mut self) -> Option<PlanStep> {
        self.plan.pop_front()
    }

    pub(crate) fn discard_plan(&mut self) {
        self.plan.clear();
        self.status = AgentStatus::NoPlan;
    }

    pub(crate) const fn set_status(&mut self, status: AgentStatus) {
        self.status = status;
    }

    pub(crate) const fn private_mut(&mut self) -> &mut WorldState {
        &mut self.private
    }

    /// Record an executed step and the position it left the agent at.
    pub(crate) fn record(&mut self, step: PlanStep) {
        self.executed.push(step);
        if let Some(position) = self.private.position() {
            if self.path.last() != Some(&position) {
                self.path.push(position);
            }
        }
        if self.plan.is_empty() && self.status == AgentStatus::Planned {
            self.status = AgentStatus::NoPlan;
        }
    }
}

/// Per-agent outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    /// Agent identifier.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Status when the run ended.
    pub status: AgentStatus,
    /// Executed steps in order.
    pub executed: Vec<PlanStep>,
    /// Total executed cost.
    pub total_cost: Cost,
    /// Visited positions, for plotting.
    pub path: Vec<Coord>,
}
