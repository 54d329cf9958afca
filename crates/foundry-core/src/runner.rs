//! Turn-based multi-agent simulation loop.
//!
//! [`run_simulation`] gives every agent one turn per step, in a fixed
//! order, until one of three things happens:
//!
//! - **All goals met**: every agent reached [`AgentStatus::GoalMet`]
//! - **Stalled**: a whole step passed without any agent executing an
//!   action while every unfinished agent was stuck. The shared state can no
//!   longer change, so replanning would fail forever.
//! - **Step limit**: `max_steps` steps have run
//!
//! A [`StepObserver`] sees every turn report as it happens.

use foundry_actions::ActionLibrary;
use foundry_types::WorldState;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::agent::{Agent, AgentStatus, AgentSummary};
use crate::config::SimulationBoundsConfig;
use crate::coordinator::{Coordinator, CoordinatorError, SharedWorld, TurnReport};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A turn failed unrecoverably.
    #[error("turn error: {source}")]
    Coordinator {
        /// The underlying coordinator error.
        #[from]
        source: CoordinatorError,
    },
}

/// Everything a run mutates: the shared world and the agents, in turn order.
#[derive(Debug, Clone, Default)]
pub struct World {
    /// The live shared partition.
    pub shared: SharedWorld,
    /// Agents in the order they act within a step.
    pub agents: Vec<Agent>,
}

impl World {
    /// Assemble a world.
    pub const fn new(shared: SharedWorld, agents: Vec<Agent>) -> Self {
        Self { shared, agents }
    }

    /// Whether every agent has met its goal.
    pub fn all_goals_met(&self) -> bool {
        self.agents.iter().all(|a| a.status().is_finished())
    }

    /// Whether every agent still working on its goal is stuck.
    fn all_unfinished_stuck(&self) -> bool {
        self.agents
            .iter()
            .filter(|a| !a.status().is_finished())
            .all(|a| a.status() == AgentStatus::Stuck)
    }
}

/// Reason why the simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEndReason {
    /// Every agent reached its goal.
    AllGoalsMet,
    /// No agent could make progress any more.
    Stalled,
    /// Reached the configured `max_steps` limit.
    MaxStepsReached,
}

/// Result of the simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// The reason the simulation ended.
    pub end_reason: RunEndReason,
    /// Number of steps executed.
    pub steps: u64,
    /// Shared state at the end of the run.
    pub shared: WorldState,
    /// Per-agent outcome, in turn order.
    pub agents: Vec<AgentSummary>,
}

impl RunReport {
    /// Look up an agent summary by name.
    pub fn agent(&self, name: &str) -> Option<&AgentSummary> {
        self.agents.iter().find(|a| a.name == name)
    }
}

/// Callback invoked as the simulation progresses.
///
/// Presentation layers implement this to narrate or record a run.
pub trait StepObserver {
    /// Called after each agent turn.
    fn on_turn(&mut self, step: u64, agent: &Agent, report: &TurnReport);

    /// Called after every agent has had its turn in a step.
    fn on_step_end(&mut self, _step: u64, _world: &World) {}
}

/// An observer that ignores everything.
pub struct NoOpObserver;

impl StepObserver for NoOpObserver {
    fn on_turn(&mut self, _step: u64, _agent: &Agent, _report: &TurnReport) {}
}

/// Run the simulation until all goals are met, progress stalls, or the
/// step limit is reached.
///
/// # Errors
///
/// Returns [`RunnerError`] if a turn fails unrecoverably.
pub fn run_simulation(
    world: &mut World,
    library: &ActionLibrary,
    bounds: &SimulationBoundsConfig,
    observer: &mut dyn StepObserver,
) -> Result<RunReport, RunnerError> {
    let coordinator = Coordinator::new(library);
    let mut steps: u64 = 0;

    info!(
        max_steps = bounds.max_steps,
        agents = world.agents.len(),
        actions = library.len(),
        "Simulation starting"
    );

    let end_reason = loop {
        if world.all_goals_met() {
            break RunEndReason::AllGoalsMet;
        }
        if steps >= bounds.max_steps {
            break RunEndReason::MaxStepsReached;
        }
        steps = steps.saturating_add(1);

        let mut any_executed = false;
        for agent in &mut world.agents {
            let report = coordinator.take_turn(agent, &mut world.shared)?;
            any_executed |= report.executed();
            observer.on_turn(steps, agent, &report);
        }
        observer.on_step_end(steps, world);

        if !any_executed && !world.all_goals_met() && world.all_unfinished_stuck() {
            break RunEndReason::Stalled;
        }
    };

    Ok(RunReport {
        end_reason,
        steps,
        shared: world.shared.state().clone(),
        agents: world.agents.iter().map(Agent::summary).collect(),
    })
}

/// Log the simulation end sequence.
pub fn log_run_end(report: &RunReport) {
    info!(
        reason = ?report.end_reason,
        steps = report.steps,
        "Simulation ended"
    );
    for agent in &report.agents {
        info!(
            agent = %agent.name,
            status = %agent.status,
            executed = agent.executed.len(),
            total_cost = agent.total_cost,
            "Agent outcome"
        );
    }
}
