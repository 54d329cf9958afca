//! Step observer that narrates a run through structured logging.

use foundry_core::{Agent, StepObserver, TurnReport, World};
use foundry_types::WorldState;
use tracing::{debug, info, warn};

/// Logs every turn of a multi-agent run.
pub struct Narrator;

impl StepObserver for Narrator {
    fn on_turn(&mut self, step: u64, agent: &Agent, report: &TurnReport) {
        let name = agent.name();
        match report {
            TurnReport::Idle => {}
            TurnReport::GoalMet => info!(step, agent = name, "Goal already achieved"),
            TurnReport::Executed {
                action,
                cost,
                goal_reached,
            } => {
                info!(step, agent = name, action = %action, cost, "Executed");
                if *goal_reached {
                    info!(step, agent = name, "Goal accomplished");
                }
            }
            TurnReport::Stale { action } => {
                warn!(step, agent = name, action = %action, "Plan failed re-validation, replanning");
            }
            TurnReport::Stuck { expanded } => {
                warn!(step, agent = name, expanded, "Stuck: no plan reaches the goal");
            }
        }
    }

    fn on_step_end(&mut self, step: u64, world: &World) {
        debug!(step, shared = %render(world.shared.state()), "Step complete");
    }
}

/// Render a state as compact JSON for log fields.
pub fn render(state: &WorldState) -> String {
    serde_json::to_string(state).unwrap_or_else(|e| format!("<unrenderable state: {e}>"))
}
