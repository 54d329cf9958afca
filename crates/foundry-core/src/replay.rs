//! Step-by-step replay of a single-state plan.

use foundry_actions::ActionLibrary;
use foundry_planner::{Plan, PlanStep};
use foundry_types::WorldState;
use serde::{Deserialize, Serialize};

/// Errors raised while replaying a plan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    /// The plan names an action missing from the library.
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    /// A step's preconditions do not hold in the replayed state, so the
    /// plan was not produced from this initial state.
    #[error("step {index} ('{action}') is not applicable")]
    NotApplicable {
        /// Zero-based step index.
        index: usize,
        /// Action name.
        action: String,
    },
}

/// One replayed step and the state it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayStep {
    /// The plan step that was applied.
    pub step: PlanStep,
    /// State after applying it.
    pub state: WorldState,
}

/// Apply every step of `plan` to `initial` in order.
///
/// # Errors
///
/// Returns [`ReplayError::UnknownAction`] for an action missing from
/// `library`, or [`ReplayError::NotApplicable`] if a step's preconditions
/// do not hold when it is reached.
pub fn replay_plan(
    initial: &WorldState,
    plan: &Plan,
    library: &ActionLibrary,
) -> Result<Vec<ReplayStep>, ReplayError> {
    let mut state = initial.clone();
    let mut replayed = Vec::with_capacity(plan.len());

    for (index, step) in plan.steps.iter().enumerate() {
        let action = library
            .get(&step.action)
            .ok_or_else(|| ReplayError::UnknownAction(step.action.clone()))?;
        if !action.check_preconditions(&state) {
            return Err(ReplayError::NotApplicable {
                index,
                action: step.action.clone(),
            });
        }
        state = action.apply_effects(&state);
        replayed.push(ReplayStep {
            step: step.clone(),
            state: state.clone(),
        });
    }

    Ok(replayed)
}
