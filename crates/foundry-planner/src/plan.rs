//! Planner output: an ordered list of steps with incremental costs.

use foundry_actions::Cost;
use serde::{Deserialize, Serialize};

/// One step of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Name of the action to apply, as found in the action library.
    pub action: String,
    /// Incremental cost of the action, evaluated in the state it is
    /// applied to.
    pub cost: Cost,
}

/// Bookkeeping from one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// States popped from the frontier and expanded.
    pub expanded: usize,
    /// Successor states recorded as new or cheaper.
    pub generated: usize,
}

/// A complete, minimum-cost plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Sum of every step's incremental cost.
    pub total_cost: Cost,
    /// Steps in execution order. Empty when the start state already
    /// satisfies the goal.
    pub steps: Vec<PlanStep>,
    /// Search statistics for diagnostics.
    pub stats: SearchStats,
}

impl Plan {
    /// Whether the plan has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Action names in execution order.
    pub fn action_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.action.as_str()).collect()
    }
}
