//! Planner over a single, unpartitioned state space.
//!
//! Nodes are full [`WorldState`] snapshots. Both of an action's deltas are
//! applied to the one state, which makes this the planner for a lone agent
//! whose world and inventory live in the same map.

use foundry_actions::ActionLibrary;
use foundry_types::{Condition, Fingerprint, WorldState};

use crate::error::PlanError;
use crate::plan::Plan;
use crate::search::{SearchSpace, Successor, uniform_cost_search};

/// Cost-optimal planner over full states.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    library: &'a ActionLibrary,
}

impl<'a> Planner<'a> {
    /// Create a planner over `library`.
    pub const fn new(library: &'a ActionLibrary) -> Self {
        Self { library }
    }

    /// Find the cheapest action sequence from `start` to a state
    /// satisfying `goal`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NotFound`] if no such sequence exists.
    pub fn plan(&self, start: &WorldState, goal: &Condition) -> Result<Plan, PlanError> {
        let space = SingleSpace {
            library: self.library,
            goal,
        };
        uniform_cost_search(&space, start.clone())
    }
}

/// Plan in a single state space; shorthand for [`Planner::plan`].
///
/// # Errors
///
/// Returns [`PlanError::NotFound`] if no plan exists.
pub fn plan_actions(
    start: &WorldState,
    goal: &Condition,
    library: &ActionLibrary,
) -> Result<Plan, PlanError> {
    Planner::new(library).plan(start, goal)
}

struct SingleSpace<'a> {
    library: &'a ActionLibrary,
    goal: &'a Condition,
}

impl SearchSpace for SingleSpace<'_> {
    type Node = WorldState;

    fn fingerprint(&self, node: &WorldState) -> Fingerprint {
        node.fingerprint()
    }

    fn is_goal(&self, node: &WorldState) -> bool {
        self.goal.is_satisfied_by(node)
    }

    fn successors<'s>(
        &'s self,
        node: &'s WorldState,
    ) -> impl Iterator<Item = Successor<'s, WorldState>> + 's {
        self.library
            .iter()
            .filter(move |a| a.check_preconditions(node))
            .map(move |a| Successor {
                action: a,
                node: a.apply_effects(node),
                cost: a.get_cost(node),
            })
    }
}
