//! Planner over partitioned (shared + private) state.
//!
//! Each agent plans against a snapshot of the shared state together with
//! its own private state. The planner knows nothing about other agents;
//! conflicts between concurrently executing plans are caught later, when
//! the coordinator re-checks preconditions against the live world.

use foundry_actions::ActionLibrary;
use foundry_types::{Condition, Fingerprint, Merged, WorldState};
use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::plan::Plan;
use crate::search::{SearchSpace, Successor, uniform_cost_search};

/// A search node split into the world-visible and the agent-local part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionedState {
    /// World-visible attributes.
    pub shared: WorldState,
    /// Attributes owned by the planning agent.
    pub private: WorldState,
}

impl PartitionedState {
    /// Pair two partitions.
    pub const fn new(shared: WorldState, private: WorldState) -> Self {
        Self { shared, private }
    }

    /// Read-only union of both partitions.
    pub const fn view(&self) -> Merged<'_> {
        Merged::new(&self.shared, &self.private)
    }

    /// Canonical fingerprint over the union of both partitions.
    pub fn fingerprint(&self) -> Fingerprint {
        self.view().fingerprint()
    }
}

/// Cost-optimal planner over partitioned states.
#[derive(Debug, Clone, Copy)]
pub struct PartitionedPlanner<'a> {
    library: &'a ActionLibrary,
}

impl<'a> PartitionedPlanner<'a> {
    /// Create a planner over `library`.
    ///
    /// The library is expected to have passed
    /// [`ActionLibrary::validate_partition`] for the layout in use.
    pub const fn new(library: &'a ActionLibrary) -> Self {
        Self { library }
    }

    /// Find the cheapest action sequence that brings the union of `shared`
    /// and `private` to a state satisfying `goal`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NotFound`] if no such sequence exists.
    pub fn plan(
        &self,
        shared: &WorldState,
        private: &WorldState,
        goal: &Condition,
    ) -> Result<Plan, PlanError> {
        let space = PartitionedSpace {
            library: self.library,
            goal,
        };
        let start = PartitionedState::new(shared.clone(), private.clone());
        uniform_cost_search(&space, start)
    }
}

struct PartitionedSpace<'a> {
    library: &'a ActionLibrary,
    goal: &'a Condition,
}

impl SearchSpace for PartitionedSpace<'_> {
    type Node = PartitionedState;

    fn fingerprint(&self, node: &PartitionedState) -> Fingerprint {
        node.fingerprint()
    }

    fn is_goal(&self, node: &PartitionedState) -> bool {
        self.goal.is_satisfied_by(&node.view())
    }

    fn successors<'s>(
        &'s self,
        node: &'s PartitionedState,
    ) -> impl Iterator<Item = Successor<'s, PartitionedState>> + 's {
        let view = node.view();
        self.library
            .iter()
            .filter(move |a| a.check_preconditions(&view))
            .map(move |a| Successor {
                action: a,
                node: PartitionedState {
                    shared: a.apply_shared_effects(&node.shared),
                    private: a.apply_private_effects(&node.private),
                },
                // Costs read the private partition only.
                cost: a.get_cost(&node.private),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use foundry_actions::{Action, PartitionLayout};
    use foundry_types::{Coord, POSITION_KEY, StateView, Value};

    use super::*;

    fn fetch_library() -> ActionLibrary {
        ActionLibrary::new(vec![
            Action::movement("Move to Receiving", Coord::new(0, 0)),
            Action::movement("Move to Shipping", Coord::new(6, 0)),
            Action::state_change("Fetch Raw Steel", 15)
                .requires(POSITION_KEY, Coord::new(0, 0))
                .requires("raw_steel", 1)
                .requires("agent_has_steel", false)
                .sets("agent_has_steel", true)
                .sets_shared("raw_steel", 0),
            Action::state_change("Ship Steel", 4)
                .requires(POSITION_KEY, Coord::new(6, 0))
                .requires("agent_has_steel", true)
                .sets("agent_has_steel", false)
                .sets_shared("shipped", true),
        ])
        .unwrap()
    }

    fn shared() -> WorldState {
        WorldState::new().with("raw_steel", 1).with("shipped", false)
    }

    fn private_at(position: Coord) -> WorldState {
        WorldState::new()
            .with(POSITION_KEY, position)
            .with("agent_has_steel", false)
    }

    #[test]
    fn effects_land_in_their_own_partition() {
        let library = fetch_library();
        let layout = PartitionLayout::from_initial(&shared(), &private_at(Coord::new(0, 0))).unwrap();
        library.validate_partition(&layout).unwrap();

        let goal = Condition::new().with("shipped", true);
        let plan = PartitionedPlanner::new(&library)
            .plan(&shared(), &private_at(Coord::new(0, 0)), &goal)
            .unwrap();

        assert_eq!(
            plan.action_names(),
            vec!["Fetch Raw Steel", "Move to Shipping", "Ship Steel"]
        );
        assert_eq!(plan.total_cost, 15 + 6 + 4);
    }

    #[test]
    fn goal_may_mix_shared_and_private_keys() {
        let library = fetch_library();
        let goal = Condition::new()
            .with("raw_steel", 0)
            .with("agent_has_steel", true);
        let plan = PartitionedPlanner::new(&library)
            .plan(&shared(), &private_at(Coord::new(3, 0)), &goal)
            .unwrap();
        assert_eq!(plan.action_names(), vec!["Move to Receiving", "Fetch Raw Steel"]);
        assert_eq!(plan.total_cost, 3 + 15);
    }

    #[test]
    fn exhausted_shared_resource_means_no_plan() {
        let library = fetch_library();
        let depleted = shared().with("raw_steel", 0);
        let goal = Condition::new().with("shipped", true);
        let result = PartitionedPlanner::new(&library).plan(
            &depleted,
            &private_at(Coord::new(0, 0)),
            &goal,
        );
        assert!(matches!(result, Err(PlanError::NotFound { .. })));
    }

    #[test]
    fn planning_does_not_touch_inputs() {
        let library = fetch_library();
        let shared = shared();
        let private = private_at(Coord::new(0, 0));
        let goal = Condition::new().with("shipped", true);
        PartitionedPlanner::new(&library)
            .plan(&shared, &private, &goal)
            .unwrap();
        assert_eq!(shared.get("raw_steel"), Some(&Value::Int(1)));
        assert_eq!(private.position(), Some(Coord::new(0, 0)));
    }

    #[test]
    fn partitioned_fingerprint_matches_merged_state() {
        let state = PartitionedState::new(shared(), private_at(Coord::new(1, 1)));
        assert_eq!(state.fingerprint(), state.view().to_state().fingerprint());
    }

    #[test]
    fn agrees_with_single_planner_on_merged_state() {
        let library = fetch_library();
        let goal = Condition::new().with("shipped", true);
        for start in [Coord::new(0, 0), Coord::new(6, 0), Coord::new(2, 5)] {
            let partitioned = PartitionedPlanner::new(&library)
                .plan(&shared(), &private_at(start), &goal)
                .unwrap();
            let merged = shared().overlaid(&private_at(start));
            let single = crate::Planner::new(&library).plan(&merged, &goal).unwrap();
            assert_eq!(partitioned.total_cost, single.total_cost);
            assert_eq!(partitioned.steps, single.steps);
        }
    }
}
