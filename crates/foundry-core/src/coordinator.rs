//! Execution coordinator: plan, re-validate, apply, replan.
//!
//! Agents plan against a snapshot of the shared state, so by the time a
//! step runs another agent may have changed the world underneath it. Every
//! step's preconditions are therefore re-checked against the live shared
//! state merged with the agent's private state immediately before it is
//! applied. A failed check discards the rest of the plan and the agent
//! replans on its next turn.
//!
//! The shared state has exactly one writer per step: [`execute_step`]
//! takes the [`SharedWorld`] by exclusive reference.

use foundry_actions::{Action, ActionLibrary, Cost};
use foundry_planner::{PartitionedPlanner, PlanError, PlanStep};
use foundry_types::{Merged, WorldState};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::agent::{Agent, AgentStatus};

/// Errors raised while taking a turn.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinatorError {
    /// A plan named an action that is not in the library.
    #[error("agent {agent} planned unknown action '{action}'")]
    UnknownAction {
        /// The agent holding the plan.
        agent: String,
        /// The missing action name.
        action: String,
    },
}

/// Handle to the live shared partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedWorld {
    state: WorldState,
}

impl SharedWorld {
    /// Wrap an initial shared state.
    pub const fn new(state: WorldState) -> Self {
        Self { state }
    }

    /// Read the current shared state.
    pub const fn state(&self) -> &WorldState {
        &self.state
    }

    /// Unwrap the shared state.
    pub fn into_inner(self) -> WorldState {
        self.state
    }
}

/// Outcome of one attempted execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The action was applied at the given incremental cost.
    Applied {
        /// Cost evaluated against the pre-action private state.
        cost: Cost,
    },
    /// A precondition no longer held. Nothing was applied.
    Stale,
}

/// Re-check `action` against the live world and apply it if it still holds.
///
/// The cost is computed from the private state before the action runs.
/// On success the shared delta is written to `world` and the private delta
/// (with any position change) to `private`.
pub fn execute_step(
    action: &Action,
    world: &mut SharedWorld,
    private: &mut WorldState,
) -> StepOutcome {
    if !action.check_preconditions(&Merged::new(&world.state, private)) {
        return StepOutcome::Stale;
    }
    let cost = action.get_cost(&*private);
    action.apply_in_place(&mut world.state, private);
    StepOutcome::Applied { cost }
}

/// What happened during one agent's turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnReport {
    /// The agent had already finished; nothing happened.
    Idle,
    /// The goal was found satisfied before acting.
    GoalMet,
    /// A step was executed.
    Executed {
        /// Action name.
        action: String,
        /// Cost actually incurred.
        cost: Cost,
        /// Whether this step satisfied the goal.
        goal_reached: bool,
    },
    /// The next step failed re-validation; the plan was discarded.
    Stale {
        /// The step that could no longer be applied.
        action: String,
    },
    /// Planning found no route to the goal.
    Stuck {
        /// States expanded by the failed search.
        expanded: usize,
    },
}

impl TurnReport {
    /// Whether the turn changed any state.
    pub const fn executed(&self) -> bool {
        matches!(self, Self::Executed { .. })
    }
}

/// Drives agents through plan/execute/replan against one action library.
#[derive(Debug, Clone, Copy)]
pub struct Coordinator<'a> {
    library: &'a ActionLibrary,
}

impl<'a> Coordinator<'a> {
    /// Create a coordinator over `library`.
    pub const fn new(library: &'a ActionLibrary) -> Self {
        Self { library }
    }

    /// Give `agent` one turn against the live shared world.
    ///
    /// An agent without a plan plans first and, if that succeeds, executes
    /// the first step in the same turn.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::UnknownAction`] if the plan names an
    /// action missing from the library.
    pub fn take_turn(
        &self,
        agent: &mut Agent,
        world: &mut SharedWorld,
    ) -> Result<TurnReport, CoordinatorError> {
        if agent.status().is_finished() {
            return Ok(TurnReport::Idle);
        }

        if agent.goal_satisfied(world.state()) {
            agent.set_status(AgentStatus::GoalMet);
            info!(agent = agent.name(), "Goal already satisfied");
            return Ok(TurnReport::GoalMet);
        }

        if agent.status() != AgentStatus::Planned {
            let planner = PartitionedPlanner::new(self.library);
            match planner.plan(world.state(), agent.private(), agent.goal()) {
                Ok(plan) => {
                    info!(
                        agent = agent.name(),
                        total_cost = plan.total_cost,
                        plan = %plan.action_names().join(" -> "),
                        "New plan"
                    );
                    agent.adopt_plan(plan);
                }
                Err(PlanError::NotFound { expanded }) => {
                    agent.set_status(AgentStatus::Stuck);
                    warn!(agent = agent.name(), expanded, "No plan found, agent is stuck");
                    return Ok(TurnReport::Stuck { expanded });
                }
            }
        }

        let Some(step) = agent.next_step() else {
            // Only a start state that already satisfies the goal plans empty.
            agent.set_status(AgentStatus::GoalMet);
            return Ok(TurnReport::GoalMet);
        };

        let action = self
            .library
            .get(&step.action)
            .ok_or_else(|| CoordinatorError::UnknownAction {
                agent: agent.name().to_owned(),
                action: step.action.clone(),
            })?;

        match execute_step(action, world, agent.private_mut()) {
            StepOutcome::Stale => {
                agent.discard_plan();
                debug!(
                    agent = agent.name(),
                    action = %step.action,
                    "Precondition no longer holds, discarding plan"
                );
                Ok(TurnReport::Stale {
                    action: step.action,
                })
            }
            StepOutcome::Applied { cost } => {
                debug!(agent = agent.name(), action = %step.action, cost, "Executed");
                let name = step.action.clone();
                agent.record(PlanStep {
                    action: step.action,
                    cost,
                });

                let goal_reached = agent.goal_satisfied(world.state());
                if goal_reached {
                    agent.set_status(AgentStatus::GoalMet);
                    info!(
                        agent = agent.name(),
                        total_cost = agent.executed_cost(),
                        "Goal reached"
                    );
                }
                Ok(TurnReport::Executed {
                    action: name,
                    cost,
                    goal_reached,
                })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use foundry_planner::{Plan, SearchStats};
    use foundry_types::{Condition, Coord, POSITION_KEY, StateView, Value};

    use super::*;

    fn library() -> ActionLibrary {
        ActionLibrary::new(vec![
            Action::movement("Move to Receiving", Coord::new(0, 0)),
            Action::state_change("Fetch Raw Steel", 15)
                .requires(POSITION_KEY, Coord::new(0, 0))
                .requires("has_raw_steel", 1)
                .requires("agent_has_steel", false)
                .sets("agent_has_steel", true)
                .sets_shared("has_raw_steel", 0),
        ])
        .unwrap()
    }

    fn private_at(position: Coord) -> WorldState {
        WorldState::new()
            .with(POSITION_KEY, position)
            .with("agent_has_steel", false)
    }

    fn steel_goal() -> Condition {
        Condition::new().with("agent_has_steel", true)
    }

    #[test]
    fn applied_step_writes_both_partitions() {
        let library = library();
        let fetch = library.get("Fetch Raw Steel").unwrap();
        let mut world = SharedWorld::new(WorldState::new().with("has_raw_steel", 1));
        let mut private = private_at(Coord::new(0, 0));

        let outcome = execute_step(fetch, &mut world, &mut private);
        assert_eq!(outcome, StepOutcome::Applied { cost: 15 });
        assert_eq!(world.state().get("has_raw_steel"), Some(&Value::Int(0)));
        assert_eq!(private.get("agent_has_steel"), Some(&Value::Bool(true)));
    }

    #[test]
    fn stale_step_leaves_state_untouched() {
        let library = library();
        let fetch = library.get("Fetch Raw Steel").unwrap();
        let mut world = SharedWorld::new(WorldState::new().with("has_raw_steel", 0));
        let mut private = private_at(Coord::new(0, 0));
        let before = (world.clone(), private.clone());

        assert_eq!(execute_step(fetch, &mut world, &mut private), StepOutcome::Stale);
        assert_eq!((world, private), before);
    }

    #[test]
    fn movement_cost_uses_pre_action_position() {
        let library = library();
        let mv = library.get("Move to Receiving").unwrap();
        let mut world = SharedWorld::default();
        let mut private = private_at(Coord::new(3, 4));
        assert_eq!(
            execute_step(mv, &mut world, &mut private),
            StepOutcome::Applied { cost: 7 }
        );
        assert_eq!(private.position(), Some(Coord::new(0, 0)));
    }

    #[test]
    fn turn_plans_then_executes_first_step() {
        let library = library();
        let coordinator = Coordinator::new(&library);
        let mut world = SharedWorld::new(WorldState::new().with("has_raw_steel", 1));
        let mut agent = Agent::new("A", private_at(Coord::new(2, 0)), steel_goal());

        let report = coordinator.take_turn(&mut agent, &mut world).unwrap();
        assert_eq!(
            report,
            TurnReport::Executed {
                action: "Move to Receiving".into(),
                cost: 2,
                goal_reached: false
            }
        );
        assert_eq!(agent.status(), AgentStatus::Planned);

        let report = coordinator.take_turn(&mut agent, &mut world).unwrap();
        assert!(matches!(report, TurnReport::Executed { goal_reached: true, .. }));
        assert_eq!(agent.status(), AgentStatus::GoalMet);
        assert_eq!(agent.executed_cost(), 17);

        assert_eq!(coordinator.take_turn(&mut agent, &mut world).unwrap(), TurnReport::Idle);
    }

    #[test]
    fn consumed_resource_invalidates_plan() {
        let library = library();
        let coordinator = Coordinator::new(&library);
        let mut world = SharedWorld::new(WorldState::new().with("has_raw_steel", 1));
        let mut slow = Agent::new("slow", private_at(Coord::new(4, 0)), steel_goal());
        let mut fast = Agent::new("fast", private_at(Coord::new(0, 0)), steel_goal());

        // Both plan while the steel is still there.
        coordinator.take_turn(&mut slow, &mut world).unwrap();
        coordinator.take_turn(&mut fast, &mut world).unwrap();
        assert_eq!(fast.status(), AgentStatus::GoalMet);

        let report = coordinator.take_turn(&mut slow, &mut world).unwrap();
        assert_eq!(
            report,
            TurnReport::Stale {
                action: "Fetch Raw Steel".into()
            }
        );
        assert_eq!(slow.status(), AgentStatus::NoPlan);
        assert_eq!(slow.remaining_plan().count(), 0);

        let report = coordinator.take_turn(&mut slow, &mut world).unwrap();
        assert!(matches!(report, TurnReport::Stuck { .. }));
        assert_eq!(slow.status(), AgentStatus::Stuck);
    }

    #[test]
    fn goal_satisfied_by_others_is_noticed() {
        let library = library();
        let coordinator = Coordinator::new(&library);
        let mut world = SharedWorld::new(WorldState::new().with("has_raw_steel", 0));
        let mut agent = Agent::new(
            "watcher",
            private_at(Coord::new(0, 0)),
            Condition::new().with("has_raw_steel", 0),
        );
        assert_eq!(
            coordinator.take_turn(&mut agent, &mut world).unwrap(),
            TurnReport::GoalMet
        );
        assert_eq!(agent.status(), AgentStatus::GoalMet);
        assert!(agent.executed().is_empty());
    }

    #[test]
    fn goal_met_by_others_ends_plan_early() {
        let pile = Coord::new(5, 0);
        let library = ActionLibrary::new(vec![
            Action::movement("Move to Pile", pile),
            Action::state_change("Ship", 3)
                .requires(POSITION_KEY, pile)
                .requires("crates_shipped", 0)
                .sets_shared("crates_shipped", 1),
        ])
        .unwrap();
        let coordinator = Coordinator::new(&library);
        let goal = Condition::new().with("crates_shipped", 1);
        let mut world = SharedWorld::new(WorldState::new().with("crates_shipped", 0));
        let mut far = Agent::new(
            "far",
            WorldState::new().with(POSITION_KEY, Coord::new(3, 0)),
            goal.clone(),
        );
        let mut near = Agent::new("near", WorldState::new().with(POSITION_KEY, pile), goal);

        let report = coordinator.take_turn(&mut far, &mut world).unwrap();
        assert_eq!(
            report,
            TurnReport::Executed {
                action: "Move to Pile".into(),
                cost: 2,
                goal_reached: false
            }
        );
        assert_eq!(far.remaining_plan().count(), 1);

        let report = coordinator.take_turn(&mut near, &mut world).unwrap();
        assert!(matches!(report, TurnReport::Executed { goal_reached: true, .. }));

        // The queued Ship step is never attempted.
        assert_eq!(coordinator.take_turn(&mut far, &mut world).unwrap(), TurnReport::GoalMet);
        assert_eq!(far.status(), AgentStatus::GoalMet);
        assert_eq!(far.executed().len(), 1);
        assert_eq!(coordinator.take_turn(&mut far, &mut world).unwrap(), TurnReport::Idle);
        assert_eq!(world.state().get("crates_shipped"), Some(&Value::Int(1)));
    }

    #[test]
    fn stuck_agent_replans_once_world_changes() {
        let library = ActionLibrary::new(vec![
            Action::state_change("Restock", 1)
                .requires("has_crate", true)
                .sets("has_crate", false)
                .sets_shared("crates", 1),
            Action::state_change("Take Crate", 2)
                .requires("crates", 1)
                .requires("holding", false)
                .sets("holding", true)
                .sets_shared("crates", 0),
        ])
        .unwrap();
        let coordinator = Coordinator::new(&library);
        let mut world = SharedWorld::new(WorldState::new().with("crates", 0));
        let mut taker = Agent::new(
            "taker",
            WorldState::new().with("has_crate", false).with("holding", false),
            Condition::new().with("holding", true),
        );
        let mut stocker = Agent::new(
            "stocker",
            WorldState::new().with("has_crate", true),
            Condition::new().with("crates", 1),
        );

        let report = coordinator.take_turn(&mut taker, &mut world).unwrap();
        assert!(matches!(report, TurnReport::Stuck { .. }));
        assert_eq!(taker.status(), AgentStatus::Stuck);

        let report = coordinator.take_turn(&mut stocker, &mut world).unwrap();
        assert!(matches!(report, TurnReport::Executed { goal_reached: true, .. }));

        let report = coordinator.take_turn(&mut taker, &mut world).unwrap();
        assert_eq!(
            report,
            TurnReport::Executed {
                action: "Take Crate".into(),
                cost: 2,
                goal_reached: true
            }
        );
        assert_eq!(taker.status(), AgentStatus::GoalMet);
        assert_eq!(world.state().get("crates"), Some(&Value::Int(0)));
    }

    #[test]
    fn unknown_action_in_plan_is_an_error() {
        let library = library();
        let coordinator = Coordinator::new(&library);
        let mut world = SharedWorld::new(WorldState::new().with("has_raw_steel", 1));
        let mut agent = Agent::new("A", private_at(Coord::new(0, 0)), steel_goal());
        agent.adopt_plan(Plan {
            total_cost: 1,
            steps: vec![PlanStep {
                action: "Teleport".into(),
                cost: 1,
            }],
            stats: SearchStats::default(),
        });

        let result = coordinator.take_turn(&mut agent, &mut world);
        assert_eq!(
            result,
            Err(CoordinatorError::UnknownAction {
                agent: "A".into(),
                action: "Teleport".into()
            })
        );
    }
}
