//! The action contract: preconditions, effects, and dynamic cost.
//!
//! An [`Action`] is immutable once built. Its [`ActionKind`] is resolved a
//! single time (from a descriptor or a constructor) and never re-derived
//! from the action's name.
//!
//! Effects are split into a private delta ([`Action::effects`]) and a shared
//! delta ([`Action::shared_effects`]). In a single state space both land in
//! the same state; the partitioned planner and the coordinator route each
//! delta to its own partition.

use foundry_types::{AttributeKey, Condition, Coord, POSITION_KEY, StateView, Value, WorldState};
use serde::{Deserialize, Serialize};

use crate::costs::{self, Cost};

/// A conditional, additive adjustment to an action's cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostModifier {
    /// Fires when the evaluated state satisfies this condition.
    pub condition: Condition,
    /// Signed amount added to the running cost. Negative values are
    /// reductions, positive values are penalties.
    pub adjustment: i64,
}

impl CostModifier {
    /// Create a modifier.
    pub const fn new(condition: Condition, adjustment: i64) -> Self {
        Self {
            condition,
            adjustment,
        }
    }
}

/// What kind of transition an action performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Changes attribute values only.
    StateChange,
    /// Moves the agent to `target`. Cost is the Manhattan distance from the
    /// current position and applying it overwrites the position.
    Movement {
        /// Destination on the grid.
        target: Coord,
    },
}

/// A named transition rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    name: String,
    kind: ActionKind,
    preconditions: Condition,
    effects: WorldState,
    shared_effects: WorldState,
    base_cost: Cost,
    cost_modifiers: Vec<CostModifier>,
}

impl Action {
    /// Create a state-change action with no preconditions or effects.
    pub fn state_change(name: impl Into<String>, base_cost: Cost) -> Self {
        Self {
            name: name.into(),
            kind: ActionKind::StateChange,
            preconditions: Condition::new(),
            effects: WorldState::new(),
            shared_effects: WorldState::new(),
            base_cost,
            cost_modifiers: Vec::new(),
        }
    }

    /// Create a movement action towards `target`.
    pub fn movement(name: impl Into<String>, target: Coord) -> Self {
        Self {
            kind: ActionKind::Movement { target },
            ..Self::state_change(name, costs::MIN_ACTION_COST)
        }
    }

    /// Add a precondition.
    #[must_use]
    pub fn requires(mut self, key: impl Into<AttributeKey>, value: impl Into<Value>) -> Self {
        self.preconditions.require(key, value);
        self
    }

    /// Add a private (agent-local) effect.
    #[must_use]
    pub fn sets(mut self, key: impl Into<AttributeKey>, value: impl Into<Value>) -> Self {
        self.effects.set(key, value);
        self
    }

    /// Add a shared (world-visible) effect.
    #[must_use]
    pub fn sets_shared(mut self, key: impl Into<AttributeKey>, value: impl Into<Value>) -> Self {
        self.shared_effects.set(key, value);
        self
    }

    /// Append a cost modifier. Modifiers are evaluated in insertion order.
    #[must_use]
    pub fn with_modifier(mut self, condition: Condition, adjustment: i64) -> Self {
        self.cost_modifiers.push(CostModifier::new(condition, adjustment));
        self
    }

    pub(crate) const fn from_parts(
        name: String,
        kind: ActionKind,
        preconditions: Condition,
        effects: WorldState,
        shared_effects: WorldState,
        base_cost: Cost,
        cost_modifiers: Vec<CostModifier>,
    ) -> Self {
        Self {
            name,
            kind,
            preconditions,
            effects,
            shared_effects,
            base_cost,
            cost_modifiers,
        }
    }

    /// The action's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved action kind.
    pub const fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Movement target, if this is a movement action.
    pub const fn target(&self) -> Option<Coord> {
        match self.kind {
            ActionKind::Movement { target } => Some(target),
            ActionKind::StateChange => None,
        }
    }

    /// Preconditions that must hold for the action to apply.
    pub const fn preconditions(&self) -> &Condition {
        &self.preconditions
    }

    /// Private (agent-local) effect delta.
    pub const fn effects(&self) -> &WorldState {
        &self.effects
    }

    /// Shared (world-visible) effect delta.
    pub const fn shared_effects(&self) -> &WorldState {
        &self.shared_effects
    }

    /// Configured base cost. Advisory only for movement actions.
    pub const fn base_cost(&self) -> Cost {
        self.base_cost
    }

    /// Cost modifiers in evaluation order.
    pub fn cost_modifiers(&self) -> &[CostModifier] {
        &self.cost_modifiers
    }

    /// Whether the action can be applied to `state`.
    ///
    /// Every precondition must match. A movement action is additionally
    /// rejected when the state has no position or is already at the
    /// target, which keeps zero-length self-loops out of the search graph.
    pub fn check_preconditions<S: StateView + ?Sized>(&self, state: &S) -> bool {
        if !self.preconditions.is_satisfied_by(state) {
            return false;
        }
        match self.kind {
            ActionKind::Movement { target } => state.position().is_some_and(|p| p != target),
            ActionKind::StateChange => true,
        }
    }

    /// Incremental cost of applying the action in `state`.
    ///
    /// Movement actions replace the base cost with the distance to their
    /// target (falling back to the base cost if `state` has no position).
    /// Every modifier whose condition matches adds its adjustment, in list
    /// order. The result is never below [`costs::MIN_ACTION_COST`].
    pub fn get_cost<S: StateView + ?Sized>(&self, state: &S) -> Cost {
        let base = match self.kind {
            ActionKind::Movement { target } => state
                .position()
                .map_or(self.base_cost, |from| costs::movement_cost(from, target)),
            ActionKind::StateChange => self.base_cost,
        };

        let raw = self
            .cost_modifiers
            .iter()
            .filter(|m| m.condition.is_satisfied_by(state))
            .fold(costs::to_signed(base), |running, m| {
                running.saturating_add(m.adjustment)
            });

        costs::clamp(raw)
    }

    /// Apply both deltas to a single, unpartitioned state.
    ///
    /// Returns a new snapshot; `state` is left untouched.
    pub fn apply_effects(&self, state: &WorldState) -> WorldState {
        let mut next = state.overlaid(&self.shared_effects);
        self.write_private(&mut next);
        next
    }

    /// Apply the private delta (and the position update for movement) to
    /// an agent's private partition.
    pub fn apply_private_effects(&self, private: &WorldState) -> WorldState {
        let mut next = private.clone();
        self.write_private(&mut next);
        next
    }

    /// Apply the shared delta to the shared partition.
    pub fn apply_shared_effects(&self, shared: &WorldState) -> WorldState {
        shared.overlaid(&self.shared_effects)
    }

    /// Overwrite private keys (and the position) in place.
    pub(crate) fn write_private(&self, state: &mut WorldState) {
        state.overlay(&self.effects);
        if let ActionKind::Movement { target } = self.kind {
            state.set(POSITION_KEY, target);
        }
    }

    /// Overwrite shared keys in place.
    pub(crate) fn write_shared(&self, state: &mut WorldState) {
        state.overlay(&self.shared_effects);
    }

    /// Apply the action to live partitions in place.
    ///
    /// Used by the execution coordinator once a precondition re-check has
    /// passed. Callers that need purity should use the `apply_*` methods.
    pub fn apply_in_place(&self, shared: &mut WorldState, private: &mut WorldState) {
        self.write_shared(shared);
        self.write_private(private);
    }
}
