//! Serializable action descriptors.
//!
//! An [`ActionDescriptor`] is the configuration-file form of an action. It
//! is converted into an [`Action`] exactly once, at library load time;
//! that conversion is where malformed descriptors are rejected.
//!
//! ```yaml
//! - name: Move to Cutter
//!   kind: movement
//!   target: {x: 10, y: 5}
//! - name: Fetch Raw Steel
//!   preconditions: {agent_position: {x: 0, y: 0}, has_raw_steel: false}
//!   effects: {has_raw_steel: true}
//!   base_cost: 15
//! ```

use foundry_types::{Condition, Coord, WorldState};
use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionKind, CostModifier};
use crate::costs::{self, Cost};
use crate::error::ActionError;

/// The kind tag as written in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKindTag {
    /// Attribute changes only.
    #[default]
    StateChange,
    /// Movement to a `target` coordinate.
    Movement,
}

/// Configuration-file form of an [`Action`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionDescriptor {
    /// Unique action name.
    pub name: String,

    /// Action kind; defaults to `state_change`.
    #[serde(default)]
    pub kind: ActionKindTag,

    /// Preconditions over the (merged) state.
    #[serde(default)]
    pub preconditions: Condition,

    /// Private (agent-local) effects.
    #[serde(default)]
    pub effects: WorldState,

    /// Shared (world-visible) effects.
    #[serde(default)]
    pub shared_effects: WorldState,

    /// Base cost; must be positive.
    #[serde(default = "default_base_cost")]
    pub base_cost: i64,

    /// Ordered cost modifiers.
    #[serde(default)]
    pub cost_modifiers: Vec<CostModifier>,

    /// Movement target; required for and only allowed on movement actions.
    #[serde(default)]
    pub target: Option<Coord>,
}

const fn default_base_cost() -> i64 {
    costs::DEFAULT_BASE_COST
}

impl TryFrom<ActionDescriptor> for Action {
    type Error = ActionError;

    fn try_from(d: ActionDescriptor) -> Result<Self, Self::Error> {
        let base_cost = match Cost::try_from(d.base_cost) {
            Ok(cost) if cost > 0 => cost,
            _ => {
                return Err(ActionError::NonPositiveCost {
                    action: d.name,
                    cost: d.base_cost,
                });
            }
        };

        let kind = match (d.kind, d.target) {
            (ActionKindTag::Movement, Some(target)) => ActionKind::Movement { target },
            (ActionKindTag::Movement, None) => {
                return Err(ActionError::MissingTarget { action: d.name });
            }
            (ActionKindTag::StateChange, Some(_)) => {
                return Err(ActionError::UnexpectedTarget { action: d.name });
            }
            (ActionKindTag::StateChange, None) => ActionKind::StateChange,
        };

        Ok(Self::from_parts(
            d.name,
            kind,
            d.preconditions,
            d.effects,
            d.shared_effects,
            base_cost,
            d.cost_modifiers,
        ))
    }
}

impl From<&Action> for ActionDescriptor {
    fn from(action: &Action) -> Self {
        let (kind, target) = match action.kind() {
            ActionKind::Movement { target } => (ActionKindTag::Movement, Some(target)),
            ActionKind::StateChange => (ActionKindTag::StateChange, None),
        };
        Self {
            name: action.name().to_owned(),
            kind,
            preconditions: action.preconditions().clone(),
            effects: action.effects().clone(),
            shared_effects: action.shared_effects().clone(),
            base_cost: costs::to_signed(action.base_cost()),
            cost_modifiers: action.cost_modifiers().to_vec(),
            target,
        }
    }
}
