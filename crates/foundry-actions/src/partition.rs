//! Fixed assignment of attribute keys to the shared or private partition.
//!
//! The layout is derived once from the initial configuration: keys in the
//! initial shared state are forever shared, keys in the initial private
//! state are forever private. Every action used in a partitioned run is
//! checked against it at load time.

use std::collections::BTreeSet;

use foundry_types::{AttributeKey, POSITION_KEY, WorldState};

use crate::action::{Action, ActionKind};
use crate::error::ActionError;

/// Which partition each attribute key belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionLayout {
    shared: BTreeSet<AttributeKey>,
    private: BTreeSet<AttributeKey>,
}

impl PartitionLayout {
    /// Derive the layout from an initial shared and private state.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::PartitionOverlap`] if any key is present in
    /// both states.
    pub fn from_initial(shared: &WorldState, private: &WorldState) -> Result<Self, ActionError> {
        if let Some(key) = shared.keys().find(|k| private.contains_key(k.as_str())) {
            return Err(ActionError::PartitionOverlap(key.to_string()));
        }
        Ok(Self {
            shared: shared.keys().cloned().collect(),
            private: private.keys().cloned().collect(),
        })
    }

    /// Extend the layout with another agent's private keys.
    ///
    /// Agents in one run may carry different private attributes; none of
    /// them may collide with a shared key.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::PartitionOverlap`] on a collision.
    pub fn add_private(&mut self, private: &WorldState) -> Result<(), ActionError> {
        if let Some(key) = private.keys().find(|k| self.shared.contains(*k)) {
            return Err(ActionError::PartitionOverlap(key.to_string()));
        }
        self.private.extend(private.keys().cloned());
        Ok(())
    }

    /// Whether `key` belongs to the shared partition.
    pub fn is_shared(&self, key: &str) -> bool {
        self.shared.contains(key)
    }

    /// Whether `key` belongs to the private partition.
    pub fn is_private(&self, key: &str) -> bool {
        self.private.contains(key)
    }

    /// Check that `action` only writes keys of the partition each effect
    /// is declared for.
    ///
    /// # Errors
    ///
    /// Returns the first violation found: a shared effect writing a
    /// non-shared key, a private effect writing a non-private key, a
    /// movement action without a private position, or a cost modifier
    /// conditioned on a shared key.
    pub fn validate(&self, action: &Action) -> Result<(), ActionError> {
        if let Some(key) = action.shared_effects().keys().find(|k| !self.is_shared(k.as_str())) {
            return Err(ActionError::EffectOutsidePartition {
                action: action.name().to_owned(),
                key: key.to_string(),
                partition: "shared",
            });
        }

        if let Some(key) = action.effects().keys().find(|k| !self.is_private(k.as_str())) {
            return Err(ActionError::EffectOutsidePartition {
                action: action.name().to_owned(),
                key: key.to_string(),
                partition: "private",
            });
        }

        if matches!(action.kind(), ActionKind::Movement { .. }) && !self.is_private(POSITION_KEY) {
            return Err(ActionError::PositionNotPrivate {
                action: action.name().to_owned(),
                key: POSITION_KEY,
            });
        }

        let shared_read = action
            .cost_modifiers()
            .iter()
            .flat_map(|m| m.condition.iter())
            .find(|(k, _)| self.is_shared(k.as_str()));
        if let Some((key, _)) = shared_read {
            return Err(ActionError::ModifierReadsShared {
                action: action.name().to_owned(),
                key: key.to_string(),
            });
        }

        Ok(())
    }
}
