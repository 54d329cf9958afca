//! The static action library.
//!
//! Loaded once at startup (from code or YAML), validated, and then shared
//! read-only by every planner call and every agent. Library order is the
//! order in which the planner considers actions during expansion.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::action::Action;
use crate::descriptor::ActionDescriptor;
use crate::error::ActionError;
use crate::partition::PartitionLayout;

/// An ordered, name-indexed collection of actions.
#[derive(Debug, Clone, Default)]
pub struct ActionLibrary {
    actions: Vec<Action>,
    by_name: BTreeMap<String, usize>,
}

impl ActionLibrary {
    /// Build a library from already-constructed actions.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::DuplicateName`] if two actions share a name.
    pub fn new(actions: Vec<Action>) -> Result<Self, ActionError> {
        let mut by_name = BTreeMap::new();
        for (index, action) in actions.iter().enumerate() {
            if by_name.insert(action.name().to_owned(), index).is_some() {
                return Err(ActionError::DuplicateName(action.name().to_owned()));
            }
        }
        debug!(actions = actions.len(), "Action library built");
        Ok(Self { actions, by_name })
    }

    /// Build a library from descriptors, rejecting malformed ones.
    ///
    /// # Errors
    ///
    /// Returns the first descriptor conversion error, or
    /// [`ActionError::DuplicateName`].
    pub fn from_descriptors(descriptors: Vec<ActionDescriptor>) -> Result<Self, ActionError> {
        let actions = descriptors
            .into_iter()
            .map(Action::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(actions)
    }

    /// Parse a YAML list of action descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Yaml`] for invalid YAML, or any validation
    /// error from [`from_descriptors`](Self::from_descriptors).
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ActionError> {
        let descriptors: Vec<ActionDescriptor> = serde_yml::from_str(yaml)?;
        Self::from_descriptors(descriptors)
    }

    /// Load a YAML action library from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Io`] if the file cannot be read, or any error
    /// from [`from_yaml_str`](Self::from_yaml_str).
    pub fn from_file(path: &Path) -> Result<Self, ActionError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Check every action against a partition layout.
    ///
    /// # Errors
    ///
    /// Returns the first violation reported by [`PartitionLayout::validate`].
    pub fn validate_partition(&self, layout: &PartitionLayout) -> Result<(), ActionError> {
        self.actions.iter().try_for_each(|a| layout.validate(a))
    }

    /// Look up an action by name.
    pub fn get(&self, name: &str) -> Option<&Action> {
        self.by_name.get(name).and_then(|&i| self.actions.get(i))
    }

    /// Iterate actions in library order.
    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the library holds no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Descriptor form of every action, in library order.
    pub fn descriptors(&self) -> Vec<ActionDescriptor> {
        self.actions.iter().map(ActionDescriptor::from).collect()
    }
}

impl<'a> IntoIterator for &'a ActionLibrary {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}
