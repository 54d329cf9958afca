//! Scenario files: shared state, agents, and the action library in one
//! YAML document.
//!
//! ```yaml
//! shared: {has_raw_steel: 1, has_finished_widget: 0}
//! agents:
//!   - name: Agent A
//!     private: {agent_position: {x: 0, y: 0}, agent_has_steel: false}
//!     goal: {has_finished_widget: 1}
//! actions:
//!   - name: Move to Receiving
//!     kind: movement
//!     target: {x: 0, y: 0}
//! ```
//!
//! Building a scenario derives the partition layout from the initial
//! states and validates every action against it, so a malformed scenario
//! fails before any planning happens.

use std::collections::BTreeSet;
use std::path::Path;

use foundry_actions::{ActionDescriptor, ActionError, ActionLibrary, PartitionLayout};
use foundry_types::{Condition, WorldState};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::agent::Agent;
use crate::coordinator::SharedWorld;
use crate::runner::World;

/// Errors that can occur when loading or building a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Failed to read the scenario file from disk.
    #[error("failed to read scenario file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse or emit YAML.
    #[error("failed to process scenario YAML: {source}")]
    Yaml {
        /// The underlying YAML error.
        source: serde_yml::Error,
    },

    /// An action or the partition layout is malformed.
    #[error("invalid scenario: {source}")]
    Action {
        /// The underlying validation error.
        #[from]
        source: ActionError,
    },

    /// Two agents share a name.
    #[error("duplicate agent name: {0}")]
    DuplicateAgent(String),
}

impl From<serde_yml::Error> for ScenarioError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// One agent as written in a scenario file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name; unique within the scenario.
    pub name: String,
    /// Initial private partition.
    #[serde(default)]
    pub private: WorldState,
    /// Goal over shared + private state.
    pub goal: Condition,
}

/// A complete multi-agent scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Initial shared partition.
    #[serde(default)]
    pub shared: WorldState,
    /// Agents, in turn order.
    #[serde(default)]
    pub agents: Vec<AgentConfig>,
    /// Action library, in planner order.
    #[serde(default)]
    pub actions: Vec<ActionDescriptor>,
}

/// A scenario turned into runnable parts.
#[derive(Debug, Clone)]
pub struct LoadedScenario {
    /// Shared world and agents.
    pub world: World,
    /// The validated action library.
    pub library: ActionLibrary,
    /// The fixed partition layout.
    pub layout: PartitionLayout,
}

impl ScenarioConfig {
    /// Load a scenario from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Io`] if the file cannot be read, or
    /// [`ScenarioError::Yaml`] if it is not a valid scenario document.
    pub fn from_file(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a scenario from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Yaml`] if the string is not a valid
    /// scenario document.
    pub fn parse(yaml: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Render the scenario as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Yaml`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ScenarioError> {
        Ok(serde_yml::to_string(self)?)
    }

    /// Derive the partition layout from the initial shared state and every
    /// agent's initial private state.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::PartitionOverlap`] if a private key is also
    /// shared.
    pub fn layout(&self) -> Result<PartitionLayout, ActionError> {
        let mut layout = PartitionLayout::from_initial(&self.shared, &WorldState::new())?;
        for agent in &self.agents {
            layout.add_private(&agent.private)?;
        }
        Ok(layout)
    }

    /// Validate the scenario and build its world and library.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::DuplicateAgent`] for repeated agent names,
    /// or [`ScenarioError::Action`] for a malformed action or layout.
    pub fn build(&self) -> Result<LoadedScenario, ScenarioError> {
        let mut names = BTreeSet::new();
        if let Some(dup) = self.agents.iter().find(|a| !names.insert(a.name.as_str())) {
            return Err(ScenarioError::DuplicateAgent(dup.name.clone()));
        }

        let layout = self.layout()?;
        let library = ActionLibrary::from_descriptors(self.actions.clone())?;
        library.validate_partition(&layout)?;

        let agents = self
            .agents
            .iter()
            .map(|a| Agent::new(a.name.clone(), a.private.clone(), a.goal.clone()))
            .collect();

        debug!(
            agents = self.agents.len(),
            actions = library.len(),
            shared_keys = self.shared.len(),
            "Scenario built"
        );

        Ok(LoadedScenario {
            world: World::new(SharedWorld::new(self.shared.clone()), agents),
            library,
            layout,
        })
    }
}
