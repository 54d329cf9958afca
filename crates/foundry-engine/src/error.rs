//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of startup and of the runs
//! themselves so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: foundry_core::ConfigError,
    },

    /// Scenario loading or validation failed.
    #[error("scenario error: {source}")]
    Scenario {
        /// The underlying scenario error.
        #[from]
        source: foundry_core::ScenarioError,
    },

    /// The built-in action library is malformed.
    #[error("action library error: {source}")]
    Actions {
        /// The underlying action error.
        #[from]
        source: foundry_actions::ActionError,
    },

    /// The single-agent factory could not be planned.
    #[error("planning error: {source}")]
    Plan {
        /// The underlying planner error.
        #[from]
        source: foundry_planner::PlanError,
    },

    /// Replaying the single-agent plan failed.
    #[error("replay error: {source}")]
    Replay {
        /// The underlying replay error.
        #[from]
        source: foundry_core::ReplayError,
    },

    /// The multi-agent run failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: foundry_core::RunnerError,
    },
}
