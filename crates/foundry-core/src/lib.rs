//! Agents, execution coordination, and the turn-based runner for Foundry.
//!
//! This crate turns plans into action: it owns the per-agent state machine,
//! re-validates every step against the live shared state before applying
//! it, and drives multi-agent runs to completion.
//!
//! # Modules
//!
//! - [`agent`] -- [`Agent`], its status machine, and run summaries
//! - [`config`] -- Configuration loading from `foundry-config.yaml`
//! - [`coordinator`] -- Step re-validation, execution, and replanning
//! - [`factory`] -- Built-in single- and two-agent factory domains
//! - [`replay`] -- Step-by-step replay of a single-state plan
//! - [`runner`] -- The turn loop and its end conditions
//! - [`scenario`] -- Scenario files and their validation
//!
//! [`Agent`]: agent::Agent

pub mod agent;
pub mod config;
pub mod coordinator;
pub mod factory;
pub mod replay;
pub mod runner;
pub mod scenario;

pub use agent::{Agent, AgentStatus, AgentSummary};
pub use config::{ConfigError, SimulationConfig};
pub use coordinator::{
    Coordinator, CoordinatorError, SharedWorld, StepOutcome, TurnReport, execute_step,
};
pub use replay::{ReplayError, ReplayStep, replay_plan};
pub use runner::{
    NoOpObserver, RunEndReason, RunReport, RunnerError, StepObserver, World, log_run_end,
    run_simulation,
};
pub use scenario::{AgentConfig, LoadedScenario, ScenarioConfig, ScenarioError};
