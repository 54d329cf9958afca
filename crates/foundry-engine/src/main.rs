//! Foundry engine binary.
//!
//! Plans the built-in single-agent factory and narrates the plan step by
//! step, then runs a multi-agent scenario to completion and reports each
//! agent's outcome.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `foundry-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Plan and replay the single-agent factory
//! 4. Load and validate the multi-agent scenario
//! 5. Run the simulation loop
//! 6. Log the result

mod error;
mod narrator;

use std::path::Path;

use foundry_core::config::SimulationConfig;
use foundry_core::{
    RunReport, ScenarioConfig, factory, log_run_end, replay_plan, run_simulation,
};
use foundry_planner::Planner;
use foundry_types::StateView;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::narrator::{Narrator, render};

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "foundry-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration, planning, or the simulation fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("foundry-engine starting");
    if from_file {
        info!(path = CONFIG_PATH, "Configuration loaded");
    } else {
        info!("Config file not found, using defaults");
    }
    info!(
        max_steps = config.simulation.max_steps,
        scenario = ?config.scenario,
        "Run parameters"
    );

    // 3. Single-agent factory.
    narrate_single_agent()?;

    // 4-5. Multi-agent scenario.
    let report = run_scenario(&config)?;

    // 6. Report.
    log_run_end(&report);
    for agent in &report.agents {
        let path: Vec<String> = agent.path.iter().map(ToString::to_string).collect();
        info!(agent = %agent.name, path = %path.join(" -> "), "Agent path");
    }
    match serde_json::to_string(&report) {
        Ok(json) => debug!(report = %json, "Run report"),
        Err(e) => debug!(error = %e, "Run report could not be serialized"),
    }

    Ok(())
}

/// Load configuration from `foundry-config.yaml`, falling back to defaults.
///
/// Returns whether the file was found. Environment overrides apply either
/// way.
fn load_config() -> Result<(SimulationConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        let config = SimulationConfig::from_file(config_path)?;
        Ok((config, true))
    } else {
        let mut config = SimulationConfig::default();
        config.apply_env_overrides();
        Ok((config, false))
    }
}

/// The configured scenario file, or the built-in two-agent factory.
fn load_scenario(config: &SimulationConfig) -> Result<ScenarioConfig, EngineError> {
    match &config.scenario {
        Some(path) => {
            info!(path = %path.display(), "Loading scenario file");
            Ok(ScenarioConfig::from_file(path)?)
        }
        None => {
            info!("No scenario configured, using the built-in two-agent factory");
            Ok(factory::two_agent_scenario(2))
        }
    }
}

/// Load, validate, and run the configured multi-agent scenario.
fn run_scenario(config: &SimulationConfig) -> Result<RunReport, EngineError> {
    let scenario = load_scenario(config)?;
    let mut loaded = scenario.build()?;
    info!(
        agents = loaded.world.agents.len(),
        actions = loaded.library.len(),
        "Scenario loaded"
    );

    let report = run_simulation(
        &mut loaded.world,
        &loaded.library,
        &config.simulation,
        &mut Narrator,
    )?;
    Ok(report)
}

/// Plan the single-agent factory and log every intermediate state.
fn narrate_single_agent() -> Result<(), EngineError> {
    let library = factory::single_agent_library()?;
    let initial = factory::single_agent_state(factory::RECEIVING);
    let goal = factory::single_agent_goal();

    info!(
        start = %render(&initial),
        goal = ?goal,
        "Single-agent planning"
    );

    let plan = Planner::new(&library).plan(&initial, &goal)?;
    info!(
        total_cost = plan.total_cost,
        steps = plan.len(),
        expanded = plan.stats.expanded,
        "Plan found"
    );

    let replayed = replay_plan(&initial, &plan, &library)?;
    for (number, entry) in (1_usize..).zip(&replayed) {
        info!(
            step = number,
            action = %entry.step.action,
            cost = entry.step.cost,
            position = ?entry.state.position(),
            state = %render(&entry.state),
            "Plan step"
        );
    }

    let satisfied = replayed
        .last()
        .map_or_else(|| goal.is_satisfied_by(&initial), |r| goal.is_satisfied_by(&r.state));
    info!(satisfied, "Final state satisfies goal");
    Ok(())
}
