//! Integration tests for multi-agent runs over the factory domains.
//!
//! Every run here is deterministic: agents act in a fixed order, planning
//! breaks ties by insertion order, and nothing depends on wall-clock time.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::missing_panics_doc
)]

use std::path::Path;

use foundry_core::config::SimulationBoundsConfig;
use foundry_core::factory::{self, ASSEMBLER, CUTTER, PRESS, RECEIVING};
use foundry_core::{
    Agent, AgentConfig, AgentStatus, NoOpObserver, RunEndReason, RunReport, ScenarioConfig,
    StepObserver, TurnReport, World, run_simulation,
};
use foundry_types::{Condition, StateView, Value};

/// Collects every turn report for later inspection.
#[derive(Default)]
struct Transcript {
    turns: Vec<(u64, String, TurnReport)>,
}

impl StepObserver for Transcript {
    fn on_turn(&mut self, step: u64, agent: &Agent, report: &TurnReport) {
        self.turns.push((step, agent.name().to_owned(), report.clone()));
    }
}

impl Transcript {
    fn for_agent(&self, name: &str) -> Vec<(u64, &TurnReport)> {
        self.turns
            .iter()
            .filter(|(_, n, _)| n == name)
            .map(|(s, _, r)| (*s, r))
            .collect()
    }
}

fn run(config: &ScenarioConfig, observer: &mut dyn StepObserver) -> RunReport {
    let mut loaded = config.build().unwrap();
    run_simulation(
        &mut loaded.world,
        &loaded.library,
        &SimulationBoundsConfig::default(),
        observer,
    )
    .unwrap()
}

#[test]
fn two_agent_factory_completes_both_products() {
    let report = run(&factory::two_agent_scenario(2), &mut NoOpObserver);

    assert_eq!(report.end_reason, RunEndReason::AllGoalsMet);
    assert_eq!(report.steps, 8);

    let a = report.agent("Agent A").unwrap();
    assert_eq!(a.status, AgentStatus::GoalMet);
    assert_eq!(a.total_cost, 53);
    assert_eq!(a.path, vec![RECEIVING, CUTTER, ASSEMBLER]);
    let names: Vec<&str> = a.executed.iter().map(|s| s.action.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Fetch Raw Steel (Qty 2 -> 1)",
            "Move to Cutter",
            "Cut Raw Material",
            "Move to Assembler",
            "Assemble Widget",
        ]
    );

    let b = report.agent("Agent B").unwrap();
    assert_eq!(b.status, AgentStatus::GoalMet);
    assert_eq!(b.total_cost, 81);
    assert_eq!(b.path, vec![ASSEMBLER, RECEIVING, CUTTER, PRESS, ASSEMBLER]);
    assert_eq!(b.executed.len(), 8);

    assert_eq!(report.shared.get("has_raw_steel"), Some(&Value::Int(0)));
    assert_eq!(report.shared.get("has_finished_widget"), Some(&Value::Int(1)));
    assert_eq!(report.shared.get("has_heavy_duty_assembly"), Some(&Value::Int(1)));
}

#[test]
fn single_unit_of_steel_leaves_one_agent_stuck() {
    let mut transcript = Transcript::default();
    let report = run(&factory::two_agent_scenario(1), &mut transcript);

    assert_eq!(report.end_reason, RunEndReason::Stalled);
    assert_eq!(report.steps, 6);

    let a = report.agent("Agent A").unwrap();
    assert_eq!(a.status, AgentStatus::GoalMet);
    assert_eq!(a.total_cost, 53);

    let b = report.agent("Agent B").unwrap();
    assert_eq!(b.status, AgentStatus::Stuck);
    assert!(b.executed.is_empty());
    assert_eq!(b.path, vec![ASSEMBLER]);

    // Agent A fetched the only unit before Agent B ever planned.
    assert!(
        transcript
            .for_agent("Agent B")
            .iter()
            .all(|(_, r)| matches!(r, TurnReport::Stuck { .. }))
    );
}

#[test]
fn consumed_resource_forces_replan() {
    // Agent A now starts far from the steel and Agent B right next to it.
    let mut config = factory::two_agent_scenario(1);
    config.agents = vec![
        AgentConfig {
            name: "Agent A".into(),
            private: factory::worker_state(ASSEMBLER),
            goal: Condition::new().with("has_finished_widget", 1),
        },
        AgentConfig {
            name: "Agent B".into(),
            private: factory::worker_state(RECEIVING),
            goal: Condition::new().with("has_heavy_duty_assembly", 1),
        },
    ];

    let mut transcript = Transcript::default();
    let report = run(&config, &mut transcript);

    let a_turns = transcript.for_agent("Agent A");
    assert!(matches!(
        a_turns[0],
        (1, TurnReport::Executed { action, cost: 5, .. }) if action == "Move to Receiving"
    ));
    assert!(matches!(
        a_turns[1],
        (2, TurnReport::Stale { action }) if action == "Fetch Raw Steel (Qty 1 -> 0)"
    ));
    assert!(matches!(a_turns[2], (3, TurnReport::Stuck { .. })));

    assert_eq!(report.end_reason, RunEndReason::Stalled);
    assert_eq!(report.steps, 8);

    let a = report.agent("Agent A").unwrap();
    assert_eq!(a.status, AgentStatus::Stuck);
    assert_eq!(a.total_cost, 5);
    assert_eq!(a.path, vec![ASSEMBLER, RECEIVING]);

    let b = report.agent("Agent B").unwrap();
    assert_eq!(b.status, AgentStatus::GoalMet);
    assert_eq!(b.total_cost, 76);
}

#[test]
fn step_limit_cuts_run_short() {
    let mut loaded = factory::two_agent_scenario(2).build().unwrap();
    let report = run_simulation(
        &mut loaded.world,
        &loaded.library,
        &SimulationBoundsConfig { max_steps: 3 },
        &mut NoOpObserver,
    )
    .unwrap();

    assert_eq!(report.end_reason, RunEndReason::MaxStepsReached);
    assert_eq!(report.steps, 3);
    assert!(report.agents.iter().all(|a| a.status == AgentStatus::Planned));
}

#[test]
fn runs_are_deterministic() {
    let first = run(&factory::two_agent_scenario(2), &mut NoOpObserver);
    let second = run(&factory::two_agent_scenario(2), &mut NoOpObserver);

    assert_eq!(first.end_reason, second.end_reason);
    assert_eq!(first.steps, second.steps);
    assert_eq!(first.shared, second.shared);
    for (x, y) in first.agents.iter().zip(&second.agents) {
        assert_eq!(x.executed, y.executed);
        assert_eq!(x.path, y.path);
    }
}

#[test]
fn shipped_scenario_file_matches_built_in_factory() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenarios/two_agent_factory.yaml");
    let from_file = ScenarioConfig::from_file(&path).unwrap();
    assert_eq!(from_file, factory::two_agent_scenario(2));
}

#[test]
fn agents_can_be_assembled_by_hand() {
    let loaded = factory::two_agent_scenario(2).build().unwrap();
    let agents = vec![Agent::new(
        "Solo",
        factory::worker_state(RECEIVING),
        Condition::new().with("has_finished_widget", 1),
    )];
    let mut world = World::new(loaded.world.shared, agents);
    let report = run_simulation(
        &mut world,
        &loaded.library,
        &SimulationBoundsConfig::default(),
        &mut NoOpObserver,
    )
    .unwrap();
    assert_eq!(report.end_reason, RunEndReason::AllGoalsMet);
    assert_eq!(report.agent("Solo").unwrap().total_cost, 53);
}
