//! Built-in sample domains: a factory floor with four stations.
//!
//! Two variants ship with the crate:
//!
//! - a single-agent factory where one worker fetches steel, optionally
//!   picks up a cutting tool and tunes the cutter, then cuts and assembles
//!   a widget;
//! - a two-agent factory where both workers draw from one steel supply,
//!   one building a widget and the other a heavy-duty assembly through an
//!   extra press stage.

use foundry_actions::{Action, ActionDescriptor, ActionError, ActionLibrary};
use foundry_types::{Condition, Coord, POSITION_KEY, WorldState};

use crate::scenario::{AgentConfig, ScenarioConfig};

/// Raw material storage.
pub const RECEIVING: Coord = Coord::new(0, 0);
/// The cutter; turns raw steel into a cut plate.
pub const CUTTER: Coord = Coord::new(10, 5);
/// The assembler; final station for every product.
pub const ASSEMBLER: Coord = Coord::new(5, 0);
/// Where the cutting tool hangs (single-agent floor).
pub const TOOL_RACK: Coord = Coord::new(2, 8);
/// The press (two-agent floor). Sits where the tool rack is on the
/// single-agent floor.
pub const PRESS: Coord = Coord::new(2, 8);

/// Extra cost of walking while carrying raw steel.
const CARRY_PENALTY: i64 = 5;

/// Actions available to the lone worker.
pub fn single_agent_actions() -> Vec<Action> {
    let carrying = || Condition::new().with("has_raw_steel", true);
    vec![
        Action::movement("Move to Receiving", RECEIVING),
        Action::movement("Move to Cutter", CUTTER).with_modifier(carrying(), CARRY_PENALTY),
        Action::movement("Move to Assembler", ASSEMBLER).with_modifier(carrying(), CARRY_PENALTY),
        Action::movement("Move to Tool Rack", TOOL_RACK),
        Action::state_change("Set Cutter to Optimal", 3)
            .requires(POSITION_KEY, CUTTER)
            .requires("cutter_status", "Suboptimal")
            .sets("cutter_status", "Optimal"),
        Action::state_change("Fetch Cutting Tool", 1)
            .requires(POSITION_KEY, TOOL_RACK)
            .requires("has_cutting_tool", false)
            .sets("has_cutting_tool", true),
        Action::state_change("Fetch Raw Steel", 15)
            .requires(POSITION_KEY, RECEIVING)
            .requires("has_raw_steel", false)
            .sets("has_raw_steel", true),
        Action::state_change("Cut Raw Material", 20)
            .requires(POSITION_KEY, CUTTER)
            .requires("has_raw_steel", true)
            .requires("has_cut_plate", false)
            .sets("has_raw_steel", false)
            .sets("has_cut_plate", true)
            .with_modifier(Condition::new().with("has_cutting_tool", true), -15)
            .with_modifier(Condition::new().with("cutter_status", "Suboptimal"), 10),
        Action::state_change("Assemble Part", 8)
            .requires(POSITION_KEY, ASSEMBLER)
            .requires("has_cut_plate", true)
            .requires("has_finished_widget", false)
            .sets("has_cut_plate", false)
            .sets("has_finished_widget", true)
            .sets("has_cutting_tool", false),
    ]
}

/// The single-agent action library.
///
/// # Errors
///
/// Returns [`ActionError::DuplicateName`] only if the built-in table is
/// edited into an inconsistent state.
pub fn single_agent_library() -> Result<ActionLibrary, ActionError> {
    ActionLibrary::new(single_agent_actions())
}

/// Initial state of the single-agent floor with the worker at `position`.
pub fn single_agent_state(position: Coord) -> WorldState {
    WorldState::new()
        .with("has_raw_steel", false)
        .with("has_cut_plate", false)
        .with("has_finished_widget", false)
        .with("has_cutting_tool", false)
        .with("cutter_status", "Idle")
        .with(POSITION_KEY, position)
}

/// Goal of the single-agent floor: one finished widget.
pub fn single_agent_goal() -> Condition {
    Condition::new().with("has_finished_widget", true)
}

/// Actions shared by both workers on the two-agent floor.
///
/// Steel is fetched through one action per remaining quantity, so each
/// fetch both requires and decrements the exact count in the shared
/// state.
pub fn two_agent_actions() -> Vec<Action> {
    let fetch = |name: &str, from: i64, to: i64| {
        Action::state_change(name, 15)
            .requires(POSITION_KEY, RECEIVING)
            .requires("has_raw_steel", from)
            .requires("agent_has_steel", false)
            .sets("agent_has_steel", true)
            .sets_shared("has_raw_steel", to)
    };
    vec![
        Action::movement("Move to Receiving", RECEIVING),
        Action::movement("Move to Cutter", CUTTER),
        Action::movement("Move to Assembler", ASSEMBLER),
        Action::movement("Move to Press", PRESS),
        fetch("Fetch Raw Steel (Qty 2 -> 1)", 2, 1),
        fetch("Fetch Raw Steel (Qty 1 -> 0)", 1, 0),
        Action::state_change("Cut Raw Material", 5)
            .requires(POSITION_KEY, CUTTER)
            .requires("agent_has_steel", true)
            .requires("agent_has_plate", false)
            .sets("agent_has_steel", false)
            .sets("agent_has_plate", true),
        Action::state_change("Use Press", 7)
            .requires(POSITION_KEY, PRESS)
            .requires("agent_has_plate", true)
            .requires("agent_has_machined_part", false)
            .sets("agent_has_plate", false)
            .sets("agent_has_machined_part", true),
        Action::state_change("Assemble Widget", 8)
            .requires(POSITION_KEY, ASSEMBLER)
            .requires("agent_has_plate", true)
            .sets("agent_has_plate", false)
            .sets_shared("has_finished_widget", 1),
        Action::state_change("Heavy Duty Assembly", 12)
            .requires(POSITION_KEY, ASSEMBLER)
            .requires("agent_has_machined_part", true)
            .sets("agent_has_machined_part", false)
            .sets_shared("has_heavy_duty_assembly", 1),
    ]
}

/// Initial shared state of the two-agent floor with `steel` units of raw
/// steel in receiving.
pub fn two_agent_shared(steel: i64) -> WorldState {
    WorldState::new()
        .with("has_raw_steel", steel)
        .with("has_cut_plate", 0)
        .with("has_machined_part", 0)
        .with("has_finished_widget", 0)
        .with("has_heavy_duty_assembly", 0)
        .with("cutter_status", "Optimal")
}

/// Initial private state of a two-agent-floor worker.
pub fn worker_state(position: Coord) -> WorldState {
    WorldState::new()
        .with(POSITION_KEY, position)
        .with("agent_has_steel", false)
        .with("agent_has_plate", false)
        .with("agent_has_machined_part", false)
}

/// The two-agent factory with `steel` units of raw steel.
///
/// Agent A starts in receiving and wants a finished widget; Agent B starts
/// at the assembler and wants a heavy-duty assembly. With two units both
/// succeed; with one, whoever fetches first wins.
pub fn two_agent_scenario(steel: i64) -> ScenarioConfig {
    ScenarioConfig {
        shared: two_agent_shared(steel),
        agents: vec![
            AgentConfig {
                name: "Agent A".to_owned(),
                private: worker_state(RECEIVING),
                goal: Condition::new().with("has_finished_widget", 1),
            },
            AgentConfig {
                name: "Agent B".to_owned(),
                private: worker_state(ASSEMBLER),
                goal: Condition::new().with("has_heavy_duty_assembly", 1),
            },
        ],
        actions: two_agent_actions().iter().map(ActionDescriptor::from).collect(),
    }
}
