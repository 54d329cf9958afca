//! Shared type definitions for the Foundry action planner.
//!
//! Every other crate in the workspace speaks in these types: the planner
//! searches over [`WorldState`] snapshots, actions test [`Condition`]s
//! against any [`StateView`], and the coordinator tracks agents by
//! [`AgentId`].
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for agent identifiers
//! - [`state`] -- States, partial predicates, partition unions, fingerprints
//! - [`value`] -- Tagged attribute values and grid coordinates

pub mod ids;
pub mod state;
pub mod value;

// Re-export all public types at crate root for convenience.
pub use ids::AgentId;
pub use state::{AttributeKey, Condition, Fingerprint, Merged, POSITION_KEY, StateView, WorldState};
pub use value::{Coord, Value};
