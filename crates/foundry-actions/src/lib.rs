//! Action contract, cost model, and action library for the Foundry planner.
//!
//! This crate defines what an action *is* and how it behaves against a
//! state, without any search logic. It sits between `foundry-types` (the
//! state model) and `foundry-planner` (which searches over actions).
//!
//! # Modules
//!
//! - [`action`] -- [`Action`]: preconditions, split effects, dynamic cost
//! - [`costs`] -- Cost type, cost floor, movement distance cost
//! - [`descriptor`] -- Serializable [`ActionDescriptor`] and load-time validation
//! - [`error`] -- Configuration-time error type ([`ActionError`])
//! - [`library`] -- The ordered, name-indexed [`ActionLibrary`]
//! - [`partition`] -- Shared/private key assignment ([`PartitionLayout`])

pub mod action;
pub mod costs;
pub mod descriptor;
pub mod error;
pub mod library;
pub mod partition;

// Re-export primary types at crate root for convenience.
pub use action::{Action, ActionKind, CostModifier};
pub use costs::{Cost, MIN_ACTION_COST};
pub use descriptor::{ActionDescriptor, ActionKindTag};
pub use error::ActionError;
pub use library::ActionLibrary;
pub use partition::PartitionLayout;
