//! Cost-optimal planners for the Foundry action model.
//!
//! Both planners run the same uniform-cost search; they differ only in the
//! shape of a search node.
//!
//! # Modules
//!
//! - [`search`] -- The shared search loop and the [`SearchSpace`] seam
//! - [`single`] -- [`Planner`] over full, unpartitioned states
//! - [`partitioned`] -- [`PartitionedPlanner`] over shared + private states
//! - [`plan`] -- Planner output ([`Plan`], [`PlanStep`])
//! - [`error`] -- [`PlanError`]

pub mod error;
pub mod partitioned;
pub mod plan;
pub mod search;
pub mod single;

pub use error::PlanError;
pub use partitioned::{PartitionedPlanner, PartitionedState};
pub use plan::{Plan, PlanStep, SearchStats};
pub use search::{SearchSpace, Successor, uniform_cost_search};
pub use single::{Planner, plan_actions};
