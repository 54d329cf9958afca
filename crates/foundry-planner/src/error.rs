//! Error types for the foundry-planner crate.

/// Errors returned by a planning call.
///
/// Planning never returns a partially filled plan: either a complete,
/// optimal [`Plan`](crate::Plan) or one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// The frontier was exhausted without reaching a goal-satisfying state.
    ///
    /// Non-fatal: the goal is unreachable from this start state with this
    /// library, but may become reachable once the shared state changes.
    #[error("no plan found after expanding {expanded} states")]
    NotFound {
        /// Number of states expanded before the frontier ran dry.
        expanded: usize,
    },
}
