//! Uniform-cost (Dijkstra) search over an implicit state graph.
//!
//! The graph is never materialized: a [`SearchSpace`] knows how to
//! fingerprint a node, test it against the goal, and enumerate the
//! actions applicable to it. [`uniform_cost_search`] is the one search
//! loop shared by every planner in this crate.
//!
//! The frontier is a `BTreeSet<(Cost, usize)>` used as a min-heap. The
//! second component is the node's index in the search arena, which is
//! also its insertion sequence number, so equal-cost entries pop in the
//! order they were generated. Nothing about a node's contents takes part
//! in the ordering.
//!
//! No heuristic is used and there is no iteration cap. Termination relies
//! on every action costing at least one and on the state space being
//! finite.

use std::collections::{BTreeMap, BTreeSet};

use foundry_actions::{Action, Cost};
use foundry_types::Fingerprint;
use tracing::debug;

use crate::error::PlanError;
use crate::plan::{Plan, PlanStep, SearchStats};

/// An edge out of a search node.
#[derive(Debug, Clone)]
pub struct Successor<'a, N> {
    /// The action that produces the successor.
    pub action: &'a Action,
    /// The state after applying the action.
    pub node: N,
    /// Incremental cost of the action in the originating state.
    pub cost: Cost,
}

/// The implicit graph a planner searches.
pub trait SearchSpace {
    /// A search node (a full state, or a partitioned one).
    type Node: Clone;

    /// Canonical fingerprint used for deduplication.
    fn fingerprint(&self, node: &Self::Node) -> Fingerprint;

    /// Whether `node` satisfies the goal.
    fn is_goal(&self, node: &Self::Node) -> bool;

    /// Every applicable action from `node`, in library order.
    fn successors<'s>(
        &'s self,
        node: &'s Self::Node,
    ) -> impl Iterator<Item = Successor<'s, Self::Node>> + 's;
}

/// A node recorded during the search.
struct Entry<N> {
    node: N,
    fingerprint: Fingerprint,
    parent: Option<usize>,
    step: Option<PlanStep>,
}

/// Run uniform-cost search from `start`.
///
/// Returns the first goal-satisfying state popped from the frontier, which
/// is optimal because edge costs are positive and the frontier is ordered
/// by accumulated cost.
///
/// # Errors
///
/// Returns [`PlanError::NotFound`] once the frontier is exhausted.
pub fn uniform_cost_search<S: SearchSpace>(space: &S, start: S::Node) -> Result<Plan, PlanError> {
    let start_fp = space.fingerprint(&start);

    let mut best: BTreeMap<Fingerprint, Cost> = BTreeMap::new();
    best.insert(start_fp.clone(), 0);

    let mut arena: Vec<Entry<S::Node>> = vec![Entry {
        node: start,
        fingerprint: start_fp,
        parent: None,
        step: None,
    }];

    let mut frontier: BTreeSet<(Cost, usize)> = BTreeSet::new();
    frontier.insert((0, 0));

    let mut stats = SearchStats::default();

    while let Some((cost, index)) = frontier.pop_first() {
        let Some(entry) = arena.get(index) else {
            continue;
        };

        // A cheaper path to this state was recorded after this entry was queued.
        if best.get(&entry.fingerprint).is_some_and(|&b| b < cost) {
            continue;
        }

        if space.is_goal(&entry.node) {
            let steps = reconstruct(&arena, index);
            debug!(
                total_cost = cost,
                steps = steps.len(),
                expanded = stats.expanded,
                generated = stats.generated,
                "Plan found"
            );
            return Ok(Plan {
                total_cost: cost,
                steps,
                stats,
            });
        }

        stats.expanded = stats.expanded.saturating_add(1);

        let successors: Vec<(PlanStep, S::Node)> = space
            .successors(&entry.node)
            .map(|s| {
                let step = PlanStep {
                    action: s.action.name().to_owned(),
                    cost: s.cost,
                };
                (step, s.node)
            })
            .collect();

        for (step, node) in successors {
            let new_cost = cost.saturating_add(step.cost);
            let fingerprint = space.fingerprint(&node);

            let is_cheaper = best
                .get(&fingerprint)
                .is_none_or(|&existing| new_cost < existing);
            if !is_cheaper {
                continue;
            }

            best.insert(fingerprint.clone(), new_cost);
            let child = arena.len();
            arena.push(Entry {
                node,
                fingerprint,
                parent: Some(index),
                step: Some(step),
            });
            frontier.insert((new_cost, child));
            stats.generated = stats.generated.saturating_add(1);
        }
    }

    debug!(
        expanded = stats.expanded,
        generated = stats.generated,
        "Frontier exhausted without reaching the goal"
    );
    Err(PlanError::NotFound {
        expanded: stats.expanded,
    })
}

/// Walk parent links back to the root and return steps in execution order.
fn reconstruct<N>(arena: &[Entry<N>], goal: usize) -> Vec<PlanStep> {
    let mut steps = Vec::new();
    let mut cursor = arena.get(goal);
    while let Some(entry) = cursor {
        if let Some(step) = &entry.step {
            steps.push(step.clone());
        }
        cursor = entry.parent.and_then(|p| arena.get(p));
    }
    steps.reverse();
    steps
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use foundry_actions::ActionLibrary;

    use super::*;

    /// A counter that can be bumped by one or two; cost equals the bump.
    struct Counter {
        library: ActionLibrary,
        target: i64,
        limit: i64,
    }

    impl SearchSpace for Counter {
        type Node = i64;

        fn fingerprint(&self, node: &i64) -> Fingerprint {
            foundry_types::WorldState::new().with("n", *node).fingerprint()
        }

        fn is_goal(&self, node: &i64) -> bool {
            *node == self.target
        }

        fn successors<'s>(&'s self, node: &'s i64) -> impl Iterator<Item = Successor<'s, i64>> + 's {
            self.library.iter().filter_map(move |a| {
                let bump = i64::try_from(a.base_cost()).unwrap();
                let next = node.checked_add(bump)?;
                (next <= self.limit).then_some(Successor {
                    action: a,
                    node: next,
                    cost: a.base_cost(),
                })
            })
        }
    }

    fn counter(target: i64, limit: i64) -> Counter {
        Counter {
            library: ActionLibrary::new(vec![
                Action::state_change("one", 1),
                Action::state_change("two", 2),
            ])
            .unwrap(),
            target,
            limit,
        }
    }

    #[test]
    fn start_state_satisfying_goal_yields_empty_plan() {
        let plan = uniform_cost_search(&counter(0, 10), 0).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.total_cost, 0);
        assert_eq!(plan.stats.expanded, 0);
    }

    #[test]
    fn reaches_target_with_minimal_cost() {
        let plan = uniform_cost_search(&counter(5, 10), 0).unwrap();
        assert_eq!(plan.total_cost, 5);
        let summed: Cost = plan.steps.iter().map(|s| s.cost).sum();
        assert_eq!(summed, plan.total_cost);
    }

    #[test]
    fn equal_cost_ties_break_by_insertion_order() {
        // "two" from 0 records state 2 at cost 2 before "one" + "one" can,
        // and the later equal-cost path is not an improvement.
        let plan = uniform_cost_search(&counter(2, 10), 0).unwrap();
        assert_eq!(plan.action_names(), vec!["two"]);
    }

    #[test]
    fn exhausted_frontier_reports_not_found() {
        let result = uniform_cost_search(&counter(50, 10), 0);
        assert_eq!(result, Err(PlanError::NotFound { expanded: 11 }));
    }
}
