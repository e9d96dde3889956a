//! Breadth-first and depth-first search.
//!
//! Both walk the same state space and differ only in frontier order, so one
//! driver serves both through the [`Frontier`] trait.

use std::collections::VecDeque;

use alchemy_common::ElementId;
use tracing::trace;

use super::{StopReason, Traversal, TraversalOutcome};
use crate::path_state::{Discipline, Expansion, PathState};

/// Pending states of a linear traversal.
pub trait Frontier {
    /// How expanded ingredients are scheduled inside a state.
    const DISCIPLINE: Discipline;

    /// Adds the children of one state, in recipe order.
    fn push_children(&mut self, children: &mut Vec<PathState>);

    /// Takes the next state to visit.
    fn pop(&mut self) -> Option<PathState>;

    /// Number of pending states.
    fn len(&self) -> usize;

    /// Whether nothing is pending.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// FIFO frontier.
#[derive(Debug, Default)]
pub struct Queue(VecDeque<PathState>);

impl Frontier for Queue {
    const DISCIPLINE: Discipline = Discipline::Fifo;

    fn push_children(&mut self, children: &mut Vec<PathState>) {
        self.0.extend(children.drain(..));
    }

    fn pop(&mut self) -> Option<PathState> {
        self.0.pop_front()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// LIFO frontier. The first child ends up on top.
#[derive(Debug, Default)]
pub struct Stack(Vec<PathState>);

impl Frontier for Stack {
    const DISCIPLINE: Discipline = Discipline::Lifo;

    fn push_children(&mut self, children: &mut Vec<PathState>) {
        self.0.extend(children.drain(..).rev());
    }

    fn pop(&mut self) -> Option<PathState> {
        self.0.pop()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Breadth-first search from `target`.
#[must_use]
pub fn breadth_first(traversal: Traversal<'_>, target: ElementId) -> TraversalOutcome {
    explore(traversal, target, Queue::default())
}

/// Depth-first search from `target`, first recipe and first ingredient first.
#[must_use]
pub fn depth_first(traversal: Traversal<'_>, target: ElementId) -> TraversalOutcome {
    explore(traversal, target, Stack::default())
}

/// Drives any frontier until it drains, the cap is hit, or the run is stopped.
pub fn explore<F: Frontier>(
    mut traversal: Traversal<'_>,
    target: ElementId,
    mut frontier: F,
) -> TraversalOutcome {
    let index = traversal.index();
    if index.is_base(target) {
        return traversal.finish(StopReason::Exhausted);
    }

    let mut children = vec![PathState::root(target)];
    frontier.push_children(&mut children);

    while let Some(state) = frontier.pop() {
        if let Err(err) = traversal.visit() {
            return traversal.interrupt(&err);
        }
        let Some(element) = state.element() else {
            continue;
        };
        trace!(
            "Visiting {} at depth {} ({} pending)",
            index.name(element),
            state.depth(),
            frontier.len()
        );

        for recipe in index.recipes_for(element) {
            match state.expand(index, recipe, F::DISCIPLINE) {
                Expansion::Complete(decomposition) => {
                    if traversal.accept(decomposition) {
                        return traversal.finish(StopReason::CapReached);
                    }
                },
                Expansion::Partial(next) => children.push(next),
                Expansion::Discarded(reason) => {
                    trace!("Discarded {}: {:?}", index.format_step(&recipe.step()), reason);
                },
            }
        }
        frontier.push_children(&mut children);
    }

    traversal.finish(StopReason::Exhausted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{cyclic_entries, sample_entries, wide_entries};
    use crate::index::RecipeIndex;
    use crate::strategy::test_support::{run_all, signatures};
    use crate::strategy::{Algorithm, RecipeCountPolicy};

    fn steps_of(index: &RecipeIndex, outcome: &TraversalOutcome, which: usize) -> Vec<String> {
        outcome.decompositions[which].format_steps(index)
    }

    #[test]
    fn test_bfs_finds_steam() {
        let index = RecipeIndex::from_entries(sample_entries());
        let steam = index.lookup("Steam").expect("steam");

        let outcome = breadth_first(Traversal::new(&index, RecipeCountPolicy::Single), steam);
        assert_eq!(outcome.decompositions.len(), 1);
        assert_eq!(steps_of(&index, &outcome, 0), vec!["Steam = Water + Fire"]);
        assert_eq!(outcome.nodes_visited, 1);
        assert_eq!(outcome.stop, StopReason::CapReached);
    }

    #[test]
    fn test_base_target_visits_nothing() {
        let index = RecipeIndex::from_entries(sample_entries());
        let water = index.lookup("Water").expect("water");

        let outcome = depth_first(Traversal::new(&index, RecipeCountPolicy::All), water);
        assert!(outcome.decompositions.is_empty());
        assert_eq!(outcome.nodes_visited, 0);
    }

    #[test]
    fn test_bfs_prefers_shallow_decomposition() {
        let index = RecipeIndex::from_entries(wide_entries());
        let lava = index.lookup("Lava").expect("lava");

        let outcome = breadth_first(Traversal::new(&index, RecipeCountPolicy::Single), lava);
        assert_eq!(steps_of(&index, &outcome, 0), vec!["Lava = Earth + Fire"]);
    }

    #[test]
    fn test_bfs_and_dfs_order_second_result() {
        let index = RecipeIndex::from_entries(wide_entries());
        let lava = index.lookup("Lava").expect("lava");

        let bfs = breadth_first(Traversal::new(&index, RecipeCountPolicy::Limited(2)), lava);
        assert_eq!(
            steps_of(&index, &bfs, 1),
            vec!["Mud = Water + Earth", "Lava = Mud + Fire"]
        );

        let dfs = depth_first(Traversal::new(&index, RecipeCountPolicy::Limited(2)), lava);
        assert_eq!(
            steps_of(&index, &dfs, 1),
            vec![
                "Pressure = Air + Air",
                "Stone = Earth + Pressure",
                "Lava = Stone + Fire"
            ]
        );
    }

    #[test]
    fn test_limited_policy_caps_results() {
        let index = RecipeIndex::from_entries(wide_entries());
        let lava = index.lookup("Lava").expect("lava");

        let outcome = breadth_first(Traversal::new(&index, RecipeCountPolicy::Limited(2)), lava);
        assert_eq!(outcome.decompositions.len(), 2);
        assert_eq!(outcome.stop, StopReason::CapReached);
    }

    #[test]
    fn test_all_policies_agree_on_signature_set() {
        let index = RecipeIndex::from_entries(wide_entries());
        let bfs = run_all(&index, Algorithm::Bfs, "Lava");
        let dfs = run_all(&index, Algorithm::Dfs, "Lava");

        assert_eq!(bfs.stop, StopReason::Exhausted);
        assert_eq!(bfs.decompositions.len(), 3);
        assert_eq!(signatures(&bfs), signatures(&dfs));
    }

    #[test]
    fn test_cycles_terminate() {
        let index = RecipeIndex::from_entries(cyclic_entries());
        for algorithm in [Algorithm::Bfs, Algorithm::Dfs] {
            let outcome = run_all(&index, algorithm, "Egg");
            assert_eq!(outcome.stop, StopReason::Exhausted);
            assert_eq!(outcome.decompositions.len(), 1, "{algorithm}");
            assert!(outcome.decompositions[0].is_complete(&index));
        }
    }

    #[test]
    fn test_budget_stops_search() {
        let index = RecipeIndex::from_entries(wide_entries());
        let lava = index.lookup("Lava").expect("lava");

        let outcome = breadth_first(
            Traversal::new(&index, RecipeCountPolicy::All).with_budget(Some(1)),
            lava,
        );
        assert_eq!(outcome.stop, StopReason::BudgetExhausted);
        assert_eq!(outcome.nodes_visited, 1);
    }

    #[test]
    fn test_stack_pops_first_child_first() {
        let index = RecipeIndex::from_entries(sample_entries());
        let steam = index.lookup("Steam").expect("steam");
        let mud = index.lookup("Mud").expect("mud");

        let mut stack = Stack::default();
        stack.push_children(&mut vec![PathState::root(steam), PathState::root(mud)]);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop().and_then(|s| s.element()), Some(steam));

        let mut queue = Queue::default();
        queue.push_children(&mut vec![PathState::root(steam), PathState::root(mud)]);
        assert_eq!(queue.pop().and_then(|s| s.element()), Some(steam));
    }
}
