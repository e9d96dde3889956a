//! Bidirectional search.
//!
//! The forward side is a breadth-first walk over partial decompositions of
//! the target. The backward side grows a table of elements buildable from
//! the seed set, each with the recipe that first made it buildable. When a
//! forward state reaches an element the backward side has visited, the
//! table supplies recipes for every open element it knows and the state is
//! spliced toward completion.

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};
use alchemy_common::{ElementId, RecipeId};
use tracing::{debug, trace};

use super::{StopReason, Traversal, TraversalOutcome};
use crate::index::RecipeIndex;
use crate::path_state::{Discipline, Expansion, PathState};

/// Backward half: what can be built from the seeds, and how.
#[derive(Debug)]
pub struct BackwardSearch<'a> {
    index: &'a RecipeIndex,
    queue: VecDeque<ElementId>,
    /// Buildable elements. Seeds map to `None`.
    resolved: AHashMap<ElementId, Option<RecipeId>>,
    visited: AHashSet<ElementId>,
}

impl<'a> BackwardSearch<'a> {
    /// Starts from `seeds`. Repeated seeds are ignored.
    #[must_use]
    pub fn new(index: &'a RecipeIndex, seeds: &[ElementId]) -> Self {
        let mut resolved = AHashMap::with_capacity(seeds.len());
        let mut queue = VecDeque::with_capacity(seeds.len());
        for &seed in seeds {
            if resolved.insert(seed, None).is_none() {
                queue.push_back(seed);
            }
        }
        Self {
            index,
            queue,
            resolved,
            visited: AHashSet::new(),
        }
    }

    /// Visits the next buildable element and resolves every product whose
    /// ingredients are now both buildable.
    pub fn pop(&mut self) -> Option<ElementId> {
        let element = self.queue.pop_front()?;
        self.visited.insert(element);

        for recipe in self.index.recipes_using(element) {
            if self.resolved.contains_key(&recipe.result) {
                continue;
            }
            if self.resolved.contains_key(&recipe.item1) && self.resolved.contains_key(&recipe.item2)
            {
                self.resolved.insert(recipe.result, Some(recipe.id));
                self.queue.push_back(recipe.result);
            }
        }
        Some(element)
    }

    /// Whether the backward side has popped `element`.
    #[must_use]
    pub fn has_visited(&self, element: ElementId) -> bool {
        self.visited.contains(&element)
    }

    /// Whether nothing is left to visit.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }

    /// Recipe that made `element` buildable. `None` for seeds and unknowns.
    #[must_use]
    pub fn recipe_for(&self, element: ElementId) -> Option<RecipeId> {
        self.resolved.get(&element).copied().flatten()
    }

    /// Resolves every open element the table covers.
    ///
    /// Returns `Partial` when some open element is not yet buildable.
    #[must_use]
    pub fn splice(&self, mut state: PathState) -> Expansion {
        loop {
            let next = state
                .open_elements()
                .find_map(|element| self.recipe_for(element).map(|recipe| (element, recipe)));
            let Some((element, recipe)) = next else {
                return Expansion::Partial(state);
            };

            state.focus(element);
            match state.expand(self.index, self.index.recipe(recipe), Discipline::Fifo) {
                Expansion::Partial(next) => state = next,
                finished => return finished,
            }
        }
    }
}

/// Bidirectional search for `target`, growing backward from `seeds`.
///
/// With no usable seeds the backward side is empty and the search behaves
/// like a breadth-first one.
#[must_use]
pub fn bidirectional(
    mut traversal: Traversal<'_>,
    target: ElementId,
    seeds: &[ElementId],
) -> TraversalOutcome {
    let index = traversal.index();
    if index.is_base(target) {
        return traversal.finish(StopReason::Exhausted);
    }

    let mut backward = BackwardSearch::new(index, seeds);
    let mut forward = VecDeque::from([PathState::root(target)]);
    let mut parked: AHashMap<ElementId, Vec<PathState>> = AHashMap::new();
    let mut meetings = 0usize;

    while !forward.is_empty() || !backward.is_exhausted() {
        if let Some(state) = forward.pop_front() {
            if let Err(err) = traversal.visit() {
                return traversal.interrupt(&err);
            }
            if let Some(element) = state.element() {
                if backward.has_visited(element) {
                    meetings += 1;
                    trace!("Frontiers meet at {}", index.name(element));
                    if meet(&mut traversal, &backward, state, &mut forward) {
                        return finish_met(traversal, meetings);
                    }
                } else {
                    for recipe in index.recipes_for(element) {
                        match state.expand(index, recipe, Discipline::Fifo) {
                            Expansion::Complete(decomposition) => {
                                if traversal.accept(decomposition) {
                                    return finish_met(traversal, meetings);
                                }
                            },
                            Expansion::Partial(next) => forward.push_back(next),
                            Expansion::Discarded(reason) => {
                                trace!("Discarded {}: {:?}", index.format_step(&recipe.step()), reason);
                            },
                        }
                    }
                    parked.entry(element).or_default().push(state);
                }
            }
        }

        if backward.is_exhausted() {
            continue;
        }
        if let Err(err) = traversal.visit() {
            return traversal.interrupt(&err);
        }
        if let Some(element) = backward.pop() {
            if let Some(states) = parked.remove(&element) {
                meetings += 1;
                trace!(
                    "Backward side reached {} with {} parked states",
                    index.name(element),
                    states.len()
                );
                for state in states {
                    if meet(&mut traversal, &backward, state, &mut forward) {
                        return finish_met(traversal, meetings);
                    }
                }
            }
        }
    }

    debug!("Bidirectional search exhausted with {meetings} meetings");
    traversal.finish(StopReason::Exhausted)
}

/// Splices a state at a meeting point. Returns true once the cap is reached.
fn meet(
    traversal: &mut Traversal<'_>,
    backward: &BackwardSearch<'_>,
    state: PathState,
    forward: &mut VecDeque<PathState>,
) -> bool {
    match backward.splice(state) {
        Expansion::Complete(decomposition) => traversal.accept(decomposition),
        Expansion::Partial(next) => {
            forward.push_back(next);
            false
        },
        Expansion::Discarded(reason) => {
            trace!("Splice discarded: {:?}", reason);
            false
        },
    }
}

fn finish_met(traversal: Traversal<'_>, meetings: usize) -> TraversalOutcome {
    debug!("Bidirectional search reached its cap after {meetings} meetings");
    traversal.finish(StopReason::CapReached)
}
