//! Per-branch search state.
//!
//! A [`PathState`] is a partial decomposition: the steps applied so far
//! (target first) and the elements still waiting for a recipe. Every open
//! element carries its own ancestor chain, the cycle guard for its branch.
//! Both the step path and the ancestor chains are persistent, so expanding a
//! state never copies its history.

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};
use alchemy_common::ElementId;

use crate::chain::Chain;
use crate::decomposition::Decomposition;
use crate::index::RecipeIndex;
use crate::recipe::{Recipe, Step};

/// Ancestor chain of an open element, the element itself included.
pub type Branch = Chain<ElementId>;

/// An element awaiting expansion, with the branch that reached it.
#[derive(Debug, Clone)]
pub struct OpenElement {
    /// Element to expand.
    pub element: ElementId,
    /// Elements from the target down to `element`.
    pub branch: Branch,
}

/// Order in which newly opened ingredients are scheduled inside a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    /// Ingredients queue behind the elements already open.
    Fifo,
    /// Ingredients go first, first ingredient ahead of second.
    Lifo,
}

/// Why an expansion produced no successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discard {
    /// Using the ingredient would make the decomposition cyclic.
    Cycle(ElementId),
    /// The recipe does not produce the state's current element.
    NotCurrent,
}

/// Result of applying one recipe to a state.
#[derive(Debug, Clone)]
pub enum Expansion {
    /// Every leaf is now a base element.
    Complete(Decomposition),
    /// Some elements are still open.
    Partial(PathState),
    /// The branch was dropped.
    Discarded(Discard),
}

impl Expansion {
    /// The successor state, if still partial.
    #[must_use]
    pub fn into_partial(self) -> Option<PathState> {
        match self {
            Self::Partial(state) => Some(state),
            _ => None,
        }
    }

    /// The finished decomposition, if complete.
    #[must_use]
    pub fn into_complete(self) -> Option<Decomposition> {
        match self {
            Self::Complete(decomposition) => Some(decomposition),
            _ => None,
        }
    }
}

/// Partial decomposition of a target.
#[derive(Debug, Clone)]
pub struct PathState {
    target: ElementId,
    path: Chain<Step>,
    open: VecDeque<OpenElement>,
}

impl PathState {
    /// Initial state: the target open on its own branch, no steps.
    #[must_use]
    pub fn root(target: ElementId) -> Self {
        let mut open = VecDeque::with_capacity(4);
        open.push_back(OpenElement {
            element: target,
            branch: Branch::new().push(target),
        });
        Self {
            target,
            path: Chain::new(),
            open,
        }
    }

    /// Target being decomposed.
    #[must_use]
    pub const fn target(&self) -> ElementId {
        self.target
    }

    /// Element expanded next.
    #[must_use]
    pub fn element(&self) -> Option<ElementId> {
        self.open.front().map(|open| open.element)
    }

    /// Branch of the element expanded next.
    #[must_use]
    pub fn on_branch(&self) -> Option<&Branch> {
        self.open.front().map(|open| &open.branch)
    }

    /// Steps applied so far, target first.
    #[must_use]
    pub fn steps(&self) -> Vec<Step> {
        self.path.to_vec()
    }

    /// Number of steps applied so far.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Elements still waiting for a recipe, in scheduling order.
    pub fn open_elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.open.iter().map(|open| open.element)
    }

    /// Moves an open element to the front. Returns false if it is not open.
    pub fn focus(&mut self, element: ElementId) -> bool {
        let Some(pos) = self.open.iter().position(|open| open.element == element) else {
            return false;
        };
        if let Some(open) = self.open.remove(pos) {
            self.open.push_front(open);
        }
        true
    }

    /// Applies `recipe` to the current element.
    ///
    /// Base ingredients become leaves. An ingredient already resolved or
    /// open elsewhere in this state is shared rather than expanded twice,
    /// unless sharing would close a cycle.
    #[must_use]
    pub fn expand(&self, index: &RecipeIndex, recipe: &Recipe, discipline: Discipline) -> Expansion {
        let mut open = self.open.clone();
        let current = match open.pop_front() {
            Some(current) if current.element == recipe.result => current,
            _ => return Expansion::Discarded(Discard::NotCurrent),
        };

        let step = recipe.step();
        let path = self.path.push(step);
        let mut fresh: Vec<OpenElement> = Vec::with_capacity(2);

        for (slot, ingredient) in step.ingredients().into_iter().enumerate() {
            if slot == 1 && ingredient == step.item1 {
                continue;
            }
            if index.is_base(ingredient) {
                continue;
            }
            if current.branch.contains(&ingredient) {
                return Expansion::Discarded(Discard::Cycle(ingredient));
            }

            let shared = open.iter().any(|o| o.element == ingredient)
                || path.iter().any(|s| s.result == ingredient);
            if shared {
                if reaches(&path, ingredient, step.result) {
                    return Expansion::Discarded(Discard::Cycle(ingredient));
                }
                continue;
            }

            fresh.push(OpenElement {
                element: ingredient,
                branch: current.branch.push(ingredient),
            });
        }

        match discipline {
            Discipline::Fifo => open.extend(fresh),
            Discipline::Lifo => {
                for entry in fresh.into_iter().rev() {
                    open.push_front(entry);
                }
            },
        }

        if open.is_empty() {
            Expansion::Complete(Decomposition::new(self.target, path.to_vec()))
        } else {
            Expansion::Partial(Self {
                target: self.target,
                path,
                open,
            })
        }
    }
}

/// Whether `to` is reachable from `from` through the steps of `path`.
fn reaches(path: &Chain<Step>, from: ElementId, to: ElementId) -> bool {
    let producers: AHashMap<ElementId, Step> = path.iter().map(|s| (s.result, *s)).collect();
    let mut stack = vec![from];
    let mut seen = AHashSet::new();

    while let Some(element) = stack.pop() {
        if element == to {
            return true;
        }
        if !seen.insert(element) {
            continue;
        }
        if let Some(step) = producers.get(&element) {
            stack.extend(step.ingredients());
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::RecipeEntry;

    fn index_of(entries: Vec<RecipeEntry>) -> RecipeIndex {
        RecipeIndex::from_entries(entries)
    }

    fn first_recipe<'a>(index: &'a RecipeIndex, name: &str) -> &'a Recipe {
        let id = index.lookup(name).expect("element");
        index.recipes_for(id).next().expect("recipe")
    }

    #[test]
    fn test_root_state() {
        let state = PathState::root(ElementId::new(3));
        assert_eq!(state.element(), Some(ElementId::new(3)));
        assert_eq!(state.depth(), 0);
        assert!(state
            .on_branch()
            .expect("branch")
            .contains(&ElementId::new(3)));
    }

    #[test]
    fn test_expand_to_base_completes() {
        let index = index_of(vec![RecipeEntry::new("Steam", "Water", "Fire")]);
        let steam = index.lookup("Steam").expect("steam");
        let state = PathState::root(steam);

        match state.expand(&index, first_recipe(&index, "Steam"), Discipline::Fifo) {
            Expansion::Complete(decomposition) => {
                assert_eq!(decomposition.target(), steam);
                assert_eq!(decomposition.len(), 1);
            },
            other => panic!("expected complete, got {other:?}"),
        }
    }

    #[test]
    fn test_expand_opens_non_base_ingredients() {
        let index = index_of(vec![
            RecipeEntry::new("Geyser", "Steam", "Earth"),
            RecipeEntry::new("Steam", "Water", "Fire"),
        ]);
        let geyser = index.lookup("Geyser").expect("geyser");

        let Expansion::Partial(state) =
            PathState::root(geyser).expand(&index, first_recipe(&index, "Geyser"), Discipline::Fifo)
        else {
            panic!("expected partial");
        };
        assert_eq!(state.element(), index.lookup("Steam"));
        assert_eq!(state.depth(), 1);

        let Expansion::Complete(decomposition) =
            state.expand(&index, first_recipe(&index, "Steam"), Discipline::Fifo)
        else {
            panic!("expected complete");
        };
        assert_eq!(decomposition.len(), 2);
        assert_eq!(decomposition.steps()[0].result, geyser);
    }

    #[test]
    fn test_lifo_schedules_first_ingredient_first() {
        let index = index_of(vec![
            RecipeEntry::new("Life", "Swamp", "Energy"),
            RecipeEntry::new("Swamp", "Mud", "Grass"),
            RecipeEntry::new("Energy", "Fire", "Fire"),
            RecipeEntry::new("Mud", "Water", "Earth"),
            RecipeEntry::new("Grass", "Earth", "Water"),
        ]);
        let life = index.lookup("Life").expect("life");

        let Expansion::Partial(state) =
            PathState::root(life).expand(&index, first_recipe(&index, "Life"), Discipline::Lifo)
        else {
            panic!("expected partial");
        };
        let open: Vec<&str> = state.open_elements().map(|e| index.name(e)).collect();
        assert_eq!(open, vec!["Swamp", "Energy"]);

        let Expansion::Partial(state) =
            state.expand(&index, first_recipe(&index, "Swamp"), Discipline::Lifo)
        else {
            panic!("expected partial");
        };
        let open: Vec<&str> = state.open_elements().map(|e| index.name(e)).collect();
        assert_eq!(open, vec!["Mud", "Grass", "Energy"]);

        let Expansion::Partial(fifo) = PathState::root(life)
            .expand(&index, first_recipe(&index, "Life"), Discipline::Fifo)
            .into_partial()
            .expect("partial")
            .expand(&index, first_recipe(&index, "Swamp"), Discipline::Fifo)
        else {
            panic!("expected partial");
        };
        let open: Vec<&str> = fifo.open_elements().map(|e| index.name(e)).collect();
        assert_eq!(open, vec!["Energy", "Mud", "Grass"]);
    }

    #[test]
    fn test_direct_cycle_is_discarded() {
        let index = index_of(vec![
            RecipeEntry::new("Egg", "Chicken", "Water"),
            RecipeEntry::new("Chicken", "Egg", "Air"),
        ]);
        let egg = index.lookup("Egg").expect("egg");
        let chicken = index.lookup("Chicken").expect("chicken");

        let Expansion::Partial(state) =
            PathState::root(egg).expand(&index, first_recipe(&index, "Egg"), Discipline::Fifo)
        else {
            panic!("expected partial");
        };
        let result = state.expand(&index, first_recipe(&index, "Chicken"), Discipline::Fifo);
        assert!(matches!(result, Expansion::Discarded(Discard::Cycle(e)) if e == egg));
        assert_eq!(state.element(), Some(chicken));
    }

    #[test]
    fn test_shared_ingredient_is_expanded_once() {
        let index = index_of(vec![
            RecipeEntry::new("Brick", "Mud", "Fire"),
            RecipeEntry::new("Wall", "Brick", "Brick"),
            RecipeEntry::new("House", "Wall", "Mud"),
            RecipeEntry::new("Mud", "Water", "Earth"),
        ]);
        let house = index.lookup("House").expect("house");

        let mut state = PathState::root(house);
        let mut done = None;
        for _ in 0..8 {
            let element = state.element().expect("open element");
            let recipe = index.recipes_for(element).next().expect("recipe");
            match state.expand(&index, recipe, Discipline::Fifo) {
                Expansion::Partial(next) => state = next,
                Expansion::Complete(d) => {
                    done = Some(d);
                    break;
                },
                Expansion::Discarded(reason) => panic!("unexpected discard {reason:?}"),
            }
        }
        let decomposition = done.expect("complete");
        // House, Wall, Mud, Brick: Mud is shared by House and Brick.
        assert_eq!(decomposition.len(), 4);
    }

    #[test]
    fn test_shared_reference_cycle_is_discarded() {
        // Top needs A and B; A needs B; B needs A. A and B are siblings, so
        // the ancestor chain alone cannot see the loop.
        let index = index_of(vec![
            RecipeEntry::new("Top", "A", "B"),
            RecipeEntry::new("A", "B", "Water"),
            RecipeEntry::new("B", "A", "Fire"),
        ]);
        let top = index.lookup("Top").expect("top");

        let state = PathState::root(top)
            .expand(&index, first_recipe(&index, "Top"), Discipline::Fifo)
            .into_partial()
            .expect("partial");
        let state = state
            .expand(&index, first_recipe(&index, "A"), Discipline::Fifo)
            .into_partial()
            .expect("partial");
        let result = state.expand(&index, first_recipe(&index, "B"), Discipline::Fifo);
        assert!(matches!(result, Expansion::Discarded(Discard::Cycle(_))));
    }

    #[test]
    fn test_wrong_recipe_is_rejected() {
        let index = index_of(vec![
            RecipeEntry::new("Steam", "Water", "Fire"),
            RecipeEntry::new("Mud", "Water", "Earth"),
        ]);
        let steam = index.lookup("Steam").expect("steam");
        let result = PathState::root(steam).expand(&index, first_recipe(&index, "Mud"), Discipline::Fifo);
        assert!(matches!(result, Expansion::Discarded(Discard::NotCurrent)));
    }

    #[test]
    fn test_focus_reorders_open_elements() {
        let index = index_of(vec![
            RecipeEntry::new("Life", "Swamp", "Energy"),
            RecipeEntry::new("Swamp", "Mud", "Grass"),
            RecipeEntry::new("Energy", "Fire", "Fire"),
        ]);
        let life = index.lookup("Life").expect("life");
        let energy = index.lookup("Energy").expect("energy");
        let mut state = PathState::root(life)
            .expand(&index, first_recipe(&index, "Life"), Discipline::Fifo)
            .into_partial()
            .expect("partial");

        assert!(state.focus(energy));
        assert_eq!(state.element(), Some(energy));
        assert!(!state.focus(life));
    }
}
