//! Recipe trees for presentation.
//!
//! A tree mirrors a decomposition: a produced element has two children, its
//! ingredients, and a base element is a leaf. Each node also lists the steps
//! of its own subtree, base to target.

use ahash::{AHashMap, AHashSet};
use alchemy_common::ElementId;
use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::decomposition::Decomposition;
use crate::icons::IconLookup;
use crate::index::RecipeIndex;
use crate::recipe::Step;

/// One node of a recipe tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeTree {
    /// Element name.
    pub name: String,
    /// Icon reference, when an icon lookup was attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Ingredient subtrees, item1 first. Empty for leaves.
    #[serde(default)]
    pub children: Vec<RecipeTree>,
    /// Steps of this subtree as `Result = Item1 + Item2`, base to target.
    #[serde(default)]
    pub recipe_steps: Vec<String>,
}

impl RecipeTree {
    /// Creates a childless node.
    #[must_use]
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: None,
            children: Vec::new(),
            recipe_steps: Vec::new(),
        }
    }

    /// Whether the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Longest root-to-leaf path, counted in nodes.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }

    /// Leaf names, left to right.
    #[must_use]
    pub fn leaf_names(&self) -> Vec<&str> {
        if self.is_leaf() {
            return vec![self.name.as_str()];
        }
        self.children.iter().flat_map(Self::leaf_names).collect()
    }

    /// Fills `image` on every node the lookup knows.
    pub fn attach_icons<L: IconLookup + ?Sized>(&mut self, icons: &L) {
        self.image = icons.icon_for(&self.name).map(str::to_string);
        for child in &mut self.children {
            child.attach_icons(icons);
        }
    }
}

/// Builds [`RecipeTree`]s from step sets.
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder<'a> {
    index: &'a RecipeIndex,
}

impl<'a> TreeBuilder<'a> {
    /// Creates a builder naming elements through `index`.
    #[must_use]
    pub fn new(index: &'a RecipeIndex) -> Self {
        Self { index }
    }

    /// Builds the tree for `target` from `steps`.
    ///
    /// When several steps produce the same element the first one wins. An
    /// element already expanded on the current branch becomes a leaf, so
    /// inconsistent or cyclic step sets still terminate.
    #[must_use]
    pub fn build(&self, target: ElementId, steps: &[Step]) -> RecipeTree {
        let mut producers: AHashMap<ElementId, Step> = AHashMap::with_capacity(steps.len());
        for step in steps {
            producers.entry(step.result).or_insert(*step);
        }
        self.node(target, &producers, &Chain::new()).0
    }

    /// Builds the tree of one decomposition.
    #[must_use]
    pub fn build_decomposition(&self, decomposition: &Decomposition) -> RecipeTree {
        self.build(decomposition.target(), decomposition.steps())
    }

    /// Builds one tree from the union of several decompositions' steps.
    #[must_use]
    pub fn build_merged(&self, target: ElementId, decompositions: &[Decomposition]) -> RecipeTree {
        let mut seen = AHashSet::new();
        let merged: Vec<Step> = decompositions
            .iter()
            .flat_map(Decomposition::steps)
            .filter(|step| seen.insert(**step))
            .copied()
            .collect();
        self.build(target, &merged)
    }

    /// Fallback tree when no decomposition was found: a base target alone,
    /// otherwise the target over the unexpanded ingredients of its first recipe.
    #[must_use]
    pub fn default_tree(&self, target: ElementId) -> RecipeTree {
        let mut tree = RecipeTree::leaf(self.index.name(target));
        if let Some(recipe) = self.index.recipes_for(target).next() {
            tree.children = recipe
                .ingredients()
                .into_iter()
                .map(|e| RecipeTree::leaf(self.index.name(e)))
                .collect();
        }
        tree
    }

    fn node(
        &self,
        element: ElementId,
        producers: &AHashMap<ElementId, Step>,
        ancestors: &Chain<ElementId>,
    ) -> (RecipeTree, Vec<Step>) {
        let mut tree = RecipeTree::leaf(self.index.name(element));
        let Some(step) = producers.get(&element) else {
            return (tree, Vec::new());
        };
        if ancestors.contains(&element) {
            return (tree, Vec::new());
        }

        let branch = ancestors.push(element);
        let mut seen = AHashSet::new();
        let mut subtree_steps = Vec::new();
        for ingredient in step.ingredients() {
            let (child, child_steps) = self.node(ingredient, producers, &branch);
            subtree_steps.extend(child_steps.into_iter().filter(|s| seen.insert(*s)));
            tree.children.push(child);
        }
        if seen.insert(*step) {
            subtree_steps.push(*step);
        }

        tree.recipe_steps = subtree_steps
            .iter()
            .map(|s| self.index.format_step(s))
            .collect();
        (tree, subtree_steps)
    }
}
