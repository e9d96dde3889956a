//! Read-only lookup over the combination table.
//!
//! The index is built once from a [`RecipeSource`] and never mutated again,
//! so any number of searches may share it without locking.

use ahash::{AHashMap, AHashSet};
use alchemy_common::{ElementId, RecipeId};
use tracing::{debug, info, warn};

use crate::error::SearchError;
use crate::recipe::{Recipe, RecipeEntry, RecipeSource, Step};

/// Counters gathered while building an index.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    /// Rows read from the source.
    pub rows_read: usize,
    /// Rows skipped because one ingredient was missing.
    pub malformed_skipped: usize,
    /// Rows skipped because they repeated an earlier recipe exactly.
    pub duplicates_skipped: usize,
}

/// Immutable index over elements and recipes.
#[derive(Debug, Default)]
pub struct RecipeIndex {
    /// Element names by id.
    names: Vec<String>,
    /// Element ids by name (case-sensitive).
    ids: AHashMap<String, ElementId>,
    /// Recipes in insertion order.
    recipes: Vec<Recipe>,
    /// Recipes producing each element.
    producing: Vec<Vec<RecipeId>>,
    /// Recipes using each element as an ingredient.
    using: Vec<Vec<RecipeId>>,
    /// Elements with no producing recipe, in id order.
    base: Vec<ElementId>,
    /// Build statistics.
    stats: IndexStats,
}

impl RecipeIndex {
    /// Builds an index from a dataset provider.
    pub fn build<S: RecipeSource + ?Sized>(source: &S) -> Self {
        Self::from_entries(source.all_recipes())
    }

    /// Builds an index from rows in dataset insertion order.
    ///
    /// Malformed rows are skipped; their result still becomes a known element.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = RecipeEntry>,
    {
        let mut index = Self::default();
        let mut seen: AHashSet<(ElementId, ElementId, ElementId)> = AHashSet::new();

        for entry in entries {
            index.stats.rows_read += 1;

            if entry.result.is_empty() {
                debug!("Skipping row {} with empty result", index.stats.rows_read);
                index.stats.malformed_skipped += 1;
                continue;
            }

            let result = index.intern(&entry.result);

            if entry.is_declaration() {
                continue;
            }

            let Some((item1, item2)) = entry.ingredients() else {
                debug!(
                    "Skipping malformed recipe for {:?}: item1={:?}, item2={:?}",
                    entry.result, entry.item1, entry.item2
                );
                index.stats.malformed_skipped += 1;
                continue;
            };

            let item1 = index.intern(item1);
            let item2 = index.intern(item2);

            if !seen.insert((result, item1, item2)) {
                index.stats.duplicates_skipped += 1;
                continue;
            }

            let id = RecipeId::new(index.recipes.len() as u32);
            index.recipes.push(Recipe {
                id,
                result,
                item1,
                item2,
            });
            index.producing[result.index()].push(id);
            index.using[item1.index()].push(id);
            if item2 != item1 {
                index.using[item2.index()].push(id);
            }
        }

        index.base = (0..index.names.len())
            .map(|i| ElementId::new(i as u32))
            .filter(|id| index.producing[id.index()].is_empty())
            .collect();

        if index.stats.malformed_skipped > 0 {
            warn!(
                "Skipped {} malformed recipe rows",
                index.stats.malformed_skipped
            );
        }
        info!(
            "Indexed {} recipes over {} elements ({} base)",
            index.recipes.len(),
            index.names.len(),
            index.base.len()
        );

        index
    }

    fn intern(&mut self, name: &str) -> ElementId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = ElementId::new(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        self.producing.push(Vec::new());
        self.using.push(Vec::new());
        id
    }

    // ------------------------------------------------------------------------
    // Element lookup
    // ------------------------------------------------------------------------

    /// Resolves a name to its id.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ElementId> {
        self.ids.get(name).copied()
    }

    /// Resolves a name, failing with `UnknownElement`.
    pub fn require(&self, name: &str) -> Result<ElementId, SearchError> {
        self.lookup(name)
            .ok_or_else(|| SearchError::UnknownElement(name.to_string()))
    }

    /// Whether `name` is a member of the dataset.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    /// Name of an element.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this index.
    #[must_use]
    pub fn name(&self, id: ElementId) -> &str {
        &self.names[id.index()]
    }

    /// All known elements in id order.
    pub fn all_elements(&self) -> impl ExactSizeIterator<Item = ElementId> + '_ {
        (0..self.names.len()).map(|i| ElementId::new(i as u32))
    }

    /// Base elements (no producing recipe) in id order.
    #[must_use]
    pub fn base_elements(&self) -> &[ElementId] {
        &self.base
    }

    /// Whether an element has no producing recipe.
    #[must_use]
    pub fn is_base(&self, element: ElementId) -> bool {
        self.producing
            .get(element.index())
            .is_some_and(Vec::is_empty)
    }

    /// Base check by name. Unknown names are an error, not "base".
    pub fn is_base_name(&self, name: &str) -> Result<bool, SearchError> {
        self.require(name).map(|id| self.is_base(id))
    }

    // ------------------------------------------------------------------------
    // Recipe lookup
    // ------------------------------------------------------------------------

    /// Recipe by id.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this index.
    #[must_use]
    pub fn recipe(&self, id: RecipeId) -> &Recipe {
        &self.recipes[id.index()]
    }

    /// All recipes in insertion order.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Recipes producing `element`, in insertion order.
    pub fn recipes_for(&self, element: ElementId) -> impl Iterator<Item = &Recipe> + '_ {
        self.producing
            .get(element.index())
            .into_iter()
            .flatten()
            .map(|id| &self.recipes[id.index()])
    }

    /// Recipes producing the named element. Empty if the name is unknown.
    #[must_use]
    pub fn recipes_for_name(&self, name: &str) -> Vec<&Recipe> {
        self.lookup(name)
            .map(|id| self.recipes_for(id).collect())
            .unwrap_or_default()
    }

    /// Recipes that take `element` as either ingredient, in insertion order.
    pub fn recipes_using(&self, element: ElementId) -> impl Iterator<Item = &Recipe> + '_ {
        self.using
            .get(element.index())
            .into_iter()
            .flatten()
            .map(|id| &self.recipes[id.index()])
    }

    /// Distinct elements that can be made with `element`, first use first.
    #[must_use]
    pub fn products_of(&self, element: ElementId) -> Vec<ElementId> {
        let mut seen = AHashSet::new();
        self.recipes_using(element)
            .map(|recipe| recipe.result)
            .filter(|result| seen.insert(*result))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Presentation helpers
    // ------------------------------------------------------------------------

    /// Formats a step as `Result = Item1 + Item2`.
    #[must_use]
    pub fn format_step(&self, step: &Step) -> String {
        format!(
            "{} = {} + {}",
            self.name(step.result),
            self.name(step.item1),
            self.name(step.item2)
        )
    }

    /// Number of known elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.names.len()
    }

    /// Number of distinct recipes.
    #[must_use]
    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    /// Counters gathered while building.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    /// Whether the index holds no elements at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolves a list of names, dropping and logging unknown ones.
    pub(crate) fn resolve_names<'a, I>(&self, names: I, purpose: &str) -> Vec<ElementId>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter_map(|name| {
                let id = self.lookup(name);
                if id.is_none() {
                    warn!("Ignoring unknown {purpose} element {name:?}");
                }
                id
            })
            .collect()
    }
}
