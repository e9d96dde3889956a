//! Recipe definitions and data structures.
//!
//! This module provides:
//! - Raw dataset rows as handed over by a dataset provider
//! - The [`RecipeSource`] seam the index is built from
//! - Interned recipes and search steps

use alchemy_common::{ElementId, RecipeId};
use serde::{Deserialize, Serialize};

// ============================================================================
// Dataset rows
// ============================================================================

/// One row of the combination table: `result = item1 + item2`.
///
/// A row with both ingredients absent declares `result` as an element without
/// adding a recipe. A row with exactly one ingredient absent is malformed and
/// skipped by index construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeEntry {
    /// Element produced.
    pub result: String,
    /// First ingredient.
    #[serde(default)]
    pub item1: Option<String>,
    /// Second ingredient.
    #[serde(default)]
    pub item2: Option<String>,
}

impl RecipeEntry {
    /// Creates a complete combination row.
    #[must_use]
    pub fn new(
        result: impl Into<String>,
        item1: impl Into<String>,
        item2: impl Into<String>,
    ) -> Self {
        Self {
            result: result.into(),
            item1: Some(item1.into()),
            item2: Some(item2.into()),
        }
    }

    /// Creates a row declaring a base element.
    #[must_use]
    pub fn base(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            item1: None,
            item2: None,
        }
    }

    /// Returns both ingredients if the row is a complete combination.
    #[must_use]
    pub fn ingredients(&self) -> Option<(&str, &str)> {
        match (self.item1.as_deref(), self.item2.as_deref()) {
            (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => Some((a, b)),
            _ => None,
        }
    }

    /// Whether the row only declares its result.
    #[must_use]
    pub fn is_declaration(&self) -> bool {
        let blank = |item: &Option<String>| item.as_deref().map_or(true, str::is_empty);
        blank(&self.item1) && blank(&self.item2)
    }
}

/// Provider of the combination table, read once to build a `RecipeIndex`.
pub trait RecipeSource {
    /// All rows in dataset insertion order.
    fn all_recipes(&self) -> Vec<RecipeEntry>;
}

impl RecipeSource for [RecipeEntry] {
    fn all_recipes(&self) -> Vec<RecipeEntry> {
        self.to_vec()
    }
}

impl RecipeSource for Vec<RecipeEntry> {
    fn all_recipes(&self) -> Vec<RecipeEntry> {
        self.clone()
    }
}

// ============================================================================
// Interned recipes
// ============================================================================

/// A two-ingredient combination rule over interned elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Recipe {
    /// Position in dataset insertion order.
    pub id: RecipeId,
    /// Element produced.
    pub result: ElementId,
    /// First ingredient.
    pub item1: ElementId,
    /// Second ingredient.
    pub item2: ElementId,
}

impl Recipe {
    /// Both ingredients, in order.
    #[must_use]
    pub const fn ingredients(&self) -> [ElementId; 2] {
        [self.item1, self.item2]
    }

    /// Whether `element` is one of the ingredients.
    #[must_use]
    pub fn uses(&self, element: ElementId) -> bool {
        self.item1 == element || self.item2 == element
    }

    /// The step recorded when this recipe expands its result.
    #[must_use]
    pub const fn step(&self) -> Step {
        Step {
            result: self.result,
            item1: self.item1,
            item2: self.item2,
        }
    }
}

/// One applied recipe recorded during a search.
///
/// Ordering is by (result, item1, item2) and only serves canonical
/// signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Step {
    /// Element that was expanded.
    pub result: ElementId,
    /// First ingredient.
    pub item1: ElementId,
    /// Second ingredient.
    pub item2: ElementId,
}

impl Step {
    /// Both ingredients, in order.
    #[must_use]
    pub const fn ingredients(&self) -> [ElementId; 2] {
        [self.item1, self.item2]
    }
}

impl From<&Recipe> for Step {
    fn from(recipe: &Recipe) -> Self {
        recipe.step()
    }
}
