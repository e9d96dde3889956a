//! ID types for interned elements and recipes.
//!
//! Element names are interned once when the recipe index is built; the
//! search code only ever handles these compact handles.

use serde::{Deserialize, Serialize};

/// Interned identifier for an element of the combination table.
///
/// Ids are dense: the n-th distinct name seen while indexing gets id `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(u32);

impl ElementId {
    /// Creates an element ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the ID as a slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for a recipe, its position in dataset insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecipeId(u32);

impl RecipeId {
    /// Creates a recipe ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the ID as a slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_roundtrip_raw() {
        assert_eq!(ElementId::new(7).raw(), 7);
        assert_eq!(RecipeId::new(3).index(), 3);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&ElementId::new(42)).expect("serialize");
        assert_eq!(json, "42");
        let back: RecipeId = serde_json::from_str("9").expect("deserialize");
        assert_eq!(back, RecipeId::new(9));
    }
}
