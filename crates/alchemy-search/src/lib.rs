//! # Alchemy Search
//!
//! Recipe decomposition search for little-alchemy style datasets.
//!
//! This crate provides:
//! - An immutable index over the combination table
//! - Per-branch search state with persistent history
//! - Breadth-first, depth-first, and bidirectional traversal
//! - Decomposition deduplication and recipe-count policies
//! - Recipe tree construction for presentation
//! - The [`SearchEngine`] facade callers go through

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod cancel;
pub mod chain;
pub mod config;
pub mod decomposition;
pub mod dedup;
pub mod error;
pub mod icons;
pub mod index;
pub mod path_state;
pub mod recipe;
pub mod search;
pub mod strategy;
pub mod tree;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cancel::*;
    pub use crate::config::*;
    pub use crate::decomposition::*;
    pub use crate::dedup::*;
    pub use crate::error::*;
    pub use crate::icons::*;
    pub use crate::index::*;
    pub use crate::path_state::*;
    pub use crate::recipe::*;
    pub use crate::search::*;
    pub use crate::strategy::{
        Algorithm, RecipeCountPolicy, StopReason, Traversal, TraversalOutcome,
    };
    pub use crate::tree::*;
}

pub use prelude::*;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_from_prelude() {
        let index = RecipeIndex::from_entries(fixtures::sample_entries());
        let engine = SearchEngine::new(index, SearchConfig::default());
        let result = engine.search("Steam", Algorithm::Dfs, RecipeCountPolicy::Single);
        assert!(result.found());
        assert_eq!(engine.seeds().len(), 4);
    }
}
