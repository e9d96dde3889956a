//! Search error types.
//!
//! None of these reach callers of `SearchEngine::search`; the facade folds
//! them into [`SearchStatus`](crate::search::SearchStatus).

use thiserror::Error;

/// Reasons a search could not run to completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Target not present in the dataset
    #[error("Unknown element: {0}")]
    UnknownElement(String),
    /// Cancellation was requested while the search was running
    #[error("Search cancelled after {visited} node visits")]
    Cancelled {
        /// Nodes visited before stopping
        visited: usize,
    },
    /// The configured node-visit budget ran out
    #[error("Node visit budget of {budget} exhausted")]
    BudgetExhausted {
        /// Configured budget
        budget: usize,
    },
}

/// Errors parsing algorithm and recipe-count names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Not one of BFS, DFS, Bidirectional
    #[error("Unknown algorithm: {0} (expected BFS, DFS or Bidirectional)")]
    UnknownAlgorithm(String),
    /// Not `single`, `all`, or a positive count
    #[error("Invalid recipe count: {0} (expected single, all or a positive number)")]
    InvalidPolicy(String),
}
