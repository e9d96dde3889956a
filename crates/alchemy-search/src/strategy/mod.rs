//! Traversal strategies.
//!
//! This module provides:
//! - The algorithm and recipe-count selectors callers pass to a search
//! - [`Traversal`], the per-call bookkeeping every strategy shares
//!   (visit counter, cancellation, visit budget, accepted decompositions)
//! - Breadth-first and depth-first search in [`linear`]
//! - Bidirectional search in [`bidirectional`]

pub mod bidirectional;
pub mod linear;

use std::fmt;
use std::str::FromStr;

use alchemy_common::ElementId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cancel::CancellationToken;
use crate::decomposition::Decomposition;
use crate::dedup::Deduplicator;
use crate::error::{ParseError, SearchError};
use crate::index::RecipeIndex;

pub use bidirectional::bidirectional;
pub use linear::{breadth_first, depth_first};

// ============================================================================
// Selectors
// ============================================================================

/// Search algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Algorithm {
    /// Breadth-first: FIFO frontier.
    #[default]
    #[serde(rename = "BFS", alias = "bfs")]
    Bfs,
    /// Depth-first: LIFO frontier, first ingredient explored first.
    #[serde(rename = "DFS", alias = "dfs")]
    Dfs,
    /// Forward from the target and backward from the seed set at once.
    #[serde(rename = "Bidirectional", alias = "bidirectional")]
    Bidirectional,
}

impl Algorithm {
    /// Get display name for this algorithm.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Bfs => "BFS",
            Self::Dfs => "DFS",
            Self::Bidirectional => "Bidirectional",
        }
    }

    /// Get all algorithms.
    #[must_use]
    pub fn all() -> &'static [Algorithm] {
        &[Self::Bfs, Self::Dfs, Self::Bidirectional]
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Algorithm {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" | "breadth-first" => Ok(Self::Bfs),
            "dfs" | "depth-first" => Ok(Self::Dfs),
            "bidirectional" | "bidi" => Ok(Self::Bidirectional),
            _ => Err(ParseError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// How many decompositions a search should accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeCountPolicy {
    /// Stop at the first accepted decomposition.
    #[default]
    Single,
    /// Stop after `n` accepted decompositions. `Limited(0)` acts as `Limited(1)`.
    Limited(usize),
    /// Run until the frontier is exhausted.
    All,
}

impl RecipeCountPolicy {
    /// Maximum number of decompositions, `None` for unlimited.
    #[must_use]
    pub fn cap(self) -> Option<usize> {
        match self {
            Self::Single => Some(1),
            Self::Limited(n) => Some(n.max(1)),
            Self::All => None,
        }
    }
}

impl fmt::Display for RecipeCountPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Limited(n) => write!(f, "limited({n})"),
            Self::All => f.write_str("all"),
        }
    }
}

impl FromStr for RecipeCountPolicy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let count = lower
            .strip_prefix("limit:")
            .or_else(|| lower.strip_prefix("limited:"))
            .unwrap_or(&lower);
        match count {
            "single" | "one" => Ok(Self::Single),
            "all" => Ok(Self::All),
            n => match n.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Self::Limited(n)),
                _ => Err(ParseError::InvalidPolicy(s.to_string())),
            },
        }
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Why a traversal stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every frontier ran dry.
    Exhausted,
    /// The recipe-count cap was reached.
    CapReached,
    /// The cancellation token fired.
    Cancelled,
    /// The node-visit budget ran out.
    BudgetExhausted,
}

/// What a strategy hands back to the facade.
#[derive(Debug, Clone)]
pub struct TraversalOutcome {
    /// Accepted decompositions in discovery order.
    pub decompositions: Vec<Decomposition>,
    /// Frontier pops across all directions.
    pub nodes_visited: usize,
    /// Rejected repeat discoveries.
    pub duplicates: usize,
    /// Why the traversal ended.
    pub stop: StopReason,
}

// ============================================================================
// Shared bookkeeping
// ============================================================================

/// Per-call state shared by all strategies. Never shared between calls.
#[derive(Debug)]
pub struct Traversal<'a> {
    index: &'a RecipeIndex,
    cancel: Option<&'a CancellationToken>,
    budget: Option<usize>,
    visits: usize,
    accepted: Deduplicator,
}

impl<'a> Traversal<'a> {
    /// Creates bookkeeping for one search over `index`.
    #[must_use]
    pub fn new(index: &'a RecipeIndex, policy: RecipeCountPolicy) -> Self {
        Self {
            index,
            cancel: None,
            budget: None,
            visits: 0,
            accepted: Deduplicator::with_cap(policy.cap()),
        }
    }

    /// Observes a cancellation token at every visit.
    #[must_use]
    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Stops after `budget` visits.
    #[must_use]
    pub fn with_budget(mut self, budget: Option<usize>) -> Self {
        self.budget = budget;
        self
    }

    /// The index being searched.
    #[must_use]
    pub fn index(&self) -> &'a RecipeIndex {
        self.index
    }

    /// Visits counted so far.
    #[must_use]
    pub fn visits(&self) -> usize {
        self.visits
    }

    /// Counts one frontier pop, unless the search must stop first.
    pub fn visit(&mut self) -> Result<(), SearchError> {
        if self.cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(SearchError::Cancelled {
                visited: self.visits,
            });
        }
        if let Some(budget) = self.budget {
            if self.visits >= budget {
                return Err(SearchError::BudgetExhausted { budget });
            }
        }
        self.visits += 1;
        Ok(())
    }

    /// Offers a complete decomposition. Returns true once the cap is reached.
    pub fn accept(&mut self, decomposition: Decomposition) -> bool {
        debug_assert!(decomposition.is_complete(self.index));
        self.accepted.offer(decomposition);
        self.accepted.is_full()
    }

    /// Whether the cap has been reached.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.accepted.is_full()
    }

    /// Ends the traversal.
    #[must_use]
    pub fn finish(self, stop: StopReason) -> TraversalOutcome {
        debug!(
            "Traversal stopped ({:?}) after {} visits with {} decompositions",
            stop,
            self.visits,
            self.accepted.len()
        );
        TraversalOutcome {
            duplicates: self.accepted.duplicates(),
            decompositions: self.accepted.into_accepted(),
            nodes_visited: self.visits,
            stop,
        }
    }

    /// Ends the traversal early because `visit` refused.
    #[must_use]
    pub fn interrupt(self, error: &SearchError) -> TraversalOutcome {
        let stop = match error {
            SearchError::Cancelled { .. } => StopReason::Cancelled,
            SearchError::BudgetExhausted { .. } => StopReason::BudgetExhausted,
            SearchError::UnknownElement(_) => StopReason::Exhausted,
        };
        self.finish(stop)
    }
}

/// Runs `algorithm` for `target` with the given backward seeds.
///
/// `seeds` are only consulted by the bidirectional strategy.
#[must_use]
pub fn run(
    algorithm: Algorithm,
    traversal: Traversal<'_>,
    target: ElementId,
    seeds: &[ElementId],
) -> TraversalOutcome {
    match algorithm {
        Algorithm::Bfs => breadth_first(traversal, target),
        Algorithm::Dfs => depth_first(traversal, target),
        Algorithm::Bidirectional => bidirectional(traversal, target, seeds),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use ahash::AHashSet;

    use super::*;
    use crate::dedup::RecipeSignature;
    use crate::index::RecipeIndex;

    /// Runs one strategy to completion with no cap.
    pub(crate) fn run_all(index: &RecipeIndex, algorithm: Algorithm, target: &str) -> TraversalOutcome {
        let target = index.lookup(target).expect("target");
        let seeds = index.base_elements().to_vec();
        run(
            algorithm,
            Traversal::new(index, RecipeCountPolicy::All),
            target,
            &seeds,
        )
    }

    /// Signature set of an outcome.
    pub(crate) fn signatures(outcome: &TraversalOutcome) -> AHashSet<RecipeSignature> {
        outcome
            .decompositions
            .iter()
            .map(Decomposition::signature)
            .collect()
    }
}
