//! Recipe deduplication.
//!
//! Two decompositions are the same when they use the same set of steps,
//! whatever order a traversal discovered them in.

use ahash::AHashSet;

use crate::decomposition::Decomposition;
use crate::index::RecipeIndex;
use crate::recipe::Step;

/// Canonical signature of a decomposition: its distinct steps, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecipeSignature(Vec<Step>);

impl RecipeSignature {
    /// Canonicalizes a step sequence.
    #[must_use]
    pub fn of(steps: &[Step]) -> Self {
        let mut steps = steps.to_vec();
        steps.sort_unstable();
        steps.dedup();
        Self(steps)
    }

    /// Steps in canonical order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    /// Human-readable key, `Result|Item1|Item2` joined by `;`.
    #[must_use]
    pub fn render(&self, index: &RecipeIndex) -> String {
        self.0
            .iter()
            .map(|s| {
                format!(
                    "{}|{}|{}",
                    index.name(s.result),
                    index.name(s.item1),
                    index.name(s.item2)
                )
            })
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Accepts decompositions up to a cap, dropping repeats.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: AHashSet<RecipeSignature>,
    accepted: Vec<Decomposition>,
    cap: Option<usize>,
    duplicates: usize,
}

impl Deduplicator {
    /// Creates a deduplicator accepting at most `cap` decompositions.
    #[must_use]
    pub fn with_cap(cap: Option<usize>) -> Self {
        Self {
            cap,
            ..Self::default()
        }
    }

    /// Offers a decomposition. Returns true if it was accepted.
    pub fn offer(&mut self, decomposition: Decomposition) -> bool {
        if self.is_full() {
            return false;
        }
        if !self.seen.insert(decomposition.signature()) {
            self.duplicates += 1;
            return false;
        }
        self.accepted.push(decomposition);
        true
    }

    /// Whether the cap has been reached.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cap.is_some_and(|cap| self.accepted.len() >= cap)
    }

    /// Number accepted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    /// Whether nothing was accepted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Number of rejected repeats.
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Accepted decompositions in acceptance order.
    #[must_use]
    pub fn into_accepted(self) -> Vec<Decomposition> {
        self.accepted
    }
}
