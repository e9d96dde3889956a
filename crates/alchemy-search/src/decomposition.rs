//! Complete decompositions of a target into base elements.

use ahash::AHashSet;
use alchemy_common::ElementId;

use crate::dedup::RecipeSignature;
use crate::index::RecipeIndex;
use crate::recipe::Step;

/// Ordered steps reducing a target to base elements.
///
/// The first step expands the target. Every other non-base ingredient is
/// the result of exactly one later step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    target: ElementId,
    steps: Vec<Step>,
}

impl Decomposition {
    /// Wraps steps discovered for `target`, target first.
    #[must_use]
    pub fn new(target: ElementId, steps: Vec<Step>) -> Self {
        Self { target, steps }
    }

    /// Element being decomposed.
    #[must_use]
    pub const fn target(&self) -> ElementId {
        self.target
    }

    /// Steps, target first.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no step was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The step expanding `element`, if any.
    #[must_use]
    pub fn producer(&self, element: ElementId) -> Option<&Step> {
        self.steps.iter().find(|step| step.result == element)
    }

    /// Ingredients no step expands, in first-use order.
    #[must_use]
    pub fn leaves(&self) -> Vec<ElementId> {
        let produced: AHashSet<ElementId> = self.steps.iter().map(|s| s.result).collect();
        let mut seen = AHashSet::new();
        self.steps
            .iter()
            .flat_map(Step::ingredients)
            .filter(|e| !produced.contains(e) && seen.insert(*e))
            .collect()
    }

    /// Whether the steps start at the target and every leaf is base.
    #[must_use]
    pub fn is_complete(&self, index: &RecipeIndex) -> bool {
        self.steps.first().is_some_and(|s| s.result == self.target)
            && self.leaves().into_iter().all(|leaf| index.is_base(leaf))
    }

    /// Canonical identity used for deduplication.
    #[must_use]
    pub fn signature(&self) -> RecipeSignature {
        RecipeSignature::of(&self.steps)
    }

    /// Steps formatted `Result = Item1 + Item2`, base to target.
    #[must_use]
    pub fn format_steps(&self, index: &RecipeIndex) -> Vec<String> {
        self.steps
            .iter()
            .rev()
            .map(|step| index.format_step(step))
            .collect()
    }
}
