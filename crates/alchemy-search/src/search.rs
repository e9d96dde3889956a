//! Search facade.
//!
//! The only entry point callers need: validate the target, dispatch to a
//! strategy, turn accepted decompositions into trees, and time the call.
//! Every outcome is a well-formed [`SearchResult`].

use std::sync::Arc;
use std::time::Instant;

use alchemy_common::ElementId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cancel::CancellationToken;
use crate::config::SearchConfig;
use crate::icons::IconLookup;
use crate::index::RecipeIndex;
use crate::strategy::{self, Algorithm, RecipeCountPolicy, StopReason, Traversal};
use crate::tree::{RecipeTree, TreeBuilder};

/// How a search ended, so callers can pick the right rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchStatus {
    /// At least one decomposition was found and the search ran to its end.
    Complete,
    /// The target is not in the dataset.
    NotFound,
    /// The target is known but has no complete decomposition.
    NoRecipe,
    /// The cancellation token fired.
    Cancelled,
    /// The visit budget ran out.
    BudgetExhausted,
}

/// Parameters of one search call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Element to decompose.
    pub target: String,
    /// Strategy to run.
    #[serde(default)]
    pub algorithm: Algorithm,
    /// How many decompositions to accept.
    #[serde(default)]
    pub policy: RecipeCountPolicy,
    /// Also build one tree over all accepted decompositions.
    #[serde(default)]
    pub merge: bool,
}

impl SearchRequest {
    /// BFS for a single decomposition of `target`.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            algorithm: Algorithm::default(),
            policy: RecipeCountPolicy::default(),
            merge: false,
        }
    }

    /// Sets the algorithm.
    #[must_use]
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the recipe-count policy.
    #[must_use]
    pub fn policy(mut self, policy: RecipeCountPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Requests the merged tree.
    #[must_use]
    pub fn merged(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }
}

/// What a search hands back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// One tree per accepted decomposition, or a single default tree.
    pub trees: Vec<RecipeTree>,
    /// One tree over the union of all accepted decompositions, on request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_tree: Option<RecipeTree>,
    /// Frontier pops across all directions.
    pub nodes_visited: usize,
    /// Wall-clock time of the whole call.
    pub elapsed_millis: f64,
    /// Accepted decompositions. Zero when `trees` holds a default tree.
    pub recipe_count: usize,
    /// How the search ended.
    pub status: SearchStatus,
}

impl SearchResult {
    /// Fills `image` on every tree node the lookup knows.
    pub fn attach_icons<L: IconLookup + ?Sized>(&mut self, icons: &L) {
        for tree in self.trees.iter_mut().chain(self.merged_tree.as_mut()) {
            tree.attach_icons(icons);
        }
    }

    /// Whether any decomposition was found.
    #[must_use]
    pub fn found(&self) -> bool {
        self.recipe_count > 0
    }
}

/// Runs searches over one shared, immutable index.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    index: Arc<RecipeIndex>,
    config: SearchConfig,
    seeds: Arc<[ElementId]>,
}

impl SearchEngine {
    /// Creates an engine. Bidirectional seeds are resolved once, here.
    pub fn new(index: impl Into<Arc<RecipeIndex>>, config: SearchConfig) -> Self {
        let index = index.into();
        let seeds: Arc<[ElementId]> = config.seeds(&index).into();
        debug!(
            "Search engine ready: {} elements, {} bidirectional seeds ({:?})",
            index.element_count(),
            seeds.len(),
            config.seed_policy
        );
        Self {
            index,
            config,
            seeds,
        }
    }

    /// The index being searched.
    #[must_use]
    pub fn index(&self) -> &RecipeIndex {
        &self.index
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Resolved bidirectional seeds.
    #[must_use]
    pub fn seeds(&self) -> &[ElementId] {
        &self.seeds
    }

    /// Searches `target` with the given algorithm and policy.
    #[must_use]
    pub fn search(
        &self,
        target: &str,
        algorithm: Algorithm,
        policy: RecipeCountPolicy,
    ) -> SearchResult {
        self.run(
            &SearchRequest::new(target).algorithm(algorithm).policy(policy),
            None,
        )
    }

    /// Runs a request, optionally observing a cancellation token.
    #[must_use]
    pub fn run(&self, request: &SearchRequest, cancel: Option<&CancellationToken>) -> SearchResult {
        let started = Instant::now();
        debug!(
            "Searching {:?} with {} ({})",
            request.target, request.algorithm, request.policy
        );

        let Some(target) = self.index.lookup(&request.target) else {
            debug!("Unknown element {:?}", request.target);
            return SearchResult {
                trees: Vec::new(),
                merged_tree: None,
                nodes_visited: 0,
                elapsed_millis: elapsed_millis(started),
                recipe_count: 0,
                status: SearchStatus::NotFound,
            };
        };

        let mut traversal =
            Traversal::new(&self.index, request.policy).with_budget(self.config.max_visits);
        if let Some(token) = cancel {
            traversal = traversal.with_cancellation(token);
        }
        let outcome = strategy::run(request.algorithm, traversal, target, &self.seeds);

        let builder = TreeBuilder::new(&self.index);
        let recipe_count = outcome.decompositions.len();
        let mut trees: Vec<RecipeTree> = outcome
            .decompositions
            .iter()
            .map(|decomposition| builder.build_decomposition(decomposition))
            .collect();
        let merged_tree = (request.merge && recipe_count > 0)
            .then(|| builder.build_merged(target, &outcome.decompositions));
        if trees.is_empty() {
            trees.push(builder.default_tree(target));
        }

        let status = match outcome.stop {
            StopReason::Cancelled => SearchStatus::Cancelled,
            StopReason::BudgetExhausted => SearchStatus::BudgetExhausted,
            StopReason::Exhausted | StopReason::CapReached if recipe_count == 0 => {
                SearchStatus::NoRecipe
            },
            StopReason::Exhausted | StopReason::CapReached => SearchStatus::Complete,
        };

        let result = SearchResult {
            trees,
            merged_tree,
            nodes_visited: outcome.nodes_visited,
            elapsed_millis: elapsed_millis(started),
            recipe_count,
            status,
        };
        info!(
            "{} search for {:?}: {} recipes, {} nodes visited, {:.3} ms ({:?})",
            request.algorithm,
            request.target,
            result.recipe_count,
            result.nodes_visited,
            result.elapsed_millis,
            result.status
        );
        result
    }
}

fn elapsed_millis(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{cyclic_entries, sample_entries, wide_entries};
    use crate::recipe::RecipeEntry;

    fn engine(entries: Vec<RecipeEntry>) -> SearchEngine {
        SearchEngine::new(RecipeIndex::from_entries(entries), SearchConfig::default())
    }

    #[test]
    fn test_steam_single_bfs() {
        let engine = engine(sample_entries());
        let result = engine.search("Steam", Algorithm::Bfs, RecipeCountPolicy::Single);

        assert_eq!(result.status, SearchStatus::Complete);
        assert_eq!(result.recipe_count, 1);
        assert_eq!(result.trees.len(), 1);
        let tree = &result.trees[0];
        assert_eq!(tree.name, "Steam");
        assert_eq!(tree.leaf_names(), vec!["Water", "Fire"]);
        assert!(tree.children.iter().all(RecipeTree::is_leaf));
        assert_eq!(tree.recipe_steps, vec!["Steam = Water + Fire"]);
        assert!(result.nodes_visited >= 1);
        assert!(result.elapsed_millis >= 0.0);
    }

    #[test]
    fn test_base_target_returns_default_tree() {
        let engine = engine(sample_entries());
        for algorithm in Algorithm::all() {
            let result = engine.search("Water", *algorithm, RecipeCountPolicy::All);
            assert_eq!(result.status, SearchStatus::NoRecipe);
            assert_eq!(result.nodes_visited, 0);
            assert_eq!(result.recipe_count, 0);
            assert_eq!(result.trees, vec![RecipeTree::leaf("Water")]);
        }
    }

    #[test]
    fn test_unknown_target_returns_nothing() {
        let engine = engine(sample_entries());
        let result = engine.search("Unicorn", Algorithm::Dfs, RecipeCountPolicy::All);

        assert_eq!(result.status, SearchStatus::NotFound);
        assert!(result.trees.is_empty());
        assert_eq!(result.nodes_visited, 0);
    }

    #[test]
    fn test_unreachable_target_gets_default_children() {
        // Ghost only has a cyclic recipe, so it never bottoms out.
        let engine = engine(vec![
            RecipeEntry::base("Air"),
            RecipeEntry::new("Ghost", "Ghost", "Air"),
        ]);
        let result = engine.search("Ghost", Algorithm::Bfs, RecipeCountPolicy::All);

        assert_eq!(result.status, SearchStatus::NoRecipe);
        assert_eq!(result.recipe_count, 0);
        assert_eq!(result.trees[0].leaf_names(), vec!["Ghost", "Air"]);
        assert!(result.trees[0].recipe_steps.is_empty());
    }

    #[test]
    fn test_limited_policy_and_merged_tree() {
        let engine = engine(wide_entries());
        let request = SearchRequest::new("Lava")
            .policy(RecipeCountPolicy::Limited(2))
            .merged(true);
        let result = engine.run(&request, None);

        assert_eq!(result.trees.len(), 2);
        assert_eq!(result.recipe_count, 2);
        let merged = result.merged_tree.expect("merged tree");
        assert_eq!(merged.name, "Lava");
        assert_eq!(merged.recipe_steps, result.trees[0].recipe_steps);
    }

    #[test]
    fn test_search_is_idempotent() {
        let engine = engine(wide_entries());
        for algorithm in Algorithm::all() {
            let first = engine.search("Lava", *algorithm, RecipeCountPolicy::All);
            let second = engine.search("Lava", *algorithm, RecipeCountPolicy::All);
            assert_eq!(first.trees, second.trees);
            assert_eq!(first.nodes_visited, second.nodes_visited);
        }
    }

    #[test]
    fn test_cancelled_search_reports_status() {
        let engine = engine(wide_entries());
        let token = CancellationToken::new();
        token.cancel();

        let request = SearchRequest::new("Lava").policy(RecipeCountPolicy::All);
        let result = engine.run(&request, Some(&token));
        assert_eq!(result.status, SearchStatus::Cancelled);
        assert_eq!(result.nodes_visited, 0);
        assert_eq!(result.trees.len(), 1);
    }

    #[test]
    fn test_budget_reports_partial_results() {
        let engine = SearchEngine::new(
            RecipeIndex::from_entries(wide_entries()),
            SearchConfig {
                max_visits: Some(1),
                ..SearchConfig::default()
            },
        );
        let result = engine.search("Lava", Algorithm::Bfs, RecipeCountPolicy::All);
        assert_eq!(result.status, SearchStatus::BudgetExhausted);
        assert_eq!(result.recipe_count, 1);
        assert_eq!(result.nodes_visited, 1);
    }

    #[test]
    fn test_cyclic_dataset_terminates_for_every_algorithm() {
        let engine = engine(cyclic_entries());
        for algorithm in Algorithm::all() {
            let result = engine.search("Egg", *algorithm, RecipeCountPolicy::All);
            assert_eq!(result.status, SearchStatus::Complete, "{algorithm}");
            assert_eq!(result.recipe_count, 1);
        }
    }

    #[test]
    fn test_result_json_shape() {
        let engine = engine(sample_entries());
        let mut result = engine.search("Mud", Algorithm::Bidirectional, RecipeCountPolicy::Single);
        let mut icons = crate::icons::IconMap::new();
        icons.insert("Mud", "mud.png");
        result.attach_icons(&icons);

        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["status"], "complete");
        assert_eq!(json["recipeCount"], 1);
        assert!(json["nodesVisited"].as_u64().is_some());
        assert!(json["elapsedMillis"].as_f64().is_some());
        assert!(json.get("mergedTree").is_none());
        assert_eq!(json["trees"][0]["image"], "mud.png");
        assert_eq!(json["trees"][0]["recipeSteps"][0], "Mud = Water + Earth");
    }
}
