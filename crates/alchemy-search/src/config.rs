//! Search configuration.

use alchemy_common::ElementId;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ParseError;
use crate::index::RecipeIndex;
use crate::strategy::RecipeCountPolicy;

/// Where bidirectional search starts its backward side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Every base element of the loaded dataset.
    #[default]
    Discovered,
    /// The names in `canonical_seeds`.
    Canonical,
}

/// Tunables for the search facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Backward seed selection for bidirectional search.
    pub seed_policy: SeedPolicy,
    /// Seeds used by [`SeedPolicy::Canonical`].
    pub canonical_seeds: Vec<String>,
    /// Hard limit on frontier pops per search.
    pub max_visits: Option<usize>,
    /// Count used when `limited` is requested without a number.
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            seed_policy: SeedPolicy::Discovered,
            canonical_seeds: ["Air", "Earth", "Fire", "Water"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_visits: None,
            default_limit: 5,
        }
    }
}

impl SearchConfig {
    /// Resolves the backward seed set against `index`.
    ///
    /// Canonical seeds that are unknown or not base are dropped with a warning.
    #[must_use]
    pub fn seeds(&self, index: &RecipeIndex) -> Vec<ElementId> {
        match self.seed_policy {
            SeedPolicy::Discovered => index.base_elements().to_vec(),
            SeedPolicy::Canonical => index
                .resolve_names(self.canonical_seeds.iter().map(String::as_str), "seed")
                .into_iter()
                .filter(|&id| {
                    let base = index.is_base(id);
                    if !base {
                        warn!("Ignoring seed {:?}: it is not a base element", index.name(id));
                    }
                    base
                })
                .collect(),
        }
    }

    /// Parses a recipe count, reading a bare `limited` as `default_limit`.
    pub fn parse_policy(&self, value: &str) -> Result<RecipeCountPolicy, ParseError> {
        if value.trim().eq_ignore_ascii_case("limited") {
            return Ok(RecipeCountPolicy::Limited(self.default_limit.max(1)));
        }
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_entries;
    use crate::recipe::RecipeEntry;

    #[test]
    fn test_discovered_seeds_are_base_elements() {
        let index = RecipeIndex::from_entries(sample_entries());
        let seeds = SearchConfig::default().seeds(&index);
        assert_eq!(seeds, index.base_elements());
    }

    #[test]
    fn test_canonical_seeds_drop_unusable_names() {
        let mut entries = sample_entries();
        entries.push(RecipeEntry::base("Aether"));
        let index = RecipeIndex::from_entries(entries);

        let config = SearchConfig {
            seed_policy: SeedPolicy::Canonical,
            canonical_seeds: vec!["Water".into(), "Steam".into(), "Unicorn".into()],
            ..SearchConfig::default()
        };
        let names: Vec<&str> = config
            .seeds(&index)
            .into_iter()
            .map(|id| index.name(id))
            .collect();
        assert_eq!(names, vec!["Water"]);
    }

    #[test]
    fn test_parse_policy_uses_default_limit() {
        let config = SearchConfig {
            default_limit: 3,
            ..SearchConfig::default()
        };
        assert_eq!(config.parse_policy("limited"), Ok(RecipeCountPolicy::Limited(3)));
        assert_eq!(config.parse_policy("8"), Ok(RecipeCountPolicy::Limited(8)));
        assert_eq!(config.parse_policy("all"), Ok(RecipeCountPolicy::All));
    }

    #[test]
    fn test_config_toml_defaults() {
        let config: SearchConfig = toml::from_str("seed_policy = \"canonical\"").expect("parse");
        assert_eq!(config.seed_policy, SeedPolicy::Canonical);
        assert_eq!(config.default_limit, 5);
        assert_eq!(config.canonical_seeds.len(), 4);
        assert_eq!(config.max_visits, None);

        let text = toml::to_string_pretty(&SearchConfig::default()).expect("serialize");
        let back: SearchConfig = toml::from_str(&text).expect("round trip");
        assert_eq!(back, SearchConfig::default());
    }
}
