//! Element icon lookup.
//!
//! Icons are presentation data. Strategies never read them; trees get them
//! attached after a search through [`RecipeTree::attach_icons`](crate::tree::RecipeTree::attach_icons).

use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Errors loading an icon map.
#[derive(Debug, Error)]
pub enum IconError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a JSON object of strings
    #[error("Icon map parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Resolves an element name to an icon reference.
pub trait IconLookup {
    /// Icon for `name`, if one is known.
    fn icon_for(&self, name: &str) -> Option<&str>;
}

/// Name to icon URL table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconMap {
    icons: AHashMap<String, String>,
}

impl IconMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object mapping names to URLs.
    pub fn from_json_str(json: &str) -> Result<Self, IconError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a JSON icon map from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IconError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let map = Self::from_json_str(&contents)?;
        info!("Loaded {} icons from {:?}", map.len(), path);
        Ok(map)
    }

    /// Adds or replaces an icon.
    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.icons.insert(name.into(), url.into());
    }

    /// Number of icons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

impl IconLookup for IconMap {
    fn icon_for(&self, name: &str) -> Option<&str> {
        self.icons.get(name).map(String::as_str)
    }
}
