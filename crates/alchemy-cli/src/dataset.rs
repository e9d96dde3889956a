//! Combination table loading.
//!
//! This module provides:
//! - Loading `result/item1/item2` rows from TOML or JSON files
//! - Schema version checks and row validation on load
//! - A [`RecipeSource`] the search index is built from

use std::fs;
use std::path::{Path, PathBuf};

use alchemy_common::{DatasetError, DatasetResult, SchemaVersion};
use alchemy_search::{RecipeEntry, RecipeSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Default dataset path.
pub const DEFAULT_DATASET_PATH: &str = "data/recipes.toml";

fn default_version() -> String {
    SchemaVersion::DATASET.to_string()
}

/// On-disk layout: a version plus the rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFile {
    /// Schema version of the file.
    #[serde(default = "default_version")]
    pub version: String,
    /// Rows in insertion order.
    #[serde(default)]
    pub recipes: Vec<RecipeEntry>,
}

/// JSON files may also be a bare array of rows.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonDataset {
    Versioned(DatasetFile),
    Rows(Vec<RecipeEntry>),
}

/// Counters gathered while loading.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Rows kept.
    pub rows: usize,
    /// Rows that only declare an element.
    pub declarations: usize,
    /// Rows rejected by validation.
    pub rejected: usize,
}

/// A validated combination table.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: Option<PathBuf>,
    version: SchemaVersion,
    entries: Vec<RecipeEntry>,
    stats: LoadStats,
}

impl Dataset {
    /// Loads a `.toml` or `.json` dataset.
    pub fn load(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DatasetError::NotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let mut dataset = match extension.as_str() {
            "toml" => Self::from_toml_str(&contents)?,
            "json" => Self::from_json_str(&contents)?,
            other => return Err(DatasetError::UnsupportedFormat(other.to_string())),
        };
        dataset.source = Some(path.to_path_buf());

        info!(
            "Loaded {} rows ({} declarations, {} rejected) from {}",
            dataset.stats.rows,
            dataset.stats.declarations,
            dataset.stats.rejected,
            path.display()
        );
        Ok(dataset)
    }

    /// Parses TOML: `version` plus `[[recipes]]` rows.
    pub fn from_toml_str(contents: &str) -> DatasetResult<Self> {
        let file: DatasetFile =
            toml::from_str(contents).map_err(|e| DatasetError::Serialization(e.to_string()))?;
        Self::from_file(file)
    }

    /// Parses JSON: `{version, recipes}` or a bare array of rows.
    pub fn from_json_str(contents: &str) -> DatasetResult<Self> {
        let parsed: JsonDataset = serde_json::from_str(contents)
            .map_err(|e| DatasetError::Serialization(e.to_string()))?;
        let file = match parsed {
            JsonDataset::Versioned(file) => file,
            JsonDataset::Rows(recipes) => DatasetFile {
                version: default_version(),
                recipes,
            },
        };
        Self::from_file(file)
    }

    /// Validates a decoded file.
    pub fn from_file(file: DatasetFile) -> DatasetResult<Self> {
        let version = SchemaVersion::parse(&file.version).ok_or_else(|| {
            DatasetError::Validation(format!("Invalid dataset version {:?}", file.version))
        })?;
        if !SchemaVersion::DATASET.can_read(&version) {
            return Err(DatasetError::VersionMismatch {
                expected: SchemaVersion::DATASET.to_string(),
                actual: version.to_string(),
            });
        }

        let mut stats = LoadStats::default();
        let mut entries = Vec::with_capacity(file.recipes.len());
        for (row, entry) in file.recipes.into_iter().enumerate() {
            if let Err(e) = validate_entry(&entry) {
                warn!("Skipping row {}: {e}", row + 1);
                stats.rejected += 1;
                continue;
            }
            if entry.is_declaration() {
                stats.declarations += 1;
            }
            debug!("Row {}: {:?}", row + 1, entry.result);
            entries.push(entry);
        }
        stats.rows = entries.len();

        Ok(Self {
            source: None,
            version,
            entries,
            stats,
        })
    }

    /// File this dataset came from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Schema version declared by the file.
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Load counters.
    pub fn stats(&self) -> LoadStats {
        self.stats
    }
}

impl RecipeSource for Dataset {
    fn all_recipes(&self) -> Vec<RecipeEntry> {
        self.entries.clone()
    }
}

/// Row-level checks. Rows missing one ingredient pass: the index counts and
/// skips them, but their result stays a known element.
fn validate_entry(entry: &RecipeEntry) -> DatasetResult<()> {
    if entry.result.trim().is_empty() {
        return Err(DatasetError::Validation("empty result".to_string()));
    }
    if entry.result.trim() != entry.result {
        return Err(DatasetError::Validation(format!(
            "result {:?} has surrounding whitespace",
            entry.result
        )));
    }
    Ok(())
}
