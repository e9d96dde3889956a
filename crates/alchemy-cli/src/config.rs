//! Application configuration.
//!
//! Settings are loaded from `alchemy.toml` and saved back in the same format.
//! Command line flags override whatever the file says.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use alchemy_search::SearchConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dataset::DEFAULT_DATASET_PATH;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "alchemy.toml";

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Combination table to load.
    pub dataset: PathBuf,
    /// Optional JSON map of element icons.
    pub icons: Option<PathBuf>,
    /// Tracing filter directive, used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Search tunables.
    pub search: SearchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET_PATH),
            icons: None,
            log_filter: "alchemy=info".to_string(),
            search: SearchConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Resolves relative data paths against the config file's directory.
    pub fn resolve_paths(&mut self, config_path: &Path) {
        let Some(base) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return;
        };
        if self.dataset.is_relative() {
            self.dataset = base.join(&self.dataset);
        }
        if let Some(icons) = self.icons.as_mut().filter(|p| p.is_relative()) {
            *icons = base.join(&*icons);
        }
    }
}
