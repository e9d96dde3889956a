//! Command line arguments.

use std::path::PathBuf;

use alchemy_search::Algorithm;
use clap::{Args, Parser, Subcommand};

use crate::config::CONFIG_FILE;

/// Top-level arguments.
#[derive(Debug, Parser)]
#[command(name = "alchemy")]
#[command(about = "Find recipes that reduce an element to base elements")]
#[command(version)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, env = "ALCHEMY_CONFIG", default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Dataset file (.toml or .json), overrides the config file
    #[arg(short, long, global = true, env = "ALCHEMY_DATASET")]
    pub dataset: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search for recipes producing an element
    Search(SearchArgs),

    /// List known elements
    Elements {
        /// Only list base elements
        #[arg(long)]
        base: bool,
    },

    /// Write a default configuration file
    InitConfig {
        /// Where to write (default: the --config path)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Arguments of `alchemy search`.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Element to decompose
    pub target: String,

    /// BFS, DFS or Bidirectional
    #[arg(short, long, default_value = "bfs")]
    pub algorithm: Algorithm,

    /// single, all, limited, or a positive number
    #[arg(short = 'n', long, default_value = "single")]
    pub count: String,

    /// JSON icon map, overrides the config file
    #[arg(long)]
    pub icons: Option<PathBuf>,

    /// Seed bidirectional search from the configured canonical elements
    #[arg(long)]
    pub canonical_seeds: bool,

    /// Stop after this many node visits
    #[arg(long)]
    pub max_visits: Option<usize>,

    /// Also print one tree merging every recipe found
    #[arg(long)]
    pub merged: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}
