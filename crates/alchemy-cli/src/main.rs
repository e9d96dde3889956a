//! # Alchemy
//!
//! Command line front end for the recipe solver.
//!
//! This binary ties the workspace together:
//! - Dataset: combination table files on disk
//! - Search: index construction, strategies and recipe trees
//! - Config: `alchemy.toml` plus command line overrides

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod cli;
mod config;
mod dataset;

use std::path::Path;

use alchemy_common::{AlchemyError, AlchemyResult};
use alchemy_search::{
    IconMap, RecipeIndex, SearchEngine, SearchRequest, SearchResult, SeedPolicy,
};
use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::{Cli, Command, SearchArgs};
use crate::config::AppConfig;
use crate::dataset::Dataset;

/// Main entry point.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load_from(&cli.config);
    config.resolve_paths(&cli.config);
    if let Some(dataset) = &cli.dataset {
        config.dataset.clone_from(dataset);
    }

    // RUST_LOG wins over the config file
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::try_new(&config.log_filter).map_err(|e| {
            AlchemyError::Config(format!("invalid log_filter {:?}: {e}", config.log_filter))
        })?,
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    debug!("Version: {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Search(args) => search(&config, &args),
        Command::Elements { base } => list_elements(&config, base),
        Command::InitConfig { path, force } => init_config(path.as_deref().unwrap_or(&cli.config), force),
    }
}

fn load_index(config: &AppConfig) -> AlchemyResult<RecipeIndex> {
    let dataset = Dataset::load(&config.dataset)?;
    debug!(
        "Dataset schema {} from {:?}: {:?}",
        dataset.version(),
        dataset.source(),
        dataset.stats()
    );
    Ok(RecipeIndex::build(&dataset))
}

fn search(config: &AppConfig, args: &SearchArgs) -> Result<()> {
    let mut search_config = config.search.clone();
    if args.canonical_seeds {
        search_config.seed_policy = SeedPolicy::Canonical;
    }
    if args.max_visits.is_some() {
        search_config.max_visits = args.max_visits;
    }
    let policy = search_config.parse_policy(&args.count)?;

    let index = load_index(config)
        .with_context(|| format!("Failed to load dataset {}", config.dataset.display()))?;
    let engine = SearchEngine::new(index, search_config);
    let request = SearchRequest::new(args.target.as_str())
        .algorithm(args.algorithm)
        .policy(policy)
        .merged(args.merged);
    let mut result = engine.run(&request, None);

    if let Some(path) = args.icons.as_ref().or(config.icons.as_ref()) {
        let icons = IconMap::load(path)
            .with_context(|| format!("Failed to load icons {}", path.display()))?;
        result.attach_icons(&icons);
    }

    print_result(&result, args.pretty)
}

fn print_result(result: &SearchResult, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

fn list_elements(config: &AppConfig, base_only: bool) -> Result<()> {
    let index = load_index(config)
        .with_context(|| format!("Failed to load dataset {}", config.dataset.display()))?;
    if base_only {
        for &element in index.base_elements() {
            println!("{}", index.name(element));
        }
    } else {
        for element in index.all_elements() {
            println!("{}", index.name(element));
        }
    }
    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    AppConfig::default()
        .save_to(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote default configuration to {}", path.display());
    Ok(())
}
