//! CLI tool for model inspection.
//!
//! Provides commands for:
//! - Listing entities with their inherited attributes
//! - Validating a set of models as one model group
//! - Listing the named fetch specifications of each entity

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eo_core::{EoConfig, ModelGroup};

/// Command-line arguments for the model tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory searched for model files, before EO_MODEL_PATH and ./models
    #[arg(long = "model-path", global = true)]
    model_paths: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List entities and their attributes
    Entities {
        /// Models to load
        #[arg(required = true)]
        models: Vec<String>,
    },

    /// Load the models together and report problems
    Validate {
        /// Models to load
        #[arg(required = true)]
        models: Vec<String>,
    },

    /// List named fetch specifications
    FetchSpecs {
        /// Models to load
        #[arg(required = true)]
        models: Vec<String>,
    },
}

fn config_for(cli: &Cli) -> EoConfig {
    cli.model_paths
        .iter()
        .rev()
        .fold(EoConfig::from_env(), |config, path| config.with_search_path(path))
}

fn load(config: &EoConfig, models: &[String]) -> Result<ModelGroup> {
    ModelGroup::load(config, models)
        .with_context(|| format!("Failed to load models: {}", models.join(", ")))
}

fn list_entities(group: &ModelGroup) -> Result<()> {
    for model in group.models() {
        println!("{}", model.name());
        for entity in model.entities() {
            match &entity.parent {
                Some(parent) => println!("  {} : {}", entity.name, parent),
                None => println!("  {}", entity.name),
            }
            let sub_entities = group.sub_entities(&entity.name)?;
            if !sub_entities.is_empty() {
                let names: Vec<&str> = sub_entities.iter().map(|sub| sub.name.as_str()).collect();
                println!("    sub-entities: {}", names.join(", "));
            }
            for attribute in group.attributes_for(&entity.name)? {
                let required = if attribute.allows_null { "" } else { " (required)" };
                match &attribute.default {
                    Some(default) => println!(
                        "    {}: {} = {}{}",
                        attribute.name,
                        attribute.attribute_type.name(),
                        default,
                        required
                    ),
                    None => println!(
                        "    {}: {}{}",
                        attribute.name,
                        attribute.attribute_type.name(),
                        required
                    ),
                }
            }
        }
    }
    Ok(())
}

fn list_fetch_specs(group: &ModelGroup) {
    for entity in group.entities() {
        for name in entity.fetch_specifications.keys() {
            let Some(spec) = group.fetch_specification_named(name, &entity.name) else {
                continue;
            };
            let qualifier = spec
                .qualifier()
                .map(ToString::to_string)
                .unwrap_or_else(|| "(all)".to_string());
            println!(
                "{}.{}: {} deep={} limit={}",
                entity.name,
                name,
                qualifier,
                spec.is_deep(),
                spec.fetch_limit()
            );
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    let config = config_for(&cli);
    tracing::debug!("Model search paths: {:?}", config.model_search_paths);

    match &cli.command {
        Commands::Entities { models } => list_entities(&load(&config, models)?)?,
        Commands::Validate { models } => {
            let group = load(&config, models)?;
            let entity_count = group.entities().count();
            println!(
                "{} model(s), {} entities: ok",
                group.models().len(),
                entity_count
            );
        }
        Commands::FetchSpecs { models } => list_fetch_specs(&load(&config, models)?),
    }

    Ok(())
}
