#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `biodiversity_map`: builds dashboard data products for one species from
//! a GBIF-style occurrence file.
//!
//! Without a subcommand it runs interactively, prompting for the
//! occurrence file and then the species.

mod interactive;
mod pipeline;

use std::path::PathBuf;

use biodiversity_map_analytics::{DEFAULT_CLASSES, DEFAULT_TOP_N, DashboardOptions};
use biodiversity_map_geography::{paths, registry};
use biodiversity_map_source::{
    clean_occurrences, load_occurrences, progress::NullProgress, species_list,
};
use clap::{Parser, Subcommand};

use crate::pipeline::PipelineArgs;

#[derive(Parser)]
#[command(
    name = "biodiversity_map",
    about = "Species occurrence dashboards from GBIF exports"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the report and map layers for one species
    Run {
        /// Tab-delimited occurrence file (GBIF simple export)
        #[arg(long)]
        records: PathBuf,
        /// Species to report on. Prompts with the species list when omitted.
        #[arg(long)]
        species: Option<String>,
        /// TOML file with `[[layers]]` replacing the built-in boundary layers
        #[arg(long)]
        layers: Option<PathBuf>,
        /// Directory that layer paths are resolved against
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Output directory (default: `generated/` under the data directory)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Number of regions in each top-N chart view
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
        /// Number of choropleth classes
        #[arg(long, default_value_t = DEFAULT_CLASSES)]
        bins: usize,
    },
    /// Print the distinct species in an occurrence file
    Species {
        /// Tab-delimited occurrence file
        #[arg(long)]
        records: PathBuf,
    },
    /// List the configured boundary layers
    Layers {
        /// TOML file with `[[layers]]` replacing the built-in boundary layers
        #[arg(long)]
        layers: Option<PathBuf>,
        /// Directory that layer paths are resolved against
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = biodiversity_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(&multi);
    };

    match command {
        Commands::Run {
            records,
            species,
            layers,
            data_dir,
            output,
            top,
            bins,
        } => {
            let args = PipelineArgs {
                records,
                species,
                layers,
                data_dir,
                output,
                options: DashboardOptions {
                    top_n: top,
                    choropleth_classes: bins,
                },
            };
            pipeline::run(&args, &multi)?;
        }
        Commands::Species { records } => {
            if !records.is_file() {
                log::info!("No occurrence file at {}; nothing to list", records.display());
                return Ok(());
            }
            let cleaned = clean_occurrences(load_occurrences(&records, &NullProgress)?);
            for species in species_list(&cleaned.records) {
                println!("{species}");
            }
        }
        Commands::Layers { layers, data_dir } => {
            let data_dir = paths::data_dir(data_dir.as_deref());
            let definitions = registry::layer_definitions(layers.as_deref())?;

            println!("{:<20} {:<30} {:<8} PATH", "ID", "NAME", "FOUND");
            println!("{}", "-".repeat(80));
            for definition in &definitions {
                let path = paths::resolve(&data_dir, &definition.path);
                let found = if path.is_file() { "yes" } else { "no" };
                println!(
                    "{:<20} {:<30} {:<8} {}",
                    definition.id,
                    definition.name,
                    found,
                    path.display()
                );
            }
        }
    }

    Ok(())
}
