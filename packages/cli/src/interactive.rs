//! Prompt-driven mode used when no subcommand is given.

use std::path::PathBuf;

use biodiversity_map_analytics::DashboardOptions;
use biodiversity_map_cli_utils::MultiProgress;
use biodiversity_map_geography::paths;
use dialoguer::{Input, Select};

use crate::pipeline::{self, PipelineArgs};

/// Where boundary layers come from.
enum LayerSource {
    BuiltIn,
    ConfigFile,
}

impl LayerSource {
    const ALL: &[Self] = &[Self::BuiltIn, Self::ConfigFile];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::BuiltIn => "Built-in layers (protected areas, provinces, cantons)",
            Self::ConfigFile => "Layers from a TOML file",
        }
    }
}

/// Prompts for the occurrence file and layer source, then runs the
/// pipeline (which prompts for the species).
///
/// # Errors
///
/// Returns an error if a prompt fails or the pipeline fails.
pub fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("Biodiversity Map");
    println!();

    let records: String = Input::new()
        .with_prompt("Occurrence file (tab-delimited)")
        .default("occurrences.txt".to_string())
        .interact_text()?;

    let labels: Vec<&str> = LayerSource::ALL.iter().map(LayerSource::label).collect();
    let idx = Select::new()
        .with_prompt("Boundary layers")
        .items(&labels)
        .default(0)
        .interact()?;

    let layers = match LayerSource::ALL[idx] {
        LayerSource::BuiltIn => None,
        LayerSource::ConfigFile => {
            let path: String = Input::new()
                .with_prompt("Layer config (TOML)")
                .interact_text()?;
            Some(PathBuf::from(path))
        }
    };

    let data_dir: String = Input::new()
        .with_prompt("Data directory")
        .default(paths::data_dir(None).display().to_string())
        .interact_text()?;

    let args = PipelineArgs {
        records: PathBuf::from(records.trim()),
        species: None,
        layers,
        data_dir: Some(PathBuf::from(data_dir.trim())),
        output: None,
        options: DashboardOptions::default(),
    };

    pipeline::run(&args, multi)
}
