//! One full run: load, clean, pick a species, aggregate, export.

use std::path::PathBuf;
use std::time::Instant;

use biodiversity_map_analytics::{DashboardOptions, build_dashboard};
use biodiversity_map_analytics_models::DashboardReport;
use biodiversity_map_cli_utils::{IndicatifProgress, MultiProgress};
use biodiversity_map_geography::{load_layers, paths, registry};
use biodiversity_map_source::{
    clean_occurrences, filter_by_species, load_occurrences, species_list,
};
use biodiversity_map_spatial::LayerIndex;
use dialoguer::Select;

/// Inputs for [`run`].
pub struct PipelineArgs {
    pub records: PathBuf,
    /// Prompted for when `None`.
    pub species: Option<String>,
    pub layers: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub options: DashboardOptions,
}

/// Runs the pipeline.
///
/// A missing occurrence file is not an error: the run is skipped with an
/// informational message and nothing is written.
///
/// # Errors
///
/// Returns an error if the occurrence file or a boundary layer cannot be
/// read, the species prompt fails, or writing outputs fails.
pub fn run(args: &PipelineArgs, multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    if !args.records.is_file() {
        log::info!(
            "No occurrence file at {}; nothing to do",
            args.records.display()
        );
        return Ok(());
    }

    let start = Instant::now();

    let progress = IndicatifProgress::rows_spinner(multi, "Reading occurrences");
    let cleaned = clean_occurrences(load_occurrences(&args.records, progress.as_ref())?);

    let species = match &args.species {
        Some(species) => {
            if !cleaned.records.iter().any(|r| r.species == *species) {
                log::warn!(
                    "Species '{species}' does not occur in {}; the report will be empty",
                    args.records.display()
                );
            }
            species.clone()
        }
        None => {
            let Some(species) = pick_species(&species_list(&cleaned.records))? else {
                log::info!("No species in {}; nothing to do", args.records.display());
                return Ok(());
            };
            species
        }
    };

    let data_dir = paths::data_dir(args.data_dir.as_deref());
    let definitions = registry::layer_definitions(args.layers.as_deref())?;
    let indexes: Vec<LayerIndex> = load_layers(&definitions, &data_dir)?
        .into_iter()
        .map(LayerIndex::new)
        .collect();

    let progress = IndicatifProgress::aggregation_bar(multi, "Aggregating");
    let report = build_dashboard(
        &cleaned,
        &species,
        &indexes,
        args.options,
        progress.as_ref(),
    );

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| biodiversity_map_generate::default_output_dir(&data_dir));
    let records = filter_by_species(&cleaned.records, &species);
    biodiversity_map_generate::export_dashboard(&output, &report, &indexes, &records)?;

    print_summary(&report);
    log::info!("Done in {:.1}s", start.elapsed().as_secs_f64());

    Ok(())
}

/// Prompts for one species from the sorted list. `None` when the list is
/// empty.
pub fn pick_species(species: &[String]) -> Result<Option<String>, dialoguer::Error> {
    if species.is_empty() {
        return Ok(None);
    }

    let idx = Select::new()
        .with_prompt("Species")
        .items(species)
        .default(0)
        .max_length(20)
        .interact()?;

    Ok(species.get(idx).cloned())
}

fn print_summary(report: &DashboardReport) {
    let cleaning = &report.cleaning;

    println!();
    println!("{}", report.species);
    println!("{}", "-".repeat(60));
    println!(
        "Rows read: {}  kept: {}  missing species: {}  bad dates: {}",
        cleaning.rows_read,
        cleaning.rows_kept,
        cleaning.missing_species,
        cleaning.invalid_dates.len()
    );
    println!(
        "Records: {} ({} with coordinates)",
        report.records.len(),
        report.records_with_coordinates
    );

    let years = report.by_year.zero_filled();
    if let (Some(first), Some(last)) = (years.first(), years.last()) {
        println!("Years: {}-{}", first.0, last.0);
    }

    for layer in &report.layers {
        println!();
        println!(
            "{} ({} of {} areas with records, {} points outside)",
            layer.aggregation.layer_name,
            layer.aggregation.nonzero().count(),
            layer.aggregation.areas.len(),
            layer.aggregation.unmatched_points
        );
        for area in &layer.top {
            println!("  {:>6}  {}", area.count, area.name);
        }
    }
}
