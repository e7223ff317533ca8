#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Writes dashboard data products to disk for the chart and map renderers.
//!
//! One run produces, in a single output directory:
//!
//! - `report.json`: the full [`DashboardReport`], pretty-printed.
//! - `<layer_id>.geojson`: every polygon of a layer with its `code`,
//!   `name`, record `count` and choropleth `bucket`.
//! - `occurrences.geojson`: one point per record with coordinates.
//!
//! `GeoJSON` files are streamed feature by feature through a buffered
//! writer; nothing is assembled in memory beyond one feature.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use biodiversity_map_analytics_models::{DashboardReport, LayerReport};
use biodiversity_map_geography_models::BoundaryLayer;
use biodiversity_map_occurrence_models::OccurrenceRecord;
use biodiversity_map_spatial::LayerIndex;

/// File name of the JSON report.
pub const REPORT_FILE: &str = "report.json";

/// File name of the occurrence point layer.
pub const POINTS_FILE: &str = "occurrences.geojson";

/// Default output directory: `generated/` under the data directory.
#[must_use]
pub fn default_output_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("generated")
}

/// Writes every output for `report` into `dir`, creating it if needed.
///
/// `layers` must be the indexes the report was built from, in the same
/// order; `records` are the species' records (those without coordinates
/// are skipped in the point layer).
///
/// # Errors
///
/// Returns an error if the directory cannot be created or any file fails
/// to serialize or write.
pub fn export_dashboard(
    dir: &Path,
    report: &DashboardReport,
    layers: &[LayerIndex],
    records: &[OccurrenceRecord],
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;

    write_report(dir, report)?;

    for (index, layer_report) in layers.iter().zip(&report.layers) {
        write_layer_geojson(dir, index.layer(), layer_report)?;
    }

    write_points_geojson(&dir.join(POINTS_FILE), records)?;

    log::info!("Outputs written to {}", dir.display());
    Ok(())
}

/// Writes `report.json`.
///
/// The file is written to a temporary name first and then renamed, so a
/// failed run never leaves a truncated report behind.
///
/// # Errors
///
/// Returns an error if serialization or file I/O fails.
pub fn write_report(
    dir: &Path,
    report: &DashboardReport,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = dir.join(REPORT_FILE);
    let tmp_path = dir.join(format!("{REPORT_FILE}.tmp"));
    let contents = serde_json::to_string_pretty(report)?;
    std::fs::write(&tmp_path, contents)?;
    std::fs::rename(&tmp_path, &path)?;

    log::info!("Report written: {}", path.display());
    Ok(())
}

/// Writes `<layer_id>.geojson` with one feature per polygon.
///
/// Counts come from `layer_report`'s own aggregation; polygons missing from
/// it are written with a count of zero.
///
/// # Errors
///
/// Returns an error if file I/O or serialization fails.
pub fn write_layer_geojson(
    dir: &Path,
    layer: &BoundaryLayer,
    layer_report: &LayerReport,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.join(format!("{}.geojson", layer.id));
    let counts = layer_report.aggregation.counts();

    let mut writer = FeatureWriter::create(&path)?;
    for polygon in &layer.polygons {
        let count = counts.get(polygon.code.as_str()).copied().unwrap_or(0);
        let geometry = geojson::Geometry::new(geojson::Value::from(&polygon.geometry));

        writer.write_feature(&serde_json::json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": {
                "code": polygon.code,
                "name": polygon.name,
                "count": count,
                "bucket": layer_report.choropleth.class_of(count),
            },
        }))?;
    }
    let written = writer.finish()?;

    log::info!(
        "Exported {written} '{}' boundary features to {}",
        layer.id,
        path.display()
    );
    Ok(path)
}

/// Writes the occurrence point layer to `path`.
///
/// # Errors
///
/// Returns an error if file I/O or serialization fails.
pub fn write_points_geojson(
    path: &Path,
    records: &[OccurrenceRecord],
) -> Result<u64, Box<dyn std::error::Error>> {
    let mut writer = FeatureWriter::create(path)?;

    for record in records {
        let Some(coordinates) = record.coordinates else {
            continue;
        };

        writer.write_feature(&serde_json::json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": [coordinates.longitude, coordinates.latitude],
            },
            "properties": {
                "species": record.species,
                "family": record.family,
                "eventDate": record.event_date.to_string(),
                "locality": record.locality,
                "occurrenceID": record.occurrence_id,
                "gbifID": record.record_id,
            },
        }))?;
    }
    let written = writer.finish()?;

    log::info!("Exported {written} occurrence points to {}", path.display());
    Ok(written)
}

/// Streams a `FeatureCollection` one feature at a time.
struct FeatureWriter {
    writer: BufWriter<std::fs::File>,
    count: u64,
}

impl FeatureWriter {
    fn create(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(br#"{"type":"FeatureCollection","features":["#)?;
        Ok(Self { writer, count: 0 })
    }

    fn write_feature(
        &mut self,
        feature: &serde_json::Value,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self.count > 0 {
            self.writer.write_all(b",\n")?;
        } else {
            self.writer.write_all(b"\n")?;
        }
        serde_json::to_writer(&mut self.writer, feature)?;
        self.count += 1;
        Ok(())
    }

    fn finish(mut self) -> std::io::Result<u64> {
        self.writer.write_all(b"\n]}\n")?;
        self.writer.flush()?;
        Ok(self.count)
    }
}
