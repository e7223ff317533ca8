#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard data products for one species.
//!
//! [`build_dashboard`] filters the cleaned records to the selected species
//! and derives everything the dashboard renders from them: the record
//! table, year and month histograms, and per boundary layer a full
//! aggregation, a ranked top-N view, and choropleth classes.

pub mod choropleth;
pub mod ranking;
pub mod temporal;

use biodiversity_map_analytics_models::{DashboardReport, LayerReport, RecordRow};
use biodiversity_map_source::{CleanedOccurrences, filter_by_species, progress::ProgressCallback};
use biodiversity_map_spatial::LayerIndex;

pub use choropleth::{DEFAULT_CLASSES, equal_interval};
pub use ranking::{DEFAULT_TOP_N, top_areas};

/// Tunables for [`build_dashboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    /// Maximum number of regions in each top-N view.
    pub top_n: usize,
    /// Number of choropleth classes.
    pub choropleth_classes: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            choropleth_classes: DEFAULT_CLASSES,
        }
    }
}

/// Builds every data product for `species`.
///
/// An unknown species is not an error: it yields empty histograms, an
/// empty table, and all-zero layer aggregations.
#[must_use]
pub fn build_dashboard(
    cleaned: &CleanedOccurrences,
    species: &str,
    layers: &[LayerIndex],
    options: DashboardOptions,
    progress: &dyn ProgressCallback,
) -> DashboardReport {
    let records = filter_by_species(&cleaned.records, species);
    log::info!("Species '{species}': {} records", records.len());

    let points: Vec<_> = records.iter().filter_map(|r| r.point()).collect();

    progress.set_total((points.len() * layers.len()) as u64);

    let layer_reports = layers
        .iter()
        .map(|index| {
            let aggregation = index.aggregate(points.iter().copied(), progress);
            let top = top_areas(&aggregation, options.top_n);
            let choropleth = equal_interval(
                aggregation.areas.iter().map(|a| a.count),
                options.choropleth_classes,
            );
            LayerReport {
                aggregation,
                top,
                choropleth,
            }
        })
        .collect();

    progress.finish(format!("Aggregated {} layers", layers.len()));

    DashboardReport {
        species: species.to_string(),
        cleaning: cleaned.report.clone(),
        by_year: temporal::by_year(&records),
        by_month: temporal::by_month(&records),
        records_with_coordinates: points.len() as u64,
        records: records.iter().map(RecordRow::from).collect(),
        layers: layer_reports,
    }
}

#[cfg(test)]
mod tests {
    use biodiversity_map_geography_models::{BoundaryLayer, BoundaryPolygon};
    use biodiversity_map_occurrence_models::{Coordinates, OccurrenceRecord};
    use biodiversity_map_source::progress::NullProgress;
    use chrono::NaiveDate;
    use geo::{MultiPolygon, polygon};

    use super::*;

    fn record(species: &str, date: (i32, u32, u32), at: Option<(f64, f64)>) -> OccurrenceRecord {
        OccurrenceRecord {
            record_id: None,
            occurrence_id: None,
            species: species.to_string(),
            family: Some("Fam".to_string()),
            event_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            locality: None,
            coordinates: at.map(|(longitude, latitude)| Coordinates {
                longitude,
                latitude,
            }),
        }
    }

    fn square(code: &str, x0: f64, y0: f64) -> BoundaryPolygon {
        BoundaryPolygon {
            code: code.to_string(),
            name: code.to_string(),
            geometry: MultiPolygon(vec![polygon![
                (x: x0, y: y0),
                (x: x0 + 1.0, y: y0),
                (x: x0 + 1.0, y: y0 + 1.0),
                (x: x0, y: y0 + 1.0),
                (x: x0, y: y0),
            ]]),
        }
    }

    fn index() -> LayerIndex {
        LayerIndex::new(BoundaryLayer {
            id: "cantons".to_string(),
            name: "Cantons".to_string(),
            polygons: vec![square("X", 0.0, 0.0), square("Y", 5.0, 5.0), square("Z", 9.0, 9.0)],
        })
    }

    fn cleaned(records: Vec<OccurrenceRecord>) -> CleanedOccurrences {
        CleanedOccurrences {
            records,
            ..CleanedOccurrences::default()
        }
    }

    #[test]
    fn builds_all_products_for_selected_species() {
        let input = cleaned(vec![
            record("A", (2019, 3, 1), Some((0.5, 0.5))),
            record("A", (2020, 3, 9), Some((0.2, 0.7))),
            record("A", (2020, 6, 9), Some((5.5, 5.5))),
            record("A", (2021, 1, 2), Some((50.0, 50.0))),
            record("A", (2021, 1, 3), None),
            record("B", (2019, 3, 1), Some((5.5, 5.5))),
        ]);

        let report = build_dashboard(
            &input,
            "A",
            &[index()],
            DashboardOptions::default(),
            &NullProgress,
        );

        assert_eq!(report.species, "A");
        assert_eq!(report.records.len(), 5);
        assert_eq!(report.records_with_coordinates, 4);
        assert_eq!(report.by_year.total(), 5);
        assert_eq!(report.by_month.get(3), 2);

        let layer = &report.layers[0];
        assert_eq!(layer.aggregation.areas.len(), 3);
        assert_eq!(layer.aggregation.count_for("X"), Some(2));
        assert_eq!(layer.aggregation.count_for("Y"), Some(1));
        assert_eq!(layer.aggregation.count_for("Z"), Some(0));
        assert_eq!(layer.aggregation.unmatched_points, 1);

        let top: Vec<&str> = layer.top.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(top, vec!["X", "Y"]);
        assert_eq!(layer.choropleth.edges.len(), DEFAULT_CLASSES + 1);
    }

    #[test]
    fn unknown_species_yields_empty_products() {
        let input = cleaned(vec![record("A", (2019, 3, 1), Some((0.5, 0.5)))]);
        let report = build_dashboard(
            &input,
            "Nope",
            &[index()],
            DashboardOptions::default(),
            &NullProgress,
        );

        assert!(report.records.is_empty());
        assert!(report.by_year.is_empty());
        assert!(report.by_month.is_empty());
        let layer = &report.layers[0];
        assert_eq!(layer.aggregation.total(), 0);
        assert_eq!(layer.aggregation.areas.len(), 3);
        assert!(layer.top.is_empty());
        assert_eq!(layer.choropleth.class_of(0), Some(DEFAULT_CLASSES / 2));
    }

    #[test]
    fn options_limit_top_view_and_classes() {
        let input = cleaned(vec![
            record("A", (2019, 3, 1), Some((0.5, 0.5))),
            record("A", (2019, 3, 1), Some((0.5, 0.5))),
            record("A", (2019, 3, 1), Some((5.5, 5.5))),
        ]);
        let options = DashboardOptions {
            top_n: 1,
            choropleth_classes: 2,
        };
        let report = build_dashboard(&input, "A", &[index()], options, &NullProgress);

        let layer = &report.layers[0];
        assert_eq!(layer.top.len(), 1);
        assert_eq!(layer.top[0].code, "X");
        assert_eq!(layer.choropleth.edges, vec![0.0, 1.0, 2.0]);
    }
}
