#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for the occurrence dashboard.
//!
//! [`DashboardReport`] bundles every data product for one species: the
//! record table, the year and month histograms, and one [`LayerReport`]
//! per boundary layer. Renderers (charts, choropleth maps) consume these
//! types; they are serialized as camelCase JSON.

use std::collections::BTreeMap;

use biodiversity_map_geography_models::{AreaCount, LayerAggregation};
use biodiversity_map_occurrence_models::{CleanReport, OccurrenceRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Calendar unit a histogram is keyed by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TimeGranularity {
    /// Keyed by calendar year.
    Yearly,
    /// Keyed by calendar month (1-12), all years merged.
    Monthly,
}

/// Record counts per calendar unit.
///
/// Units without records are absent rather than zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalHistogram {
    /// What the keys represent.
    pub granularity: TimeGranularity,
    /// Year (or month number) to record count.
    pub counts: BTreeMap<i32, u64>,
}

impl TemporalHistogram {
    /// An empty histogram.
    #[must_use]
    pub const fn new(granularity: TimeGranularity) -> Self {
        Self {
            granularity,
            counts: BTreeMap::new(),
        }
    }

    /// Count for one unit; zero when absent.
    #[must_use]
    pub fn get(&self, unit: i32) -> u64 {
        self.counts.get(&unit).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Whether no unit has records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// A gap-free series for charting.
    ///
    /// Monthly histograms always yield all twelve months. Yearly histograms
    /// yield every year from the first to the last observed one (nothing
    /// when empty).
    #[must_use]
    pub fn zero_filled(&self) -> Vec<(i32, u64)> {
        let range = match self.granularity {
            TimeGranularity::Monthly => 1..=12,
            TimeGranularity::Yearly => {
                let (Some(first), Some(last)) =
                    (self.counts.keys().next(), self.counts.keys().next_back())
                else {
                    return Vec::new();
                };
                *first..=*last
            }
        };
        range.map(|unit| (unit, self.get(unit))).collect()
    }
}

/// Equal-interval class breaks for a choropleth map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethScale {
    /// Number of classes.
    pub classes: usize,
    /// Ascending class edges, `classes + 1` of them. Empty when there was
    /// no data to classify.
    pub edges: Vec<f64>,
}

impl ChoroplethScale {
    /// Class index for `count`.
    ///
    /// Classes are half-open `[lo, hi)` except the last, which includes its
    /// upper edge. Returns `None` for counts outside the scale or when the
    /// scale is empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn class_of(&self, count: u64) -> Option<usize> {
        let value = count as f64;
        let (first, last) = (*self.edges.first()?, *self.edges.last()?);
        if value < first || value > last {
            return None;
        }
        let upper_edges = &self.edges[1..];
        Some(
            upper_edges
                .iter()
                .position(|&hi| value < hi)
                .unwrap_or(upper_edges.len().saturating_sub(1)),
        )
    }
}

/// One row of the occurrence table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRow {
    /// Taxonomic family.
    pub family: Option<String>,
    /// Species name.
    pub species: String,
    /// Event date.
    #[serde(rename = "eventDate")]
    pub event_date: NaiveDate,
    /// Locality description.
    pub locality: Option<String>,
    /// Origin of the record (`occurrenceID`).
    #[serde(rename = "occurrenceID")]
    pub occurrence_id: Option<String>,
}

impl From<&OccurrenceRecord> for RecordRow {
    fn from(record: &OccurrenceRecord) -> Self {
        Self {
            family: record.family.clone(),
            species: record.species.clone(),
            event_date: record.event_date,
            locality: record.locality.clone(),
            occurrence_id: record.occurrence_id.clone(),
        }
    }
}

/// Everything derived from one boundary layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerReport {
    /// Full per-polygon counts, zero rows included.
    pub aggregation: LayerAggregation,
    /// Chart view: positive counts only, descending, truncated.
    pub top: Vec<AreaCount>,
    /// Class breaks over the full per-polygon counts.
    pub choropleth: ChoroplethScale,
}

/// All data products for one selected species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    /// Selected species.
    pub species: String,
    /// Cleaning summary for the whole input file.
    pub cleaning: CleanReport,
    /// Occurrence table for the species.
    pub records: Vec<RecordRow>,
    /// How many of those records have coordinates (and so take part in
    /// the spatial aggregation).
    pub records_with_coordinates: u64,
    /// Records per year.
    pub by_year: TemporalHistogram,
    /// Records per month, all years merged.
    pub by_month: TemporalHistogram,
    /// One report per boundary layer, in configuration order.
    pub layers: Vec<LayerReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram(granularity: TimeGranularity, pairs: &[(i32, u64)]) -> TemporalHistogram {
        TemporalHistogram {
            granularity,
            counts: pairs.iter().copied().collect(),
        }
    }

    #[test]
    fn monthly_zero_fill_has_twelve_months() {
        let h = histogram(TimeGranularity::Monthly, &[(3, 2), (11, 1)]);
        let filled = h.zero_filled();
        assert_eq!(filled.len(), 12);
        assert_eq!(filled[0], (1, 0));
        assert_eq!(filled[2], (3, 2));
        assert_eq!(filled[10], (11, 1));
        assert_eq!(h.total(), 3);
    }

    #[test]
    fn yearly_zero_fill_spans_observed_years() {
        let h = histogram(TimeGranularity::Yearly, &[(2017, 4), (2020, 1)]);
        assert_eq!(
            h.zero_filled(),
            vec![(2017, 4), (2018, 0), (2019, 0), (2020, 1)]
        );
        assert!(TemporalHistogram::new(TimeGranularity::Yearly)
            .zero_filled()
            .is_empty());
    }

    #[test]
    fn get_defaults_to_zero() {
        let h = histogram(TimeGranularity::Monthly, &[(3, 2)]);
        assert_eq!(h.get(3), 2);
        assert_eq!(h.get(4), 0);
    }

    #[test]
    fn class_lookup_uses_half_open_intervals() {
        let scale = ChoroplethScale {
            classes: 4,
            edges: vec![0.0, 2.0, 4.0, 6.0, 8.0],
        };
        assert_eq!(scale.class_of(0), Some(0));
        assert_eq!(scale.class_of(1), Some(0));
        assert_eq!(scale.class_of(2), Some(1));
        assert_eq!(scale.class_of(7), Some(3));
        assert_eq!(scale.class_of(8), Some(3));
        assert_eq!(scale.class_of(9), None);
    }

    #[test]
    fn empty_scale_has_no_classes() {
        let scale = ChoroplethScale {
            classes: 8,
            edges: Vec::new(),
        };
        assert_eq!(scale.class_of(0), None);
    }

    #[test]
    fn granularity_round_trips_through_strings() {
        assert_eq!(TimeGranularity::Monthly.to_string(), "monthly");
        assert_eq!(
            "yearly".parse::<TimeGranularity>().unwrap(),
            TimeGranularity::Yearly
        );
    }

    #[test]
    fn record_row_uses_darwin_core_names() {
        let row = RecordRow {
            family: None,
            species: "A".to_string(),
            event_date: NaiveDate::from_ymd_opt(2019, 3, 1).unwrap(),
            locality: None,
            occurrence_id: Some("x".to_string()),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["eventDate"], "2019-03-01");
        assert_eq!(json["occurrenceID"], "x");
    }
}
