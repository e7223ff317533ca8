//! Year and month histograms.

use biodiversity_map_analytics_models::{TemporalHistogram, TimeGranularity};
use biodiversity_map_occurrence_models::OccurrenceRecord;

/// Records per calendar year of the event date.
#[must_use]
pub fn by_year(records: &[OccurrenceRecord]) -> TemporalHistogram {
    histogram(records, TimeGranularity::Yearly, OccurrenceRecord::year)
}

/// Records per calendar month (1-12), merging all years. Shows
/// seasonality rather than a timeline.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn by_month(records: &[OccurrenceRecord]) -> TemporalHistogram {
    histogram(records, TimeGranularity::Monthly, |r| r.month() as i32)
}

fn histogram(
    records: &[OccurrenceRecord],
    granularity: TimeGranularity,
    unit: impl Fn(&OccurrenceRecord) -> i32,
) -> TemporalHistogram {
    let mut histogram = TemporalHistogram::new(granularity);
    for record in records {
        *histogram.counts.entry(unit(record)).or_insert(0) += 1;
    }
    histogram
}
