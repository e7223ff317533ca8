//! Cleaning and species filtering.
//!
//! Cleaning drops rows without a species and rows whose event date cannot
//! be parsed. Neither aborts the run: each rejection is logged and counted
//! in the [`CleanReport`]. Rows with unusable coordinates are kept; they
//! simply never take part in spatial aggregation.

use std::collections::BTreeSet;

use biodiversity_map_occurrence_models::{
    CleanReport, OccurrenceRecord, RawOccurrence, RejectedDate,
};

use crate::parsing::{parse_coordinates, parse_event_date};

/// Maximum number of individual date rejections logged at `warn` level.
const MAX_LOGGED_REJECTIONS: usize = 10;

/// Output of [`clean_occurrences`].
#[derive(Debug, Clone, Default)]
pub struct CleanedOccurrences {
    /// Records that passed cleaning, in input order.
    pub records: Vec<OccurrenceRecord>,
    /// What was dropped and why.
    pub report: CleanReport,
}

/// Cleans raw rows into typed records.
#[must_use]
pub fn clean_occurrences(rows: Vec<RawOccurrence>) -> CleanedOccurrences {
    let mut cleaned = CleanedOccurrences::default();
    cleaned.report.rows_read = rows.len() as u64;

    for (idx, row) in rows.into_iter().enumerate() {
        let row_number = idx as u64 + 1;

        let Some(species) = row.species.filter(|s| !s.trim().is_empty()) else {
            cleaned.report.missing_species += 1;
            continue;
        };

        let raw_date = row.event_date.unwrap_or_default();
        let Some(event_date) = parse_event_date(&raw_date) else {
            if cleaned.report.invalid_dates.len() < MAX_LOGGED_REJECTIONS {
                log::warn!("Row {row_number}: dropping record with unparseable eventDate '{raw_date}'");
            }
            cleaned.report.invalid_dates.push(RejectedDate {
                row: row_number,
                value: raw_date,
            });
            continue;
        };

        let coordinates = parse_coordinates(
            row.decimal_longitude.as_deref(),
            row.decimal_latitude.as_deref(),
        );
        if coordinates.is_none() {
            cleaned.report.missing_coordinates += 1;
        }

        cleaned.records.push(OccurrenceRecord {
            record_id: non_blank(row.gbif_id),
            occurrence_id: non_blank(row.occurrence_id),
            species,
            family: non_blank(row.family),
            event_date,
            locality: non_blank(row.locality),
            coordinates,
        });
    }

    cleaned.report.rows_kept = cleaned.records.len() as u64;

    let report = &cleaned.report;
    if report.invalid_dates.len() > MAX_LOGGED_REJECTIONS {
        log::warn!(
            "{} more rows with unparseable eventDate were dropped",
            report.invalid_dates.len() - MAX_LOGGED_REJECTIONS
        );
    }
    log::info!(
        "Cleaned {} rows: kept {}, dropped {} without species, {} with invalid dates ({} kept rows lack coordinates)",
        report.rows_read,
        report.rows_kept,
        report.missing_species,
        report.invalid_dates.len(),
        report.missing_coordinates,
    );

    cleaned
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Sorted, deduplicated species names present in `records`.
#[must_use]
pub fn species_list(records: &[OccurrenceRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.species.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Records whose species exactly equals `species` (case-sensitive).
#[must_use]
pub fn filter_by_species(records: &[OccurrenceRecord], species: &str) -> Vec<OccurrenceRecord> {
    records
        .iter()
        .filter(|r| r.species == species)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(species: Option<&str>, date: Option<&str>) -> RawOccurrence {
        RawOccurrence {
            species: species.map(str::to_string),
            event_date: date.map(str::to_string),
            decimal_longitude: Some("-84.0".to_string()),
            decimal_latitude: Some("10.0".to_string()),
            ..RawOccurrence::default()
        }
    }

    #[test]
    fn drops_rows_without_species() {
        let cleaned = clean_occurrences(vec![
            raw(Some("A"), Some("2019-01-01")),
            raw(None, Some("2019-01-01")),
            raw(Some("   "), Some("2019-01-01")),
        ]);
        assert_eq!(cleaned.records.len(), 1);
        assert_eq!(cleaned.report.missing_species, 2);
        assert_eq!(cleaned.report.rows_read, 3);
        assert_eq!(cleaned.report.rows_kept, 1);
    }

    #[test]
    fn unparseable_dates_are_reported_not_fatal() {
        let cleaned = clean_occurrences(vec![
            raw(Some("A"), Some("2019-01-01")),
            raw(Some("A"), Some("sometime in spring")),
            raw(Some("A"), None),
            raw(Some("B"), Some("2020-05-05")),
        ]);
        assert_eq!(cleaned.records.len(), 2);
        assert_eq!(
            cleaned.report.invalid_dates,
            vec![
                RejectedDate {
                    row: 2,
                    value: "sometime in spring".to_string(),
                },
                RejectedDate {
                    row: 3,
                    value: String::new(),
                },
            ]
        );
        assert_eq!(cleaned.report.rows_dropped(), 2);
    }

    #[test]
    fn keeps_records_without_coordinates() {
        let mut row = raw(Some("A"), Some("2019-01-01"));
        row.decimal_latitude = Some("unknown".to_string());
        let cleaned = clean_occurrences(vec![row]);
        assert_eq!(cleaned.records.len(), 1);
        assert!(cleaned.records[0].coordinates.is_none());
        assert_eq!(cleaned.report.missing_coordinates, 1);
    }

    #[test]
    fn trims_optional_text_fields() {
        let mut row = raw(Some("Ateles geoffroyi"), Some("2019-01-01"));
        row.family = Some(" Atelidae".to_string());
        row.locality = Some(String::new());
        let cleaned = clean_occurrences(vec![row]);
        let record = &cleaned.records[0];
        assert_eq!(record.family.as_deref(), Some("Atelidae"));
        assert!(record.locality.is_none());
    }

    #[test]
    fn species_is_kept_as_written() {
        let cleaned = clean_occurrences(vec![
            raw(Some(" A"), Some("2019")),
            raw(Some("A"), Some("2020")),
        ]);
        assert_eq!(cleaned.records[0].species, " A");
        assert_eq!(species_list(&cleaned.records), vec![" A", "A"]);
        assert_eq!(filter_by_species(&cleaned.records, "A").len(), 1);
    }

    #[test]
    fn species_list_is_sorted_and_unique() {
        let cleaned = clean_occurrences(vec![
            raw(Some("Cebus imitator"), Some("2019")),
            raw(Some("Alouatta palliata"), Some("2019")),
            raw(Some("Cebus imitator"), Some("2019")),
            raw(Some("alouatta palliata"), Some("2019")),
        ]);
        assert_eq!(
            species_list(&cleaned.records),
            vec!["Alouatta palliata", "Cebus imitator", "alouatta palliata"]
        );
    }

    #[test]
    fn filters_by_exact_species() {
        let cleaned = clean_occurrences(vec![
            raw(Some("A"), Some("2019")),
            raw(Some("A"), Some("2020")),
            raw(Some("B"), Some("2021")),
        ]);
        assert_eq!(filter_by_species(&cleaned.records, "A").len(), 2);
        assert_eq!(filter_by_species(&cleaned.records, "B").len(), 1);
        assert!(filter_by_species(&cleaned.records, "a").is_empty());
        assert!(filter_by_species(&cleaned.records, "C").is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let cleaned = clean_occurrences(vec![
            raw(Some("A"), Some("2019")),
            raw(Some("B"), Some("2020")),
            raw(Some("A"), Some("2021")),
        ]);
        let once = filter_by_species(&cleaned.records, "A");
        let twice = filter_by_species(&once, "A");
        assert_eq!(once, twice);
    }
}
