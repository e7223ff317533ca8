#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Darwin Core occurrence record types.
//!
//! [`RawOccurrence`] mirrors the subset of Darwin Core columns read from a
//! tab-separated occurrence export (e.g. a GBIF download). Cleaning turns
//! raw rows into [`OccurrenceRecord`]s, which always carry a species name
//! and a parsed event date. Rows dropped along the way are accounted for in
//! a [`CleanReport`].

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single occurrence row exactly as read from the input file.
///
/// Every field is optional text: empty cells and absent columns both
/// deserialize to `None`. Columns not listed here are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOccurrence {
    /// GBIF record key, the unique record identifier.
    #[serde(rename = "gbifID", default)]
    pub gbif_id: Option<String>,
    /// Identifier of the record at its originating institution.
    #[serde(rename = "occurrenceID", default)]
    pub occurrence_id: Option<String>,
    /// Taxonomic family.
    #[serde(default)]
    pub family: Option<String>,
    /// Binomial species name.
    #[serde(default)]
    pub species: Option<String>,
    /// Darwin Core `eventDate` (ISO 8601 date, date-time, or interval).
    #[serde(rename = "eventDate", default)]
    pub event_date: Option<String>,
    /// Free-text locality description.
    #[serde(default)]
    pub locality: Option<String>,
    /// WGS84 longitude in decimal degrees.
    #[serde(rename = "decimalLongitude", default)]
    pub decimal_longitude: Option<String>,
    /// WGS84 latitude in decimal degrees.
    #[serde(rename = "decimalLatitude", default)]
    pub decimal_latitude: Option<String>,
}

/// A WGS84 longitude/latitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Latitude in decimal degrees.
    pub latitude: f64,
}

impl Coordinates {
    /// Returns the coordinates as a planar point (x = longitude, y = latitude).
    #[must_use]
    pub const fn point(self) -> geo::Point<f64> {
        geo::Point(geo::Coord {
            x: self.longitude,
            y: self.latitude,
        })
    }
}

/// A cleaned occurrence record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceRecord {
    /// GBIF record key.
    pub record_id: Option<String>,
    /// Origin identifier (`occurrenceID`).
    pub occurrence_id: Option<String>,
    /// Species name. Never empty.
    pub species: String,
    /// Taxonomic family.
    pub family: Option<String>,
    /// Date the organism was observed or collected.
    pub event_date: NaiveDate,
    /// Locality description.
    pub locality: Option<String>,
    /// Location, when the source row had usable coordinates.
    pub coordinates: Option<Coordinates>,
}

impl OccurrenceRecord {
    /// Point geometry for this record, if it has coordinates.
    #[must_use]
    pub fn point(&self) -> Option<geo::Point<f64>> {
        self.coordinates.map(Coordinates::point)
    }

    /// Calendar year of the event date.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.event_date.year()
    }

    /// Calendar month (1-12) of the event date.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.event_date.month()
    }
}

/// A row dropped because its event date could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedDate {
    /// 1-based data row number (the header row is not counted).
    pub row: u64,
    /// The offending `eventDate` value (empty when the cell was blank).
    pub value: String,
}

/// Accounting for one cleaning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanReport {
    /// Rows read from the input.
    pub rows_read: u64,
    /// Rows that became [`OccurrenceRecord`]s.
    pub rows_kept: u64,
    /// Rows dropped for a missing or blank species.
    pub missing_species: u64,
    /// Rows dropped for an unparseable event date.
    pub invalid_dates: Vec<RejectedDate>,
    /// Kept rows that have no usable coordinates.
    pub missing_coordinates: u64,
}

impl CleanReport {
    /// Total number of dropped rows.
    #[must_use]
    pub fn rows_dropped(&self) -> u64 {
        self.missing_species + self.invalid_dates.len() as u64
    }
}
