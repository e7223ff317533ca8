#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Occurrence data loading and cleaning.
//!
//! Reads a tab-separated Darwin Core export into [`RawOccurrence`] rows
//! ([`loader`]), turns them into typed [`OccurrenceRecord`]s ([`clean`]),
//! and narrows the cleaned set down to a single species.
//!
//! [`RawOccurrence`]: biodiversity_map_occurrence_models::RawOccurrence
//! [`OccurrenceRecord`]: biodiversity_map_occurrence_models::OccurrenceRecord

pub mod clean;
pub mod loader;
pub mod parsing;
pub mod progress;

pub use clean::{CleanedOccurrences, clean_occurrences, filter_by_species, species_list};
pub use loader::{load_occurrences, read_occurrences};

/// Errors that can occur while loading occurrence data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be parsed as delimited text.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks a column the pipeline needs.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Darwin Core name of the missing column.
        column: String,
    },
}
