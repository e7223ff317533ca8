//! Tab-separated Darwin Core reader.
//!
//! GBIF "simple" downloads are tab-delimited with no quoting: locality
//! strings routinely contain bare `"` characters, so quote handling is
//! disabled. Rows may be ragged; missing trailing cells read as empty.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use biodiversity_map_occurrence_models::RawOccurrence;

use crate::SourceError;
use crate::progress::ProgressCallback;

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "species",
    "eventDate",
    "decimalLongitude",
    "decimalLatitude",
];

/// Number of rows between progress updates.
const PROGRESS_BATCH: u64 = 1_000;

/// Reads every row of an occurrence file.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened, is not valid
/// delimited text, or lacks one of [`REQUIRED_COLUMNS`].
pub fn load_occurrences(
    path: &Path,
    progress: &dyn ProgressCallback,
) -> Result<Vec<RawOccurrence>, SourceError> {
    log::info!("Reading occurrences from {}", path.display());
    let file = File::open(path)?;
    read_occurrences(BufReader::new(file), progress)
}

/// Reads every row of tab-separated occurrence data from `reader`.
///
/// # Errors
///
/// Returns [`SourceError`] if the input is not valid delimited text or
/// lacks one of [`REQUIRED_COLUMNS`].
pub fn read_occurrences<R: Read>(
    reader: R,
    progress: &dyn ProgressCallback,
) -> Result<Vec<RawOccurrence>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let headers: csv::StringRecord = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim())
        .collect();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(SourceError::MissingColumn {
                column: (*column).to_string(),
            });
        }
    }
    log::debug!("Occurrence file has {} columns", headers.len());
    reader.set_headers(headers);

    progress.set_message("Reading occurrences".to_string());

    let mut rows = Vec::new();
    for result in reader.deserialize::<RawOccurrence>() {
        rows.push(result?);

        if rows.len() as u64 % PROGRESS_BATCH == 0 {
            progress.inc(PROGRESS_BATCH);
        }
    }
    progress.inc(rows.len() as u64 % PROGRESS_BATCH);

    log::info!("Read {} occurrence rows", rows.len());
    progress.finish(format!("Read {} occurrence rows", rows.len()));

    Ok(rows)
}
