//! Intermediate tabular file between the fetch and import stages.
//!
//! The format is picked from the file extension: `.xlsx` (one worksheet) or
//! `.csv`. Both carry a header row with the record field names, written even
//! when there are no records.

mod delimited;
mod error;
mod xlsx;

use std::path::Path;

use tracing::debug;

use crate::models::{PlaceRecord, COLUMNS};

pub use error::{Result, TableError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Xlsx,
    Csv,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("xlsx") => Ok(Self::Xlsx),
            Some("csv") => Ok(Self::Csv),
            _ => Err(TableError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Write all records, replacing any existing file
pub fn write_records(path: &Path, records: &[PlaceRecord]) -> Result<()> {
    let format = TableFormat::from_path(path)?;
    debug!("Writing {} records to {} as {:?}", records.len(), path.display(), format);

    match format {
        TableFormat::Xlsx => xlsx::write(path, records),
        TableFormat::Csv => delimited::write(path, records),
    }
}

/// Read every record in file order
pub fn read_records(path: &Path) -> Result<Vec<PlaceRecord>> {
    let format = TableFormat::from_path(path)?;
    let records = match format {
        TableFormat::Xlsx => xlsx::read(path)?,
        TableFormat::Csv => delimited::read(path)?,
    };

    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Position of each expected column in `headers`, in `COLUMNS` order.
/// Extra columns are ignored.
fn column_indices<'a, I>(headers: I) -> Result<[usize; COLUMNS.len()]>
where
    I: IntoIterator<Item = &'a str>,
{
    let headers: Vec<&str> = headers.into_iter().map(str::trim).collect();
    let mut indices = [0; COLUMNS.len()];

    for (slot, column) in indices.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| *h == column)
            .ok_or(TableError::MissingColumn(column))?;
    }

    Ok(indices)
}

fn parse_coordinate(row: usize, column: &'static str, raw: &str) -> Result<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| TableError::InvalidCell {
            row,
            column,
            value: raw.to_string(),
        })
}
