//! CSV flavour of the intermediate file.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use super::{column_indices, parse_coordinate, Result};
use crate::models::{PlaceRecord, COLUMNS};

pub(super) fn write(path: &Path, records: &[PlaceRecord]) -> Result<()> {
    // Header is written by hand so that an empty collection still gets one
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(COLUMNS)?;

    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}

pub(super) fn read(path: &Path) -> Result<Vec<PlaceRecord>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Ok(Vec::new());
    }
    let [name, address, latitude, longitude, description, category, image_url] =
        column_indices(headers.iter())?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result?;
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        // Header is line 1
        let line = i + 2;
        let field = |idx: usize| field_at(&row, idx);

        records.push(PlaceRecord {
            name: field(name),
            address: field(address),
            latitude: parse_coordinate(line, "latitude", &field(latitude))?,
            longitude: parse_coordinate(line, "longitude", &field(longitude))?,
            description: field(description),
            category: field(category),
            image_url: field(image_url),
        });
    }

    Ok(records)
}

fn field_at(row: &StringRecord, idx: usize) -> String {
    row.get(idx).unwrap_or_default().to_string()
}
