//! Spreadsheet flavour of the intermediate file.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Workbook, Worksheet};

use super::{column_indices, parse_coordinate, Result, TableError};
use crate::models::{PlaceRecord, COLUMNS};

const SHEET_NAME: &str = "places";

pub(super) fn write(path: &Path, records: &[PlaceRecord]) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        write_text(sheet, row, 0, &record.name)?;
        write_text(sheet, row, 1, &record.address)?;
        if let Some(lat) = record.latitude {
            sheet.write_number(row, 2, lat)?;
        }
        if let Some(lon) = record.longitude {
            sheet.write_number(row, 3, lon)?;
        }
        write_text(sheet, row, 4, &record.description)?;
        write_text(sheet, row, 5, &record.category)?;
        write_text(sheet, row, 6, &record.image_url)?;
    }

    workbook.save(path)?;
    Ok(())
}

/// Empty strings are left as blank cells
fn write_text(sheet: &mut Worksheet, row: u32, col: u16, value: &str) -> Result<()> {
    if !value.is_empty() {
        sheet.write_string(row, col, value)?;
    }
    Ok(())
}

pub(super) fn read(path: &Path) -> Result<Vec<PlaceRecord>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableError::NoSheet(path.to_path_buf()))??;

    if range.is_empty() {
        return Ok(Vec::new());
    }

    // Rows of a range are relative to its first used cell
    let (first_row, _) = range.start().unwrap_or((0, 0));
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(cell_text).collect(),
        None => return Ok(Vec::new()),
    };
    let [name, address, latitude, longitude, description, category, image_url] =
        column_indices(headers.iter().map(String::as_str))?;

    let mut records = Vec::new();
    for (i, row) in rows.enumerate() {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }

        // Spreadsheet rows are 1-based and the header takes the first one
        let line = first_row as usize + i + 2;
        let text = |idx: usize| row.get(idx).map(cell_text).unwrap_or_default();

        records.push(PlaceRecord {
            name: text(name),
            address: text(address),
            latitude: cell_coordinate(row.get(latitude), line, "latitude")?,
            longitude: cell_coordinate(row.get(longitude), line, "longitude")?,
            description: text(description),
            category: text(category),
            image_url: text(image_url),
        });
    }

    Ok(records)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => decode_escapes(s),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Undo the `_xHHHH_` escaping used for control characters in shared
/// strings. A literal `_x` sequence is itself stored as `_x005F_x...`.
fn decode_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find("_x") {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        match escaped_char(candidate) {
            Some(c) => {
                out.push(c);
                rest = &candidate[7..];
            }
            None => {
                out.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Character encoded by a leading `_xHHHH_`, if `s` starts with one
fn escaped_char(s: &str) -> Option<char> {
    let bytes = s.as_bytes();
    if bytes.len() < 7 || bytes[6] != b'_' {
        return None;
    }
    let hex = s.get(2..6)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    char::from_u32(u32::from_str_radix(hex, 16).ok()?)
}

fn cell_coordinate(cell: Option<&Data>, row: usize, column: &'static str) -> Result<Option<f64>> {
    match cell {
        None | Some(Data::Empty) => Ok(None),
        Some(Data::Float(f)) => Ok(Some(*f)),
        Some(Data::Int(i)) => Ok(Some(*i as f64)),
        Some(Data::String(s)) => parse_coordinate(row, column, s),
        Some(other) => Err(TableError::InvalidCell {
            row,
            column,
            value: other.to_string(),
        }),
    }
}
