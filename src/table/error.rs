use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing the intermediate file
#[derive(Error, Debug)]
pub enum TableError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Spreadsheet read error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported file extension: {0} (expected .xlsx or .csv)")]
    UnsupportedFormat(PathBuf),

    #[error("Workbook has no worksheet: {0}")]
    NoSheet(PathBuf),

    #[error("Column '{0}' not found in header")]
    MissingColumn(&'static str),

    #[error("Invalid value in row {row}, column '{column}': {value}")]
    InvalidCell {
        row: usize,
        column: &'static str,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, TableError>;
