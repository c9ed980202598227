//! CSV ingestion with a fixed positional schema.
//!
//! Input is comma-delimited with a header row, columns in file order:
//! `date,open,high,low,close,adj_close,volume`. Binding is positional, not
//! header-driven; the column order is a contract with the data source.
//! Empty numeric fields (and the literal `null` some exporters write)
//! become NaN and are left for the sanitation pass; any other malformed
//! field aborts the whole load. No partial dataset is ever returned.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::schema::StockRecord;

/// Fields a data row must have, in file order.
const COLUMN_NAMES: [&str; 7] = [
    "date",
    "open",
    "high",
    "low",
    "close",
    "adj_close",
    "volume",
];

/// Errors from the loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("csv read error: {0}")]
    Read(#[from] csv::Error),

    #[error("line {line}: expected {expected} fields, got {got}")]
    FieldCount {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("line {line}: malformed {column} field '{value}'")]
    Parse {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// Read a whole CSV file into records.
///
/// The header line is skipped. Fails on the first malformed row.
pub fn load_csv(path: &Path) -> Result<Vec<StockRecord>, LoadError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    parse_rows(reader)
}

fn parse_rows<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<StockRecord>, LoadError> {
    let mut records = Vec::new();

    for (index, row) in reader.records().enumerate() {
        let row = row?;
        // The header occupies line 1; data rows start at line 2.
        let line = index + 2;

        if row.len() != COLUMN_NAMES.len() {
            return Err(LoadError::FieldCount {
                line,
                expected: COLUMN_NAMES.len(),
                got: row.len(),
            });
        }

        records.push(StockRecord {
            date: parse_date(&row[0], line)?,
            open: parse_value(&row[1], line, COLUMN_NAMES[1])?,
            high: parse_value(&row[2], line, COLUMN_NAMES[2])?,
            low: parse_value(&row[3], line, COLUMN_NAMES[3])?,
            close: parse_value(&row[4], line, COLUMN_NAMES[4])?,
            adj_close: parse_value(&row[5], line, COLUMN_NAMES[5])?,
            volume: parse_value(&row[6], line, COLUMN_NAMES[6])?,
        });
    }

    Ok(records)
}

/// ISO-8601 calendar date. A date is always required.
fn parse_date(field: &str, line: usize) -> Result<NaiveDate, LoadError> {
    NaiveDate::from_str(field.trim()).map_err(|_| LoadError::Parse {
        line,
        column: COLUMN_NAMES[0],
        value: field.to_string(),
    })
}

/// Numeric field. Empty and `null` mean missing and parse to NaN.
fn parse_value(field: &str, line: usize, column: &'static str) -> Result<f64, LoadError> {
    let trimmed = field.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(f64::NAN);
    }
    trimmed.parse::<f64>().map_err(|_| LoadError::Parse {
        line,
        column,
        value: field.to_string(),
    })
}
