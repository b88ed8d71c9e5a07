//! Transaction table loader.
//!
//! Reads the marketplace CSV export into an immutable `Vec<Transaction>`.
//! Every cell is validated up front; the first malformed row aborts the load
//! so the engine never sees a partial table.

use super::schema::Transaction;
use crate::utils::config::{DATETIME_FORMATS, DATE_FORMATS, REQUIRED_COLUMNS};
use crate::utils::error::ParseError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Positions of the required columns in the header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    timestamp: usize,
    username: usize,
    seller: usize,
    action: usize,
    item_name: usize,
    quantity: usize,
    price: usize,
    x: usize,
    y: usize,
    z: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, ParseError> {
        let mut positions = [0usize; 10];

        for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS.iter()) {
            *slot = headers
                .iter()
                .position(|h| h == *name)
                .ok_or_else(|| ParseError::MissingColumn(name.to_string()))?;
        }

        // Same order as REQUIRED_COLUMNS
        let [timestamp, username, seller, action, item_name, quantity, price, x, y, z] = positions;

        Ok(Self {
            timestamp,
            username,
            seller,
            action,
            item_name,
            quantity,
            price,
            x,
            y,
            z,
        })
    }
}

/// Load the transaction table from a CSV file
///
/// **Public** - main entry point for loading
///
/// # Arguments
/// * `path` - Path to the CSV export (header row required)
///
/// # Returns
/// All rows, in file order
///
/// # Errors
/// * `ParseError::Io` - File cannot be opened
/// * `ParseError::MissingColumn` - A required column is absent
/// * `ParseError::InvalidTimestamp` / `ParseError::InvalidValue` - Malformed cell
pub fn load_transactions(path: impl AsRef<Path>) -> Result<Vec<Transaction>, ParseError> {
    let path = path.as_ref();

    info!("Loading transactions from: {}", path.display());

    let file = File::open(path)?;
    let table = parse_transactions(BufReader::new(file))?;

    info!("Loaded {} transactions", table.len());

    Ok(table)
}

/// Parse a transaction table from any CSV reader
///
/// **Public** - used by `load_transactions` and by tests with in-memory input
pub fn parse_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>, ParseError> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let columns = ColumnIndex::from_headers(csv_reader.headers()?)?;
    debug!("Resolved column layout: {:?}", columns);

    let mut rows = Vec::new();
    // Every quantity sum is bounded by the table total
    let mut quantity_total: u64 = 0;

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let tx = parse_record(&record, &columns, line)?;

        quantity_total = quantity_total.checked_add(tx.quantity).ok_or_else(|| {
            invalid(line, "quantity", cell(&record, columns.quantity), "quantity total overflows")
        })?;

        rows.push(tx);
    }

    Ok(rows)
}

/// Convert one CSV record into a transaction
///
/// **Private** - internal helper for parse_transactions
fn parse_record(
    record: &StringRecord,
    columns: &ColumnIndex,
    row: u64,
) -> Result<Transaction, ParseError> {
    let raw_timestamp = cell(record, columns.timestamp);
    let timestamp =
        parse_timestamp(raw_timestamp).ok_or_else(|| ParseError::InvalidTimestamp {
            row,
            value: raw_timestamp.to_string(),
        })?;

    Ok(Transaction {
        timestamp,
        username: identifier(record, columns.username),
        seller: identifier(record, columns.seller),
        action: identifier(record, columns.action),
        item_name: identifier(record, columns.item_name),
        quantity: parse_quantity(cell(record, columns.quantity), row)?,
        price: parse_price(cell(record, columns.price), row)?,
        x: parse_coordinate(cell(record, columns.x), "x", row)?,
        y: parse_coordinate(cell(record, columns.y), "y", row)?,
        z: parse_coordinate(cell(record, columns.z), "z", row)?,
    })
}

fn cell(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("")
}

fn identifier(record: &StringRecord, index: usize) -> Option<String> {
    Some(cell(record, index))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a timestamp in any of the accepted layouts
///
/// **Public** - shared with tests and callers building tables by hand
///
/// RFC 3339 values carrying an offset are normalised to UTC. Date-only
/// values resolve to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn invalid(row: u64, column: &str, value: &str, reason: &'static str) -> ParseError {
    ParseError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
        reason,
    }
}

fn parse_quantity(raw: &str, row: u64) -> Result<u64, ParseError> {
    if raw.is_empty() {
        return Ok(0);
    }

    if let Ok(quantity) = raw.parse::<u64>() {
        return Ok(quantity);
    }

    // Exports sometimes write integral counts as floats ("3.0")
    let value: f64 = raw
        .parse()
        .map_err(|_| invalid(row, "quantity", raw, "not a number"))?;

    if !value.is_finite() || value < 0.0 {
        return Err(invalid(row, "quantity", raw, "must be a non-negative number"));
    }
    if value.fract() != 0.0 {
        return Err(invalid(row, "quantity", raw, "must be a whole number"));
    }
    // 2^64 is exactly representable; anything at or above it does not fit
    if value >= u64::MAX as f64 {
        return Err(invalid(row, "quantity", raw, "out of range"));
    }

    Ok(value as u64)
}

fn parse_price(raw: &str, row: u64) -> Result<f64, ParseError> {
    if raw.is_empty() {
        return Ok(0.0);
    }

    let value: f64 = raw
        .parse()
        .map_err(|_| invalid(row, "price", raw, "not a number"))?;

    if !value.is_finite() || value < 0.0 {
        return Err(invalid(row, "price", raw, "must be a non-negative number"));
    }

    Ok(value)
}

fn parse_coordinate(raw: &str, column: &str, row: u64) -> Result<f64, ParseError> {
    if raw.is_empty() {
        return Err(invalid(row, column, raw, "coordinate is required"));
    }

    let value: f64 = raw
        .parse()
        .map_err(|_| invalid(row, column, raw, "not a number"))?;

    if !value.is_finite() {
        return Err(invalid(row, column, raw, "must be finite"));
    }

    Ok(value)
}
