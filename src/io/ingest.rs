//! CSV ingest and normalization.
//!
//! This module turns a snapshot-history CSV into a clean, date-sorted
//! `PortfolioSnapshot` list that is safe to build series from.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Tolerant formats**: both `,` and `;` delimiters, and European decimal
//!   commas / space thousands separators (the upstream export convention)
//! - **Separation of concerns**: no solver logic here

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::PortfolioSnapshot;
use crate::error::AppError;

const DATE_COLUMNS: &[&str] = &["date", "day"];
const VALUATION_COLUMNS: &[&str] = &["valuation", "value", "market_value"];
const CASH_IN_COLUMNS: &[&str] = &["cash_in", "cashin", "in", "deposit"];
const CASH_OUT_COLUMNS: &[&str] = &["cash_out", "cashout", "out", "withdrawal"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: normalized, date-sorted snapshots + row errors.
#[derive(Debug, Clone)]
pub struct IngestedHistory {
    pub snapshots: Vec<PortfolioSnapshot>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load and normalize a snapshot-history CSV.
pub fn load_history(path: &Path) -> Result<IngestedHistory, AppError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to read CSV '{}': {e}", path.display())))?;
    let delimiter = detect_delimiter(&raw);
    parse_history(raw.as_bytes(), delimiter)
}

/// Pick the delimiter from the header line. Upstream exports use `;`.
pub fn detect_delimiter(raw: &str) -> u8 {
    let header = raw.lines().next().unwrap_or("");
    if header.contains(';') { b';' } else { b',' }
}

/// Parse a snapshot-history CSV from any reader.
pub fn parse_history(reader: impl Read, delimiter: u8) -> Result<IngestedHistory, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let date_col = find_column(&header_map, DATE_COLUMNS)
        .ok_or_else(|| AppError::new(2, "CSV is missing a 'date' column."))?;
    let valuation_col = find_column(&header_map, VALUATION_COLUMNS)
        .ok_or_else(|| AppError::new(2, "CSV is missing a 'valuation' column."))?;
    let cash_in_col = find_column(&header_map, CASH_IN_COLUMNS)
        .ok_or_else(|| AppError::new(2, "CSV is missing a 'cash_in' column."))?;
    let cash_out_col = find_column(&header_map, CASH_OUT_COLUMNS)
        .ok_or_else(|| AppError::new(2, "CSV is missing a 'cash_out' column."))?;

    let mut snapshots = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in csv_reader.records().enumerate() {
        // +2 because records() starts after the header and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, date_col, valuation_col, cash_in_col, cash_out_col) {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if snapshots.is_empty() {
        return Err(AppError::new(
            3,
            format!("No usable snapshot rows ({} read, {} rejected).", rows_read, row_errors.len()),
        ));
    }

    // Ties on date are kept as-is; the series build tolerates them and
    // deduplication is the data source's call, not ours.
    snapshots.sort_by_key(|s| s.date);

    let rows_used = snapshots.len();
    Ok(IngestedHistory {
        snapshots,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect()
}

fn find_column(header_map: &HashMap<String, usize>, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|n| header_map.get(*n).copied())
}

fn parse_row(
    record: &StringRecord,
    date_col: usize,
    valuation_col: usize,
    cash_in_col: usize,
    cash_out_col: usize,
) -> Result<PortfolioSnapshot, String> {
    let date_raw = record.get(date_col).ok_or("missing date field")?;
    let date = NaiveDate::parse_from_str(date_raw.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{date_raw}': {e}"))?;

    let valuation = parse_money(record.get(valuation_col).unwrap_or(""))?;
    let cash_in = parse_money(record.get(cash_in_col).unwrap_or(""))?;
    let cash_out = parse_money(record.get(cash_out_col).unwrap_or(""))?;

    for (label, value) in [
        ("valuation", valuation),
        ("cash_in", cash_in),
        ("cash_out", cash_out),
    ] {
        if !value.is_finite() {
            return Err(format!("non-finite {label}: {value}"));
        }
        if value < 0.0 {
            return Err(format!("negative {label}: {value}"));
        }
    }

    Ok(PortfolioSnapshot {
        date,
        valuation,
        cash_in,
        cash_out,
    })
}

/// Parse a monetary field, accepting both `1234.56` and the European
/// `1 234,56`. Empty fields mean zero.
fn parse_money(raw: &str) -> Result<f64, String> {
    let cleaned: String = raw.trim().chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return Ok(0.0);
    }

    // With both separators present the comma is a thousands separator;
    // with only a comma it is the decimal mark.
    let normalized = if cleaned.contains('.') {
        cleaned.replace(',', "")
    } else {
        cleaned.replace(',', ".")
    };

    normalized
        .parse::<f64>()
        .map_err(|_| format!("invalid number '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_standard_comma_csv() {
        let csv = "date,valuation,cash_in,cash_out\n\
                   2024-01-01,10000,10000,0\n\
                   2024-06-01,14000,5000,0\n";

        let ingest = parse_history(csv.as_bytes(), b',').unwrap();
        assert_eq!(ingest.rows_read, 2);
        assert_eq!(ingest.rows_used, 2);
        assert!(ingest.row_errors.is_empty());
        assert_eq!(ingest.snapshots[0].valuation, 10000.0);
        assert_eq!(ingest.snapshots[1].cash_in, 5000.0);
    }

    #[test]
    fn parses_the_semicolon_european_format() {
        let csv = "date;valuation;cash_in;cash_out\n\
                   2024-01-01;10 000,50;10000;0\n\
                   2024-06-01;14 250,25;5 000,00;250,75\n";

        let ingest = parse_history(csv.as_bytes(), b';').unwrap();
        assert_eq!(ingest.rows_used, 2);
        assert!((ingest.snapshots[0].valuation - 10000.50).abs() < 1e-9);
        assert!((ingest.snapshots[1].valuation - 14250.25).abs() < 1e-9);
        assert!((ingest.snapshots[1].cash_out - 250.75).abs() < 1e-9);
    }

    #[test]
    fn detects_the_delimiter_from_the_header() {
        assert_eq!(detect_delimiter("date;valuation;cash_in;cash_out\n"), b';');
        assert_eq!(detect_delimiter("date,valuation,cash_in,cash_out\n"), b',');
    }

    #[test]
    fn bad_rows_are_collected_not_fatal() {
        let csv = "date,valuation,cash_in,cash_out\n\
                   2024-01-01,10000,10000,0\n\
                   not-a-date,1,2,3\n\
                   2024-02-01,oops,0,0\n\
                   2024-03-01,11000,0,0\n";

        let ingest = parse_history(csv.as_bytes(), b',').unwrap();
        assert_eq!(ingest.rows_read, 4);
        assert_eq!(ingest.rows_used, 2);
        assert_eq!(ingest.row_errors.len(), 2);
        assert_eq!(ingest.row_errors[0].line, 3);
    }

    #[test]
    fn negative_amounts_violate_the_snapshot_invariant() {
        let csv = "date,valuation,cash_in,cash_out\n\
                   2024-01-01,10000,-500,0\n\
                   2024-02-01,10100,0,0\n";

        let ingest = parse_history(csv.as_bytes(), b',').unwrap();
        assert_eq!(ingest.rows_used, 1);
        assert!(ingest.row_errors[0].message.contains("negative cash_in"));
    }

    #[test]
    fn rows_come_out_date_sorted() {
        let csv = "date,valuation,cash_in,cash_out\n\
                   2024-06-01,14000,5000,0\n\
                   2024-01-01,10000,10000,0\n";

        let ingest = parse_history(csv.as_bytes(), b',').unwrap();
        assert!(ingest.snapshots[0].date < ingest.snapshots[1].date);
    }

    #[test]
    fn a_csv_with_no_usable_rows_is_a_data_error() {
        let csv = "date,valuation,cash_in,cash_out\nnope,1,2,3\n";
        let err = parse_history(csv.as_bytes(), b',').unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn missing_columns_are_a_schema_error() {
        let csv = "date,valuation\n2024-01-01,10000\n";
        let err = parse_history(csv.as_bytes(), b',').unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn header_aliases_are_accepted() {
        let csv = "Date,Value,Deposit,Withdrawal\n2024-01-01,10000,10000,0\n";
        let ingest = parse_history(csv.as_bytes(), b',').unwrap();
        assert_eq!(ingest.rows_used, 1);
    }
}
