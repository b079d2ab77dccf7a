//! Read/write series JSON files.
//!
//! Series JSON is the "portable" representation of one run:
//! - both return series (annualized + cumulative)
//! - run metadata (date range, solver parameters)
//!
//! The schema is defined by `domain::SeriesFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{ReturnPoint, SeriesFile, SolverParams};
use crate::error::AppError;

/// Write a series JSON file.
pub fn write_series_json(
    path: &Path,
    annualized: &[ReturnPoint],
    cumulative: &[ReturnPoint],
    solver: &SolverParams,
) -> Result<(), AppError> {
    let (Some(first), Some(last)) = (annualized.first(), annualized.last()) else {
        return Err(AppError::new(3, "No return points to export."));
    };

    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create series JSON '{}': {e}", path.display())))?;

    let series = SeriesFile {
        tool: "xirr".to_string(),
        start_date: first.date,
        end_date: last.date,
        solver: *solver,
        annualized: annualized.to_vec(),
        cumulative: cumulative.to_vec(),
    };

    serde_json::to_writer_pretty(file, &series)
        .map_err(|e| AppError::new(2, format!("Failed to write series JSON: {e}")))?;

    Ok(())
}

/// Read a series JSON file.
pub fn read_series_json(path: &Path) -> Result<SeriesFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open series JSON '{}': {e}", path.display())))?;
    let series: SeriesFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid series JSON: {e}")))?;
    Ok(series)
}
