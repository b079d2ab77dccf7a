//! Export the built series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per date with both rates side by side, as raw fractions
//! (percent formatting is a presentation concern).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::ReturnPoint;
use crate::error::AppError;

/// Write both series to a CSV file.
///
/// The two series come from one build, so they are aligned by construction;
/// a length mismatch means the caller mixed outputs of different runs.
pub fn write_series_csv(
    path: &Path,
    annualized: &[ReturnPoint],
    cumulative: &[ReturnPoint],
) -> Result<(), AppError> {
    if annualized.len() != cumulative.len() {
        return Err(AppError::new(
            4,
            format!(
                "Series length mismatch during export ({} vs {}).",
                annualized.len(),
                cumulative.len()
            ),
        ));
    }

    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "date,annualized_rate,cumulative_rate")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for (annual, period) in annualized.iter().zip(cumulative) {
        writeln!(file, "{},{:.10},{:.10}", annual.date, annual.rate, period.rate)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
