//! Return series builder.
//!
//! For each date in the snapshot history we re-project the cash flows of the
//! prefix up to that date and re-solve XIRR, giving the annualized series.
//! The cumulative series is derived from the annualized one by compounding
//! each rate over elapsed time, so both series come from one rate estimate.
//!
//! Solver failures never abort a build: the point holds the previous rate
//! (carry-forward) and the failure is recorded on the output for the caller's
//! observability layer. The build itself prints and logs nothing.
//!
//! Complexity is O(n²) over n snapshots (each date re-projects its whole
//! prefix). Fine for histories of a few thousand days.

use chrono::NaiveDate;

use crate::domain::{PortfolioSnapshot, ReturnPoint, SolverParams};
use crate::math::newton::{self, SolveError, year_fraction};
use crate::series::project::project;

/// One date's solver failure, kept out of the series itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFailure {
    pub date: NaiveDate,
    pub error: SolveError,
}

/// A built return series plus the dates where the solver fell back.
#[derive(Debug, Clone, Default)]
pub struct ReturnSeries {
    pub points: Vec<ReturnPoint>,
    pub failures: Vec<SeriesFailure>,
}

/// Build the annualized (XIRR) series, one point per snapshot in date order.
///
/// The first point is always 0.0 without a solve (a single-snapshot prefix
/// has no meaningful rate). On a solver failure the previous point's rate is
/// carried forward so the series stays continuous instead of spiking to zero.
pub fn build_annualized(snapshots: &[PortfolioSnapshot], params: &SolverParams) -> ReturnSeries {
    if snapshots.is_empty() {
        return ReturnSeries::default();
    }

    let mut sorted = snapshots.to_vec();
    sorted.sort_by_key(|s| s.date);

    let mut points: Vec<ReturnPoint> = Vec::with_capacity(sorted.len());
    let mut failures = Vec::new();

    for i in 0..sorted.len() {
        let date = sorted[i].date;

        if i == 0 {
            points.push(ReturnPoint { date, rate: 0.0 });
            continue;
        }

        let flows = project(&sorted[..=i]);
        let rate = match newton::solve(&flows, params) {
            Ok(rate) => rate,
            Err(error) => {
                let held = points.last().map(|p| p.rate).unwrap_or(0.0);
                failures.push(SeriesFailure { date, error });
                held
            }
        };

        points.push(ReturnPoint { date, rate });
    }

    ReturnSeries { points, failures }
}

/// Derive the cumulative (period) series from an annualized one.
///
/// Each annualized rate is compounded over the time elapsed since the first
/// point: `(1 + a)^years - 1` for `years > 0`, else 0.0.
pub fn derive_cumulative(points: &[ReturnPoint]) -> Vec<ReturnPoint> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let start_date = first.date;

    points
        .iter()
        .map(|point| {
            let years = year_fraction(start_date, point.date);
            let rate = if years > 0.0 {
                (1.0 + point.rate).powf(years) - 1.0
            } else {
                0.0
            };
            ReturnPoint {
                date: point.date,
                rate,
            }
        })
        .collect()
}

/// Build the cumulative series directly from a snapshot history.
///
/// Composition of [`build_annualized`] and [`derive_cumulative`]; failures
/// are the annualized build's failures.
pub fn build_cumulative(snapshots: &[PortfolioSnapshot], params: &SolverParams) -> ReturnSeries {
    let annualized = build_annualized(snapshots, params);
    ReturnSeries {
        points: derive_cumulative(&annualized.points),
        failures: annualized.failures,
    }
}
