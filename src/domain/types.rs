//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during the series build
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A single dated, signed monetary amount.
///
/// Sign convention is the investor's: negative = capital leaving the investor
/// (a contribution into the portfolio), positive = capital returning to the
/// investor (a withdrawal, or the terminal valuation of the whole position).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: f64,
}

/// One day's recorded portfolio state.
///
/// `valuation` is the end-of-day market value; `cash_in`/`cash_out` are that
/// day's deposit and withdrawal activity. All three are non-negative; sign
/// semantics are applied only when projecting into `CashFlow`s. A well-formed
/// history has at most one snapshot per date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub date: NaiveDate,
    pub valuation: f64,
    #[serde(default)]
    pub cash_in: f64,
    #[serde(default)]
    pub cash_out: f64,
}

/// A point on a return series.
///
/// `rate` is a signed fraction (0.1163 = 11.63%). Whether it is an annualized
/// XIRR or a cumulative period return is a property of the series the point
/// belongs to, not of the type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub rate: f64,
}

/// Which of the two derived series a table/plot shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Annualized,
    Cumulative,
}

impl SeriesKind {
    /// Short label for plot headers.
    pub fn display_name(self) -> &'static str {
        match self {
            SeriesKind::Annualized => "annualized",
            SeriesKind::Cumulative => "cumulative",
        }
    }

    /// Human-readable title for tables and chart captions.
    pub fn title(self) -> &'static str {
        match self {
            SeriesKind::Annualized => "Annualized return (XIRR)",
            SeriesKind::Cumulative => "Cumulative return (period)",
        }
    }

    /// Y-axis label for chart rendering.
    pub fn axis_label(self) -> &'static str {
        match self {
            SeriesKind::Annualized => "Annualized return (%)",
            SeriesKind::Cumulative => "Period return (%)",
        }
    }
}

/// Newton-Raphson tuning knobs.
///
/// All solver constants are named and overridable rather than baked in.
/// Defaults: initial guess 10%, tolerance 1e-6, budget of 100 iterations,
/// derivative floor 1e-10, and a plausible rate band of (-0.99, 10.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    /// Starting rate for the iteration.
    pub initial_guess: f64,
    /// Convergence threshold on `|r_next - r|`.
    pub tolerance: f64,
    /// Iteration budget.
    pub max_iterations: usize,
    /// Below this `|NPV'(r)|` the step is unreliable and the solve fails.
    pub derivative_floor: f64,
    /// Lower edge of the plausible rate band (guards the `r = -1` singularity).
    pub min_rate: f64,
    /// Upper edge of the plausible rate band.
    pub max_rate: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            initial_guess: 0.10,
            tolerance: 1e-6,
            max_iterations: 100,
            derivative_floor: 1e-10,
            min_rate: -0.99,
            max_rate: 10.0,
        }
    }
}

/// Summary stats about the snapshot history actually used for the build.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioStats {
    pub n_snapshots: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_in: f64,
    pub total_out: f64,
    pub net_invested: f64,
    pub final_valuation: f64,
    pub absolute_gain: f64,
    /// `final_valuation / net_invested - 1`, when net invested is positive.
    pub simple_return: Option<f64>,
}

impl PortfolioStats {
    /// Compute summary stats for a date-sorted history. `None` when empty.
    pub fn from_history(snapshots: &[PortfolioSnapshot]) -> Option<Self> {
        let first = snapshots.first()?;
        let last = snapshots.last()?;

        let total_in: f64 = snapshots.iter().map(|s| s.cash_in).sum();
        let total_out: f64 = snapshots.iter().map(|s| s.cash_out).sum();
        let net_invested = total_in - total_out;
        let final_valuation = last.valuation;

        let simple_return = if net_invested > 0.0 {
            Some(final_valuation / net_invested - 1.0)
        } else {
            None
        };

        Some(Self {
            n_snapshots: snapshots.len(),
            start_date: first.date,
            end_date: last.date,
            total_in,
            total_out,
            net_invested,
            final_valuation,
            absolute_gain: final_valuation - net_invested,
            simple_return,
        })
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Snapshot history CSV. Takes precedence over the other sources.
    pub csv_path: Option<PathBuf>,
    /// Fetch the history from the remote portfolio API instead.
    pub remote: bool,
    /// Account identifier forwarded to the remote API.
    pub account: Option<String>,
    /// Start date filter forwarded to the remote API.
    pub from: Option<NaiveDate>,
    /// End date filter forwarded to the remote API.
    pub to: Option<NaiveDate>,

    /// Synthetic history length (used when neither CSV nor remote is given).
    pub sample_days: usize,
    /// Synthetic history seed.
    pub sample_seed: u64,
    /// First date of the synthetic history.
    pub sample_start: NaiveDate,

    pub solver: SolverParams,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_csv: Option<PathBuf>,
    pub export_series: Option<PathBuf>,
    pub chart_annualized: Option<PathBuf>,
    pub chart_cumulative: Option<PathBuf>,
}

/// A saved series file (JSON).
///
/// The portable representation of one run: both series plus enough metadata
/// to re-plot or compare later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesFile {
    pub tool: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub solver: SolverParams,
    pub annualized: Vec<ReturnPoint>,
    pub cumulative: Vec<ReturnPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(date: &str, valuation: f64, cash_in: f64, cash_out: f64) -> PortfolioSnapshot {
        PortfolioSnapshot {
            date: date.parse().unwrap(),
            valuation,
            cash_in,
            cash_out,
        }
    }

    #[test]
    fn stats_from_history_basic() {
        let history = vec![
            snap("2024-01-01", 10000.0, 10000.0, 0.0),
            snap("2024-06-01", 14000.0, 5000.0, 0.0),
            snap("2025-01-01", 16500.0, 0.0, 0.0),
        ];

        let stats = PortfolioStats::from_history(&history).unwrap();
        assert_eq!(stats.n_snapshots, 3);
        assert_eq!(stats.start_date, "2024-01-01".parse::<NaiveDate>().unwrap());
        assert_eq!(stats.end_date, "2025-01-01".parse::<NaiveDate>().unwrap());
        assert!((stats.net_invested - 15000.0).abs() < 1e-9);
        assert!((stats.absolute_gain - 1500.0).abs() < 1e-9);
        assert!((stats.simple_return.unwrap() - 0.10).abs() < 1e-9);
    }

    #[test]
    fn stats_without_net_investment_have_no_simple_return() {
        let history = vec![snap("2024-01-01", 500.0, 0.0, 0.0)];
        let stats = PortfolioStats::from_history(&history).unwrap();
        assert_eq!(stats.simple_return, None);
    }

    #[test]
    fn stats_from_empty_history_are_none() {
        assert!(PortfolioStats::from_history(&[]).is_none());
    }
}
