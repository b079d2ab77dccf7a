//! Command-line parsing for the XIRR return-series tool.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the solver/series code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::SeriesKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "xirr", version, about = "Money-weighted portfolio return series (XIRR)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build both return series, print the summary/tables, plot, export.
    Chart(ChartArgs),
    /// Print the summary and final rates only (useful for scripting).
    Summary(ChartArgs),
    /// Plot a previously exported series JSON.
    Plot(PlotArgs),
}

/// Common options for building the series.
#[derive(Debug, Parser, Clone)]
pub struct ChartArgs {
    /// Snapshot history CSV (date, valuation, cash_in, cash_out).
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Fetch the history from the portfolio API (XIRR_API_URL / XIRR_API_TOKEN).
    #[arg(long)]
    pub remote: bool,

    /// Account identifier forwarded to the portfolio API.
    #[arg(long)]
    pub account: Option<String>,

    /// Start date filter for the portfolio API (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// End date filter for the portfolio API (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Days of synthetic history when no source is given.
    #[arg(long, default_value_t = 180)]
    pub sample_days: usize,

    /// Random seed for the synthetic history.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First date of the synthetic history.
    #[arg(long, default_value = "2024-01-01")]
    pub sample_start: NaiveDate,

    /// Initial guess for the Newton iteration.
    #[arg(long, default_value_t = 0.10)]
    pub guess: f64,

    /// Convergence tolerance on successive rate iterates.
    #[arg(long, default_value_t = 1e-6)]
    pub tolerance: f64,

    /// Iteration budget for the Newton solver.
    #[arg(long, default_value_t = 100)]
    pub max_iterations: usize,

    /// Lower edge of the plausible rate band.
    #[arg(long, default_value_t = -0.99, allow_hyphen_values = true)]
    pub min_rate: f64,

    /// Upper edge of the plausible rate band.
    #[arg(long, default_value_t = 10.0)]
    pub max_rate: f64,

    /// Render terminal plots (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export both series to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export both series (plus run metadata) to JSON.
    #[arg(long = "export-series")]
    pub export_series: Option<PathBuf>,

    /// Render the annualized series to a PNG chart.
    #[arg(long)]
    pub chart: Option<PathBuf>,

    /// Render the cumulative series to a PNG chart.
    #[arg(long = "chart-cumulative")]
    pub chart_cumulative: Option<PathBuf>,
}

/// Options for plotting a saved series.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Series JSON file produced by `xirr chart --export-series`.
    #[arg(long, value_name = "JSON")]
    pub series: PathBuf,

    /// Which series to plot.
    #[arg(long, value_enum, default_value_t = SeriesKind::Cumulative)]
    pub kind: SeriesKind,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}
