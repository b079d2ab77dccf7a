//! Shared "series pipeline" logic used by the CLI subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load snapshots -> stats -> annualized series -> cumulative series
//!
//! The front-end can then focus on presentation (printing vs exporting).
//! This is also where solver fallbacks leave the pure core and hit the
//! observability channel: the builder returns them, we log them.

use tracing::warn;

use crate::data::{RemoteClient, generate_history};
use crate::domain::{PortfolioSnapshot, PortfolioStats, ReturnPoint, RunConfig};
use crate::error::AppError;
use crate::io::ingest::load_history;
use crate::series::{ReturnSeries, build_annualized, derive_cumulative};

/// All computed outputs of a single `xirr chart` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub snapshots: Vec<PortfolioSnapshot>,
    pub stats: PortfolioStats,
    pub annualized: ReturnSeries,
    pub cumulative: Vec<ReturnPoint>,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_chart(config: &RunConfig) -> Result<RunOutput, AppError> {
    let snapshots = load_snapshots(config)?;

    let stats = PortfolioStats::from_history(&snapshots)
        .ok_or_else(|| AppError::new(3, "Snapshot history is empty."))?;

    let annualized = build_annualized(&snapshots, &config.solver);
    for failure in &annualized.failures {
        warn!(
            "XIRR not solved for {}: {} (previous rate carried forward)",
            failure.date, failure.error
        );
    }

    let cumulative = derive_cumulative(&annualized.points);

    Ok(RunOutput {
        snapshots,
        stats,
        annualized,
        cumulative,
    })
}

fn load_snapshots(config: &RunConfig) -> Result<Vec<PortfolioSnapshot>, AppError> {
    if let Some(path) = &config.csv_path {
        let ingest = load_history(path)?;
        for row_error in &ingest.row_errors {
            warn!("CSV line {}: {}", row_error.line, row_error.message);
        }
        Ok(ingest.snapshots)
    } else if config.remote {
        let client = RemoteClient::from_env()?;
        client.fetch_history(config.account.as_deref(), config.from, config.to)
    } else {
        generate_history(config.sample_days, config.sample_seed, config.sample_start)
    }
}
