//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the solver/series code stays clean and testable
//! - output changes are localized (important for future snapshot tests)
//!
//! Rates are fractions everywhere in the core; the percent rendering
//! happens only here.

use crate::domain::{PortfolioStats, ReturnPoint, SeriesKind};
use crate::series::SeriesFailure;

/// Format the run summary (history stats + final rates of both series).
pub fn format_summary(
    stats: &PortfolioStats,
    annualized: &[ReturnPoint],
    cumulative: &[ReturnPoint],
) -> String {
    let mut out = String::new();

    out.push_str("=== xirr - Portfolio Return Series ===\n");
    out.push_str(&format!(
        "Period: {} - {} ({} snapshots)\n",
        stats.start_date, stats.end_date, stats.n_snapshots
    ));
    out.push_str(&format!(
        "Cash: in={:.2} out={:.2} net={:.2}\n",
        stats.total_in, stats.total_out, stats.net_invested
    ));
    out.push_str(&format!(
        "Final valuation: {:.2} | absolute gain: {:.2}\n",
        stats.final_valuation, stats.absolute_gain
    ));
    match stats.simple_return {
        Some(simple) => out.push_str(&format!("Simple return: {}\n", fmt_pct(simple))),
        None => out.push_str("Simple return: n/a (no net investment)\n"),
    }

    if let Some(last) = annualized.last() {
        out.push_str(&format!("Final XIRR (annualized): {}\n", fmt_pct(last.rate)));
    }
    if let Some(last) = cumulative.last() {
        out.push_str(&format!("Final return (period): {}\n", fmt_pct(last.rate)));
    }
    out.push('\n');

    out
}

/// Format one series as a date/rate table.
pub fn format_series_table(points: &[ReturnPoint], kind: SeriesKind) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}:\n", kind.title()));
    out.push_str(&format!("{:<12} | {:>10}\n", "date", "rate"));
    out.push_str(&format!("{:-<12}-|-{:-<10}\n", "", ""));

    for point in points {
        out.push_str(&format!("{:<12} | {:>10}\n", point.date.to_string(), fmt_pct(point.rate)));
    }

    out
}

/// Format the dates where the solver fell back to the previous rate.
pub fn format_failures(failures: &[SeriesFailure]) -> String {
    let mut out = String::new();

    out.push_str("Carried forward (solver did not converge):\n");
    for failure in failures {
        out.push_str(&format!("- {}: {}\n", failure.date, failure.error));
    }

    out
}

fn fmt_pct(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}
