//! XIRR root finder (Newton-Raphson on the NPV function).
//!
//! Given dated cash flows, we look for the annualized rate `r` such that
//!
//! ```text
//! NPV(r) = Σ amount_i / (1 + r)^years_i = 0
//! ```
//!
//! where `years_i` is measured from the earliest flow's date.
//!
//! Implementation choices:
//! - Newton-Raphson rather than bisection: the NPV curve is well-behaved with
//!   a single root near realistic returns, and Newton gets there in a handful
//!   of iterations.
//! - A bounded rate band substitutes for a global-convergence proof: an
//!   iterate escaping `(min_rate, max_rate]` fails the solve instead of
//!   running toward the singularity at `r = -1` or an implausible >1000%.
//! - Years use a fixed 365-day denominator, no leap-year adjustment. This is
//!   a deliberate simplification; both series transforms share the constant.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{CashFlow, SolverParams};

/// Fixed day-count denominator shared by the solver and the cumulative transform.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Why a solve produced no rate.
///
/// Callers apply different fallback policies per variant, so this is a typed
/// enum rather than a message string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// Fewer than 2 cash flows; the XIRR equation is undefined.
    #[error("need at least 2 cash flows, got {count}")]
    InsufficientData { count: usize },
    /// All flows share one sign; no feasible root.
    #[error("cash flows need both a contribution and a return")]
    NoSignChange,
    /// The NPV slope degenerated; no reliable Newton step.
    #[error("NPV derivative too small at iteration {iteration}")]
    DerivativeTooSmall { iteration: usize },
    /// An iterate escaped the plausible rate band.
    #[error("iteration diverged to rate {rate:.4}")]
    DivergentRate { rate: f64 },
    /// The iteration budget ran out without convergence.
    #[error("no convergence within {max_iterations} iterations")]
    MaxIterationsExceeded { max_iterations: usize },
}

/// Year fraction between two dates under the fixed 365-day convention.
pub fn year_fraction(base: NaiveDate, date: NaiveDate) -> f64 {
    date.signed_duration_since(base).num_days() as f64 / DAYS_PER_YEAR
}

/// Solve the XIRR equation for a set of dated cash flows.
///
/// The flows are sorted by date internally; the base date is the earliest
/// flow's date. Preconditions (at least 2 flows, mixed signs) are enforced
/// here, not by the caller.
pub fn solve(cash_flows: &[CashFlow], params: &SolverParams) -> Result<f64, SolveError> {
    if cash_flows.len() < 2 {
        return Err(SolveError::InsufficientData {
            count: cash_flows.len(),
        });
    }

    let has_positive = cash_flows.iter().any(|f| f.amount > 0.0);
    let has_negative = cash_flows.iter().any(|f| f.amount < 0.0);
    if !has_positive || !has_negative {
        return Err(SolveError::NoSignChange);
    }

    let mut flows = cash_flows.to_vec();
    flows.sort_by_key(|f| f.date);
    let base_date = flows[0].date;

    let mut rate = params.initial_guess;

    for iteration in 0..params.max_iterations {
        let value = npv(&flows, base_date, rate);
        let slope = npv_derivative(&flows, base_date, rate);

        if slope.abs() < params.derivative_floor {
            return Err(SolveError::DerivativeTooSmall { iteration });
        }

        let next = rate - value / slope;

        if (next - rate).abs() < params.tolerance {
            return Ok(next);
        }

        rate = next;

        if rate < params.min_rate || rate > params.max_rate {
            return Err(SolveError::DivergentRate { rate });
        }
    }

    Err(SolveError::MaxIterationsExceeded {
        max_iterations: params.max_iterations,
    })
}

/// Net present value of the flows discounted to `base_date` at `rate`.
fn npv(flows: &[CashFlow], base_date: NaiveDate, rate: f64) -> f64 {
    flows
        .iter()
        .map(|flow| {
            let years = year_fraction(base_date, flow.date);
            flow.amount / (1.0 + rate).powf(years)
        })
        .sum()
}

/// Derivative of the NPV with respect to the rate.
fn npv_derivative(flows: &[CashFlow], base_date: NaiveDate, rate: f64) -> f64 {
    flows
        .iter()
        .map(|flow| {
            let years = year_fraction(base_date, flow.date);
            -years * flow.amount / (1.0 + rate).powf(years + 1.0)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(date: &str, amount: f64) -> CashFlow {
        CashFlow {
            date: date.parse().unwrap(),
            amount,
        }
    }

    #[test]
    fn flat_roundtrip_solves_to_zero_rate() {
        // -5000 out, 5000 back exactly 365 days later: rate must be ~0.
        let flows = vec![flow("2023-01-01", -5000.0), flow("2024-01-01", 5000.0)];
        let rate = solve(&flows, &SolverParams::default()).unwrap();
        assert!(rate.abs() < 1e-6, "expected ~0, got {rate}");
    }

    #[test]
    fn ten_percent_gain_over_one_year() {
        let flows = vec![flow("2023-01-01", -1000.0), flow("2024-01-01", 1100.0)];
        let rate = solve(&flows, &SolverParams::default()).unwrap();
        assert!((rate - 0.10).abs() < 1e-4, "expected ~0.10, got {rate}");
    }

    #[test]
    fn unsorted_input_is_sorted_internally() {
        let flows = vec![flow("2024-01-01", 1100.0), flow("2023-01-01", -1000.0)];
        let rate = solve(&flows, &SolverParams::default()).unwrap();
        assert!((rate - 0.10).abs() < 1e-4);
    }

    #[test]
    fn single_flow_is_insufficient() {
        let flows = vec![flow("2023-01-01", -1000.0)];
        assert_eq!(
            solve(&flows, &SolverParams::default()),
            Err(SolveError::InsufficientData { count: 1 })
        );
        assert_eq!(
            solve(&[], &SolverParams::default()),
            Err(SolveError::InsufficientData { count: 0 })
        );
    }

    #[test]
    fn same_sign_flows_have_no_root() {
        let all_positive = vec![flow("2023-01-01", 1000.0), flow("2024-01-01", 1100.0)];
        assert_eq!(
            solve(&all_positive, &SolverParams::default()),
            Err(SolveError::NoSignChange)
        );

        let all_negative = vec![flow("2023-01-01", -1000.0), flow("2024-01-01", -1100.0)];
        assert_eq!(
            solve(&all_negative, &SolverParams::default()),
            Err(SolveError::NoSignChange)
        );
    }

    #[test]
    fn same_day_flows_degenerate_to_flat_slope() {
        // All flows on one date make NPV constant in r; the derivative check
        // must catch it on the first iteration.
        let flows = vec![flow("2023-01-01", -100.0), flow("2023-01-01", 100.0)];
        assert_eq!(
            solve(&flows, &SolverParams::default()),
            Err(SolveError::DerivativeTooSmall { iteration: 0 })
        );
    }

    #[test]
    fn rate_band_is_enforced() {
        // Root is at 0.10; a band capped at 0.05 must reject the first step
        // that crosses it.
        let flows = vec![flow("2023-01-01", -1000.0), flow("2024-01-01", 1100.0)];
        let params = SolverParams {
            initial_guess: 0.02,
            max_rate: 0.05,
            ..SolverParams::default()
        };
        assert!(matches!(
            solve(&flows, &params),
            Err(SolveError::DivergentRate { .. })
        ));
    }

    #[test]
    fn iteration_budget_is_respected() {
        // A zero tolerance can never be met; the budget must cut the loop.
        let flows = vec![flow("2023-01-01", -1000.0), flow("2024-01-01", 1100.0)];
        let params = SolverParams {
            tolerance: 0.0,
            max_iterations: 5,
            ..SolverParams::default()
        };
        assert_eq!(
            solve(&flows, &params),
            Err(SolveError::MaxIterationsExceeded { max_iterations: 5 })
        );
    }

    #[test]
    fn year_fraction_uses_fixed_365() {
        let base: NaiveDate = "2023-01-01".parse().unwrap();
        let one_year: NaiveDate = "2024-01-01".parse().unwrap();
        assert!((year_fraction(base, one_year) - 1.0).abs() < 1e-12);
        // 2024 is a leap year; the convention deliberately ignores that.
        let leap: NaiveDate = "2025-01-01".parse().unwrap();
        assert!((year_fraction(one_year, leap) - 366.0 / 365.0).abs() < 1e-12);
    }
}
