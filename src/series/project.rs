//! Cash-flow projection: snapshot prefix → solver input.
//!
//! Netted policy: the last snapshot's own cash movement is folded into its
//! terminal valuation rather than emitted as separate flows, so the terminal
//! value is never double-counted against that day's deposit/withdrawal.

use crate::domain::{CashFlow, PortfolioSnapshot};

/// Project an ordered snapshot prefix into the minimal cash-flow set.
///
/// - First snapshot: the initial investment is `cash_in`, or `valuation` when
///   no inflow was recorded (a day-one non-zero valuation is an implicit
///   opening contribution); its `cash_out` is a positive flow.
/// - Interior snapshots: their own `cash_in`/`cash_out`, zero amounts omitted.
/// - Last snapshot: only its net valuation, `valuation - cash_in + cash_out`.
pub fn project(snapshots: &[PortfolioSnapshot]) -> Vec<CashFlow> {
    let Some(first) = snapshots.first() else {
        return Vec::new();
    };

    let mut flows = Vec::with_capacity(snapshots.len() + 1);

    let initial_investment = if first.cash_in > 0.0 {
        first.cash_in
    } else if first.valuation > 0.0 {
        first.valuation
    } else {
        0.0
    };

    if initial_investment > 0.0 {
        flows.push(CashFlow {
            date: first.date,
            amount: -initial_investment,
        });
    }
    if first.cash_out > 0.0 {
        flows.push(CashFlow {
            date: first.date,
            amount: first.cash_out,
        });
    }

    if snapshots.len() > 2 {
        for snapshot in &snapshots[1..snapshots.len() - 1] {
            if snapshot.cash_in > 0.0 {
                flows.push(CashFlow {
                    date: snapshot.date,
                    amount: -snapshot.cash_in,
                });
            }
            if snapshot.cash_out > 0.0 {
                flows.push(CashFlow {
                    date: snapshot.date,
                    amount: snapshot.cash_out,
                });
            }
        }
    }

    // Terminal flow: always emitted, even when the net value is zero (a
    // worthless portfolio is still an outcome, not a missing observation).
    if snapshots.len() > 1 {
        let last = &snapshots[snapshots.len() - 1];
        flows.push(CashFlow {
            date: last.date,
            amount: last.valuation - last.cash_in + last.cash_out,
        });
    } else {
        flows.push(CashFlow {
            date: first.date,
            amount: first.valuation - first.cash_in + first.cash_out,
        });
    }

    flows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn snap(date: &str, valuation: f64, cash_in: f64, cash_out: f64) -> PortfolioSnapshot {
        PortfolioSnapshot {
            date: date.parse().unwrap(),
            valuation,
            cash_in,
            cash_out,
        }
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn three_snapshot_history_nets_the_last_day() {
        let history = vec![
            snap("2024-01-01", 10000.0, 10000.0, 0.0),
            snap("2024-06-01", 14000.0, 5000.0, 0.0),
            snap("2025-01-01", 16500.0, 0.0, 0.0),
        ];

        let flows = project(&history);
        assert_eq!(
            flows,
            vec![
                CashFlow { date: d("2024-01-01"), amount: -10000.0 },
                CashFlow { date: d("2024-06-01"), amount: -5000.0 },
                CashFlow { date: d("2025-01-01"), amount: 16500.0 },
            ]
        );
    }

    #[test]
    fn last_day_cash_movement_is_folded_into_the_terminal_value() {
        let history = vec![
            snap("2024-01-01", 10000.0, 10000.0, 0.0),
            snap("2024-06-01", 14500.0, 2000.0, 500.0),
        ];

        // 14500 - 2000 + 500: that day's deposit is not an extra flow.
        let flows = project(&history);
        assert_eq!(
            flows,
            vec![
                CashFlow { date: d("2024-01-01"), amount: -10000.0 },
                CashFlow { date: d("2024-06-01"), amount: 13000.0 },
            ]
        );
    }

    #[test]
    fn zero_activity_interior_days_emit_nothing() {
        let history = vec![
            snap("2024-01-01", 10000.0, 10000.0, 0.0),
            snap("2024-02-01", 10400.0, 0.0, 0.0),
            snap("2024-03-01", 10900.0, 0.0, 0.0),
        ];

        let flows = project(&history);
        assert_eq!(flows.len(), 2);
        assert_eq!(flows[0].date, d("2024-01-01"));
        assert_eq!(flows[1].date, d("2024-03-01"));
    }

    #[test]
    fn day_one_valuation_without_inflow_is_an_implicit_contribution() {
        let history = vec![
            snap("2024-01-01", 5000.0, 0.0, 0.0),
            snap("2024-07-01", 5600.0, 0.0, 0.0),
        ];

        let flows = project(&history);
        assert_eq!(flows[0].amount, -5000.0);
        assert_eq!(flows[1].amount, 5600.0);
    }

    #[test]
    fn day_one_withdrawal_is_a_positive_flow() {
        let history = vec![
            snap("2024-01-01", 9800.0, 10000.0, 200.0),
            snap("2025-01-01", 10500.0, 0.0, 0.0),
        ];

        let flows = project(&history);
        assert_eq!(
            flows,
            vec![
                CashFlow { date: d("2024-01-01"), amount: -10000.0 },
                CashFlow { date: d("2024-01-01"), amount: 200.0 },
                CashFlow { date: d("2025-01-01"), amount: 10500.0 },
            ]
        );
    }

    #[test]
    fn single_snapshot_projects_its_own_net_value() {
        let flows = project(&[snap("2024-01-01", 10000.0, 10000.0, 0.0)]);
        assert_eq!(
            flows,
            vec![
                CashFlow { date: d("2024-01-01"), amount: -10000.0 },
                CashFlow { date: d("2024-01-01"), amount: 0.0 },
            ]
        );
    }

    #[test]
    fn empty_prefix_projects_nothing() {
        assert!(project(&[]).is_empty());
    }
}
