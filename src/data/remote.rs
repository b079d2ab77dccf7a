//! Remote portfolio API integration.
//!
//! The endpoint returns the account's snapshot history as JSON:
//!
//! ```json
//! { "snapshots": [ { "date": "2024-01-01", "valuation": 10000.0,
//!                    "cash_in": 10000.0, "cash_out": 0.0 }, ... ] }
//! ```
//!
//! The endpoint URL and optional bearer token come from the environment
//! (`XIRR_API_URL`, `XIRR_API_TOKEN`), loaded via `.env` when present.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::PortfolioSnapshot;
use crate::error::AppError;

const ENV_URL: &str = "XIRR_API_URL";
const ENV_TOKEN: &str = "XIRR_API_TOKEN";

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    snapshots: Vec<PortfolioSnapshot>,
}

pub struct RemoteClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl RemoteClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var(ENV_URL)
            .map_err(|_| AppError::new(2, format!("Missing {ENV_URL} in environment (.env).")))?;
        let token = std::env::var(ENV_TOKEN).ok();
        Ok(Self {
            client: Client::new(),
            base_url,
            token,
        })
    }

    /// Fetch the snapshot history, optionally filtered by account and date range.
    pub fn fetch_history(
        &self,
        account: Option<&str>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<PortfolioSnapshot>, AppError> {
        let mut req = self.client.get(self.base_url.as_str());

        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if let Some(account) = account {
            req = req.query(&[("account", account)]);
        }
        if let Some(from) = from {
            req = req.query(&[("from", from.to_string().as_str())]);
        }
        if let Some(to) = to {
            req = req.query(&[("to", to.to_string().as_str())]);
        }

        let resp = req
            .send()
            .map_err(|e| AppError::new(4, format!("Portfolio API request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Portfolio API request failed with status {}.", resp.status()),
            ));
        }

        let body: HistoryResponse = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse portfolio API response: {e}")))?;

        let mut snapshots: Vec<PortfolioSnapshot> = body
            .snapshots
            .into_iter()
            .filter(|s| row_is_usable(s))
            .collect();

        if snapshots.is_empty() {
            return Err(AppError::new(4, "Portfolio API returned no usable snapshots."));
        }

        snapshots.sort_by_key(|s| s.date);
        Ok(snapshots)
    }
}

/// A usable row has finite, non-negative monetary fields. Anything else is
/// skipped the way a bad observation is, not treated as a fatal response.
fn row_is_usable(snapshot: &PortfolioSnapshot) -> bool {
    [snapshot.valuation, snapshot.cash_in, snapshot.cash_out]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(valuation: f64, cash_in: f64, cash_out: f64) -> PortfolioSnapshot {
        PortfolioSnapshot {
            date: "2024-01-01".parse().unwrap(),
            valuation,
            cash_in,
            cash_out,
        }
    }

    #[test]
    fn usable_rows_are_finite_and_non_negative() {
        assert!(row_is_usable(&snap(10000.0, 0.0, 0.0)));
        assert!(!row_is_usable(&snap(-1.0, 0.0, 0.0)));
        assert!(!row_is_usable(&snap(f64::NAN, 0.0, 0.0)));
        assert!(!row_is_usable(&snap(10000.0, 0.0, f64::INFINITY)));
    }

    #[test]
    fn history_response_deserializes_snapshot_rows() {
        let body = r#"{ "snapshots": [
            { "date": "2024-01-01", "valuation": 10000.0, "cash_in": 10000.0, "cash_out": 0.0 },
            { "date": "2024-06-01", "valuation": 14000.0 }
        ] }"#;

        let parsed: HistoryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.snapshots.len(), 2);
        // Absent cash fields default to zero.
        assert_eq!(parsed.snapshots[1].cash_in, 0.0);
        assert_eq!(parsed.snapshots[1].cash_out, 0.0);
    }
}
