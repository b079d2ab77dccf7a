//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - portfolio inputs (`PortfolioSnapshot`) and projected flows (`CashFlow`)
//! - series outputs (`ReturnPoint`, `SeriesKind`)
//! - solver tuning (`SolverParams`)
//! - run configuration (`RunConfig`) and the saved-series schema (`SeriesFile`)

pub mod types;

pub use types::*;
