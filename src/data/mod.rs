//! Snapshot history sources.
//!
//! - remote portfolio API over HTTP JSON (`remote`)
//! - deterministic synthetic histories for demos and tests (`sample`)
//!
//! CSV files go through `io::ingest` instead.

pub mod remote;
pub mod sample;

pub use remote::*;
pub use sample::*;
