//! Chart rendering for the built series.
//!
//! - fixed-grid terminal plot (`ascii`)
//! - PNG chart files (`png`)

pub mod ascii;
pub mod png;

pub use ascii::*;
pub use png::*;
