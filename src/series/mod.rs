//! Return series construction.
//!
//! - snapshot prefix → cash flows (`project`)
//! - per-date XIRR series + cumulative transform (`builder`)

pub mod builder;
pub mod project;

pub use builder::*;
pub use project::*;
