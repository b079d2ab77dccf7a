//! Numerical core: the XIRR root finder.

pub mod newton;

pub use newton::*;
