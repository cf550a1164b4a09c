//! Regression point search
//!
//! Walks a working and a failing recording in lockstep and reports the
//! first tick at which their normalized snapshot contents differ.

mod hash;
mod locator;

pub use hash::snapshot_hash;
pub use locator::{RegressionPoint, find_regression_point, locate_regression};
