//! Retrace: time-travel execution recorder and replay engine
//!
//! Facade over [`retrace_core`]. The command-line tool lives in the
//! `retrace-cli` crate.

pub use retrace_core::*;
