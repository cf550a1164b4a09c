//! Session manager
//!
//! This module provides the high-level session API: recording, the session
//! index, import/export and the read paths used by analysis and replay.

mod analysis;
mod index;
mod recording;
mod replay_ops;
#[cfg(test)]
mod tests;
mod types;

pub use index::ReloadSummary;
pub use types::SessionManager;
