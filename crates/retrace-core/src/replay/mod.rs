//! Replay engine
//!
//! Re-emits a stopped session's snapshots one tick at a time with
//! breakpoints, watch expressions and per-tick variable overrides. Each
//! replay runs as its own task and streams [`ReplayEvent`]s over a bounded
//! channel owned by the returned [`ReplayHandle`].

mod engine;
mod events;
mod handle;
mod options;
#[cfg(test)]
mod tests;

pub use engine::ReplayEngine;
pub use events::{ReplayEvent, ReplayOutcome, ReplayState};
pub use handle::ReplayHandle;
pub use options::{ReplayOptions, VariableOverride};
