//! First-divergence search between a working and a failing run

use serde::{Deserialize, Serialize};

use crate::compare::{self, Change, CompareOptions};
use crate::timeline::{ExecutionSnapshot, RecordingSession, Tick};

use super::hash::snapshot_hash;

/// Where two runs first diverge, and how
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionPoint {
    pub tick: Tick,
    pub working_hash: String,
    pub failing_hash: String,
    /// Differences at `tick`, working side as `before`
    pub changes: Vec<Change>,
}

impl RegressionPoint {
    /// Operator-facing one-liner
    pub fn summary(&self) -> String {
        let short = |hash: &str| hash.get(..12).unwrap_or(hash).to_string();
        format!(
            "regression at tick {} ({} change{}; working {} vs failing {})",
            self.tick,
            self.changes.len(),
            if self.changes.len() == 1 { "" } else { "s" },
            short(&self.working_hash),
            short(&self.failing_hash)
        )
    }
}

/// First tick in the overlap of both runs where their snapshots differ.
///
/// Ticks missing from either run are skipped. Divergence after the shorter
/// run ends is not reported.
pub fn find_regression_point(
    working: &RecordingSession,
    failing: &RecordingSession,
) -> Option<Tick> {
    first_divergence(working, failing).map(|(tick, ..)| tick)
}

/// Like [`find_regression_point`], with the differing hashes and changes
pub fn locate_regression(
    working: &RecordingSession,
    failing: &RecordingSession,
) -> Option<RegressionPoint> {
    let (tick, good, bad) = first_divergence(working, failing)?;
    let working_hash = snapshot_hash(good);
    let failing_hash = snapshot_hash(bad);
    let changes = compare::compare_snapshots(good, bad, &CompareOptions::all());

    Some(RegressionPoint {
        tick,
        working_hash,
        failing_hash,
        changes,
    })
}

fn first_divergence<'a>(
    working: &'a RecordingSession,
    failing: &'a RecordingSession,
) -> Option<(Tick, &'a ExecutionSnapshot, &'a ExecutionSnapshot)> {
    let overlap = working.total_ticks.min(failing.total_ticks);

    for good in working.snapshots.iter().take_while(|s| s.tick <= overlap) {
        let tick = good.tick;
        let Some(bad) = failing.snapshot(tick) else {
            continue;
        };
        if snapshot_hash(good) != snapshot_hash(bad) {
            tracing::debug!(
                "Regression between {} and {} at tick {}",
                working.id,
                failing.id,
                tick
            );
            return Some((tick, good, bad));
        }
    }

    None
}
