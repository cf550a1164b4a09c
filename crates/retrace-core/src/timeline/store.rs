//! Append-only snapshot store
//!
//! Snapshots are kept sorted by tick. Appends are amortized O(1); lookups by
//! exact tick and nearest tick are binary searches.

use serde::{Deserialize, Serialize};

use crate::error::{RetraceError, RetraceResult};

use super::snapshot::{ExecutionSnapshot, Tick};

/// Ordered collection of snapshots owned by one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotStore {
    snapshots: Vec<ExecutionSnapshot>,
}

impl SnapshotStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot. Its tick must be greater than every stored tick.
    pub fn append(&mut self, snapshot: ExecutionSnapshot) -> RetraceResult<()> {
        if let Some(last) = self.last_tick() {
            if snapshot.tick <= last {
                return Err(RetraceError::invalid_input_field(
                    format!(
                        "tick {} is not after the last recorded tick {}",
                        snapshot.tick, last
                    ),
                    "tick",
                ));
            }
        }
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Exact lookup
    pub fn get(&self, tick: Tick) -> Option<&ExecutionSnapshot> {
        self.position(tick).ok().map(|idx| &self.snapshots[idx])
    }

    /// Exact mutable lookup
    pub fn get_mut(&mut self, tick: Tick) -> Option<&mut ExecutionSnapshot> {
        self.position(tick).ok().map(|idx| &mut self.snapshots[idx])
    }

    /// Exact match if present, otherwise the snapshot at the smallest
    /// absolute tick distance. Ties go to the earlier tick.
    pub fn nearest(&self, tick: Tick) -> Option<&ExecutionSnapshot> {
        match self.position(tick) {
            Ok(idx) => Some(&self.snapshots[idx]),
            Err(idx) => {
                let before = idx.checked_sub(1).map(|i| &self.snapshots[i]);
                let after = self.snapshots.get(idx);
                match (before, after) {
                    (Some(b), Some(a)) => {
                        if tick - b.tick <= a.tick - tick {
                            Some(b)
                        } else {
                            Some(a)
                        }
                    }
                    (Some(b), None) => Some(b),
                    (None, Some(a)) => Some(a),
                    (None, None) => None,
                }
            }
        }
    }

    /// Snapshots with `from <= tick <= to`, in tick order
    pub fn range(&self, from: Tick, to: Tick) -> &[ExecutionSnapshot] {
        if from > to {
            return &[];
        }
        let start = self.snapshots.partition_point(|s| s.tick < from);
        let end = self.snapshots.partition_point(|s| s.tick <= to);
        &self.snapshots[start..end]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExecutionSnapshot> {
        self.snapshots.iter()
    }

    pub fn as_slice(&self) -> &[ExecutionSnapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn first_tick(&self) -> Option<Tick> {
        self.snapshots.first().map(|s| s.tick)
    }

    pub fn last_tick(&self) -> Option<Tick> {
        self.snapshots.last().map(|s| s.tick)
    }

    /// Check that ticks are unique and strictly increasing.
    ///
    /// Only needed for stores that did not come through [`SnapshotStore::append`],
    /// i.e. deserialized ones.
    pub fn validate(&self) -> RetraceResult<()> {
        for pair in self.snapshots.windows(2) {
            if pair[1].tick <= pair[0].tick {
                return Err(RetraceError::invalid_input(format!(
                    "snapshot ticks out of order: {} followed by {}",
                    pair[0].tick, pair[1].tick
                )));
            }
        }
        Ok(())
    }

    fn position(&self, tick: Tick) -> Result<usize, usize> {
        self.snapshots.binary_search_by_key(&tick, |s| s.tick)
    }
}

impl<'a> IntoIterator for &'a SnapshotStore {
    type Item = &'a ExecutionSnapshot;
    type IntoIter = std::slice::Iter<'a, ExecutionSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}
