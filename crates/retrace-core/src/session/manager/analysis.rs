//! Read paths: navigation, comparison and regression search

use crate::compare::{self, CompareOptions, DiffResult, VariableChange};
use crate::error::RetraceResult;
use crate::events::Event;
use crate::regression::{self, RegressionPoint};
use crate::timeline::{ExecutionSnapshot, SessionId, Tick};

use super::types::SessionManager;

impl SessionManager {
    /// Snapshot at `tick`, or the one nearest to it.
    ///
    /// `Ok(None)` means the session exists but holds no snapshots.
    pub fn jump_to_tick(
        &self,
        id: &SessionId,
        tick: Tick,
    ) -> RetraceResult<Option<ExecutionSnapshot>> {
        let snapshot = self.with_session(id, |session| session.snapshots.nearest(tick).cloned())?;

        if let Some(found) = &snapshot {
            if found.tick != tick {
                tracing::debug!(
                    "Tick {} not recorded in {}, resolved to {}",
                    tick,
                    id,
                    found.tick
                );
            }
            self.events.publish(Event::JumpPerformed {
                session_id: id.clone(),
                requested: tick,
                resolved: found.tick,
            });
        }

        Ok(snapshot)
    }

    /// Snapshots with `from <= tick <= to`
    pub fn snapshot_range(
        &self,
        id: &SessionId,
        from: Tick,
        to: Tick,
    ) -> RetraceResult<Vec<ExecutionSnapshot>> {
        self.with_session(id, |session| session.snapshots.range(from, to).to_vec())
    }

    /// Tick-by-tick differences between two sessions
    pub fn compare_executions(
        &self,
        a: &SessionId,
        b: &SessionId,
    ) -> RetraceResult<Vec<DiffResult>> {
        self.compare_executions_with(a, b, &CompareOptions::default())
    }

    /// Tick-by-tick differences with optional extra categories
    pub fn compare_executions_with(
        &self,
        a: &SessionId,
        b: &SessionId,
        options: &CompareOptions,
    ) -> RetraceResult<Vec<DiffResult>> {
        self.with_session_pair(a, b, |first, second| {
            compare::compare_executions_with(first, second, options)
        })
    }

    /// Every tick at which `name` changed value
    pub fn find_variable_changes(
        &self,
        id: &SessionId,
        name: &str,
    ) -> RetraceResult<Vec<VariableChange>> {
        self.with_session(id, |session| compare::find_variable_changes(session, name))
    }

    /// First tick at which the failing run diverges from the working one
    pub fn find_regression_point(
        &self,
        working: &SessionId,
        failing: &SessionId,
    ) -> RetraceResult<Option<Tick>> {
        self.with_session_pair(working, failing, regression::find_regression_point)
    }

    /// Regression tick together with the differences found there
    pub fn locate_regression(
        &self,
        working: &SessionId,
        failing: &SessionId,
    ) -> RetraceResult<Option<RegressionPoint>> {
        self.with_session_pair(working, failing, regression::locate_regression)
    }
}
