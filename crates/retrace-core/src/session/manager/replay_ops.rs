//! Status transitions and write-back used by the replay engine

use crate::error::{RetraceError, RetraceResult};
use crate::timeline::{ExecutionSnapshot, SessionId, SessionStatus, Tick, Value, VariableState};

use super::types::SessionManager;

impl SessionManager {
    /// Mark a stopped session as replaying and hand out its snapshots.
    ///
    /// Recording sessions and sessions already being replayed are busy.
    pub(crate) fn begin_replay(&self, id: &SessionId) -> RetraceResult<Vec<ExecutionSnapshot>> {
        let mut index = self.index.write();
        let session = index
            .sessions
            .get_mut(id)
            .ok_or_else(|| RetraceError::session_not_found(id.as_str()))?;

        match session.status {
            SessionStatus::Stopped => {
                session.status = SessionStatus::Replaying;
                Ok(session.snapshots.as_slice().to_vec())
            }
            SessionStatus::Recording => Err(RetraceError::session_busy(
                id.as_str(),
                "still recording",
            )),
            SessionStatus::Replaying => Err(RetraceError::session_busy(
                id.as_str(),
                "already being replayed",
            )),
        }
    }

    /// Return a replaying session to `Stopped`
    pub(crate) fn finish_replay(&self, id: &SessionId) {
        let mut index = self.index.write();
        if let Some(session) = index.sessions.get_mut(id) {
            if session.status == SessionStatus::Replaying {
                session.status = SessionStatus::Stopped;
            }
        }
    }

    /// Overwrite a variable in the stored snapshot at `tick`.
    ///
    /// Returns the updated variable, or `None` when the tick or the variable
    /// does not exist.
    pub(crate) fn apply_override(
        &self,
        id: &SessionId,
        tick: Tick,
        name: &str,
        value: &Value,
    ) -> Option<VariableState> {
        let mut index = self.index.write();
        let variable = index
            .sessions
            .get_mut(id)?
            .snapshots
            .get_mut(tick)?
            .variable_mut(name)?;
        variable.override_value(value.clone());
        Some(variable.clone())
    }
}
