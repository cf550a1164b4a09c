//! Caller-side view of a running replay

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{RetraceError, RetraceResult};
use crate::timeline::SessionId;

use super::events::{ReplayEvent, ReplayOutcome, ReplayState};

/// Handle to a replay task.
///
/// Events are buffered in a bounded channel; a consumer that stops reading
/// slows the replay down rather than losing events. Dropping the handle
/// detaches the task, which then runs to completion without emitting.
pub struct ReplayHandle {
    session_id: SessionId,
    events: mpsc::Receiver<ReplayEvent>,
    state: watch::Receiver<ReplayState>,
    cancel: CancellationToken,
    task: JoinHandle<ReplayOutcome>,
}

impl ReplayHandle {
    pub(super) fn new(
        session_id: SessionId,
        events: mpsc::Receiver<ReplayEvent>,
        state: watch::Receiver<ReplayState>,
        cancel: CancellationToken,
        task: JoinHandle<ReplayOutcome>,
    ) -> Self {
        Self {
            session_id,
            events,
            state,
            cancel,
            task,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Next event, or `None` once the replay has finished and the buffer is drained
    pub async fn next_event(&mut self) -> Option<ReplayEvent> {
        self.events.recv().await
    }

    /// Current state of the replay
    pub fn state(&self) -> ReplayState {
        *self.state.borrow()
    }

    /// Stop the replay at its next tick boundary
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token shared with the replay task
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the task, discarding events not yet read
    pub async fn finish(self) -> RetraceResult<ReplayOutcome> {
        let Self { events, task, .. } = self;
        drop(events);
        join(task).await
    }

    /// Read every remaining event, then wait for the task
    pub async fn collect(mut self) -> RetraceResult<(Vec<ReplayEvent>, ReplayOutcome)> {
        let mut collected = Vec::new();
        while let Some(event) = self.events.recv().await {
            collected.push(event);
        }
        let outcome = join(self.task).await?;
        Ok((collected, outcome))
    }
}

async fn join(task: JoinHandle<ReplayOutcome>) -> RetraceResult<ReplayOutcome> {
    task.await
        .map_err(|e| RetraceError::other(format!("Replay task failed: {}", e)))
}
