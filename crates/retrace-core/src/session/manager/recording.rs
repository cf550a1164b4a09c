//! Recording lifecycle: start, capture, stop

use std::path::PathBuf;

use crate::error::{RetraceError, RetraceResult};
use crate::events::Event;
use crate::timeline::{
    ExecutionSnapshot, RecordingSession, SessionId, SessionMetadata, SnapshotDraft,
};

use super::types::SessionManager;

impl SessionManager {
    /// Start a new recording session.
    ///
    /// Fails with [`RetraceError::AlreadyRecording`] while another session
    /// is active.
    pub fn start_recording(
        &self,
        name: impl Into<String>,
        project_path: impl Into<PathBuf>,
        entry_point: impl Into<String>,
    ) -> RetraceResult<RecordingSession> {
        let metadata = SessionMetadata {
            project_path: Some(project_path.into()),
            entry_point: Some(entry_point.into()),
            runtime_version: None,
        };
        self.start_recording_with(name, metadata)
    }

    /// Start a new recording session with full metadata
    pub fn start_recording_with(
        &self,
        name: impl Into<String>,
        metadata: SessionMetadata,
    ) -> RetraceResult<RecordingSession> {
        let session = RecordingSession::new(name, metadata);

        {
            let mut index = self.index.write();
            if let Some(active) = &index.active {
                return Err(RetraceError::already_recording(active.as_str()));
            }
            index.active = Some(session.id.clone());
            index.sessions.insert(session.id.clone(), session.clone());
        }

        tracing::info!("Started recording session {} ({})", session.id, session.name);
        self.events.publish(Event::RecordingStarted {
            session_id: session.id.clone(),
            name: session.name.clone(),
        });

        Ok(session)
    }

    /// Append a snapshot to the active session.
    ///
    /// Synchronous and allocation-light; called on every tick of the
    /// recorded program.
    pub fn capture_snapshot(&self, draft: SnapshotDraft) -> RetraceResult<ExecutionSnapshot> {
        let (session_id, snapshot) = {
            let mut index = self.index.write();
            let active = index.active.clone().ok_or(RetraceError::NoActiveSession)?;
            let session = index
                .sessions
                .get_mut(&active)
                .ok_or(RetraceError::NoActiveSession)?;
            let snapshot = session.capture(draft)?;
            (active, snapshot)
        };

        tracing::trace!("Captured tick {} for session {}", snapshot.tick, session_id);
        self.events.publish(Event::SnapshotCaptured {
            session_id,
            tick: snapshot.tick,
        });

        Ok(snapshot)
    }

    /// Finalize the active session and persist it.
    ///
    /// Returns `None` when nothing was recording. A persistence failure is
    /// logged and the stopped session stays available in memory.
    #[tracing::instrument(skip_all)]
    pub async fn stop_recording(&self) -> Option<RecordingSession> {
        let session = {
            let mut index = self.index.write();
            let active = index.active.take()?;
            let session = index.sessions.get_mut(&active)?;
            session.stop();
            session.clone()
        };

        tracing::info!(
            "Stopped recording session {} after {} ticks",
            session.id,
            session.total_ticks
        );

        if let Err(e) = self.storage.save(&session).await {
            tracing::warn!("Failed to persist session {}: {}", session.id, e);
        }

        self.events.publish(Event::RecordingStopped {
            session_id: session.id.clone(),
            total_ticks: session.total_ticks,
        });

        Some(session)
    }

    /// The session currently recording, if any
    pub fn active_session(&self) -> Option<RecordingSession> {
        let index = self.index.read();
        let id = index.active.as_ref()?;
        index.sessions.get(id).cloned()
    }

    /// Id of the session currently recording, if any
    pub fn active_session_id(&self) -> Option<SessionId> {
        self.index.read().active.clone()
    }

    /// Whether any session is recording
    pub fn is_recording(&self) -> bool {
        self.index.read().active.is_some()
    }
}
