//! Session index operations: listing, lookup, delete, import/export

use std::path::{Path, PathBuf};

use crate::error::{RetraceError, RetraceResult};
use crate::events::Event;
use crate::session::storage::{LoadFailure, read_artifact, write_export};
use crate::timeline::{RecordingSession, SessionId, SessionStatus, SessionSummary};

use super::types::SessionManager;

/// Result of reloading persisted sessions into the index
#[derive(Debug, Default)]
pub struct ReloadSummary {
    /// Sessions added to the index
    pub loaded: usize,
    /// Sessions skipped because the index already held that id
    pub already_present: usize,
    /// Artifacts that could not be read
    pub failures: Vec<LoadFailure>,
}

impl SessionManager {
    /// Load every persisted session into the index.
    ///
    /// Sessions persisted mid-recording or mid-replay come back as
    /// `Stopped`. Sessions already in memory win over their artifacts.
    #[tracing::instrument(skip_all)]
    pub async fn load_from_storage(&self) -> RetraceResult<ReloadSummary> {
        let report = self.storage.load_all().await?;
        let mut summary = ReloadSummary {
            failures: report.failures,
            ..Default::default()
        };

        {
            let mut index = self.index.write();
            for mut session in report.sessions {
                if index.sessions.contains_key(&session.id) {
                    summary.already_present += 1;
                    continue;
                }
                if session.status != SessionStatus::Stopped {
                    tracing::debug!(
                        "Session {} was persisted while {}, marking stopped",
                        session.id,
                        session.status
                    );
                    session.status = SessionStatus::Stopped;
                }
                index.sessions.insert(session.id.clone(), session);
                summary.loaded += 1;
            }
        }

        tracing::info!(
            "Loaded {} sessions from storage ({} unreadable)",
            summary.loaded,
            summary.failures.len()
        );
        Ok(summary)
    }

    /// Every session in the index, newest first
    pub fn list_sessions(&self) -> Vec<RecordingSession> {
        let index = self.index.read();
        let mut sessions: Vec<RecordingSession> = index.sessions.values().cloned().collect();
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        sessions
    }

    /// Lightweight listing, newest first
    pub fn summaries(&self) -> Vec<SessionSummary> {
        let index = self.index.read();
        let mut summaries: Vec<SessionSummary> =
            index.sessions.values().map(SessionSummary::from).collect();
        summaries.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        summaries
    }

    /// Get a session by id
    pub fn get_session(&self, id: &SessionId) -> Option<RecordingSession> {
        self.index.read().sessions.get(id).cloned()
    }

    /// Resolve a full id or a unique id prefix
    pub fn resolve_id(&self, prefix: &str) -> RetraceResult<SessionId> {
        let index = self.index.read();
        let exact = SessionId::from(prefix);
        if index.sessions.contains_key(&exact) {
            return Ok(exact);
        }

        let mut matches = index
            .sessions
            .keys()
            .filter(|id| id.as_str().starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(id), None) => Ok(id.clone()),
            (Some(_), Some(_)) => Err(RetraceError::invalid_input_field(
                format!("Session prefix '{}' is ambiguous", prefix),
                "session_id",
            )),
            (None, _) => Err(RetraceError::session_not_found(prefix)),
        }
    }

    /// Remove a session from the index and from storage.
    ///
    /// Sessions that are recording or replaying cannot be deleted. A failure
    /// to remove the artifact is logged; the in-memory removal stands.
    #[tracing::instrument(skip_all, fields(session_id = %id))]
    pub async fn delete_session(&self, id: &SessionId) -> RetraceResult<()> {
        {
            let mut index = self.index.write();
            let session = index
                .sessions
                .get(id)
                .ok_or_else(|| RetraceError::session_not_found(id.as_str()))?;
            if session.status != SessionStatus::Stopped {
                return Err(RetraceError::session_busy(
                    id.as_str(),
                    format!("cannot delete while {}", session.status),
                ));
            }
            index.sessions.remove(id);
        }

        if let Err(e) = self.storage.delete(id).await {
            tracing::warn!("Failed to remove artifact for session {}: {}", id, e);
        }

        tracing::info!("Deleted session {}", id);
        self.events.publish(Event::SessionDeleted {
            session_id: id.clone(),
        });
        Ok(())
    }

    /// Write a standalone artifact for a session and return its path
    pub async fn export_session(&self, id: &SessionId) -> RetraceResult<PathBuf> {
        self.export_session_to(id, &self.export_dir).await
    }

    /// Export into an explicit directory
    #[tracing::instrument(skip_all, fields(session_id = %id))]
    pub async fn export_session_to(&self, id: &SessionId, dir: &Path) -> RetraceResult<PathBuf> {
        let session = self
            .get_session(id)
            .ok_or_else(|| RetraceError::session_not_found(id.as_str()))?;

        let path = write_export(dir, &session, self.pretty_exports).await?;

        tracing::info!("Exported session {} to {}", id, path.display());
        self.events.publish(Event::SessionExported {
            session_id: id.clone(),
            path: path.clone(),
        });
        Ok(path)
    }

    /// Read an artifact and add it to the index under a fresh id.
    ///
    /// The imported session is persisted before it becomes visible; if that
    /// fails nothing is added.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub async fn import_session(&self, path: &Path) -> RetraceResult<RecordingSession> {
        let mut session = read_artifact(path).await?;
        // take() leaves a freshly minted id behind
        let original_id = std::mem::take(&mut session.id);
        session.status = SessionStatus::Stopped;

        if self.index.read().sessions.contains_key(&session.id) {
            return Err(RetraceError::session_exists(session.id.as_str()));
        }

        self.storage.save(&session).await?;

        {
            let mut index = self.index.write();
            if index.sessions.contains_key(&session.id) {
                return Err(RetraceError::session_exists(session.id.as_str()));
            }
            index.sessions.insert(session.id.clone(), session.clone());
        }

        tracing::info!(
            "Imported session {} from {} (originally {})",
            session.id,
            path.display(),
            original_id
        );
        self.events.publish(Event::SessionImported {
            session_id: session.id.clone(),
            original_id,
        });
        Ok(session)
    }
}
