//! Local filesystem session storage
//!
//! Stores each session as `<session-id>.json` in one directory.

use super::artifact::{EXPORT_PREFIX, decode, encode};
use super::{LoadFailure, LoadReport, SessionStorage};
use crate::error::{RetraceError, RetraceResult};
use crate::timeline::{RecordingSession, SessionId};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Local filesystem session storage
pub struct FileSessionStorage {
    /// Base directory for session files
    base_path: PathBuf,
    pretty: bool,
}

impl FileSessionStorage {
    /// Create storage rooted at a directory
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            pretty: true,
        }
    }

    /// Write compact JSON instead of indented JSON
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Ensure storage directory exists
    async fn ensure_dir(&self) -> RetraceResult<()> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            RetraceError::storage(format!("Failed to create session directory: {}", e))
        })?;
        Ok(())
    }

    /// Get file path for a session ID
    fn session_path(&self, id: &SessionId) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }

    /// Canonical artifacts only: `*.json`, not starting with the export prefix
    fn is_session_artifact(path: &Path) -> bool {
        let is_json = path.extension().and_then(|s| s.to_str()) == Some("json");
        let is_export = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(EXPORT_PREFIX));
        is_json && !is_export
    }

    async fn read_session(&self, path: &Path) -> RetraceResult<RecordingSession> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            RetraceError::io_with_path(format!("Failed to read session: {}", e), path)
        })?;
        decode(path, &content)
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn save(&self, session: &RecordingSession) -> RetraceResult<()> {
        self.ensure_dir().await?;

        let path = self.session_path(&session.id);
        let content = encode(session, self.pretty)?;

        fs::write(&path, content).await.map_err(|e| {
            RetraceError::io_with_path(format!("Failed to write session: {}", e), &path)
        })?;
        debug!("Saved session {} to {:?}", session.id, path);

        Ok(())
    }

    async fn load(&self, id: &SessionId) -> RetraceResult<RecordingSession> {
        let path = self.session_path(id);

        if !path.exists() {
            return Err(RetraceError::session_not_found(id.as_str()));
        }

        let session = self.read_session(&path).await?;
        debug!("Loaded session {} from {:?}", id, path);
        Ok(session)
    }

    async fn delete(&self, id: &SessionId) -> RetraceResult<()> {
        let path = self.session_path(id);

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted session {} at {:?}", id, path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Session artifact {:?} already gone", path);
                Ok(())
            }
            Err(e) => Err(RetraceError::io_with_path(
                format!("Failed to delete session: {}", e),
                &path,
            )),
        }
    }

    async fn load_all(&self) -> RetraceResult<LoadReport> {
        let mut report = LoadReport::default();

        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!(
                    "Session directory {:?} not readable ({}), starting empty",
                    self.base_path, e
                );
                return Ok(report);
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!("Stopped scanning {:?}: {}", self.base_path, e);
                    break;
                }
            };

            let path = entry.path();
            if !Self::is_session_artifact(&path) {
                continue;
            }

            match self.read_session(&path).await {
                Ok(session) => report.sessions.push(session),
                Err(error) => {
                    warn!("Skipping unreadable session artifact {:?}: {}", path, error);
                    report.failures.push(LoadFailure { path, error });
                }
            }
        }

        // Sort by start time (newest first)
        report
            .sessions
            .sort_by(|a, b| b.start_time.cmp(&a.start_time));

        Ok(report)
    }
}
