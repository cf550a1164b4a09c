//! Session storage abstraction and implementations
//!
//! Provides trait-based storage for session persistence with a local
//! filesystem implementation and an in-memory one.

mod artifact;
mod file_storage;
mod memory_storage;

pub use artifact::{EXPORT_PREFIX, export_file_name, read_artifact, write_export};
pub use file_storage::FileSessionStorage;
pub use memory_storage::MemorySessionStorage;

use crate::error::{RetraceError, RetraceResult};
use crate::timeline::{RecordingSession, SessionId};
use async_trait::async_trait;
use std::path::PathBuf;

/// One artifact that could not be loaded during a scan
#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: RetraceError,
}

/// Outcome of a best-effort scan of persisted sessions
#[derive(Debug, Default)]
pub struct LoadReport {
    pub sessions: Vec<RecordingSession>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Session storage trait for different backends
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Save a session, replacing any previous artifact with the same id
    async fn save(&self, session: &RecordingSession) -> RetraceResult<()>;

    /// Load a session by ID
    async fn load(&self, id: &SessionId) -> RetraceResult<RecordingSession>;

    /// Delete a session's artifact. Deleting a missing artifact succeeds.
    async fn delete(&self, id: &SessionId) -> RetraceResult<()>;

    /// Load every persisted session.
    ///
    /// Never fails because of one bad artifact; those are collected in
    /// [`LoadReport::failures`].
    async fn load_all(&self) -> RetraceResult<LoadReport>;

    /// Check if a session exists
    async fn exists(&self, id: &SessionId) -> RetraceResult<bool> {
        match self.load(id).await {
            Ok(_) => Ok(true),
            Err(RetraceError::SessionNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
