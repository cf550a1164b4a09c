//! Session manager types and construction

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::RetraceConfig;
use crate::error::{RetraceError, RetraceResult};
use crate::events::EventBus;
use crate::session::storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};
use crate::timeline::{RecordingSession, SessionId};

/// In-memory session index.
///
/// `active` and the session statuses live behind the same lock so the
/// single-recording check and the status flip happen atomically.
#[derive(Default)]
pub(super) struct SessionIndex {
    pub(super) sessions: HashMap<SessionId, RecordingSession>,
    pub(super) active: Option<SessionId>,
}

/// Owner of every recording session in the process
pub struct SessionManager {
    pub(super) index: RwLock<SessionIndex>,
    pub(super) storage: Arc<dyn SessionStorage>,
    pub(super) events: EventBus,
    pub(super) export_dir: PathBuf,
    pub(super) pretty_exports: bool,
}

impl SessionManager {
    /// Create a manager over an explicit storage backend
    pub fn new(storage: Arc<dyn SessionStorage>, config: &RetraceConfig) -> Self {
        Self {
            index: RwLock::new(SessionIndex::default()),
            storage,
            events: EventBus::new(config.events.bus_capacity),
            export_dir: config.storage.export_dir().clone(),
            pretty_exports: config.storage.pretty_json,
        }
    }

    /// Create a manager persisting to the configured directory
    pub fn from_config(config: &RetraceConfig) -> Self {
        let mut storage = FileSessionStorage::new(&config.storage.directory);
        if !config.storage.pretty_json {
            storage = storage.compact();
        }
        Self::new(Arc::new(storage), config)
    }

    /// Create a manager that keeps sessions in memory only.
    ///
    /// Exports still go to disk under `export_dir`.
    pub fn in_memory(export_dir: impl Into<PathBuf>) -> Self {
        let mut config = RetraceConfig::default();
        config.storage.export_directory = Some(export_dir.into());
        Self::new(Arc::new(MemorySessionStorage::new()), &config)
    }

    /// Event bus for recording/navigation observers
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Storage backend
    pub fn storage(&self) -> &Arc<dyn SessionStorage> {
        &self.storage
    }

    /// Run a closure against a session without cloning it
    pub fn with_session<R>(
        &self,
        id: &SessionId,
        f: impl FnOnce(&RecordingSession) -> R,
    ) -> RetraceResult<R> {
        let index = self.index.read();
        let session = index
            .sessions
            .get(id)
            .ok_or_else(|| RetraceError::session_not_found(id.as_str()))?;
        Ok(f(session))
    }

    /// Run a closure against two sessions at once
    pub fn with_session_pair<R>(
        &self,
        a: &SessionId,
        b: &SessionId,
        f: impl FnOnce(&RecordingSession, &RecordingSession) -> R,
    ) -> RetraceResult<R> {
        let index = self.index.read();
        let first = index
            .sessions
            .get(a)
            .ok_or_else(|| RetraceError::session_not_found(a.as_str()))?;
        let second = index
            .sessions
            .get(b)
            .ok_or_else(|| RetraceError::session_not_found(b.as_str()))?;
        Ok(f(first, second))
    }
}
