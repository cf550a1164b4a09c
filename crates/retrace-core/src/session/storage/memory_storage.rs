//! In-memory session storage implementation

use crate::error::{RetraceError, RetraceResult};
use crate::timeline::{RecordingSession, SessionId};
use async_trait::async_trait;
use std::collections::HashMap;

use super::{LoadReport, SessionStorage};

/// In-memory session storage (for testing and ephemeral recordings)
#[derive(Default)]
pub struct MemorySessionStorage {
    sessions: tokio::sync::RwLock<HashMap<SessionId, RecordingSession>>,
}

impl MemorySessionStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn save(&self, session: &RecordingSession) -> RetraceResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn load(&self, id: &SessionId) -> RetraceResult<RecordingSession> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RetraceError::session_not_found(id.as_str()))
    }

    async fn delete(&self, id: &SessionId) -> RetraceResult<()> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn load_all(&self) -> RetraceResult<LoadReport> {
        let mut sessions: Vec<RecordingSession> =
            self.sessions.read().await.values().cloned().collect();
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(LoadReport {
            sessions,
            failures: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::SessionMetadata;

    #[tokio::test]
    async fn test_memory_storage_roundtrip() {
        let storage = MemorySessionStorage::new();
        let session = RecordingSession::new("mem", SessionMetadata::default());

        storage.save(&session).await.unwrap();
        assert_eq!(storage.len().await, 1);
        assert_eq!(storage.load(&session.id).await.unwrap(), session);

        storage.delete(&session.id).await.unwrap();
        assert!(storage.is_empty().await);
        assert!(matches!(
            storage.load(&session.id).await,
            Err(RetraceError::SessionNotFound { .. })
        ));
    }
}
