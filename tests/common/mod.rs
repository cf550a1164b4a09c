//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use retrace::config::{RetraceConfig, StorageConfig};
use retrace::{SessionId, SessionManager, SnapshotDraft, StackFrame, Value};
use tempfile::TempDir;

/// Manager persisting to a fresh temporary directory
pub fn file_manager() -> (Arc<SessionManager>, TempDir) {
    let dir = TempDir::new().unwrap();
    (Arc::new(manager_at(&dir)), dir)
}

/// Manager over an existing directory, as a restarted process would see it
pub fn manager_at(dir: &TempDir) -> SessionManager {
    let config = RetraceConfig {
        storage: StorageConfig::at(dir.path()),
        ..Default::default()
    };
    SessionManager::from_config(&config)
}

/// Record one session whose tick `n` holds `name = values[n - 1]`
pub async fn record_values(
    manager: &SessionManager,
    session: &str,
    name: &str,
    values: &[Value],
) -> SessionId {
    let started = manager
        .start_recording(session, "/workspace/app", "index.js")
        .unwrap();
    for (i, value) in values.iter().enumerate() {
        manager
            .capture_snapshot(
                SnapshotDraft::new()
                    .with_frame(StackFrame::new("tick", "index.js", 10 + i as u32))
                    .with_frame(StackFrame::new("main", "index.js", 1))
                    .with_local(name, value.clone()),
            )
            .unwrap();
    }
    manager.stop_recording().await.unwrap();
    started.id
}

/// Integer shorthand for [`record_values`]
pub async fn record_ints(
    manager: &SessionManager,
    session: &str,
    name: &str,
    values: &[i64],
) -> SessionId {
    let values: Vec<Value> = values.iter().map(|v| Value::Int(*v)).collect();
    record_values(manager, session, name, &values).await
}
