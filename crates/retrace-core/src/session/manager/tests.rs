use std::sync::Arc;

use tempfile::TempDir;

use super::*;
use crate::config::{RetraceConfig, StorageConfig};
use crate::error::RetraceError;
use crate::events::Event;
use crate::session::storage::{FileSessionStorage, SessionStorage};
use crate::timeline::{SessionId, SessionStatus, SnapshotDraft, StackFrame, Value};

fn file_manager(dir: &TempDir) -> SessionManager {
    let config = RetraceConfig {
        storage: StorageConfig::at(dir.path()),
        ..Default::default()
    };
    SessionManager::from_config(&config)
}

async fn record(manager: &SessionManager, name: &str, values: &[i64]) -> SessionId {
    let session = manager
        .start_recording(name, "/project", "main.js")
        .unwrap();
    for value in values {
        manager
            .capture_snapshot(
                SnapshotDraft::new()
                    .with_frame(StackFrame::new("main", "main.js", 3))
                    .with_local("x", *value),
            )
            .unwrap();
    }
    manager.stop_recording().await.unwrap();
    session.id
}

#[tokio::test]
async fn test_only_one_active_recording() {
    let dir = TempDir::new().unwrap();
    let manager = SessionManager::in_memory(dir.path());

    let first = manager.start_recording("a", "/p", "a.js").unwrap();
    let err = manager.start_recording("b", "/p", "b.js").unwrap_err();
    match err {
        RetraceError::AlreadyRecording { active_id } => assert_eq!(active_id, first.id.0),
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(manager.summaries().len(), 1);
    assert_eq!(manager.active_session_id(), Some(first.id));
}

#[tokio::test]
async fn test_capture_without_session() {
    let dir = TempDir::new().unwrap();
    let manager = SessionManager::in_memory(dir.path());

    let err = manager.capture_snapshot(SnapshotDraft::new()).unwrap_err();
    assert!(matches!(err, RetraceError::NoActiveSession));

    record(&manager, "done", &[1]).await;
    let err = manager.capture_snapshot(SnapshotDraft::new()).unwrap_err();
    assert!(matches!(err, RetraceError::NoActiveSession));
}

#[tokio::test]
async fn test_ticks_are_dense_and_increasing() {
    let dir = TempDir::new().unwrap();
    let manager = SessionManager::in_memory(dir.path());
    let id = record(&manager, "run", &[5, 6, 7, 8]).await;

    let session = manager.get_session(&id).unwrap();
    let ticks: Vec<u64> = session.snapshots.iter().map(|s| s.tick).collect();
    assert_eq!(ticks, vec![1, 2, 3, 4]);
    assert_eq!(session.total_ticks, 4);
    assert_eq!(session.status, SessionStatus::Stopped);
    assert!(session.end_time.is_some());
}

#[tokio::test]
async fn test_stop_without_recording_returns_none() {
    let dir = TempDir::new().unwrap();
    let manager = SessionManager::in_memory(dir.path());
    assert!(manager.stop_recording().await.is_none());
}

#[tokio::test]
async fn test_stop_persists_session() {
    let dir = TempDir::new().unwrap();
    let manager = file_manager(&dir);
    let id = record(&manager, "persisted", &[1, 2]).await;

    let stored = FileSessionStorage::new(dir.path()).load(&id).await.unwrap();
    assert_eq!(stored.total_ticks, 2);
    assert_eq!(stored.status, SessionStatus::Stopped);
}

#[tokio::test]
async fn test_reload_normalizes_status() {
    let dir = TempDir::new().unwrap();
    let storage = FileSessionStorage::new(dir.path());

    let mut interrupted =
        crate::timeline::RecordingSession::new("crashed", Default::default());
    interrupted.capture(SnapshotDraft::new()).unwrap();
    storage.save(&interrupted).await.unwrap();
    tokio::fs::write(dir.path().join("garbage.json"), "{ nope")
        .await
        .unwrap();

    let manager = file_manager(&dir);
    let summary = manager.load_from_storage().await.unwrap();
    assert_eq!(summary.loaded, 1);
    assert_eq!(summary.failures.len(), 1);

    let loaded = manager.get_session(&interrupted.id).unwrap();
    assert_eq!(loaded.status, SessionStatus::Stopped);
    assert!(!manager.is_recording());

    let again = manager.load_from_storage().await.unwrap();
    assert_eq!(again.loaded, 0);
    assert_eq!(again.already_present, 1);
}

#[tokio::test]
async fn test_jump_resolves_nearest_and_publishes() {
    let dir = TempDir::new().unwrap();
    let manager = SessionManager::in_memory(dir.path());
    let id = record(&manager, "run", &[1, 2, 3]).await;
    let mut events = manager.events().subscribe();

    let exact = manager.jump_to_tick(&id, 2).unwrap().unwrap();
    assert_eq!(exact.tick, 2);
    let clamped = manager.jump_to_tick(&id, 50).unwrap().unwrap();
    assert_eq!(clamped.tick, 3);

    assert_eq!(
        events.recv().await.unwrap(),
        Event::JumpPerformed {
            session_id: id.clone(),
            requested: 2,
            resolved: 2,
        }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        Event::JumpPerformed {
            session_id: id.clone(),
            requested: 50,
            resolved: 3,
        }
    );

    let missing = manager.jump_to_tick(&SessionId::from("nope"), 1);
    assert!(matches!(missing, Err(RetraceError::SessionNotFound { .. })));
}

#[tokio::test]
async fn test_jump_on_empty_session() {
    let dir = TempDir::new().unwrap();
    let manager = SessionManager::in_memory(dir.path());
    let id = record(&manager, "empty", &[]).await;
    assert!(manager.jump_to_tick(&id, 1).unwrap().is_none());
}

#[tokio::test]
async fn test_snapshot_range() {
    let dir = TempDir::new().unwrap();
    let manager = SessionManager::in_memory(dir.path());
    let id = record(&manager, "run", &[1, 2, 3, 4, 5]).await;

    let range = manager.snapshot_range(&id, 2, 4).unwrap();
    let values: Vec<Value> = range
        .iter()
        .map(|s| s.variable("x").unwrap().value.clone())
        .collect();
    assert_eq!(values, vec![Value::Int(2), Value::Int(3), Value::Int(4)]);
}

#[tokio::test]
async fn test_delete_rejects_active_session() {
    let dir = TempDir::new().unwrap();
    let manager = file_manager(&dir);
    let live = manager.start_recording("live", "/p", "m.js").unwrap();

    let err = manager.delete_session(&live.id).await.unwrap_err();
    assert!(matches!(err, RetraceError::SessionBusy { .. }));

    manager.stop_recording().await.unwrap();
    manager.delete_session(&live.id).await.unwrap();
    assert!(manager.get_session(&live.id).is_none());
    assert!(!dir.path().join(format!("{}.json", live.id)).exists());

    let err = manager.delete_session(&live.id).await.unwrap_err();
    assert!(matches!(err, RetraceError::SessionNotFound { .. }));
}

#[tokio::test]
async fn test_export_import_mints_new_id() {
    let dir = TempDir::new().unwrap();
    let manager = file_manager(&dir);
    let id = record(&manager, "original", &[1, 2, 3]).await;

    let path = manager.export_session(&id).await.unwrap();
    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with(&format!("export-{}-", id)));

    let imported = manager.import_session(&path).await.unwrap();
    assert_ne!(imported.id, id);
    assert_eq!(imported.name, "original");
    assert_eq!(imported.total_ticks, 3);
    assert_eq!(manager.summaries().len(), 2);

    let original = manager.get_session(&id).unwrap();
    assert_eq!(imported.snapshots, original.snapshots);

    // The export file is skipped by the scan, the imported copy is not
    let fresh = file_manager(&dir);
    assert_eq!(fresh.load_from_storage().await.unwrap().loaded, 2);
}

#[tokio::test]
async fn test_import_corrupt_artifact() {
    let dir = TempDir::new().unwrap();
    let manager = SessionManager::in_memory(dir.path());
    let path = dir.path().join("broken.json");
    tokio::fs::write(&path, "[1, 2").await.unwrap();

    let err = manager.import_session(&path).await.unwrap_err();
    assert!(matches!(err, RetraceError::CorruptArtifact { .. }));
    assert!(manager.summaries().is_empty());
}

#[tokio::test]
async fn test_resolve_id_by_prefix() {
    let dir = TempDir::new().unwrap();
    let manager = SessionManager::in_memory(dir.path());
    let id = record(&manager, "run", &[1]).await;

    assert_eq!(manager.resolve_id(id.as_str()).unwrap(), id);
    assert_eq!(manager.resolve_id(id.short()).unwrap(), id);
    assert!(matches!(
        manager.resolve_id("zzzz-not-there"),
        Err(RetraceError::SessionNotFound { .. })
    ));
}

#[tokio::test]
async fn test_concurrent_capture_keeps_ticks_unique() {
    let dir = TempDir::new().unwrap();
    let manager = Arc::new(SessionManager::in_memory(dir.path()));
    let session = manager.start_recording("threads", "/p", "m.js").unwrap();

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let manager = Arc::clone(&manager);
            std::thread::spawn(move || {
                for _ in 0..50 {
                    manager.capture_snapshot(SnapshotDraft::new()).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    manager.stop_recording().await.unwrap();
    let session = manager.get_session(&session.id).unwrap();
    assert_eq!(session.total_ticks, 200);
    assert!(session.snapshots.validate().is_ok());
    assert_eq!(session.snapshots.last_tick(), Some(200));
}

#[tokio::test]
async fn test_storage_accessor_is_shared() {
    let dir = TempDir::new().unwrap();
    let manager = file_manager(&dir);
    let id = record(&manager, "run", &[1]).await;
    assert!(manager.storage().exists(&id).await.unwrap());
}
