//! Storage, reload and import/export end to end

mod common;

use retrace::config::ConfigLoader;
use retrace::{RetraceError, SessionManager, SessionStatus, Value};
use tempfile::TempDir;

use common::{file_manager, manager_at, record_ints, record_values};

#[tokio::test]
async fn export_then_import_keeps_content_with_new_id() {
    let (manager, _dir) = file_manager();
    let id = record_ints(&manager, "original", "x", &[1, 2, 3]).await;
    let original = manager.get_session(&id).unwrap();

    let path = manager.export_session(&id).await.unwrap();
    let imported = manager.import_session(&path).await.unwrap();

    assert_ne!(imported.id, original.id);
    assert_eq!(imported.snapshots, original.snapshots);
    assert_eq!(imported.total_ticks, original.total_ticks);
    assert_eq!(imported.status, SessionStatus::Stopped);
}

#[tokio::test]
async fn restart_reloads_sessions_and_skips_corrupt_files() {
    let dir = TempDir::new().unwrap();
    let id = {
        let manager = manager_at(&dir);
        record_ints(&manager, "survivor", "x", &[1, 2]).await
    };
    tokio::fs::write(dir.path().join("truncated.json"), "{\"id\": \"abc\"")
        .await
        .unwrap();
    tokio::fs::write(dir.path().join("README.txt"), "not a session")
        .await
        .unwrap();

    let restarted = manager_at(&dir);
    let summary = restarted.load_from_storage().await.unwrap();

    assert_eq!(summary.loaded, 1);
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].path.ends_with("truncated.json"));
    assert!(matches!(
        summary.failures[0].error,
        RetraceError::CorruptArtifact { .. }
    ));

    let session = restarted.get_session(&id).unwrap();
    assert_eq!(session.total_ticks, 2);
}

#[tokio::test]
async fn restart_keeps_sessions_with_non_finite_floats() {
    let dir = TempDir::new().unwrap();
    let values = [
        Value::Float(1.0),
        Value::Float(f64::INFINITY),
        Value::Float(f64::NEG_INFINITY),
    ];
    let id = {
        let manager = manager_at(&dir);
        record_values(&manager, "overflow", "ratio", &values).await
    };

    let restarted = manager_at(&dir);
    let summary = restarted.load_from_storage().await.unwrap();
    assert_eq!(summary.loaded, 1);
    assert!(summary.failures.is_empty());

    let session = restarted.get_session(&id).unwrap();
    let recorded: Vec<Value> = session
        .snapshots
        .iter()
        .map(|s| s.variable("ratio").unwrap().value.clone())
        .collect();
    assert_eq!(recorded, values);
}

#[tokio::test]
async fn import_rejects_tick_count_below_recorded_ticks() {
    let (manager, dir) = file_manager();
    let id = record_ints(&manager, "b", "x", &[1, 2, 9]).await;
    let path = manager.export_session(&id).await.unwrap();

    let mut artifact: serde_json::Value =
        serde_json::from_str(&tokio::fs::read_to_string(&path).await.unwrap()).unwrap();
    artifact["total_ticks"] = serde_json::json!(1);
    let tampered = dir.path().join("tampered.bin");
    tokio::fs::write(&tampered, artifact.to_string()).await.unwrap();

    let err = manager.import_session(&tampered).await.unwrap_err();
    assert!(matches!(err, RetraceError::CorruptArtifact { .. }));
    assert_eq!(manager.list_sessions().len(), 1);
}

#[tokio::test]
async fn export_to_unwritable_location_is_surfaced() {
    let (manager, dir) = file_manager();
    let id = record_ints(&manager, "run", "x", &[1]).await;

    // A regular file where the export directory should be
    let blocker = dir.path().join("blocker");
    tokio::fs::write(&blocker, "").await.unwrap();

    let err = manager
        .export_session_to(&id, &blocker.join("exports"))
        .await
        .unwrap_err();
    assert!(matches!(err, RetraceError::Io { .. }));
}

#[tokio::test]
async fn delete_survives_missing_artifact() {
    let (manager, dir) = file_manager();
    let id = record_ints(&manager, "run", "x", &[1]).await;
    tokio::fs::remove_file(dir.path().join(format!("{}.json", id)))
        .await
        .unwrap();

    manager.delete_session(&id).await.unwrap();
    assert!(manager.get_session(&id).is_none());
}

#[tokio::test]
async fn manager_built_from_config_file() {
    let dir = TempDir::new().unwrap();
    let storage = dir.path().join("sessions");
    let config_path = dir.path().join("retrace.toml");
    let toml = format!(
        "[storage]\ndirectory = {:?}\npretty_json = false\n\n[replay]\nbase_unit_ms = 5\n",
        storage.display().to_string()
    );
    tokio::fs::write(&config_path, toml).await.unwrap();

    let config = ConfigLoader::new().with_file(&config_path).load().unwrap();
    assert_eq!(config.replay.base_unit_ms, 5);

    let manager = SessionManager::from_config(&config);
    let id = record_ints(&manager, "configured", "x", &[1]).await;

    let artifact = tokio::fs::read_to_string(storage.join(format!("{}.json", id)))
        .await
        .unwrap();
    assert!(!artifact.contains('\n'));
}
