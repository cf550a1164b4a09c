//! Standalone session artifacts (export / import)

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tracing::debug;

use crate::error::{RetraceError, RetraceResult};
use crate::timeline::RecordingSession;

/// File name prefix that marks export artifacts.
///
/// Startup scans skip files carrying it so an export in the storage
/// directory is never mistaken for a canonical session.
pub const EXPORT_PREFIX: &str = "export-";

/// `export-<session-id>-<yyyymmddThhmmss>.json`
pub fn export_file_name(session: &RecordingSession) -> String {
    format!(
        "{}{}-{}.json",
        EXPORT_PREFIX,
        session.id,
        Utc::now().format("%Y%m%dT%H%M%S%3f")
    )
}

/// Serialize a session into a standalone artifact inside `dir`
pub async fn write_export(
    dir: &Path,
    session: &RecordingSession,
    pretty: bool,
) -> RetraceResult<PathBuf> {
    fs::create_dir_all(dir).await.map_err(|e| {
        RetraceError::io_with_path(format!("Failed to create export directory: {}", e), dir)
    })?;

    let path = dir.join(export_file_name(session));
    let content = encode(session, pretty)?;
    fs::write(&path, content)
        .await
        .map_err(|e| RetraceError::io_with_path(format!("Failed to write export: {}", e), &path))?;

    debug!("Exported session {} to {:?}", session.id, path);
    Ok(path)
}

/// Read and validate a session artifact
pub async fn read_artifact(path: &Path) -> RetraceResult<RecordingSession> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| RetraceError::io_with_path(format!("Failed to read artifact: {}", e), path))?;
    decode(path, &content)
}

pub(super) fn encode(session: &RecordingSession, pretty: bool) -> RetraceResult<String> {
    let encoded = if pretty {
        serde_json::to_string_pretty(session)?
    } else {
        serde_json::to_string(session)?
    };
    Ok(encoded)
}

pub(super) fn decode(path: &Path, content: &str) -> RetraceResult<RecordingSession> {
    let session: RecordingSession = serde_json::from_str(content)
        .map_err(|e| RetraceError::corrupt_artifact(path, e.to_string()))?;
    session
        .snapshots
        .validate()
        .map_err(|e| RetraceError::corrupt_artifact(path, e.to_string()))?;
    if let Some(last) = session.snapshots.last_tick() {
        if session.total_ticks < last {
            return Err(RetraceError::corrupt_artifact(
                path,
                format!(
                    "total_ticks {} is below the last recorded tick {}",
                    session.total_ticks, last
                ),
            ));
        }
    }
    Ok(session)
}
