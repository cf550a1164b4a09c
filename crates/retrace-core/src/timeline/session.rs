//! Recording session data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::RetraceResult;

use super::snapshot::{ExecutionSnapshot, SnapshotDraft, Tick};
use super::store::SnapshotStore;

/// Unique identifier for a recording session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Mint a fresh identifier
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Create from a string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for display
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Session lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Accepting snapshots
    Recording,
    /// Finalized; available for analysis
    Stopped,
    /// Held by a replay in progress
    Replaying,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Recording => write!(f, "recording"),
            Self::Stopped => write!(f, "stopped"),
            Self::Replaying => write!(f, "replaying"),
        }
    }
}

/// Where the recorded program came from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,

    /// Language / runtime version string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,
}

/// The unit of recording: one run of one program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingSession {
    pub id: SessionId,
    pub name: String,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    /// Number of ticks captured so far
    pub total_ticks: u64,
    #[serde(default)]
    pub metadata: SessionMetadata,
    #[serde(default)]
    pub snapshots: SnapshotStore,
}

impl RecordingSession {
    /// Create a new session in `Recording` status
    pub fn new(name: impl Into<String>, metadata: SessionMetadata) -> Self {
        Self {
            id: SessionId::new(),
            name: name.into(),
            start_time: Utc::now(),
            end_time: None,
            status: SessionStatus::Recording,
            total_ticks: 0,
            metadata,
            snapshots: SnapshotStore::new(),
        }
    }

    /// Advance the tick counter and append a snapshot built from the draft
    pub fn capture(&mut self, draft: SnapshotDraft) -> RetraceResult<ExecutionSnapshot> {
        let tick = self.total_ticks + 1;
        let snapshot = draft.into_snapshot(tick);
        self.snapshots.append(snapshot.clone())?;
        self.total_ticks = tick;
        Ok(snapshot)
    }

    /// Finalize the session
    pub fn stop(&mut self) {
        self.status = SessionStatus::Stopped;
        self.end_time = Some(Utc::now());
    }

    pub fn is_recording(&self) -> bool {
        self.status == SessionStatus::Recording
    }

    pub fn snapshot(&self, tick: Tick) -> Option<&ExecutionSnapshot> {
        self.snapshots.get(tick)
    }

    /// Wall-clock duration, if the session has ended
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end_time.map(|end| end - self.start_time)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from(self)
    }
}

/// Lightweight session info for listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub name: String,
    pub status: SessionStatus,
    pub total_ticks: u64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub entry_point: Option<String>,
}

impl From<&RecordingSession> for SessionSummary {
    fn from(session: &RecordingSession) -> Self {
        Self {
            id: session.id.clone(),
            name: session.name.clone(),
            status: session.status,
            total_ticks: session.total_ticks,
            start_time: session.start_time,
            end_time: session.end_time,
            entry_point: session.metadata.entry_point.clone(),
        }
    }
}
