//! Core error types and traits for Retrace

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Retrace operations
pub type RetraceResult<T> = Result<T, RetraceError>;

/// Unified error trait that all Retrace errors implement.
///
/// - error_code(): Unique code for programmatic error identification
/// - message(): Human-readable error message
/// - context(): Optional additional context
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> String;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }

    /// Whether the caller can fix the situation and try again
    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Main error type for Retrace
#[derive(Error, Debug, Clone)]
pub enum RetraceError {
    /// A snapshot was captured while no session was recording
    #[error("No active recording session")]
    NoActiveSession,

    /// A recording was started while another one is still active
    #[error("Session {active_id} is already recording")]
    AlreadyRecording { active_id: String },

    /// An operation referenced an unknown session id
    #[error("Session not found: {id}")]
    SessionNotFound { id: String },

    /// A session with this id is already present in the index
    #[error("Session already exists: {id}")]
    SessionAlreadyExists { id: String },

    /// The session is being replayed or is still recording
    #[error("Session {id} is busy: {reason}")]
    SessionBusy { id: String, reason: String },

    /// A persisted session failed to deserialize
    #[error("Corrupt session artifact {}: {message}", .path.display())]
    CorruptArtifact { path: PathBuf, message: String },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        context: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
        context: Option<String>,
    },

    /// Storage/persistence errors
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        context: Option<String>,
    },

    /// Generic error with context
    #[error("Error: {message}")]
    Other {
        message: String,
        context: Option<String>,
    },
}
