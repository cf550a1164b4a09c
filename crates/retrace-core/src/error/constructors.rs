//! Constructor methods for RetraceError

use std::path::PathBuf;

use super::types::RetraceError;

impl RetraceError {
    /// Create an already-recording error naming the active session
    pub fn already_recording(active_id: impl Into<String>) -> Self {
        Self::AlreadyRecording {
            active_id: active_id.into(),
        }
    }

    /// Create a session-not-found error
    pub fn session_not_found(id: impl Into<String>) -> Self {
        Self::SessionNotFound { id: id.into() }
    }

    /// Create a session-already-exists error
    pub fn session_exists(id: impl Into<String>) -> Self {
        Self::SessionAlreadyExists { id: id.into() }
    }

    /// Create a session-busy error
    pub fn session_busy(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SessionBusy {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create a corrupt-artifact error
    pub fn corrupt_artifact(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::CorruptArtifact {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
            context: None,
        }
    }

    /// Create an IO error with path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
            context: None,
        }
    }

    /// Create a new JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
            context: None,
        }
    }

    /// Create an invalid input error with field
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
            context: None,
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            context: None,
        }
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            context: None,
        }
    }

    /// Add context to any error that carries a context slot
    pub fn with_context(mut self, new_context: impl Into<String>) -> Self {
        match &mut self {
            Self::Config { context, .. }
            | Self::Io { context, .. }
            | Self::Json { context, .. }
            | Self::InvalidInput { context, .. }
            | Self::Storage { context, .. }
            | Self::Other { context, .. } => {
                *context = Some(new_context.into());
            }
            _ => {}
        }
        self
    }
}
