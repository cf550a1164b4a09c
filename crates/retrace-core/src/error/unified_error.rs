//! UnifiedError trait implementation for RetraceError

use super::types::{RetraceError, UnifiedError};

impl UnifiedError for RetraceError {
    fn error_code(&self) -> &str {
        match self {
            Self::NoActiveSession => "RETRACE_NO_ACTIVE_SESSION",
            Self::AlreadyRecording { .. } => "RETRACE_ALREADY_RECORDING",
            Self::SessionNotFound { .. } => "RETRACE_SESSION_NOT_FOUND",
            Self::SessionAlreadyExists { .. } => "RETRACE_SESSION_EXISTS",
            Self::SessionBusy { .. } => "RETRACE_SESSION_BUSY",
            Self::CorruptArtifact { .. } => "RETRACE_CORRUPT_ARTIFACT",
            Self::Config { .. } => "RETRACE_CONFIG",
            Self::Io { .. } => "RETRACE_IO",
            Self::Json { .. } => "RETRACE_JSON",
            Self::InvalidInput { .. } => "RETRACE_INVALID_INPUT",
            Self::Storage { .. } => "RETRACE_STORAGE",
            Self::Other { .. } => "RETRACE_OTHER",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Config { message, .. }
            | Self::Io { message, .. }
            | Self::Json { message, .. }
            | Self::InvalidInput { message, .. }
            | Self::Storage { message, .. }
            | Self::Other { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. }
            | Self::Io { context, .. }
            | Self::Json { context, .. }
            | Self::InvalidInput { context, .. }
            | Self::Storage { context, .. }
            | Self::Other { context, .. } => context.as_deref(),
            _ => None,
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoActiveSession
                | Self::AlreadyRecording { .. }
                | Self::SessionBusy { .. }
        )
    }
}
