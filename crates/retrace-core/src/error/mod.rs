//! Error types for Retrace
//!
//! Every failure in the engine is a [`RetraceError`]. Each variant carries a
//! stable error code through the [`UnifiedError`] trait so the CLI and any
//! embedding UI can branch on the kind of failure without string matching:
//! - error_code: A unique identifier for programmatic error handling
//! - message: Human-readable error message
//! - context: Optional additional context about where the error occurred

mod constructors;
mod conversions;
mod types;
mod unified_error;

pub use types::{RetraceError, RetraceResult, UnifiedError};
