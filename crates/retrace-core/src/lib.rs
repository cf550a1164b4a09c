//! Retrace Core Library
//!
//! This crate records the state of an instrumented program tick by tick and
//! analyzes the recordings afterwards: jumping to a tick, replaying with
//! breakpoints and overrides, diffing two runs and locating the first tick
//! at which a failing run departs from a working one.

pub mod compare;
pub mod config;
pub mod error;
pub mod events;
pub mod regression;
pub mod replay;
pub mod session;
pub mod timeline;

// Re-export commonly used types
pub use compare::{Change, ChangeKind, CompareOptions, DiffResult, VariableChange};
pub use config::{RetraceConfig, load_config};
pub use error::{RetraceError, RetraceResult, UnifiedError};
pub use events::{Event, EventBus, EventFilter};
pub use regression::{RegressionPoint, find_regression_point, snapshot_hash};
pub use replay::{
    ReplayEngine, ReplayEvent, ReplayHandle, ReplayOptions, ReplayOutcome, ReplayState,
    VariableOverride,
};
pub use session::{
    FileSessionStorage, MemorySessionStorage, ReloadSummary, SessionManager, SessionStorage,
};
pub use timeline::{
    ExecutionSnapshot, RecordingSession, SessionId, SessionMetadata, SessionStatus,
    SessionSummary, SnapshotDraft, StackFrame, Tick, Value, VariableScope, VariableState,
};
