//! Timeline data model
//!
//! A [`RecordingSession`] owns an ordered [`SnapshotStore`] of
//! [`ExecutionSnapshot`]s, one per tick reported by the instrumentation layer.

pub mod session;
pub mod snapshot;
pub mod store;
pub mod value;

pub use session::{RecordingSession, SessionId, SessionMetadata, SessionStatus, SessionSummary};
pub use snapshot::{
    AsyncKind, AsyncOperation, AsyncStatus, ConsoleEntry, ConsoleLevel, ExecutionSnapshot,
    FileOperation, FileOperationKind, NetworkRequest, SnapshotDraft, StackFrame, Tick,
    VariableScope, VariableState,
};
pub use store::SnapshotStore;
pub use value::Value;
