//! Execution snapshot type definitions
//!
//! An [`ExecutionSnapshot`] is everything the instrumentation layer reported
//! about the traced program at one tick. Snapshots are immutable once they
//! are appended to a session; the only exception is a replay override, which
//! records the overwritten value in [`VariableState::previous_value`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value::Value;

/// Session-scoped logical clock value
pub type Tick = u64;

/// Point-in-time capture of the traced program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSnapshot {
    /// Unique identifier
    pub id: String,

    /// Wall-clock time of the capture
    pub timestamp: DateTime<Utc>,

    /// Logical tick within the owning session
    pub tick: Tick,

    /// Call stack, index 0 is the innermost frame
    #[serde(default)]
    pub call_stack: Vec<StackFrame>,

    /// Variables visible at this tick
    #[serde(default)]
    pub variables: Vec<VariableState>,

    /// Heap usage in bytes as reported by the runtime
    #[serde(default)]
    pub heap_used: u64,

    /// Scheduler / event-loop phase descriptor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_loop_phase: Option<String>,

    #[serde(default)]
    pub async_operations: Vec<AsyncOperation>,

    #[serde(default)]
    pub console_output: Vec<ConsoleEntry>,

    #[serde(default)]
    pub network_requests: Vec<NetworkRequest>,

    #[serde(default)]
    pub file_operations: Vec<FileOperation>,
}

impl ExecutionSnapshot {
    /// Look up a variable by name.
    ///
    /// Names are unique per scope; when the same name exists in several
    /// scopes the innermost (local, then closure, then global) wins.
    pub fn variable(&self, name: &str) -> Option<&VariableState> {
        self.variables
            .iter()
            .filter(|v| v.name == name)
            .min_by_key(|v| v.scope.rank())
    }

    /// Exact lookup of a variable in one scope
    pub fn variable_in(&self, name: &str, scope: VariableScope) -> Option<&VariableState> {
        self.variables
            .iter()
            .find(|v| v.name == name && v.scope == scope)
    }

    /// Mutable variant of [`ExecutionSnapshot::variable`]
    pub fn variable_mut(&mut self, name: &str) -> Option<&mut VariableState> {
        self.variables
            .iter_mut()
            .filter(|v| v.name == name)
            .min_by_key(|v| v.scope.rank())
    }

    /// Innermost stack frame
    pub fn current_frame(&self) -> Option<&StackFrame> {
        self.call_stack.first()
    }

    /// Stack depth
    pub fn depth(&self) -> usize {
        self.call_stack.len()
    }
}

/// A single call-stack frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackFrame {
    pub function_name: String,
    pub file: String,
    pub line: u32,
    #[serde(default)]
    pub column: u32,
    #[serde(default)]
    pub is_async: bool,
    /// Description of the receiver binding, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub this_binding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<Value>>,
}

impl StackFrame {
    /// Create a frame at a source location
    pub fn new(function_name: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            function_name: function_name.into(),
            file: file.into(),
            line,
            column: 0,
            is_async: false,
            this_binding: None,
            arguments: None,
        }
    }

    /// Set the column
    pub fn with_column(mut self, column: u32) -> Self {
        self.column = column;
        self
    }

    /// Mark the frame as an async function
    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    /// Attach captured arguments
    pub fn with_arguments(mut self, arguments: Vec<Value>) -> Self {
        self.arguments = Some(arguments);
        self
    }

    /// `file:line` location string
    pub fn location(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}

/// Lexical scope of a variable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableScope {
    #[default]
    Local,
    Closure,
    Global,
}

impl VariableScope {
    fn rank(self) -> u8 {
        match self {
            Self::Local => 0,
            Self::Closure => 1,
            Self::Global => 2,
        }
    }
}

impl std::fmt::Display for VariableScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Closure => write!(f, "closure"),
            Self::Global => write!(f, "global"),
        }
    }
}

/// State of one variable at one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableState {
    /// Variable name, unique within its scope
    pub name: String,

    /// Current value
    pub value: Value,

    /// Declared type tag
    #[serde(rename = "type")]
    pub type_tag: String,

    #[serde(default)]
    pub scope: VariableScope,

    /// Whether the binding is reassignable
    #[serde(default = "default_mutable")]
    pub mutable: bool,

    /// Value before a replay override replaced it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_value: Option<Value>,
}

fn default_mutable() -> bool {
    true
}

impl VariableState {
    /// Create a local variable, inferring the type tag from the value
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            type_tag: value.type_name().to_string(),
            value,
            scope: VariableScope::Local,
            mutable: true,
            previous_value: None,
        }
    }

    /// Set the scope
    pub fn in_scope(mut self, scope: VariableScope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the declared type tag
    pub fn with_type(mut self, type_tag: impl Into<String>) -> Self {
        self.type_tag = type_tag.into();
        self
    }

    /// Mark as immutable (const / let without mut)
    pub fn immutable(mut self) -> Self {
        self.mutable = false;
        self
    }

    /// Replace the value, remembering the old one
    pub fn override_value(&mut self, new_value: Value) {
        let old = std::mem::replace(&mut self.value, new_value);
        self.previous_value = Some(old);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AsyncKind {
    Promise,
    Timer,
    Io,
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AsyncStatus {
    Pending,
    Resolved,
    Rejected,
}

impl AsyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Rejected => "rejected",
        }
    }
}

/// Outstanding or settled asynchronous work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsyncOperation {
    pub id: String,
    pub kind: AsyncKind,
    pub status: AsyncStatus,
    pub start_tick: Tick,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_tick: Option<Tick>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    Debug,
    Log,
    Info,
    Warn,
    Error,
}

/// Console output emitted by the traced program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub level: ConsoleLevel,
    pub message: String,
    pub tick: Tick,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Network request observed by the instrumentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkRequest {
    pub id: String,
    pub method: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub start_tick: Tick,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_tick: Option<Tick>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOperationKind {
    Read,
    Write,
    Delete,
    Stat,
}

/// File system access observed by the instrumentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileOperation {
    pub id: String,
    pub kind: FileOperationKind,
    pub path: String,
    pub start_tick: Tick,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_tick: Option<Tick>,
    /// Content snapshot, if the reporter captured one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Partial snapshot data handed to the capture entry point.
///
/// Every field is optional; omitted lists become empty lists. The engine
/// assigns the identifier and tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotDraft {
    pub timestamp: Option<DateTime<Utc>>,
    pub call_stack: Vec<StackFrame>,
    pub variables: Vec<VariableState>,
    pub heap_used: Option<u64>,
    pub event_loop_phase: Option<String>,
    pub async_operations: Vec<AsyncOperation>,
    pub console_output: Vec<ConsoleEntry>,
    pub network_requests: Vec<NetworkRequest>,
    pub file_operations: Vec<FileOperation>,
}

impl SnapshotDraft {
    /// Create an empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a frame; frames are pushed innermost first
    pub fn with_frame(mut self, frame: StackFrame) -> Self {
        self.call_stack.push(frame);
        self
    }

    /// Add a variable
    pub fn with_variable(mut self, variable: VariableState) -> Self {
        self.variables.push(variable);
        self
    }

    /// Shorthand for a local variable
    pub fn with_local(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_variable(VariableState::new(name, value))
    }

    pub fn with_heap_used(mut self, bytes: u64) -> Self {
        self.heap_used = Some(bytes);
        self
    }

    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.event_loop_phase = Some(phase.into());
        self
    }

    pub fn with_console(mut self, entry: ConsoleEntry) -> Self {
        self.console_output.push(entry);
        self
    }

    /// Finalize into a snapshot at the given tick
    pub fn into_snapshot(self, tick: Tick) -> ExecutionSnapshot {
        ExecutionSnapshot {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            tick,
            call_stack: self.call_stack,
            variables: self.variables,
            heap_used: self.heap_used.unwrap_or(0),
            event_loop_phase: self.event_loop_phase,
            async_operations: self.async_operations,
            console_output: self.console_output,
            network_requests: self.network_requests,
            file_operations: self.file_operations,
        }
    }
}
