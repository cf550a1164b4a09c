//! Difference types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::timeline::{Tick, Value};

/// Category of a difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Variable,
    Callstack,
    Async,
    Network,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable => write!(f, "variable"),
            Self::Callstack => write!(f, "callstack"),
            Self::Async => write!(f, "async"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// One difference between two snapshots at the same tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    /// Value on the first session's side, if it has one
    pub before: Option<Value>,
    /// Value on the second session's side, if it has one
    pub after: Option<Value>,
    pub description: String,
}

impl Change {
    pub(super) fn new(
        kind: ChangeKind,
        before: Option<Value>,
        after: Option<Value>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            before,
            after,
            description: description.into(),
        }
    }

    /// Check if this is a variable change
    pub fn is_variable(&self) -> bool {
        self.kind == ChangeKind::Variable
    }

    /// Check if this is a call-stack change
    pub fn is_callstack(&self) -> bool {
        self.kind == ChangeKind::Callstack
    }
}

/// Every difference found at one tick. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    pub tick: Tick,
    pub changes: Vec<Change>,
}

impl DiffResult {
    /// Count changes of one kind
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.kind == kind).count()
    }

    /// One-line summary, e.g. `tick 6: 2 variable, 1 callstack`
    pub fn summary(&self) -> String {
        let parts: Vec<String> = [
            ChangeKind::Variable,
            ChangeKind::Callstack,
            ChangeKind::Async,
            ChangeKind::Network,
        ]
        .into_iter()
        .filter_map(|kind| match self.count(kind) {
            0 => None,
            n => Some(format!("{} {}", n, kind)),
        })
        .collect();
        format!("tick {}: {}", self.tick, parts.join(", "))
    }
}

/// A tick at which a single variable took a new value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableChange {
    pub tick: Tick,
    pub before: Value,
    pub after: Value,
}
