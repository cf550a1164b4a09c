//! Replay progress events

use serde::{Deserialize, Serialize};

use crate::timeline::{ExecutionSnapshot, SessionId, Tick, VariableState};

/// Progress of one replay, in emission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    /// Emitted once before the first tick
    Started {
        session_id: SessionId,
        total_ticks: u64,
    },
    /// Replay reached a breakpoint tick
    BreakpointHit { tick: Tick },
    /// A watched variable exists at this tick
    WatchUpdate {
        tick: Tick,
        variable: VariableState,
    },
    /// The snapshot for this tick, overrides applied
    Tick { snapshot: Box<ExecutionSnapshot> },
    /// Every tick was replayed
    Completed { ticks_replayed: u64 },
    /// The caller cancelled before the last tick
    Cancelled { ticks_replayed: u64 },
}

impl ReplayEvent {
    /// Tick the event refers to, if any
    pub fn tick(&self) -> Option<Tick> {
        match self {
            Self::BreakpointHit { tick } | Self::WatchUpdate { tick, .. } => Some(*tick),
            Self::Tick { snapshot } => Some(snapshot.tick),
            _ => None,
        }
    }

    /// Whether no further events follow this one
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Cancelled { .. })
    }
}

/// Replay state machine: `Idle -> Replaying -> {Completed, Idle}`.
///
/// Cancellation returns to `Idle`; running out of ticks ends in `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayState {
    Idle,
    Replaying,
    Completed,
}

/// Final result of a replay task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub session_id: SessionId,
    pub ticks_replayed: u64,
    pub cancelled: bool,
}

impl ReplayOutcome {
    pub fn final_state(&self) -> ReplayState {
        if self.cancelled {
            ReplayState::Idle
        } else {
            ReplayState::Completed
        }
    }
}
