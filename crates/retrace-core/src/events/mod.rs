//! Event bus for recorder and replay observers
//!
//! This module provides a broadcast-based event bus so a UI or any other
//! observer can follow recording progress without being wired into the
//! session manager. Replay progress has its own per-replay channel, see
//! [`crate::replay::ReplayHandle`]; only its start and finish are mirrored here.

use tokio::sync::broadcast;

use crate::timeline::{SessionId, Tick};

/// Events published by the session manager and the replay engine
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // ========== Recording Events ==========
    /// A new recording session started
    RecordingStarted { session_id: SessionId, name: String },

    /// A snapshot was appended to the active session
    SnapshotCaptured { session_id: SessionId, tick: Tick },

    /// The active session was finalized
    RecordingStopped {
        session_id: SessionId,
        total_ticks: u64,
    },

    // ========== Navigation Events ==========
    /// A jump resolved a requested tick to a recorded one
    JumpPerformed {
        session_id: SessionId,
        requested: Tick,
        resolved: Tick,
    },

    // ========== Replay Events ==========
    ReplayStarted {
        session_id: SessionId,
        total_ticks: u64,
    },

    /// Replay ended, either by running out of ticks or by cancellation
    ReplayFinished {
        session_id: SessionId,
        ticks_replayed: u64,
        cancelled: bool,
    },

    // ========== Index Events ==========
    SessionDeleted { session_id: SessionId },

    SessionImported {
        session_id: SessionId,
        original_id: SessionId,
    },

    SessionExported {
        session_id: SessionId,
        path: std::path::PathBuf,
    },
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RecordingStarted { .. } => "recording_started",
            Self::SnapshotCaptured { .. } => "snapshot_captured",
            Self::RecordingStopped { .. } => "recording_stopped",
            Self::JumpPerformed { .. } => "jump_performed",
            Self::ReplayStarted { .. } => "replay_started",
            Self::ReplayFinished { .. } => "replay_finished",
            Self::SessionDeleted { .. } => "session_deleted",
            Self::SessionImported { .. } => "session_imported",
            Self::SessionExported { .. } => "session_exported",
        }
    }

    /// Session the event refers to
    pub fn session_id(&self) -> &SessionId {
        match self {
            Self::RecordingStarted { session_id, .. }
            | Self::SnapshotCaptured { session_id, .. }
            | Self::RecordingStopped { session_id, .. }
            | Self::JumpPerformed { session_id, .. }
            | Self::ReplayStarted { session_id, .. }
            | Self::ReplayFinished { session_id, .. }
            | Self::SessionDeleted { session_id }
            | Self::SessionImported { session_id, .. }
            | Self::SessionExported { session_id, .. } => session_id,
        }
    }
}

/// Event bus for system-wide event distribution
///
/// The EventBus uses a broadcast channel to distribute events to multiple subscribers.
/// Each subscriber receives a copy of every published event. A subscriber that
/// falls more than `capacity` events behind loses the oldest ones; capture never
/// waits on a slow observer.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
    capacity: usize,
}

impl EventBus {
    /// Create a new event bus with the specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender, capacity }
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of active receivers that will receive this event.
    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    /// Create a default event bus with capacity of 256 events
    fn default() -> Self {
        Self::new(256)
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            capacity: self.capacity,
        }
    }
}

/// Event filter for selective subscription
#[derive(Debug, Default)]
pub struct EventFilter {
    types: Option<Vec<&'static str>>,
    session_id: Option<SessionId>,
}

impl EventFilter {
    /// Create a new event filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by event types
    pub fn only_types(mut self, types: Vec<&'static str>) -> Self {
        self.types = Some(types);
        self
    }

    /// Only events about one session
    pub fn for_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Check if an event matches the filter
    pub fn matches(&self, event: &Event) -> bool {
        let type_ok = match &self.types {
            Some(types) => types.contains(&event.event_type()),
            None => true,
        };
        let session_ok = match &self.session_id {
            Some(id) => event.session_id() == id,
            None => true,
        };
        type_ok && session_ok
    }
}

/// Filtered event subscriber
pub struct FilteredSubscriber {
    receiver: broadcast::Receiver<Event>,
    filter: EventFilter,
}

impl FilteredSubscriber {
    /// Create a new filtered subscriber
    pub fn new(bus: &EventBus, filter: EventFilter) -> Self {
        Self {
            receiver: bus.subscribe(),
            filter,
        }
    }

    /// Receive the next matching event
    pub async fn recv(&mut self) -> Result<Event, broadcast::error::RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.filter.matches(&event) {
                return Ok(event);
            }
        }
    }

    /// Receive the next matching event without waiting
    pub fn try_recv(&mut self) -> Result<Event, broadcast::error::TryRecvError> {
        loop {
            let event = self.receiver.try_recv()?;
            if self.filter.matches(&event) {
                return Ok(event);
            }
        }
    }
}
