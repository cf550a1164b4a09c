//! Replay task

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::config::ReplayConfig;
use crate::error::RetraceResult;
use crate::events::Event;
use crate::session::SessionManager;
use crate::timeline::{ExecutionSnapshot, SessionId};

use super::events::{ReplayEvent, ReplayOutcome, ReplayState};
use super::handle::ReplayHandle;
use super::options::ReplayOptions;

/// Starts replays of sessions held by a [`SessionManager`]
#[derive(Clone)]
pub struct ReplayEngine {
    manager: Arc<SessionManager>,
    config: ReplayConfig,
}

impl ReplayEngine {
    pub fn new(manager: Arc<SessionManager>, config: ReplayConfig) -> Self {
        Self { manager, config }
    }

    pub fn manager(&self) -> &Arc<SessionManager> {
        &self.manager
    }

    /// Start replaying a session with a fresh cancellation token
    pub fn replay(&self, id: &SessionId, options: ReplayOptions) -> RetraceResult<ReplayHandle> {
        self.replay_with_cancel(id, options, CancellationToken::new())
    }

    /// Start replaying a session, stopping when `cancel` fires.
    ///
    /// The session must be stopped; it is marked as replaying until the task
    /// ends. Must be called from within a tokio runtime.
    pub fn replay_with_cancel(
        &self,
        id: &SessionId,
        options: ReplayOptions,
        cancel: CancellationToken,
    ) -> RetraceResult<ReplayHandle> {
        options.validate()?;
        let snapshots = self.manager.begin_replay(id)?;

        let (event_tx, event_rx) = mpsc::channel(self.config.event_buffer.max(1));
        let (state_tx, state_rx) = watch::channel(ReplayState::Replaying);

        let run = ReplayRun {
            manager: Arc::clone(&self.manager),
            session_id: id.clone(),
            delay: options.tick_delay(self.config.base_unit()),
            options,
            events: event_tx,
            state: state_tx,
            cancel: cancel.clone(),
        };

        tracing::info!(
            "Replaying session {} ({} ticks, {:?} per tick)",
            id,
            snapshots.len(),
            run.delay
        );
        let task = tokio::spawn(run.execute(snapshots));

        Ok(ReplayHandle::new(id.clone(), event_rx, state_rx, cancel, task))
    }
}

/// Everything one replay task owns
struct ReplayRun {
    manager: Arc<SessionManager>,
    session_id: SessionId,
    options: ReplayOptions,
    delay: Duration,
    events: mpsc::Sender<ReplayEvent>,
    state: watch::Sender<ReplayState>,
    cancel: CancellationToken,
}

impl ReplayRun {
    async fn execute(self, snapshots: Vec<ExecutionSnapshot>) -> ReplayOutcome {
        let total_ticks = snapshots.len() as u64;
        self.manager.events().publish(Event::ReplayStarted {
            session_id: self.session_id.clone(),
            total_ticks,
        });
        self.emit(ReplayEvent::Started {
            session_id: self.session_id.clone(),
            total_ticks,
        })
        .await;

        let mut ticks_replayed = 0;
        let mut cancelled = false;
        let mut remaining = snapshots.into_iter().peekable();

        while let Some(snapshot) = remaining.next() {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            self.replay_tick(snapshot).await;
            ticks_replayed += 1;

            if remaining.peek().is_none() {
                break;
            }
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                _ = tokio::time::sleep(self.delay) => {}
            }
        }

        self.manager.finish_replay(&self.session_id);

        let outcome = ReplayOutcome {
            session_id: self.session_id.clone(),
            ticks_replayed,
            cancelled,
        };

        self.state.send_replace(outcome.final_state());
        if cancelled {
            tracing::info!(
                "Replay of {} cancelled after {} ticks",
                self.session_id,
                ticks_replayed
            );
            self.emit(ReplayEvent::Cancelled { ticks_replayed }).await;
        } else {
            tracing::info!("Replay of {} completed", self.session_id);
            self.emit(ReplayEvent::Completed { ticks_replayed }).await;
        }

        self.manager.events().publish(Event::ReplayFinished {
            session_id: self.session_id.clone(),
            ticks_replayed,
            cancelled,
        });

        outcome
    }

    async fn replay_tick(&self, mut snapshot: ExecutionSnapshot) {
        let tick = snapshot.tick;

        if self.options.breakpoints.contains(&tick) {
            tracing::debug!("Breakpoint hit at tick {}", tick);
            self.emit(ReplayEvent::BreakpointHit { tick }).await;
        }

        for change in self.options.overrides_at(tick) {
            let stored = self.manager.apply_override(
                &self.session_id,
                tick,
                &change.variable_name,
                &change.new_value,
            );
            match (stored, snapshot.variable_mut(&change.variable_name)) {
                (Some(updated), Some(local)) => *local = updated,
                _ => tracing::debug!(
                    "Override of '{}' at tick {} has no matching variable",
                    change.variable_name,
                    tick
                ),
            }
        }

        for name in &self.options.watch_expressions {
            if let Some(variable) = snapshot.variable(name) {
                self.emit(ReplayEvent::WatchUpdate {
                    tick,
                    variable: variable.clone(),
                })
                .await;
            }
        }

        self.emit(ReplayEvent::Tick {
            snapshot: Box::new(snapshot),
        })
        .await;
    }

    // A dropped receiver only means nobody is listening
    async fn emit(&self, event: ReplayEvent) {
        let _ = self.events.send(event).await;
    }
}
