use std::sync::Arc;

use tempfile::TempDir;

use super::*;
use crate::config::ReplayConfig;
use crate::error::RetraceError;
use crate::events::Event;
use crate::session::SessionManager;
use crate::timeline::{SessionId, SessionStatus, SnapshotDraft, Value};

async fn recorded(values: &[i64]) -> (Arc<SessionManager>, SessionId, TempDir) {
    let dir = TempDir::new().unwrap();
    let manager = Arc::new(SessionManager::in_memory(dir.path()));
    let session = manager
        .start_recording("replay", "/project", "main.js")
        .unwrap();
    for value in values {
        manager
            .capture_snapshot(
                SnapshotDraft::new()
                    .with_local("x", *value)
                    .with_local("y", *value * 10),
            )
            .unwrap();
    }
    manager.stop_recording().await.unwrap();
    (manager, session.id, dir)
}

fn engine(manager: &Arc<SessionManager>, base_unit_ms: u64) -> ReplayEngine {
    ReplayEngine::new(
        Arc::clone(manager),
        ReplayConfig::default().with_base_unit_ms(base_unit_ms),
    )
}

fn tick_events(events: &[ReplayEvent]) -> Vec<u64> {
    events
        .iter()
        .filter_map(|e| match e {
            ReplayEvent::Tick { snapshot } => Some(snapshot.tick),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_replay_emits_every_tick_in_order() {
    let (manager, id, _dir) = recorded(&[1, 2, 3]).await;

    let handle = engine(&manager, 1).replay(&id, ReplayOptions::new()).unwrap();
    let (events, outcome) = handle.collect().await.unwrap();

    assert!(matches!(
        events.first(),
        Some(ReplayEvent::Started { total_ticks: 3, .. })
    ));
    assert_eq!(tick_events(&events), vec![1, 2, 3]);
    assert_eq!(
        events.last(),
        Some(&ReplayEvent::Completed { ticks_replayed: 3 })
    );
    assert!(!outcome.cancelled);
    assert_eq!(outcome.final_state(), ReplayState::Completed);
    assert_eq!(
        manager.get_session(&id).unwrap().status,
        SessionStatus::Stopped
    );
}

#[tokio::test]
async fn test_breakpoint_then_watch_then_tick() {
    let (manager, id, _dir) = recorded(&[1, 2, 3]).await;
    let options = ReplayOptions::new().with_breakpoint(2).with_watch("x");

    let (events, _) = engine(&manager, 1)
        .replay(&id, options)
        .unwrap()
        .collect()
        .await
        .unwrap();

    let at_two: Vec<&ReplayEvent> = events.iter().filter(|e| e.tick() == Some(2)).collect();
    assert_eq!(at_two.len(), 3);
    assert_eq!(at_two[0], &ReplayEvent::BreakpointHit { tick: 2 });
    match at_two[1] {
        ReplayEvent::WatchUpdate { variable, .. } => {
            assert_eq!(variable.name, "x");
            assert_eq!(variable.value, Value::Int(2));
        }
        other => panic!("expected watch update, got {:?}", other),
    }
    assert!(matches!(at_two[2], ReplayEvent::Tick { .. }));

    let breakpoints = events
        .iter()
        .filter(|e| matches!(e, ReplayEvent::BreakpointHit { .. }))
        .count();
    assert_eq!(breakpoints, 1);
}

#[tokio::test]
async fn test_override_applies_from_its_tick() {
    let (manager, id, _dir) = recorded(&[1, 2, 3]).await;
    let options = ReplayOptions::new()
        .with_watch("y")
        .with_override(2, "y", 999);

    let (events, _) = engine(&manager, 1)
        .replay(&id, options)
        .unwrap()
        .collect()
        .await
        .unwrap();

    let watched: Vec<(u64, Value)> = events
        .iter()
        .filter_map(|e| match e {
            ReplayEvent::WatchUpdate { tick, variable } => Some((*tick, variable.value.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        watched,
        vec![
            (1, Value::Int(10)),
            (2, Value::Int(999)),
            (3, Value::Int(30)),
        ]
    );

    let stored = manager.jump_to_tick(&id, 2).unwrap().unwrap();
    let y = stored.variable("y").unwrap();
    assert_eq!(y.value, Value::Int(999));
    assert_eq!(y.previous_value, Some(Value::Int(20)));
}

#[tokio::test]
async fn test_override_of_unknown_variable_is_ignored() {
    let (manager, id, _dir) = recorded(&[1, 2]).await;
    let options = ReplayOptions::new().with_override(1, "nope", 5);

    let (events, outcome) = engine(&manager, 1)
        .replay(&id, options)
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(tick_events(&events), vec![1, 2]);
    assert_eq!(outcome.ticks_replayed, 2);
}

#[tokio::test]
async fn test_cancel_stops_at_tick_boundary() {
    let (manager, id, _dir) = recorded(&[1, 2, 3]).await;
    let mut handle = engine(&manager, 10_000)
        .replay(&id, ReplayOptions::new())
        .unwrap();

    assert!(matches!(
        handle.next_event().await,
        Some(ReplayEvent::Started { .. })
    ));
    assert!(matches!(
        handle.next_event().await,
        Some(ReplayEvent::Tick { .. })
    ));
    assert_eq!(handle.state(), ReplayState::Replaying);

    handle.cancel();
    let (rest, outcome) = handle.collect().await.unwrap();

    assert_eq!(rest, vec![ReplayEvent::Cancelled { ticks_replayed: 1 }]);
    assert!(outcome.cancelled);
    assert_eq!(outcome.final_state(), ReplayState::Idle);
    assert_eq!(
        manager.get_session(&id).unwrap().status,
        SessionStatus::Stopped
    );

    // The session can be replayed again
    let again = engine(&manager, 1).replay(&id, ReplayOptions::new()).unwrap();
    assert_eq!(again.finish().await.unwrap().ticks_replayed, 3);
}

#[tokio::test]
async fn test_pre_cancelled_token_replays_nothing() {
    let (manager, id, _dir) = recorded(&[1, 2]).await;
    let token = tokio_util::sync::CancellationToken::new();
    token.cancel();

    let (events, outcome) = engine(&manager, 1)
        .replay_with_cancel(&id, ReplayOptions::new(), token)
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert!(tick_events(&events).is_empty());
    assert_eq!(outcome.ticks_replayed, 0);
    assert!(outcome.cancelled);
}

#[tokio::test]
async fn test_busy_sessions_are_rejected() {
    let (manager, id, _dir) = recorded(&[1, 2, 3]).await;
    let engine = engine(&manager, 10_000);

    let handle = engine.replay(&id, ReplayOptions::new()).unwrap();
    assert_eq!(
        manager.get_session(&id).unwrap().status,
        SessionStatus::Replaying
    );
    let second = engine.replay(&id, ReplayOptions::new());
    assert!(matches!(second, Err(RetraceError::SessionBusy { .. })));
    handle.cancel();
    handle.finish().await.unwrap();

    let recording = manager
        .start_recording("live", "/project", "main.js")
        .unwrap();
    let result = engine.replay(&recording.id, ReplayOptions::new());
    assert!(matches!(result, Err(RetraceError::SessionBusy { .. })));
}

#[tokio::test]
async fn test_invalid_speed_leaves_session_untouched() {
    let (manager, id, _dir) = recorded(&[1]).await;

    let result = engine(&manager, 1).replay(&id, ReplayOptions::new().with_speed(0.0));
    assert!(matches!(result, Err(RetraceError::InvalidInput { .. })));
    assert_eq!(
        manager.get_session(&id).unwrap().status,
        SessionStatus::Stopped
    );
}

#[tokio::test]
async fn test_unknown_session() {
    let (manager, _id, _dir) = recorded(&[1]).await;
    let result = engine(&manager, 1).replay(&SessionId::from("missing"), ReplayOptions::new());
    assert!(matches!(result, Err(RetraceError::SessionNotFound { .. })));
}

#[tokio::test]
async fn test_empty_session_completes_immediately() {
    let (manager, id, _dir) = recorded(&[]).await;

    let (events, outcome) = engine(&manager, 1)
        .replay(&id, ReplayOptions::new())
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[1], ReplayEvent::Completed { ticks_replayed: 0 });
    assert!(!outcome.cancelled);
}

#[tokio::test]
async fn test_replay_is_mirrored_on_event_bus() {
    let (manager, id, _dir) = recorded(&[1, 2]).await;
    let mut bus = manager.events().subscribe();

    engine(&manager, 1)
        .replay(&id, ReplayOptions::new())
        .unwrap()
        .finish()
        .await
        .unwrap();

    assert!(matches!(
        bus.recv().await.unwrap(),
        Event::ReplayStarted { total_ticks: 2, .. }
    ));
    assert_eq!(
        bus.recv().await.unwrap(),
        Event::ReplayFinished {
            session_id: id,
            ticks_replayed: 2,
            cancelled: false,
        }
    );
}
