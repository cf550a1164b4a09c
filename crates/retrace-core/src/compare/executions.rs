//! Tick-aligned comparison of two sessions

use std::collections::HashMap;

use crate::timeline::{ExecutionSnapshot, RecordingSession, Tick, Value};

use super::changes::{Change, ChangeKind, DiffResult};

/// Extra categories to compare beyond variables and call-stack shape
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    /// Report async operations whose status differs, matched by id
    pub include_async: bool,
    /// Report network requests whose status or response differs, matched by id
    pub include_network: bool,
}

impl CompareOptions {
    /// Compare every category
    pub fn all() -> Self {
        Self {
            include_async: true,
            include_network: true,
        }
    }
}

/// Compare two sessions tick by tick.
///
/// Every tick recorded by either session is visited. Only ticks with at
/// least one difference are returned, in tick order.
pub fn compare_executions(a: &RecordingSession, b: &RecordingSession) -> Vec<DiffResult> {
    compare_executions_with(a, b, &CompareOptions::default())
}

/// Compare two sessions with optional extra categories
pub fn compare_executions_with(
    a: &RecordingSession,
    b: &RecordingSession,
    options: &CompareOptions,
) -> Vec<DiffResult> {
    let mut ticks: Vec<Tick> = a
        .snapshots
        .iter()
        .chain(b.snapshots.iter())
        .map(|s| s.tick)
        .collect();
    ticks.sort_unstable();
    ticks.dedup();

    let mut results = Vec::new();
    for tick in ticks {
        let changes = match (a.snapshot(tick), b.snapshot(tick)) {
            (Some(left), Some(right)) => compare_snapshots(left, right, options),
            (Some(left), None) => vec![diverged(Some(left), None)],
            (None, Some(right)) => vec![diverged(None, Some(right))],
            (None, None) => continue,
        };

        if !changes.is_empty() {
            results.push(DiffResult { tick, changes });
        }
    }

    tracing::debug!(
        "Compared {} and {}: {} ticks differ",
        a.id,
        b.id,
        results.len()
    );
    results
}

/// Differences between two snapshots at the same tick
pub(crate) fn compare_snapshots(
    left: &ExecutionSnapshot,
    right: &ExecutionSnapshot,
    options: &CompareOptions,
) -> Vec<Change> {
    let mut changes = Vec::new();

    for variable in &left.variables {
        let Some(other) = right.variable_in(&variable.name, variable.scope) else {
            continue;
        };
        if variable.value.differs_from(&other.value) {
            changes.push(Change::new(
                ChangeKind::Variable,
                Some(variable.value.clone()),
                Some(other.value.clone()),
                format!(
                    "{} changed from {} to {}",
                    variable.name, variable.value, other.value
                ),
            ));
        }
    }

    if left.depth() != right.depth() {
        changes.push(Change::new(
            ChangeKind::Callstack,
            Some(depth_value(left)),
            Some(depth_value(right)),
            format!(
                "call stack depth changed from {} to {}",
                left.depth(),
                right.depth()
            ),
        ));
    }

    if options.include_async {
        compare_async(left, right, &mut changes);
    }
    if options.include_network {
        compare_network(left, right, &mut changes);
    }

    changes
}

fn diverged(left: Option<&ExecutionSnapshot>, right: Option<&ExecutionSnapshot>) -> Change {
    let description = if left.is_some() {
        "execution diverged: only the first session reached this tick"
    } else {
        "execution diverged: only the second session reached this tick"
    };
    Change::new(
        ChangeKind::Callstack,
        left.map(depth_value),
        right.map(depth_value),
        description,
    )
}

fn depth_value(snapshot: &ExecutionSnapshot) -> Value {
    Value::Int(snapshot.depth() as i64)
}

fn compare_async(left: &ExecutionSnapshot, right: &ExecutionSnapshot, changes: &mut Vec<Change>) {
    let right_ops: HashMap<&str, _> = right
        .async_operations
        .iter()
        .map(|op| (op.id.as_str(), op))
        .collect();

    for op in &left.async_operations {
        let Some(other) = right_ops.get(op.id.as_str()) else {
            continue;
        };
        if op.status != other.status {
            changes.push(Change::new(
                ChangeKind::Async,
                Some(Value::from(op.status.as_str())),
                Some(Value::from(other.status.as_str())),
                format!(
                    "async operation {} is {} vs {}",
                    op.id,
                    op.status.as_str(),
                    other.status.as_str()
                ),
            ));
        }
    }
}

fn compare_network(
    left: &ExecutionSnapshot,
    right: &ExecutionSnapshot,
    changes: &mut Vec<Change>,
) {
    let right_requests: HashMap<&str, _> = right
        .network_requests
        .iter()
        .map(|req| (req.id.as_str(), req))
        .collect();

    for request in &left.network_requests {
        let Some(other) = right_requests.get(request.id.as_str()) else {
            continue;
        };
        let status_differs = request.status != other.status;
        let body_differs = match (&request.response_body, &other.response_body) {
            (Some(l), Some(r)) => l.differs_from(r),
            (None, None) => false,
            _ => true,
        };
        if status_differs || body_differs {
            changes.push(Change::new(
                ChangeKind::Network,
                request.status.map(|s| Value::Int(i64::from(s))),
                other.status.map(|s| Value::Int(i64::from(s))),
                format!(
                    "{} {} responded differently",
                    request.method, request.url
                ),
            ));
        }
    }
}
