//! Normalized snapshot hashing

use sha2::{Digest, Sha256};

use crate::timeline::ExecutionSnapshot;

/// Content hash of the parts of a snapshot that define program state.
///
/// Covers each frame's `file:line` and each variable's `(name, value)`,
/// with the name qualified by its scope.
/// Order within each category does not affect the result. Timestamps,
/// ids and runtime diagnostics are excluded.
pub fn snapshot_hash(snapshot: &ExecutionSnapshot) -> String {
    let mut frames: Vec<String> = snapshot.call_stack.iter().map(|f| f.location()).collect();
    frames.sort_unstable();

    let mut variables: Vec<(String, String)> = snapshot
        .variables
        .iter()
        .map(|v| (format!("{}:{}", v.scope, v.name), v.value.canonical()))
        .collect();
    variables.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(b"frames");
    for frame in &frames {
        update_field(&mut hasher, frame.as_bytes());
    }
    hasher.update(b"variables");
    for (name, value) in &variables {
        update_field(&mut hasher, name.as_bytes());
        update_field(&mut hasher, value.as_bytes());
    }

    format!("{:x}", hasher.finalize())
}

// Length-prefixed so adjacent fields cannot run into each other
fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{SnapshotDraft, StackFrame, Value, VariableScope, VariableState};

    #[test]
    fn test_hash_ignores_ordering() {
        let a = SnapshotDraft::new()
            .with_frame(StackFrame::new("inner", "a.js", 3))
            .with_frame(StackFrame::new("main", "a.js", 1))
            .with_local("x", 1)
            .with_local("y", "two")
            .into_snapshot(1);
        let b = SnapshotDraft::new()
            .with_frame(StackFrame::new("main", "a.js", 1))
            .with_frame(StackFrame::new("inner", "a.js", 3))
            .with_local("y", "two")
            .with_local("x", 1)
            .into_snapshot(1);

        assert_eq!(snapshot_hash(&a), snapshot_hash(&b));
    }

    #[test]
    fn test_hash_ignores_ids_and_timestamps() {
        let a = SnapshotDraft::new().with_local("x", 1).into_snapshot(1);
        let b = SnapshotDraft::new()
            .with_local("x", 1)
            .with_heap_used(4096)
            .into_snapshot(7);
        assert_ne!(a.id, b.id);
        assert_eq!(snapshot_hash(&a), snapshot_hash(&b));
    }

    #[test]
    fn test_hash_sees_value_changes() {
        let a = SnapshotDraft::new().with_local("x", 1).into_snapshot(1);
        let b = SnapshotDraft::new().with_local("x", 2).into_snapshot(1);
        let c = SnapshotDraft::new()
            .with_local("x", Value::from("1"))
            .into_snapshot(1);

        assert_ne!(snapshot_hash(&a), snapshot_hash(&b));
        assert_ne!(snapshot_hash(&a), snapshot_hash(&c));
    }

    #[test]
    fn test_hash_sees_line_changes() {
        let a = SnapshotDraft::new()
            .with_frame(StackFrame::new("main", "a.js", 1))
            .into_snapshot(1);
        let b = SnapshotDraft::new()
            .with_frame(StackFrame::new("main", "a.js", 2))
            .into_snapshot(1);
        assert_ne!(snapshot_hash(&a), snapshot_hash(&b));
    }

    #[test]
    fn test_hash_keeps_shadowed_names_apart() {
        let shadowed = |global: i64, local: i64| {
            SnapshotDraft::new()
                .with_variable(VariableState::new("n", global).in_scope(VariableScope::Global))
                .with_variable(VariableState::new("n", local))
                .into_snapshot(1)
        };
        assert_eq!(snapshot_hash(&shadowed(1, 2)), snapshot_hash(&shadowed(1, 2)));
        assert_ne!(snapshot_hash(&shadowed(1, 2)), snapshot_hash(&shadowed(2, 1)));
    }
}
