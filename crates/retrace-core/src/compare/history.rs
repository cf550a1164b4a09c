//! Single-variable history scan

use crate::timeline::{RecordingSession, Value};

use super::changes::VariableChange;

/// Every tick at which `name` took a value different from the last one seen.
///
/// The first observed value is not a change. Ticks where the variable is
/// absent are skipped without resetting the last-seen value.
pub fn find_variable_changes(session: &RecordingSession, name: &str) -> Vec<VariableChange> {
    let mut last_seen: Option<&Value> = None;
    let mut changes = Vec::new();

    for snapshot in &session.snapshots {
        let Some(variable) = snapshot.variable(name) else {
            continue;
        };
        if let Some(previous) = last_seen {
            if previous.differs_from(&variable.value) {
                changes.push(VariableChange {
                    tick: snapshot.tick,
                    before: previous.clone(),
                    after: variable.value.clone(),
                });
            }
        }
        last_seen = Some(&variable.value);
    }

    changes
}
