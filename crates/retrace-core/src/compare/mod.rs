//! Execution comparison
//!
//! Aligns two sessions by tick number and reports where their variables or
//! call-stack shape differ, and scans one session for every change of a
//! single variable.

mod changes;
mod executions;
mod history;

pub use changes::{Change, ChangeKind, DiffResult, VariableChange};
pub use executions::{CompareOptions, compare_executions, compare_executions_with};
pub(crate) use executions::compare_snapshots;
pub use history::find_variable_changes;
