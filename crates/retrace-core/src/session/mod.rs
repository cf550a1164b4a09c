//! Recording session lifecycle and persistence
//!
//! The [`SessionManager`] owns the process-wide index of sessions, enforces
//! the single-active-recording rule and is the only component that talks to
//! [`storage::SessionStorage`].

pub mod manager;
pub mod storage;

pub use manager::{ReloadSummary, SessionManager};
pub use storage::{
    FileSessionStorage, LoadFailure, LoadReport, MemorySessionStorage, SessionStorage,
};
