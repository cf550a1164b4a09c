//! CLI command implementations

pub mod compare;
pub mod inspect;
pub mod record;
pub mod replay;
pub mod session;

use std::sync::Arc;

use retrace_core::config::RetraceConfig;
use retrace_core::error::RetraceResult;
use retrace_core::session::SessionManager;
use serde::Serialize;

use crate::console::CliConsole;

/// Shared state for one CLI invocation
pub struct CommandContext {
    pub config: RetraceConfig,
    pub console: CliConsole,
    pub json: bool,
}

impl CommandContext {
    /// Informational lines are suppressed under `--json` so stdout carries
    /// nothing but the JSON document.
    pub fn new(config: RetraceConfig, verbose: bool, json: bool) -> Self {
        Self {
            config,
            console: CliConsole::new(verbose && !json),
            json,
        }
    }

    /// Open the session manager and load every persisted session
    pub async fn manager(&self) -> RetraceResult<Arc<SessionManager>> {
        let manager = SessionManager::from_config(&self.config);
        let summary = manager.load_from_storage().await?;
        for failure in &summary.failures {
            self.console.warn(&format!(
                "Skipping unreadable session {}: {}",
                failure.path.display(),
                failure.error
            ));
        }
        self.console
            .info(&format!("Loaded {} sessions", summary.loaded));
        Ok(Arc::new(manager))
    }

    /// Print a value as pretty JSON
    pub fn print_json<T: Serialize>(&self, value: &T) -> RetraceResult<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
