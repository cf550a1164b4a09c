//! Configuration model

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{RetraceError, RetraceResult};

use super::logging_config::LoggingConfig;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetraceConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
    #[serde(default)]
    pub events: EventsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RetraceConfig {
    /// Reject values the engine cannot run with
    pub fn validate(&self) -> RetraceResult<()> {
        if self.replay.event_buffer == 0 {
            return Err(RetraceError::config_with_context(
                "replay.event_buffer must be at least 1",
                "validating replay configuration",
            ));
        }
        if self.events.bus_capacity == 0 {
            return Err(RetraceError::config_with_context(
                "events.bus_capacity must be at least 1",
                "validating events configuration",
            ));
        }
        Ok(())
    }
}

/// Where session artifacts live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one `<session-id>.json` per session
    #[serde(default = "default_storage_dir")]
    pub directory: PathBuf,

    /// Directory for `export-*` artifacts; defaults to `directory`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_directory: Option<PathBuf>,

    /// Indent persisted JSON
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,
}

fn default_storage_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".retrace")
        .join("sessions")
}

fn default_pretty_json() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: default_storage_dir(),
            export_directory: None,
            pretty_json: true,
        }
    }
}

impl StorageConfig {
    /// Storage rooted at a specific directory
    pub fn at(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Default::default()
        }
    }

    /// Effective export directory
    pub fn export_dir(&self) -> &PathBuf {
        self.export_directory.as_ref().unwrap_or(&self.directory)
    }
}

/// Replay pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Delay between ticks at speed 1.0, in milliseconds
    #[serde(default = "default_base_unit_ms")]
    pub base_unit_ms: u64,

    /// Capacity of the per-replay event channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

fn default_base_unit_ms() -> u64 {
    100
}

fn default_event_buffer() -> usize {
    256
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            base_unit_ms: default_base_unit_ms(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl ReplayConfig {
    pub fn base_unit(&self) -> Duration {
        Duration::from_millis(self.base_unit_ms)
    }

    /// Set the base unit
    pub fn with_base_unit_ms(mut self, ms: u64) -> Self {
        self.base_unit_ms = ms;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Capacity of the broadcast event bus
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,
}

fn default_bus_capacity() -> usize {
    256
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            bus_capacity: default_bus_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RetraceConfig::default();
        assert_eq!(config.replay.base_unit(), Duration::from_millis(100));
        assert_eq!(config.events.bus_capacity, 256);
        assert!(config.storage.directory.ends_with(".retrace/sessions"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_export_dir_falls_back_to_storage_dir() {
        let mut storage = StorageConfig::at("/data/sessions");
        assert_eq!(storage.export_dir(), &PathBuf::from("/data/sessions"));

        storage.export_directory = Some(PathBuf::from("/data/exports"));
        assert_eq!(storage.export_dir(), &PathBuf::from("/data/exports"));
    }

    #[test]
    fn test_validate_rejects_zero_buffer() {
        let mut config = RetraceConfig::default();
        config.replay.event_buffer = 0;
        assert!(matches!(
            config.validate(),
            Err(RetraceError::Config { .. })
        ));
    }
}
