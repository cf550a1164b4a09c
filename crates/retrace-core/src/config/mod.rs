//! Configuration management for Retrace

mod env_loader;
mod file_loader;
mod logging_config;
mod model;

pub mod loader;

pub use env_loader::{apply_env_overrides, apply_env_overrides_from};
pub use file_loader::load_from_file;
pub use loader::{ConfigLoader, ConfigSource, load_config};
pub use logging_config::{LogFormat, LoggingConfig};
pub use model::{EventsConfig, ReplayConfig, RetraceConfig, StorageConfig};
