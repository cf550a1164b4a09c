//! Configuration loading from layered sources

use crate::config::env_loader::apply_env_overrides;
use crate::config::file_loader::load_from_file;
use crate::config::model::RetraceConfig;
use crate::error::RetraceResult;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "retrace.toml";

/// Source of configuration data
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Configuration from a file; replaces everything loaded before it
    File(PathBuf),
    /// `RETRACE_*` environment variable overrides
    Environment,
}

/// Configuration loader with support for multiple sources
#[derive(Debug, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration source
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Add a file source
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    /// Add environment variables source
    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    /// Load configuration from all sources, in order
    pub fn load(self) -> RetraceResult<RetraceConfig> {
        let mut config = RetraceConfig::default();

        for source in &self.sources {
            match source {
                ConfigSource::File(path) => {
                    tracing::debug!("Loading configuration file {}", path.display());
                    config = load_from_file(path)?;
                }
                ConfigSource::Environment => apply_env_overrides(&mut config)?,
            }
        }

        config.validate()?;
        Ok(config)
    }
}

/// Load configuration: defaults, then the given file (or `retrace.toml` in
/// the working directory), then environment overrides.
pub fn load_config(config_file: Option<&Path>) -> RetraceResult<RetraceConfig> {
    let file = config_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    ConfigLoader::new().with_file(file).with_env().load()
}
