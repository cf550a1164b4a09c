//! Environment variable-based configuration overrides
//!
//! Recognised variables:
//! - `RETRACE_STORAGE_DIR`
//! - `RETRACE_EXPORT_DIR`
//! - `RETRACE_REPLAY_BASE_UNIT_MS`
//! - `RETRACE_LOG_LEVEL`
//! - `RETRACE_LOG_FORMAT`

use crate::config::model::RetraceConfig;
use crate::error::{RetraceError, RetraceResult};
use std::env;
use std::path::PathBuf;

/// Apply overrides from the process environment
pub fn apply_env_overrides(config: &mut RetraceConfig) -> RetraceResult<()> {
    apply_env_overrides_from(config, |key| env::var(key).ok())
}

/// Apply overrides from an arbitrary variable lookup
pub fn apply_env_overrides_from<F>(config: &mut RetraceConfig, lookup: F) -> RetraceResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = lookup("RETRACE_STORAGE_DIR") {
        config.storage.directory = PathBuf::from(dir);
    }

    if let Some(dir) = lookup("RETRACE_EXPORT_DIR") {
        config.storage.export_directory = Some(PathBuf::from(dir));
    }

    if let Some(ms) = lookup("RETRACE_REPLAY_BASE_UNIT_MS") {
        config.replay.base_unit_ms = ms.trim().parse().map_err(|_| {
            RetraceError::config(format!("Invalid RETRACE_REPLAY_BASE_UNIT_MS value: {}", ms))
        })?;
    }

    if let Some(level) = lookup("RETRACE_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Some(format) = lookup("RETRACE_LOG_FORMAT") {
        config.logging.format = format.parse()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = RetraceConfig::default();
        apply_env_overrides_from(
            &mut config,
            lookup(&[
                ("RETRACE_STORAGE_DIR", "/tmp/sessions"),
                ("RETRACE_REPLAY_BASE_UNIT_MS", "15"),
                ("RETRACE_LOG_FORMAT", "compact"),
            ]),
        )
        .unwrap();

        assert_eq!(config.storage.directory, PathBuf::from("/tmp/sessions"));
        assert_eq!(config.replay.base_unit_ms, 15);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let mut config = RetraceConfig::default();
        let result = apply_env_overrides_from(
            &mut config,
            lookup(&[("RETRACE_REPLAY_BASE_UNIT_MS", "fast")]),
        );
        assert!(matches!(result, Err(RetraceError::Config { .. })));
    }

    #[test]
    fn test_no_variables_leaves_config_untouched() {
        let mut config = RetraceConfig::default();
        apply_env_overrides_from(&mut config, |_| None).unwrap();
        assert_eq!(config, RetraceConfig::default());
    }
}
