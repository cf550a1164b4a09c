//! From trait implementations for RetraceError conversions

use super::types::RetraceError;

impl From<anyhow::Error> for RetraceError {
    fn from(error: anyhow::Error) -> Self {
        Self::other(format!("{:#}", error))
    }
}

impl From<std::io::Error> for RetraceError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for RetraceError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<toml::de::Error> for RetraceError {
    fn from(error: toml::de::Error) -> Self {
        Self::config(format!("Failed to parse TOML: {}", error))
    }
}

impl From<serde_yaml::Error> for RetraceError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::config(format!("Failed to parse YAML: {}", error))
    }
}
