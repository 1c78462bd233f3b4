//! Engine configuration.
//!
//! Loaded from JSON; every field has a default so an empty object is a
//! valid configuration. `utc_window_ms` can also be changed at runtime
//! through the `SPARKPLUG_TCK/CONFIG` control topic.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tck_core::constants::{DEFAULT_UTC_WINDOW_MS, LOG_TOPIC, RESULT_TOPIC};

/// Errors raised while loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(String),

    #[error("config parse error: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Tolerated distance between a payload timestamp and the engine clock.
    pub utc_window_ms: u64,
    /// Topic result reports are published on.
    pub results_topic: String,
    /// Topic scenario log lines are published on.
    pub log_topic: String,
    /// Publish result reports on the outbound sink.
    pub publish_results: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            utc_window_ms: DEFAULT_UTC_WINDOW_MS,
            results_topic: RESULT_TOPIC.to_owned(),
            log_topic: LOG_TOPIC.to_owned(),
            publish_results: true,
        }
    }
}

impl EngineConfig {
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed JSON, [`ConfigError::Invalid`]
    /// if the values fail [`EngineConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`EngineConfig::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// # Errors
    ///
    /// [`ConfigError::Invalid`] for a zero UTC window or an empty topic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.utc_window_ms == 0 {
            return Err(ConfigError::Invalid("utc_window_ms must be > 0".into()));
        }
        if self.results_topic.is_empty() || self.log_topic.is_empty() {
            return Err(ConfigError::Invalid("topics must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(EngineConfig::from_json_str("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn fields_override_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{"utc_window_ms": 500, "publish_results": false}"#)
                .unwrap();
        assert_eq!(config.utc_window_ms, 500);
        assert!(!config.publish_results);
        assert_eq!(config.results_topic, RESULT_TOPIC);
    }

    #[test]
    fn rejects_zero_window() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"utc_window_ms": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"utc_window": 10}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            EngineConfig::from_path("/nonexistent/tck.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
