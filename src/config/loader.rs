//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::InstrumentConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<InstrumentConfig, ConfigError> {
    parse_config(&fs::read_to_string(path)?)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(text: &str) -> Result<InstrumentConfig, ConfigError> {
    let config: InstrumentConfig = toml::from_str(text)?;
    validate_config(&config)?;
    Ok(config)
}

/// Semantic checks; serde already covered the syntactic ones.
fn validate_config(config: &InstrumentConfig) -> Result<(), ConfigError> {
    if config.enabled && config.budget_ms == 0 {
        return Err(ConfigError::Invalid(
            "budget_ms must be greater than zero".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.enabled);
        assert_eq!(config.budget_ms, 5_000);
    }

    #[test]
    fn test_parse_overrides() {
        let config = parse_config("enabled = false\nbudget_ms = 250\n").unwrap();
        assert!(!config.enabled);
        assert_eq!(config.budget().as_millis(), 250);
    }

    #[test]
    fn test_zero_budget_rejected() {
        let err = parse_config("budget_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_budget_tolerated_when_disabled() {
        let config = parse_config("enabled = false\nbudget_ms = 0\n").unwrap();
        assert!(!config.enabled);
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let err = parse_config("budget_ms = \"soon\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
