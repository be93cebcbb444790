//! Configuration module for the trigger engine.
//!
//! Loads YAML configuration with `${VAR}` / `${VAR:-default}` environment
//! variable interpolation and validates it before use.
//!
//! # Usage
//!
//! ```rust,ignore
//! use trigger_engine::config::load_config;
//!
//! let config = load_config(Some("config.yaml"))?;
//! let engine_config = config.engine.to_engine_config();
//! ```

mod engine;
mod observability;

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use engine::EngineSettings;
pub use observability::{LogFormat, LoggingConfig, MetricsSettings, ObservabilityConfig};

/// Default config file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Engine loop and pool settings.
    #[serde(default)]
    pub engine: EngineSettings,
    /// Logging and metrics.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Load configuration from a YAML file with environment variable interpolation.
///
/// `path` defaults to `config.yaml`.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
///
/// A blank document yields the defaults.
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. Unset or empty
/// variables without a default become empty strings.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let engine = &config.engine;

    if engine.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "engine.poll_interval_ms must be positive".to_string(),
        ));
    }

    if engine.error_backoff_ms == 0 {
        return Err(ConfigError::ValidationError(
            "engine.error_backoff_ms must be positive".to_string(),
        ));
    }

    if engine.worker_pool_size == 0 {
        return Err(ConfigError::ValidationError(
            "engine.worker_pool_size must be at least 1".to_string(),
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    let level = config.observability.logging.level.to_ascii_lowercase();
    if !valid_levels.contains(&level.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.level must be one of: {valid_levels:?}"
        )));
    }

    let metrics = &config.observability.metrics;
    if metrics.enabled && metrics.listen_address.parse::<SocketAddr>().is_err() {
        return Err(ConfigError::ValidationError(format!(
            "observability.metrics.listen_address '{}' is not a socket address",
            metrics.listen_address
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trigger::TriggerSidePolicy;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.engine.poll_interval_ms, 1000);
        assert_eq!(config.engine.error_backoff_ms, 5000);
        assert_eq!(config.engine.worker_pool_size, 2);
        assert_eq!(config.engine.side_policy, TriggerSidePolicy::ExitPosition);
        assert_eq!(config.observability.logging.level, "info");
        assert_eq!(config.observability.logging.format, LogFormat::Json);
        assert!(!config.observability.metrics.enabled);
    }

    #[test]
    fn test_blank_document_uses_defaults() {
        let config = match load_config_from_string("  \n") {
            Ok(c) => c,
            Err(e) => panic!("blank config should load: {e}"),
        };
        assert_eq!(config.engine.poll_interval_ms, 1000);
    }

    #[test]
    fn test_load_minimal_config() {
        let yaml = r"
engine:
  poll_interval_ms: 250
";

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load minimal config: {e}"),
        };
        assert_eq!(config.engine.poll_interval_ms, 250);
        assert_eq!(config.engine.error_backoff_ms, 5000); // Default value
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
engine:
  poll_interval_ms: 500
  error_backoff_ms: 2500
  worker_pool_size: 4
  side_policy: quantity_direction

observability:
  logging:
    level: debug
    format: pretty
  metrics:
    enabled: true
    listen_address: "127.0.0.1:9100"
"#;

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };
        assert_eq!(config.engine.worker_pool_size, 4);
        assert_eq!(
            config.engine.side_policy,
            TriggerSidePolicy::QuantityDirection
        );
        assert_eq!(config.observability.logging.format, LogFormat::Pretty);
        assert_eq!(
            config.observability.metrics.listen_address,
            "127.0.0.1:9100"
        );
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "level: ${TRIGGER_ENGINE_TEST_NONEXISTENT_VAR:-debug}";
        let result = interpolate_env_vars(input);

        assert_eq!(result, "level: debug");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_with_default_uses_existing() {
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);

        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "address: ${TRIGGER_ENGINE_TEST_UNLIKELY_TO_EXIST}";
        let result = interpolate_env_vars(input);

        assert_eq!(result, "address: ");
    }

    #[test]
    fn test_validation_zero_poll_interval() {
        let yaml = r"
engine:
  poll_interval_ms: 0
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero poll interval");
        };
        assert!(err.to_string().contains("poll_interval_ms"));
    }

    #[test]
    fn test_validation_zero_worker_pool() {
        let yaml = r"
engine:
  worker_pool_size: 0
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for empty worker pool");
        };
        assert!(err.to_string().contains("worker_pool_size"));
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let yaml = r"
observability:
  logging:
    level: loud
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for invalid level");
        };
        assert!(err.to_string().contains("level"));
    }

    #[test]
    fn test_validation_bad_metrics_address_only_when_enabled() {
        let disabled = r"
observability:
  metrics:
    listen_address: nowhere
";
        assert!(load_config_from_string(disabled).is_ok());

        let enabled = r"
observability:
  metrics:
    enabled: true
    listen_address: nowhere
";
        let Err(err) = load_config_from_string(enabled) else {
            panic!("expected error for bad listen address");
        };
        assert!(err.to_string().contains("listen_address"));
    }

    #[test]
    fn test_unknown_side_policy_fails_to_parse() {
        let yaml = r"
engine:
  side_policy: sideways
";

        assert!(matches!(
            load_config_from_string(yaml),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = load_config(Some("/nonexistent/trigger-engine/config.yaml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
