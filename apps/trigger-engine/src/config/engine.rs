//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::services::EngineConfig;
use crate::domain::trigger::TriggerSidePolicy;

/// Monitoring loop and worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Delay between evaluation passes in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Delay after a failed pass in milliseconds.
    #[serde(default = "default_error_backoff_ms")]
    pub error_backoff_ms: u64,
    /// Blocking worker pool size.
    #[serde(default = "default_worker_pool_size")]
    pub worker_pool_size: usize,
    /// Trigger side resolution: `exit_position` or `quantity_direction`.
    #[serde(default)]
    pub side_policy: TriggerSidePolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            error_backoff_ms: default_error_backoff_ms(),
            worker_pool_size: default_worker_pool_size(),
            side_policy: TriggerSidePolicy::default(),
        }
    }
}

impl EngineSettings {
    /// Convert to the runtime `EngineConfig`.
    #[must_use]
    pub const fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            error_backoff: Duration::from_millis(self.error_backoff_ms),
            worker_pool_size: self.worker_pool_size,
            side_policy: self.side_policy,
        }
    }
}

const fn default_poll_interval_ms() -> u64 {
    1000
}

const fn default_error_backoff_ms() -> u64 {
    5000
}

const fn default_worker_pool_size() -> usize {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_runtime_defaults() {
        assert_eq!(
            EngineSettings::default().to_engine_config(),
            EngineConfig::default()
        );
    }

    #[test]
    fn to_engine_config_converts_millis() {
        let settings = EngineSettings {
            poll_interval_ms: 250,
            error_backoff_ms: 2000,
            worker_pool_size: 4,
            side_policy: TriggerSidePolicy::QuantityDirection,
        };

        let config = settings.to_engine_config();
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.error_backoff, Duration::from_secs(2));
        assert_eq!(config.worker_pool_size, 4);
        assert_eq!(config.side_policy, TriggerSidePolicy::QuantityDirection);
    }
}
