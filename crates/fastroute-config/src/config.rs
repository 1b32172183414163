//! The top-level configuration type.

use crate::ConfigError;
use fastroute_router::RouterConfig;
use fastroute_telemetry::{create_env_filter, LogConfig};
use serde::{Deserialize, Serialize};

/// Everything a fastroute service is configured with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FastrouteConfig {
    /// Router limits and recovery behavior.
    #[serde(default)]
    pub router: RouterConfig,

    /// Logging setup.
    #[serde(default)]
    pub logging: LogConfig,
}

impl FastrouteConfig {
    /// Pretty `debug` logs and per-request dispatch logging.
    #[must_use]
    pub fn development() -> Self {
        Self {
            router: RouterConfig {
                log_dispatch: true,
                ..RouterConfig::default()
            },
            logging: LogConfig::development(),
        }
    }

    /// JSON `info` logs, default limits.
    #[must_use]
    pub fn production() -> Self {
        Self {
            router: RouterConfig::default(),
            logging: LogConfig::production(),
        }
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.router.max_path_len == 0 {
            return Err(ConfigError::invalid_value(
                "router.max_path_len",
                "must be at least 1",
            ));
        }

        if self.router.max_segments == 0 {
            return Err(ConfigError::invalid_value(
                "router.max_segments",
                "must be at least 1",
            ));
        }

        if self.logging.enabled {
            create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastroute_router::RecoveryMode;
    use fastroute_telemetry::LogFormat;

    #[test]
    fn test_default_is_valid() {
        let config = FastrouteConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config, FastrouteConfig::production());
    }

    #[test]
    fn test_development_preset() {
        let config = FastrouteConfig::development();
        assert!(config.router.log_dispatch);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut config = FastrouteConfig::default();
        config.router.max_segments = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "router.max_segments"
        ));

        let mut config = FastrouteConfig::default();
        config.router.max_path_len = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_level_rejected_only_when_enabled() {
        let mut config = FastrouteConfig::default();
        config.logging.level = "fastroute=loud".to_string();
        assert!(config.validate().is_err());

        config.logging.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result: Result<FastrouteConfig, _> = toml::from_str("[server]\nport = 80\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config: FastrouteConfig = toml::from_str("[router]\nrecovery = \"always\"\n").unwrap();
        assert_eq!(config.router.recovery, RecoveryMode::Always);
        assert_eq!(config.router.max_segments, 100);
        assert_eq!(config.logging, LogConfig::default());
    }
}
