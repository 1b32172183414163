//! Layered configuration loading.

use std::env;
use std::fs;
use std::path::Path;

use fastroute_router::RecoveryMode;
use fastroute_telemetry::LogFormat;

use crate::{ConfigError, FastrouteConfig};

/// Builds a [`FastrouteConfig`] from defaults, a file and the environment.
///
/// Later layers override earlier ones. A file replaces the whole
/// configuration, with unset fields taking their defaults; environment
/// variables then override single fields.
///
/// # Example
///
/// ```
/// use fastroute_config::{ConfigLoader, RecoveryMode};
///
/// let config = ConfigLoader::new()
///     .with_string("[router]\nrecovery = \"always\"", "toml")
///     .unwrap()
///     .load()
///     .unwrap();
///
/// assert_eq!(config.router.recovery, RecoveryMode::Always);
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: FastrouteConfig,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Starts from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets to the development preset.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = FastrouteConfig::development();
        self
    }

    /// Resets to the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = FastrouteConfig::production();
        self
    }

    /// Loads a `.toml` or `.json` file, chosen by extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable, has an
    /// unsupported extension, or does not parse (unknown fields included).
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        self.config = parse(&content, format)?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration text; `format` is `"toml"` or `"json"`.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = parse(content, format)?;
        Ok(self)
    }

    /// Enables overrides from variables named `PREFIX__SECTION__KEY`, e.g.
    /// `FASTROUTE__ROUTER__MAX_SEGMENTS=20` or `FASTROUTE__LOGGING__LEVEL=debug`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Loads variables from a `.env` file in the working directory, if any.
    #[must_use]
    pub fn with_dotenv(self) -> Self {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!(error = %err, "Failed to load .env file");
            }
        }
        self
    }

    /// Applies environment overrides and validates.
    pub fn load(self) -> Result<FastrouteConfig, ConfigError> {
        self.load_from(env::vars())
    }

    /// Returns the configuration without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> FastrouteConfig {
        self.config
    }

    fn load_from<I>(mut self, vars: I) -> Result<FastrouteConfig, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        if let Some(prefix) = self.env_prefix.take() {
            let marker = format!("{prefix}__");
            for (key, value) in vars {
                if let Some(field) = key.strip_prefix(&marker) {
                    self.apply_env_var(&key, field, &value)?;
                }
            }
        }

        self.config.validate()?;
        Ok(self.config)
    }

    fn apply_env_var(&mut self, key: &str, field: &str, value: &str) -> Result<(), ConfigError> {
        let router = &mut self.config.router;
        let logging = &mut self.config.logging;
        let parts: Vec<&str> = field.split("__").collect();

        match parts.as_slice() {
            ["ROUTER", "MAX_PATH_LEN"] => router.max_path_len = parse_usize(key, value)?,
            ["ROUTER", "MAX_SEGMENTS"] => router.max_segments = parse_usize(key, value)?,
            ["ROUTER", "RECOVERY"] => {
                router.recovery = match value.to_lowercase().as_str() {
                    "fallback" => RecoveryMode::Fallback,
                    "always" => RecoveryMode::Always,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'fallback' or 'always'",
                        ))
                    }
                };
            }
            ["ROUTER", "LOG_DISPATCH"] => router.log_dispatch = require_bool(key, value)?,

            ["LOGGING", "ENABLED"] => logging.enabled = require_bool(key, value)?,
            ["LOGGING", "LEVEL"] => logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["LOGGING", "SPAN_EVENTS"] => logging.span_events = require_bool(key, value)?,
            ["LOGGING", "FILE_LINE_INFO"] => logging.file_line_info = require_bool(key, value)?,
            ["LOGGING", "THREAD_IDS"] => logging.thread_ids = require_bool(key, value)?,
            ["LOGGING", "INCLUDE_TARGET"] => logging.include_target = require_bool(key, value)?,

            _ => tracing::warn!(var = key, "Ignoring unknown configuration variable"),
        }

        Ok(())
    }
}

fn parse(content: &str, format: &str) -> Result<FastrouteConfig, ConfigError> {
    match format.to_lowercase().as_str() {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))
}

fn require_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
