//! Router configuration.

use crate::path::MAX_SEGMENTS;
use crate::recovery::RecoveryMode;
use serde::{Deserialize, Serialize};

/// Longest request path, in bytes, the router will try to match.
pub const MAX_PATH_LEN: usize = 8182;

/// Router limits and behavior switches.
///
/// Fixed once the router is built.
///
/// # Example
///
/// ```
/// use fastroute_router::{RecoveryMode, RouterConfig};
///
/// let config: RouterConfig = serde_json::from_str(r#"{ "recovery": "always" }"#).unwrap();
/// assert_eq!(config.recovery, RecoveryMode::Always);
/// assert_eq!(config.max_path_len, 8182);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Requests with a longer path get `414 URI Too Long`.
    #[serde(default = "default_max_path_len")]
    pub max_path_len: usize,

    /// Segments kept per path; the rest is ignored for matching.
    #[serde(default = "default_max_segments")]
    pub max_segments: usize,

    /// What the default recovery does after a custom recovery callback.
    #[serde(default)]
    pub recovery: RecoveryMode,

    /// Log every dispatch outcome at `debug` level.
    #[serde(default)]
    pub log_dispatch: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_path_len: default_max_path_len(),
            max_segments: default_max_segments(),
            recovery: RecoveryMode::default(),
            log_dispatch: false,
        }
    }
}

fn default_max_path_len() -> usize {
    MAX_PATH_LEN
}

fn default_max_segments() -> usize {
    MAX_SEGMENTS
}
