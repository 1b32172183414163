//! Configuration for fastroute services.
//!
//! [`FastrouteConfig`] bundles the router limits ([`RouterConfig`]) and the
//! logging setup ([`LogConfig`]). [`ConfigLoader`] builds one in layers:
//!
//! 1. defaults (or the development/production presets)
//! 2. a TOML or JSON file
//! 3. environment variables named `PREFIX__SECTION__KEY`
//!
//! Unknown fields in files are rejected.
//!
//! # Example
//!
//! ```no_run
//! use fastroute_config::ConfigLoader;
//!
//! # fn main() -> Result<(), fastroute_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("fastroute.toml")?
//!     .with_env_prefix("FASTROUTE")
//!     .load()?;
//!
//! println!("max path length: {}", config.router.max_path_len);
//! # Ok(())
//! # }
//! ```
//!
//! # File format
//!
//! ```toml
//! [router]
//! max_path_len = 8182
//! max_segments = 100
//! recovery = "fallback"   # or "always"
//! log_dispatch = false
//!
//! [logging]
//! level = "info"
//! format = "json"         # or "pretty"
//! ```

#![doc(html_root_url = "https://docs.rs/fastroute-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;

pub use config::FastrouteConfig;
pub use error::ConfigError;
pub use fastroute_router::{RecoveryMode, RouterConfig};
pub use fastroute_telemetry::{LogConfig, LogFormat};
pub use loader::ConfigLoader;
