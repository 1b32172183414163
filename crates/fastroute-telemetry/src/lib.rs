//! Logging setup for fastroute.
//!
//! Every fastroute crate logs through the [`tracing`] facade. This crate
//! installs a `tracing-subscriber` pipeline for it: an [`EnvFilter`] built from
//! the configured level (or `RUST_LOG`), and a JSON or human-readable
//! formatter.
//!
//! # Example
//!
//! ```rust,no_run
//! use fastroute_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(routes = 12, "Router ready");
//! # Ok::<(), fastroute_telemetry::TelemetryError>(())
//! ```
//!
//! # Events emitted by the router
//!
//! | Level | Message | Fields |
//! |-------|---------|--------|
//! | `debug` | Route registered | `http.method`, `route`, `kind` |
//! | `error` | Route registration failed | `http.method`, `route`, `error` |
//! | `debug` | Filter stopped request | `filter`, `http.method`, `http.path` |
//! | `warn` | Request path too long | `http.method`, `path_len`, `max_path_len` |
//! | `error` | Recovered from panic while serving request | `http.method`, `http.path`, `error` |
//! | `debug` | Request dispatched (opt-in) | `http.method`, `http.path`, `http.status_code`, `outcome` |
//!
//! [`EnvFilter`]: tracing_subscriber::EnvFilter

#![doc(html_root_url = "https://docs.rs/fastroute-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};

/// Result type alias for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
