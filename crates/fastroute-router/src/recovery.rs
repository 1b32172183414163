//! Panic recovery.
//!
//! The dispatcher runs matching, filters and the handler under
//! [`std::panic::catch_unwind`]. A caught panic becomes a [`HandlerFailure`]
//! and is handed to the [`RecoveryPolicy`].

use fastroute_core::{HandlerFailure, RequestContext};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// A custom recovery callback.
pub type RecoverFn = Arc<dyn Fn(&mut RequestContext, &HandlerFailure) + Send + Sync + 'static>;

/// When the default recovery runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryMode {
    /// Only if the custom callback panicked or left the response unwritten.
    #[default]
    Fallback,
    /// Always, after the custom callback.
    Always,
}

/// Writes the default recovery response: `500` with the failure text.
pub fn default_recover(ctx: &mut RequestContext, failure: &HandlerFailure) {
    ctx.error(failure.message(), StatusCode::INTERNAL_SERVER_ERROR);
}

/// A custom callback plus the [`RecoveryMode`] deciding whether the default
/// response follows it.
#[derive(Clone, Default)]
pub struct RecoveryPolicy {
    callback: Option<RecoverFn>,
    mode: RecoveryMode,
}

impl RecoveryPolicy {
    /// Creates a policy.
    #[must_use]
    pub fn new(callback: Option<RecoverFn>, mode: RecoveryMode) -> Self {
        Self { callback, mode }
    }

    /// Returns the mode.
    #[must_use]
    pub fn mode(&self) -> RecoveryMode {
        self.mode
    }

    /// Returns true if a custom callback is installed.
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Discards the partial response and writes the recovery response.
    ///
    /// A panicking callback is contained; its partial output is discarded and
    /// the default response is written.
    pub fn recover(&self, ctx: &mut RequestContext, failure: &HandlerFailure) {
        ctx.response_mut().reset();

        let mut callback_failed = false;
        if let Some(callback) = &self.callback {
            let result = panic::catch_unwind(AssertUnwindSafe(|| callback(ctx, failure)));
            if let Err(payload) = result {
                let nested = HandlerFailure::from_panic(payload);
                tracing::error!(error = %nested, "Recovery callback panicked");
                ctx.response_mut().reset();
                callback_failed = true;
            }
        }

        let run_default = callback_failed
            || match self.mode {
                RecoveryMode::Always => true,
                RecoveryMode::Fallback => !ctx.response().is_written(),
            };
        if run_default {
            default_recover(ctx, failure);
        }
    }
}

impl fmt::Debug for RecoveryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecoveryPolicy")
            .field("callback", &self.callback.is_some())
            .field("mode", &self.mode)
            .finish()
    }
}
