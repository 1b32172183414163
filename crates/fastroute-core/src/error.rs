//! Error types for fastroute.
//!
//! Two kinds of failure exist:
//!
//! - [`RouteError`]: the route table is invalid. Raised while routes are being
//!   registered; a router whose table produced one of these must never serve.
//! - [`HandlerFailure`]: a filter or handler panicked while serving a request.
//!   The router catches it and hands it to the recovery policy.
//!
//! Not-found and method-not-allowed are ordinary responses, not errors.

use http::Method;
use std::any::Any;
use thiserror::Error;

/// Result type alias for route registration.
pub type RouteResult<T> = Result<T, RouteError>;

/// An invalid route registration.
///
/// # Example
///
/// ```
/// use fastroute_core::RouteError;
///
/// let err = RouteError::MissingLeadingSlash { pattern: "users".to_string() };
/// assert_eq!(err.to_string(), "route pattern must start with '/': users");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The pattern was the empty string.
    #[error("route pattern cannot be empty")]
    EmptyPattern,

    /// The pattern did not begin with `/`.
    #[error("route pattern must start with '/': {pattern}")]
    MissingLeadingSlash {
        /// The offending pattern.
        pattern: String,
    },

    /// A `:` segment without a name, e.g. `/users/:`.
    #[error("route variable without a name in {pattern}")]
    EmptyVariableName {
        /// The offending pattern.
        pattern: String,
    },

    /// The same variable name appears twice in one pattern.
    #[error("route variable {name:?} declared twice in {pattern}")]
    DuplicateVariable {
        /// The offending pattern.
        pattern: String,
        /// The repeated variable name.
        name: String,
    },

    /// A route with the same method and path shape already exists.
    #[error("route already exists: {method} {pattern}")]
    DuplicateRoute {
        /// Method of the rejected route.
        method: Method,
        /// Pattern of the rejected route.
        pattern: String,
    },
}

/// A panic caught while running a filter or handler.
///
/// Carries the textual description of the panic payload. Payloads that are
/// neither `&str` nor `String` are described generically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HandlerFailure {
    message: String,
}

impl HandlerFailure {
    /// Creates a failure with the given description.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Converts a payload returned by [`std::panic::catch_unwind`].
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_string(),
                Err(_) => "handler panicked".to_string(),
            },
        };
        Self { message }
    }

    /// Returns the failure description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
