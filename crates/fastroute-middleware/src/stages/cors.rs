//! CORS (Cross-Origin Resource Sharing) filter.
//!
//! Adds the CORS response headers to every request that carries an allowed
//! `Origin`, and answers `OPTIONS` requests itself with `204 No Content` so
//! preflights never reach a handler.
//!
//! The default configuration mirrors the request origin and allows
//! credentials, which suits first-party browser clients:
//!
//! | Header | Default |
//! |--------|---------|
//! | `Access-Control-Allow-Origin` | the request `Origin` |
//! | `Access-Control-Allow-Methods` | `GET,POST,PUT,DELETE,OPTIONS,PATCH` |
//! | `Access-Control-Allow-Headers` | `*` |
//! | `Access-Control-Expose-Headers` | `*` |
//! | `Access-Control-Allow-Credentials` | `true` |
//!
//! ## Example
//!
//! ```
//! use fastroute_core::RequestContext;
//! use fastroute_middleware::Filter;
//! use fastroute_middleware::stages::Cors;
//! use http::{HeaderValue, Method, StatusCode};
//! use http::header::ORIGIN;
//!
//! let cors = Cors::builder()
//!     .allow_origin("https://app.example.com")
//!     .build();
//!
//! let mut ctx = RequestContext::new(Method::OPTIONS, "/users")
//!     .with_header(ORIGIN, HeaderValue::from_static("https://app.example.com"));
//!
//! assert!(!cors.filter(&mut ctx));
//! assert_eq!(ctx.response().status(), StatusCode::NO_CONTENT);
//! ```

use crate::filter::Filter;
use fastroute_core::RequestContext;
use http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS,
    ACCESS_CONTROL_MAX_AGE, ORIGIN, VARY,
};
use http::{HeaderValue, Method, StatusCode};
use std::collections::HashSet;
use std::time::Duration;

/// Which origins receive CORS headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// Echo back whatever origin the request carries.
    Mirror,
    /// Only the listed origins.
    List(HashSet<String>),
}

impl AllowedOrigins {
    /// Checks if an origin is allowed.
    #[must_use]
    pub fn is_allowed(&self, origin: &str) -> bool {
        match self {
            Self::Mirror => true,
            Self::List(origins) => origins.contains(origin),
        }
    }
}

/// CORS filter.
#[derive(Debug, Clone)]
pub struct Cors {
    allowed_origins: AllowedOrigins,
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
    expose_headers: HeaderValue,
    allow_credentials: bool,
    max_age: Option<Duration>,
}

impl Default for Cors {
    fn default() -> Self {
        CorsBuilder::new().build()
    }
}

impl Cors {
    /// Creates a CORS filter with the permissive defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a builder.
    #[must_use]
    pub fn builder() -> CorsBuilder {
        CorsBuilder::new()
    }

    fn apply_headers(&self, ctx: &mut RequestContext, origin: HeaderValue) {
        ctx.set_header(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        ctx.set_header(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        ctx.set_header(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
        ctx.set_header(ACCESS_CONTROL_EXPOSE_HEADERS, self.expose_headers.clone());
        if self.allow_credentials {
            ctx.set_header(
                ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
        if let Some(max_age) = self.max_age {
            ctx.set_header(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(max_age.as_secs()));
        }
        ctx.set_header(VARY, HeaderValue::from_static("Origin"));
    }
}

impl Filter for Cors {
    fn name(&self) -> &'static str {
        "cors"
    }

    fn filter(&self, ctx: &mut RequestContext) -> bool {
        let origin = ctx
            .headers()
            .get(ORIGIN)
            .filter(|o| o.to_str().is_ok_and(|o| self.allowed_origins.is_allowed(o)))
            .cloned();

        if let Some(origin) = origin {
            self.apply_headers(ctx, origin);
        }

        if ctx.is_options() {
            ctx.set_status(StatusCode::NO_CONTENT);
            return false;
        }
        true
    }
}

/// Builder for [`Cors`].
#[derive(Debug, Clone)]
pub struct CorsBuilder {
    allowed_origins: AllowedOrigins,
    allow_methods: Vec<Method>,
    allow_headers: Vec<String>,
    expose_headers: Vec<String>,
    allow_credentials: bool,
    max_age: Option<Duration>,
}

impl Default for CorsBuilder {
    fn default() -> Self {
        Self {
            allowed_origins: AllowedOrigins::Mirror,
            allow_methods: vec![
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
                Method::PATCH,
            ],
            allow_headers: vec!["*".to_string()],
            expose_headers: vec!["*".to_string()],
            allow_credentials: true,
            max_age: None,
        }
    }
}

impl CorsBuilder {
    /// Creates a builder with the permissive defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts CORS headers to `origin` (and any other origins added).
    #[must_use]
    pub fn allow_origin(mut self, origin: impl Into<String>) -> Self {
        match &mut self.allowed_origins {
            AllowedOrigins::Mirror => {
                self.allowed_origins = AllowedOrigins::List(HashSet::from([origin.into()]));
            }
            AllowedOrigins::List(origins) => {
                origins.insert(origin.into());
            }
        }
        self
    }

    /// Echoes any request origin back.
    #[must_use]
    pub fn mirror_origin(mut self) -> Self {
        self.allowed_origins = AllowedOrigins::Mirror;
        self
    }

    /// Sets the allowed methods.
    #[must_use]
    pub fn allow_methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        self.allow_methods = methods.into_iter().collect();
        self
    }

    /// Sets the allowed request headers.
    #[must_use]
    pub fn allow_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the headers exposed to browser scripts.
    #[must_use]
    pub fn expose_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expose_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether credentials are allowed.
    #[must_use]
    pub fn allow_credentials(mut self, allow: bool) -> Self {
        self.allow_credentials = allow;
        self
    }

    /// Sets how long browsers may cache a preflight answer.
    #[must_use]
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Builds the filter.
    ///
    /// Header names that are not valid header values are dropped.
    #[must_use]
    pub fn build(self) -> Cors {
        let methods = self
            .allow_methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(",");

        Cors {
            allowed_origins: self.allowed_origins,
            allow_methods: join_header(std::iter::once(methods)),
            allow_headers: join_header(self.allow_headers),
            expose_headers: join_header(self.expose_headers),
            allow_credentials: self.allow_credentials,
            max_age: self.max_age,
        }
    }
}

fn join_header(values: impl IntoIterator<Item = String>) -> HeaderValue {
    let joined = values
        .into_iter()
        .filter(|v| HeaderValue::from_str(v).is_ok())
        .collect::<Vec<_>>()
        .join(",");
    HeaderValue::from_str(&joined).unwrap_or(HeaderValue::from_static(""))
}
