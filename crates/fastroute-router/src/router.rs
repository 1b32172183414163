//! Request dispatch.
//!
//! # Matching order
//!
//! 1. Paths longer than [`RouterConfig::max_path_len`] get `414` without
//!    matching.
//! 2. Routes whose static prefix equals the raw path, in registration order.
//! 3. Among routes whose static prefix is a prefix of the raw path: the
//!    longest-prefix catch-all route, then the longest-prefix exact route.
//! 4. Nothing served: `405` if some attempt matched the path shape, else `404`.
//!
//! A path without a leading `/` is looked up as if it had one. Every attempt
//! sets `Allow` from the attempted route, so a `404` keeps the last one.
//!
//! A route is served once its shape and method match, even if a filter then
//! stops the request.

use crate::config::RouterConfig;
use crate::path;
use crate::recovery::RecoveryPolicy;
use crate::registry::RouteRegistry;
use crate::route::{MatchKind, Route};
use crate::RouterBuilder;
use bytes::Bytes;
use fastroute_core::{HandlerFailure, RequestContext, SharedHandler};
use fastroute_middleware::FilterChain;
use http::header::ALLOW;
use http::{Method, Request, Response, StatusCode};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Body of the default not-found response.
pub const NOT_FOUND_BODY: &str = "404 Page not found";

/// One row of [`Router::route_table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo<'a> {
    /// Registered method.
    pub method: &'a Method,
    /// Pattern as registered.
    pub pattern: &'a str,
    /// Exact or catch-all.
    pub kind: MatchKind,
    /// Number of route-scoped filters.
    pub filters: usize,
}

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A route matched; its filters and possibly its handler ran.
    Matched,
    /// No route matched the path shape.
    NotFound,
    /// A route matched the path shape but not the method.
    MethodNotAllowed,
    /// The path exceeded the configured length limit.
    UriTooLong,
    /// A filter, handler or hook panicked and recovery wrote the response.
    Recovered,
}

enum Attempt {
    Served,
    WrongMethod,
    WrongShape,
}

pub(crate) struct RouterInner {
    pub(crate) registry: RouteRegistry,
    pub(crate) global_filters: FilterChain,
    pub(crate) not_found: Option<SharedHandler>,
    pub(crate) method_not_allowed: Option<SharedHandler>,
    pub(crate) recovery: RecoveryPolicy,
    pub(crate) config: RouterConfig,
}

/// An immutable, shareable route table.
///
/// Cloning is an `Arc` clone; every clone serves the same table. Dispatch
/// takes `&self` and never locks.
///
/// # Example
///
/// ```
/// use fastroute_core::RequestContext;
/// use fastroute_router::{RouteRegistrar, Router};
/// use http::{Method, StatusCode};
///
/// let mut builder = Router::builder();
/// builder
///     .get("/user/:name", |ctx: &mut RequestContext| {
///         let body = format!("hello {}", ctx.param("name").unwrap_or_default());
///         ctx.text(StatusCode::OK, body);
///     })
///     .unwrap();
/// let router = builder.build().unwrap();
///
/// let mut ctx = RequestContext::new(Method::GET, "/user/gopher?baz");
/// router.dispatch(&mut ctx);
/// assert_eq!(ctx.response().body_str(), Some("hello gopher"));
/// ```
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

impl Router {
    /// Starts a [`RouterBuilder`] with the default configuration.
    #[must_use]
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub(crate) fn from_inner(inner: RouterInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.inner.config
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.registry.is_empty()
    }

    /// Registered patterns, grouped by static prefix in first-registration
    /// order. A pattern registered for several methods appears once per
    /// method.
    #[must_use]
    pub fn routes(&self) -> Vec<&str> {
        self.inner.registry.patterns()
    }

    /// Every route in registration order.
    #[must_use]
    pub fn route_table(&self) -> Vec<RouteInfo<'_>> {
        self.inner
            .registry
            .iter()
            .map(|route| RouteInfo {
                method: route.method(),
                pattern: route.pattern(),
                kind: route.kind(),
                filters: route.filters().len(),
            })
            .collect()
    }

    /// Converts an [`http::Request`], dispatches it and returns the response.
    #[must_use]
    pub fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        let mut ctx = RequestContext::from_request(request);
        self.dispatch(&mut ctx);
        ctx.into_response()
    }

    /// Routes `ctx` and writes the response into it.
    pub fn dispatch(&self, ctx: &mut RequestContext) -> Outcome {
        let config = &self.inner.config;
        if ctx.path().len() > config.max_path_len {
            tracing::warn!(
                http.method = %ctx.method(),
                path_len = ctx.path().len(),
                max_path_len = config.max_path_len,
                "Request path too long"
            );
            ctx.set_status(StatusCode::URI_TOO_LONG);
            return Outcome::UriTooLong;
        }

        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| self.route(ctx))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let failure = HandlerFailure::from_panic(payload);
                tracing::error!(
                    http.method = %ctx.method(),
                    http.path = ctx.path(),
                    error = %failure,
                    "Recovered from panic while serving request"
                );
                self.inner.recovery.recover(ctx, &failure);
                Outcome::Recovered
            }
        };

        if config.log_dispatch {
            tracing::debug!(
                http.method = %ctx.method(),
                http.path = ctx.path(),
                http.status_code = ctx.response().status().as_u16(),
                outcome = ?outcome,
                "Request dispatched"
            );
        }
        outcome
    }

    fn route(&self, ctx: &mut RequestContext) -> Outcome {
        let registry = &self.inner.registry;
        let raw_path = path::normalize(ctx.path()).into_owned();
        let segments = path::segment_with_limit(&raw_path, self.inner.config.max_segments);

        let mut shape_match: Option<&Route> = None;
        let fallback = || registry.longest_prefix(&raw_path).in_order();
        let candidates = registry
            .exact(&raw_path)
            .chain(std::iter::once_with(fallback).flatten());

        for route in candidates {
            match self.attempt(route, ctx, &segments) {
                Attempt::Served => return Outcome::Matched,
                Attempt::WrongMethod => {
                    shape_match.get_or_insert(route);
                }
                Attempt::WrongShape => {}
            }
        }

        match shape_match {
            Some(route) => {
                ctx.set_header(ALLOW, route.allowed_methods().header_value());
                if let Some(hook) = &self.inner.method_not_allowed {
                    hook.call(ctx);
                }
                ctx.set_status(StatusCode::METHOD_NOT_ALLOWED);
                ctx.set_header(ALLOW, route.allowed_methods().header_value());
                Outcome::MethodNotAllowed
            }
            None => {
                match &self.inner.not_found {
                    Some(hook) => hook.call(ctx),
                    None => ctx.text(StatusCode::NOT_FOUND, NOT_FOUND_BODY),
                }
                Outcome::NotFound
            }
        }
    }

    fn attempt(&self, route: &Route, ctx: &mut RequestContext, segments: &[String]) -> Attempt {
        let shape = route.matches_shape(segments);
        let method = route.matches_method(ctx.method());
        ctx.set_header(ALLOW, route.allowed_methods().header_value());

        match (shape, method) {
            (false, _) => return Attempt::WrongShape,
            (true, false) => return Attempt::WrongMethod,
            (true, true) => {}
        }

        route.bind(ctx, segments);
        if self.inner.global_filters.run(ctx) && route.filters().run(ctx) {
            route.handler().call(ctx);
        }
        Attempt::Served
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.inner.registry.len())
            .field("global_filters", &self.inner.global_filters)
            .field("not_found", &self.inner.not_found.is_some())
            .field("method_not_allowed", &self.inner.method_not_allowed.is_some())
            .field("recovery", &self.inner.recovery)
            .field("config", &self.inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RouteRegistrar;

    fn ok(ctx: &mut RequestContext) {
        ctx.text(StatusCode::OK, ctx.path().to_string());
    }

    #[test]
    fn test_router_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Router>();
    }

    #[test]
    fn test_empty_router_not_found() {
        let router = Router::builder().build().unwrap();
        assert!(router.is_empty());

        let mut ctx = RequestContext::new(Method::GET, "/");
        assert_eq!(router.dispatch(&mut ctx), Outcome::NotFound);
        assert_eq!(ctx.response().status(), StatusCode::NOT_FOUND);
        assert_eq!(ctx.response().body_str(), Some(NOT_FOUND_BODY));
    }

    #[test]
    fn test_outcomes() {
        let mut builder = Router::builder();
        builder.post("/path", ok).unwrap();
        let router = builder.build().unwrap();

        let cases = [
            (Method::POST, "/path", Outcome::Matched),
            (Method::GET, "/path", Outcome::MethodNotAllowed),
            (Method::POST, "/nope", Outcome::NotFound),
        ];
        for (method, target, expected) in cases {
            let mut ctx = RequestContext::new(method, target);
            assert_eq!(router.dispatch(&mut ctx), expected, "{target}");
        }
    }

    #[test]
    fn test_allow_written_on_success() {
        let mut builder = Router::builder();
        builder.get("/x", ok).unwrap().post("/x", ok).unwrap();
        let router = builder.build().unwrap();

        let mut ctx = RequestContext::new(Method::GET, "/x");
        router.dispatch(&mut ctx);
        assert_eq!(ctx.response().header("allow"), Some("GET, POST, OPTIONS"));
    }

    #[test]
    fn test_handle_round_trip() {
        let mut builder = Router::builder();
        builder.get("/user/:name", ok).unwrap();
        let router = builder.build().unwrap();

        let request = Request::builder()
            .method(Method::GET)
            .uri("/user/gopher?baz")
            .body(Bytes::new())
            .unwrap();
        let response = router.handle(request);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), b"/user/gopher");
    }

    #[test]
    fn test_clones_share_table() {
        let mut builder = Router::builder();
        builder.get("/a", ok).unwrap();
        let router = builder.build().unwrap();
        let clone = router.clone();

        assert_eq!(clone.routes(), router.routes());
        assert!(Arc::ptr_eq(&clone.inner, &router.inner));
    }
}
