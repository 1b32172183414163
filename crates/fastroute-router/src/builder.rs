//! Route registration.
//!
//! Routes, filters and hooks are only accepted on a [`RouterBuilder`].
//! [`RouterBuilder::build`] freezes them into an immutable [`Router`].

use crate::config::RouterConfig;
use crate::recovery::{RecoverFn, RecoveryPolicy};
use crate::registry::RouteRegistry;
use crate::route::{MatchKind, Route};
use crate::router::{Router, RouterInner};
use fastroute_core::{Handler, HandlerFailure, RequestContext, RouteError, RouteResult, SharedHandler};
use fastroute_middleware::{Filter, FilterChain};
use http::Method;
use std::fmt;
use std::sync::Arc;

/// Methods registered by [`RouteRegistrar::any`].
pub const ANY_METHODS: [Method; 9] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::HEAD,
    Method::OPTIONS,
    Method::DELETE,
    Method::CONNECT,
    Method::TRACE,
];

/// Registration API shared by [`RouterBuilder`] and [`RouteScope`].
///
/// Every method returns `&mut Self` so registrations chain with `?`:
///
/// ```
/// use fastroute_core::RequestContext;
/// use fastroute_router::{RouteRegistrar, Router};
///
/// # fn main() -> Result<(), fastroute_core::RouteError> {
/// let mut builder = Router::builder();
/// builder
///     .get("/users", |_: &mut RequestContext| {})?
///     .post("/users", |_: &mut RequestContext| {})?
///     .get("/users/:id", |_: &mut RequestContext| {})?;
/// let router = builder.build()?;
/// assert_eq!(router.len(), 3);
/// # Ok(())
/// # }
/// ```
pub trait RouteRegistrar {
    /// Registers a compiled handler. All other methods delegate here.
    ///
    /// # Errors
    ///
    /// Any [`RouteError`]: an invalid pattern or a duplicate route.
    fn register(
        &mut self,
        method: Method,
        pattern: &str,
        kind: MatchKind,
        handler: SharedHandler,
    ) -> RouteResult<&mut Self>;

    /// Registers an exact route for `method`.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    fn handle(
        &mut self,
        method: Method,
        pattern: &str,
        handler: impl Handler,
    ) -> RouteResult<&mut Self> {
        self.register(method, pattern, MatchKind::Exact, Arc::new(handler))
    }

    /// Registers a catch-all route for `method`.
    ///
    /// The route matches any request with at least as many segments as
    /// `pattern`; the handler finds the unmatched rest in
    /// [`RequestContext::catch_all_tail`].
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    fn prefix(
        &mut self,
        method: Method,
        pattern: &str,
        handler: impl Handler,
    ) -> RouteResult<&mut Self> {
        self.register(method, pattern, MatchKind::Prefix, Arc::new(handler))
    }

    /// Registers `pattern` for every method in [`ANY_METHODS`].
    ///
    /// A pattern with variables only serves `GET` when matching falls back to
    /// the longest-prefix pass, because that pass tries a single route.
    ///
    /// # Errors
    ///
    /// Stops at the first method that fails to register.
    fn any(&mut self, pattern: &str, handler: impl Handler) -> RouteResult<&mut Self> {
        let handler: SharedHandler = Arc::new(handler);
        for method in ANY_METHODS {
            self.register(method, pattern, MatchKind::Exact, Arc::clone(&handler))?;
        }
        Ok(self)
    }

    /// Registers a `GET` route.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    fn get(&mut self, pattern: &str, handler: impl Handler) -> RouteResult<&mut Self> {
        self.handle(Method::GET, pattern, handler)
    }

    /// Registers a `POST` route.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    fn post(&mut self, pattern: &str, handler: impl Handler) -> RouteResult<&mut Self> {
        self.handle(Method::POST, pattern, handler)
    }

    /// Registers a `PUT` route.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    fn put(&mut self, pattern: &str, handler: impl Handler) -> RouteResult<&mut Self> {
        self.handle(Method::PUT, pattern, handler)
    }

    /// Registers a `PATCH` route.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    fn patch(&mut self, pattern: &str, handler: impl Handler) -> RouteResult<&mut Self> {
        self.handle(Method::PATCH, pattern, handler)
    }

    /// Registers a `HEAD` route.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    fn head(&mut self, pattern: &str, handler: impl Handler) -> RouteResult<&mut Self> {
        self.handle(Method::HEAD, pattern, handler)
    }

    /// Registers an `OPTIONS` route.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    fn options(&mut self, pattern: &str, handler: impl Handler) -> RouteResult<&mut Self> {
        self.handle(Method::OPTIONS, pattern, handler)
    }

    /// Registers a `DELETE` route.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    fn delete(&mut self, pattern: &str, handler: impl Handler) -> RouteResult<&mut Self> {
        self.handle(Method::DELETE, pattern, handler)
    }

    /// Registers a `CONNECT` route.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    fn connect(&mut self, pattern: &str, handler: impl Handler) -> RouteResult<&mut Self> {
        self.handle(Method::CONNECT, pattern, handler)
    }

    /// Registers a `TRACE` route.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    fn trace(&mut self, pattern: &str, handler: impl Handler) -> RouteResult<&mut Self> {
        self.handle(Method::TRACE, pattern, handler)
    }
}

/// Collects routes, filters and hooks for a [`Router`].
///
/// Registration failures are returned immediately and also remembered:
/// [`build`](Self::build) refuses to produce a router from a builder that saw
/// one, so an invalid route table can never serve.
pub struct RouterBuilder {
    registry: RouteRegistry,
    global_filters: FilterChain,
    not_found: Option<SharedHandler>,
    method_not_allowed: Option<SharedHandler>,
    recover: Option<RecoverFn>,
    config: RouterConfig,
    first_error: Option<RouteError>,
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::with_config(RouterConfig::default())
    }
}

impl RouterBuilder {
    /// Creates a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with `config`.
    ///
    /// The configuration is fixed for the builder's lifetime since route
    /// patterns are segmented with its segment limit as they register.
    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            registry: RouteRegistry::new(),
            global_filters: FilterChain::new(),
            not_found: None,
            method_not_allowed: None,
            recover: None,
            config,
            first_error: None,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Adds a filter that runs for every matched request, before route filters.
    pub fn filter(&mut self, filter: impl Filter) -> &mut Self {
        self.global_filters.push(filter);
        self
    }

    /// Replaces the default `404 Page not found` response.
    pub fn not_found(&mut self, handler: impl Handler) -> &mut Self {
        self.not_found = Some(Arc::new(handler));
        self
    }

    /// Runs `handler` when the path matched but the method did not.
    ///
    /// The status is forced to `405` and `Allow` is set regardless of what the
    /// handler writes.
    pub fn method_not_allowed(&mut self, handler: impl Handler) -> &mut Self {
        self.method_not_allowed = Some(Arc::new(handler));
        self
    }

    /// Installs a custom recovery callback for panicking filters and handlers.
    pub fn recover<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&mut RequestContext, &HandlerFailure) + Send + Sync + 'static,
    {
        self.recover = Some(Arc::new(callback));
        self
    }

    /// Returns a registrar whose routes carry `filters`.
    ///
    /// ```
    /// use fastroute_core::RequestContext;
    /// use fastroute_middleware::FilterChain;
    /// use fastroute_middleware::stages::BasicAuth;
    /// use fastroute_router::{RouteRegistrar, Router};
    ///
    /// let mut builder = Router::builder();
    /// builder
    ///     .scope(FilterChain::new().with(BasicAuth::new("admin", "secret")))
    ///     .get("/admin", |_: &mut RequestContext| {})
    ///     .unwrap();
    /// ```
    pub fn scope(&mut self, filters: FilterChain) -> RouteScope<'_> {
        RouteScope {
            builder: self,
            filters,
        }
    }

    /// Mounts `handler` as a `GET` catch-all under `prefix`.
    ///
    /// Meant for static file serving: the handler reads the requested file
    /// path from [`RequestContext::catch_all_tail`].
    ///
    /// # Errors
    ///
    /// See [`RouteRegistrar::register`].
    pub fn mount(&mut self, prefix: &str, handler: impl Handler) -> RouteResult<&mut Self> {
        self.prefix(Method::GET, prefix, handler)
    }

    fn insert(
        &mut self,
        method: Method,
        pattern: &str,
        kind: MatchKind,
        handler: SharedHandler,
        filters: FilterChain,
    ) -> RouteResult<()> {
        let result = Route::compile(
            method.clone(),
            pattern,
            kind,
            handler,
            filters,
            self.config.max_segments,
        )
        .and_then(|route| self.registry.insert(route));

        match &result {
            Ok(()) => {
                tracing::debug!(http.method = %method, route = pattern, kind = %kind, "Route registered");
            }
            Err(err) => {
                tracing::error!(http.method = %method, route = pattern, error = %err, "Route registration failed");
                if self.first_error.is_none() {
                    self.first_error = Some(err.clone());
                }
            }
        }
        result
    }

    /// Freezes the route table.
    ///
    /// # Errors
    ///
    /// The first [`RouteError`] any registration on this builder returned.
    pub fn build(self) -> RouteResult<Router> {
        if let Some(err) = self.first_error {
            return Err(err);
        }

        tracing::debug!(
            routes = self.registry.len(),
            global_filters = self.global_filters.len(),
            "Router built"
        );

        Ok(Router::from_inner(RouterInner {
            registry: self.registry,
            global_filters: self.global_filters,
            not_found: self.not_found,
            method_not_allowed: self.method_not_allowed,
            recovery: RecoveryPolicy::new(self.recover, self.config.recovery),
            config: self.config,
        }))
    }
}

impl RouteRegistrar for RouterBuilder {
    fn register(
        &mut self,
        method: Method,
        pattern: &str,
        kind: MatchKind,
        handler: SharedHandler,
    ) -> RouteResult<&mut Self> {
        self.insert(method, pattern, kind, handler, FilterChain::new())?;
        Ok(self)
    }
}

impl fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("routes", &self.registry.len())
            .field("global_filters", &self.global_filters)
            .field("config", &self.config)
            .field("first_error", &self.first_error)
            .finish_non_exhaustive()
    }
}

/// Registers routes that share a filter chain.
///
/// Created by [`RouterBuilder::scope`].
pub struct RouteScope<'a> {
    builder: &'a mut RouterBuilder,
    filters: FilterChain,
}

impl RouteScope<'_> {
    /// Returns the filters attached to routes registered through this scope.
    #[must_use]
    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }
}

impl RouteRegistrar for RouteScope<'_> {
    fn register(
        &mut self,
        method: Method,
        pattern: &str,
        kind: MatchKind,
        handler: SharedHandler,
    ) -> RouteResult<&mut Self> {
        self.builder
            .insert(method, pattern, kind, handler, self.filters.clone())?;
        Ok(self)
    }
}

impl fmt::Debug for RouteScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteScope")
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut RequestContext) {}

    #[test]
    fn test_chained_registration() {
        let mut builder = RouterBuilder::new();
        builder
            .get("/GET", noop)
            .and_then(|b| b.head("/GET", noop))
            .and_then(|b| b.options("/GET", noop))
            .and_then(|b| b.post("/POST", noop))
            .and_then(|b| b.put("/PUT", noop))
            .and_then(|b| b.patch("/PATCH", noop))
            .and_then(|b| b.delete("/DELETE", noop))
            .and_then(|b| b.connect("/CONNECT", noop))
            .and_then(|b| b.trace("/TRACE", noop))
            .unwrap();

        let router = builder.build().unwrap();
        assert_eq!(router.len(), 9);
    }

    #[test]
    fn test_any_registers_every_method() {
        let mut builder = RouterBuilder::new();
        builder.any("/any", noop).unwrap();
        let router = builder.build().unwrap();

        let methods: Vec<Method> = router
            .route_table()
            .into_iter()
            .map(|info| info.method.clone())
            .collect();
        assert_eq!(methods, ANY_METHODS);
    }

    #[test]
    fn test_any_twice_is_duplicate() {
        let mut builder = RouterBuilder::new();
        builder.any("/any", noop).unwrap();
        assert!(matches!(
            builder.any("/any", noop),
            Err(RouteError::DuplicateRoute { .. })
        ));
    }

    #[test]
    fn test_build_fails_after_registration_error() {
        let mut builder = RouterBuilder::new();
        assert!(builder.get("noSlash", noop).is_err());
        builder.get("/ok", noop).unwrap();

        assert_eq!(
            builder.build().unwrap_err(),
            RouteError::MissingLeadingSlash {
                pattern: "noSlash".to_string()
            }
        );
    }

    #[test]
    fn test_scope_attaches_filters() {
        let mut builder = RouterBuilder::new();
        let filters = FilterChain::new().with(|_: &mut RequestContext| true);
        {
            let mut scope = builder.scope(filters);
            assert_eq!(scope.filters().len(), 1);
            scope.get("/a", noop).unwrap().get("/b", noop).unwrap();
        }
        builder.get("/c", noop).unwrap();

        let router = builder.build().unwrap();
        let filter_counts: Vec<usize> = router
            .route_table()
            .iter()
            .map(|info| info.filters)
            .collect();
        assert_eq!(filter_counts, [1, 1, 0]);
    }

    #[test]
    fn test_mount_is_get_catch_all() {
        let mut builder = RouterBuilder::new();
        builder.mount("/static/", noop).unwrap();
        let router = builder.build().unwrap();

        let table = router.route_table();
        assert_eq!(table[0].method, &Method::GET);
        assert_eq!(table[0].kind, MatchKind::Prefix);
        assert_eq!(table[0].pattern, "/static/");
    }
}
