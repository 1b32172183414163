//! Compiled routes.
//!
//! A [`Route`] is one `(method, pattern)` registration after compilation: the
//! pattern's segments, its variable positions, and the static prefix under
//! which the registry files it.

use crate::path;
use fastroute_core::{RequestContext, RouteError, RouteResult, SharedHandler};
use fastroute_middleware::FilterChain;
use http::{HeaderValue, Method};
use smallvec::SmallVec;
use std::fmt;

/// How a route compares its segment count with a request's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Same segment count and same trailing-slash state.
    Exact,
    /// Catch-all: the request has at least as many segments as the route.
    Prefix,
}

impl MatchKind {
    /// Returns true for catch-all routes.
    #[must_use]
    pub fn is_prefix(self) -> bool {
        self == Self::Prefix
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => f.write_str("exact"),
            Self::Prefix => f.write_str("prefix"),
        }
    }
}

/// Methods registered for one path shape, in registration order.
///
/// Rendered into the `Allow` header with `OPTIONS` appended when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedMethods {
    methods: SmallVec<[Method; 4]>,
}

impl AllowedMethods {
    /// Creates a set holding just `method`.
    #[must_use]
    pub fn single(method: Method) -> Self {
        let mut set = Self::default();
        set.insert(method);
        set
    }

    /// Adds `method` if not already present.
    pub fn insert(&mut self, method: Method) {
        if !self.contains(&method) {
            self.methods.push(method);
        }
    }

    /// Returns true if `method` is in the set.
    #[must_use]
    pub fn contains(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    /// Iterates the methods in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }

    /// Returns the number of methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Renders the `Allow` header value, e.g. `GET, POST, OPTIONS`.
    #[must_use]
    pub fn header_value(&self) -> HeaderValue {
        let mut names: Vec<&str> = self.methods.iter().map(Method::as_str).collect();
        if !self.contains(&Method::OPTIONS) {
            names.push(Method::OPTIONS.as_str());
        }
        HeaderValue::from_str(&names.join(", "))
            .unwrap_or(HeaderValue::from_static("OPTIONS"))
    }
}

/// A registered route.
pub struct Route {
    method: Method,
    pattern: String,
    segments: Vec<String>,
    variables: SmallVec<[(String, usize); 4]>,
    static_prefix: String,
    kind: MatchKind,
    allowed: AllowedMethods,
    filters: FilterChain,
    handler: SharedHandler,
}

impl Route {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// - [`RouteError::EmptyPattern`] for `""`
    /// - [`RouteError::MissingLeadingSlash`] if `pattern` does not start with `/`
    /// - [`RouteError::EmptyVariableName`] for a bare `:` segment
    /// - [`RouteError::DuplicateVariable`] if a variable name repeats
    pub fn compile(
        method: Method,
        pattern: &str,
        kind: MatchKind,
        handler: SharedHandler,
        filters: FilterChain,
        max_segments: usize,
    ) -> RouteResult<Self> {
        if pattern.is_empty() {
            return Err(RouteError::EmptyPattern);
        }
        if !pattern.starts_with('/') {
            return Err(RouteError::MissingLeadingSlash {
                pattern: pattern.to_string(),
            });
        }

        let segments = path::segment_with_limit(pattern, max_segments);
        let mut variables: SmallVec<[(String, usize); 4]> = SmallVec::new();
        let mut static_prefix = String::new();

        for (index, segment) in segments.iter().enumerate() {
            if let Some(name) = segment.strip_prefix("/:") {
                if name.is_empty() {
                    return Err(RouteError::EmptyVariableName {
                        pattern: pattern.to_string(),
                    });
                }
                if variables.iter().any(|(existing, _)| existing == name) {
                    return Err(RouteError::DuplicateVariable {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }
                variables.push((name.to_string(), index));
            } else if variables.is_empty() {
                static_prefix.push_str(segment);
            }
        }
        if static_prefix.is_empty() {
            static_prefix.push_str(path::SEPARATOR);
        }

        Ok(Self {
            allowed: AllowedMethods::single(method.clone()),
            method,
            pattern: pattern.to_string(),
            segments,
            variables,
            static_prefix,
            kind,
            filters,
            handler,
        })
    }

    /// Returns the route's method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the pattern as registered.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the compiled segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the number of compiled segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Iterates `(name, segment index)` for each variable.
    pub fn variables(&self) -> impl Iterator<Item = (&str, usize)> {
        self.variables.iter().map(|(n, i)| (n.as_str(), *i))
    }

    /// Returns the literal prefix preceding the first variable.
    #[must_use]
    pub fn static_prefix(&self) -> &str {
        &self.static_prefix
    }

    /// Returns the match kind.
    #[must_use]
    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    /// Returns the methods merged onto this route's shape.
    #[must_use]
    pub fn allowed_methods(&self) -> &AllowedMethods {
        &self.allowed
    }

    pub(crate) fn allow(&mut self, method: Method) {
        self.allowed.insert(method);
    }

    /// Returns the route-scoped filters.
    #[must_use]
    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    pub(crate) fn handler(&self) -> &SharedHandler {
        &self.handler
    }

    /// Returns true if `request` has the shape this route accepts.
    #[must_use]
    pub fn matches_shape(&self, request: &[String]) -> bool {
        let own = self.segments.len();
        match self.kind {
            MatchKind::Prefix => own <= request.len(),
            MatchKind::Exact => {
                own == request.len()
                    && path::ends_with_marker(&self.segments) == path::ends_with_marker(request)
            }
        }
    }

    /// Returns true if `method` is the route's method.
    #[must_use]
    pub fn matches_method(&self, method: &Method) -> bool {
        self.method == *method
    }

    /// Binds the route's variables from the request segments.
    ///
    /// Call only after [`matches_shape`](Self::matches_shape) succeeded.
    pub fn bind(&self, ctx: &mut RequestContext, request: &[String]) {
        for (name, index) in &self.variables {
            if let Some(segment) = request.get(*index) {
                ctx.params_mut().insert(name.as_str(), &segment[1..]);
            }
        }
        if self.kind.is_prefix() {
            let tail = self.catch_all_tail(&path::normalize(ctx.path()));
            ctx.set_catch_all_tail(tail);
        }
    }

    /// The part of `request_path` after this route's static prefix.
    ///
    /// The prefix's own trailing `/` is kept on the tail, so the result always
    /// starts with `/`.
    #[must_use]
    pub fn catch_all_tail(&self, request_path: &str) -> String {
        let prefix = self
            .static_prefix
            .strip_suffix('/')
            .unwrap_or(&self.static_prefix);
        let tail = request_path.strip_prefix(prefix).unwrap_or(request_path);
        if tail.starts_with('/') {
            tail.to_string()
        } else {
            format!("/{tail}")
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .field("segments", &self.segments)
            .field("variables", &self.variables)
            .field("static_prefix", &self.static_prefix)
            .field("kind", &self.kind)
            .field("allowed", &self.allowed)
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}
