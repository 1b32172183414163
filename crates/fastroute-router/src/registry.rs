//! Route storage and lookup.
//!
//! Routes live in one insertion-ordered list. An index keyed by static prefix
//! gives the exact-path fast path and the duplicate check; a linear scan over
//! the list finds the longest-prefix fallbacks.

use crate::route::Route;
use fastroute_core::{RouteError, RouteResult};
use indexmap::IndexMap;

/// The two fallback candidates for a request path.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrefixWinners<'a> {
    /// Longest-prefix catch-all route.
    pub catch_all: Option<&'a Route>,
    /// Longest-prefix exact route.
    pub exact: Option<&'a Route>,
}

impl<'a> PrefixWinners<'a> {
    /// Iterates the winners in attempt order: catch-all first.
    pub fn in_order(self) -> impl Iterator<Item = &'a Route> {
        self.catch_all.into_iter().chain(self.exact)
    }
}

/// All registered routes.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: Vec<Route>,
    by_prefix: IndexMap<String, Vec<usize>>,
}

impl RouteRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a compiled route.
    ///
    /// Routes already filed under the same static prefix with the same
    /// segment count form one path shape: their methods are merged into each
    /// other's allowed sets.
    ///
    /// # Errors
    ///
    /// [`RouteError::DuplicateRoute`] if a route with the same shape already
    /// uses the same method. The registry is unchanged in that case.
    pub fn insert(&mut self, mut route: Route) -> RouteResult<()> {
        let bucket = self
            .by_prefix
            .get(route.static_prefix())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let siblings: Vec<usize> = bucket
            .iter()
            .copied()
            .filter(|&i| self.routes[i].segment_count() == route.segment_count())
            .collect();

        if siblings
            .iter()
            .any(|&i| self.routes[i].method() == route.method())
        {
            return Err(RouteError::DuplicateRoute {
                method: route.method().clone(),
                pattern: route.pattern().to_string(),
            });
        }

        for &i in &siblings {
            let existing = &mut self.routes[i];
            existing.allow(route.method().clone());
            for method in existing.allowed_methods().iter() {
                route.allow(method.clone());
            }
        }

        let index = self.routes.len();
        self.by_prefix
            .entry(route.static_prefix().to_string())
            .or_default()
            .push(index);
        self.routes.push(route);
        Ok(())
    }

    /// Routes whose static prefix equals `path`, in insertion order.
    pub fn exact(&self, path: &str) -> impl Iterator<Item = &Route> {
        self.by_prefix
            .get(path)
            .into_iter()
            .flatten()
            .map(|&i| &self.routes[i])
    }

    /// Finds the longest-prefix catch-all and exact routes for `path`.
    ///
    /// Only routes whose static prefix is a string prefix of `path` compete.
    /// A strictly longer prefix wins; on a tie the earlier route stays.
    #[must_use]
    pub fn longest_prefix(&self, path: &str) -> PrefixWinners<'_> {
        fn longer<'r>(current: Option<&'r Route>, candidate: &'r Route) -> Option<&'r Route> {
            match current {
                Some(best) if best.static_prefix().len() >= candidate.static_prefix().len() => {
                    Some(best)
                }
                _ => Some(candidate),
            }
        }

        self.routes
            .iter()
            .filter(|route| path.starts_with(route.static_prefix()))
            .fold(PrefixWinners::default(), |winners, route| {
                if route.kind().is_prefix() {
                    PrefixWinners {
                        catch_all: longer(winners.catch_all, route),
                        ..winners
                    }
                } else {
                    PrefixWinners {
                        exact: longer(winners.exact, route),
                        ..winners
                    }
                }
            })
    }

    /// Iterates every route in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Patterns grouped by static prefix, in first-registration order.
    #[must_use]
    pub fn patterns(&self) -> Vec<&str> {
        self.by_prefix
            .values()
            .flatten()
            .map(|&i| self.routes[i].pattern())
            .collect()
    }

    /// Returns the number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::MAX_SEGMENTS;
    use crate::route::MatchKind;
    use fastroute_core::RequestContext;
    use fastroute_middleware::FilterChain;
    use http::Method;
    use std::sync::Arc;

    fn route(method: Method, pattern: &str, kind: MatchKind) -> Route {
        Route::compile(
            method,
            pattern,
            kind,
            Arc::new(|_: &mut RequestContext| {}),
            FilterChain::new(),
            MAX_SEGMENTS,
        )
        .unwrap()
    }

    fn allowed(registry: &RouteRegistry, pattern: &str, method: &Method) -> Vec<String> {
        registry
            .iter()
            .find(|r| r.pattern() == pattern && r.method() == method)
            .unwrap()
            .allowed_methods()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = RouteRegistry::new();
        registry
            .insert(route(Method::GET, "/x", MatchKind::Exact))
            .unwrap();

        let err = registry
            .insert(route(Method::GET, "/x", MatchKind::Exact))
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::DuplicateRoute {
                method: Method::GET,
                pattern: "/x".to_string()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_same_shape_variable_names_collide() {
        let mut registry = RouteRegistry::new();
        registry
            .insert(route(Method::GET, "/user/:id", MatchKind::Exact))
            .unwrap();
        assert!(registry
            .insert(route(Method::GET, "/user/:name", MatchKind::Exact))
            .is_err());
    }

    #[test]
    fn test_methods_merge_both_ways() {
        let mut registry = RouteRegistry::new();
        registry
            .insert(route(Method::GET, "/x", MatchKind::Exact))
            .unwrap();
        registry
            .insert(route(Method::POST, "/x", MatchKind::Exact))
            .unwrap();
        registry
            .insert(route(Method::GET, "/x/", MatchKind::Exact))
            .unwrap();

        assert_eq!(allowed(&registry, "/x", &Method::GET), ["GET", "POST"]);
        assert_eq!(allowed(&registry, "/x", &Method::POST), ["POST", "GET"]);
        // different prefix bucket, not merged
        assert_eq!(allowed(&registry, "/x/", &Method::GET), ["GET"]);
    }

    #[test]
    fn test_exact_lookup_in_insertion_order() {
        let mut registry = RouteRegistry::new();
        registry
            .insert(route(Method::GET, "/a", MatchKind::Exact))
            .unwrap();
        registry
            .insert(route(Method::GET, "/a/:b", MatchKind::Exact))
            .unwrap();
        registry
            .insert(route(Method::GET, "/b", MatchKind::Exact))
            .unwrap();

        let patterns: Vec<_> = registry.exact("/a").map(Route::pattern).collect();
        assert_eq!(patterns, ["/a", "/a/:b"]);
        assert_eq!(registry.exact("/c").count(), 0);
    }

    #[test]
    fn test_longest_prefix_by_kind() {
        let mut registry = RouteRegistry::new();
        registry
            .insert(route(Method::GET, "/", MatchKind::Prefix))
            .unwrap();
        registry
            .insert(route(Method::GET, "/a/:b/:c", MatchKind::Prefix))
            .unwrap();
        registry
            .insert(route(Method::GET, "/a/:y", MatchKind::Exact))
            .unwrap();
        registry
            .insert(route(Method::GET, "/:z", MatchKind::Exact))
            .unwrap();

        let winners = registry.longest_prefix("/a/b/c");
        assert_eq!(winners.catch_all.map(Route::pattern), Some("/a/:b/:c"));
        assert_eq!(winners.exact.map(Route::pattern), Some("/a/:y"));

        let order: Vec<_> = winners.in_order().map(Route::pattern).collect();
        assert_eq!(order, ["/a/:b/:c", "/a/:y"]);

        let winners = registry.longest_prefix("/q");
        assert_eq!(winners.catch_all.map(Route::pattern), Some("/"));
        assert_eq!(winners.exact.map(Route::pattern), Some("/:z"));
    }

    #[test]
    fn test_longest_prefix_tie_keeps_first() {
        let mut registry = RouteRegistry::new();
        registry
            .insert(route(Method::GET, "/a/:x", MatchKind::Exact))
            .unwrap();
        registry
            .insert(route(Method::GET, "/a/:x/:y", MatchKind::Exact))
            .unwrap();

        let winners = registry.longest_prefix("/a/1/2");
        assert_eq!(winners.exact.map(Route::pattern), Some("/a/:x"));
        assert!(winners.catch_all.is_none());
    }

    #[test]
    fn test_patterns_grouped_by_prefix() {
        let mut registry = RouteRegistry::new();
        for pattern in ["/a", "/b", "/a/:id", "/b/:id"] {
            registry
                .insert(route(Method::GET, pattern, MatchKind::Exact))
                .unwrap();
        }
        assert_eq!(registry.patterns(), ["/a", "/a/:id", "/b", "/b/:id"]);
    }
}
