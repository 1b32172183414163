//! The core filter trait.
//!
//! Filters are the router's middleware. Unlike an onion-style middleware
//! that wraps the rest of the pipeline, a filter runs to completion before
//! the next one starts and can only decide whether the request continues.

use fastroute_core::RequestContext;
use std::fmt;
use std::sync::Arc;

/// A filter shared between routes and threads.
pub type SharedFilter = Arc<dyn Filter>;

/// A short-circuiting request filter.
///
/// # Contract
///
/// - Return `true` to continue with the next filter (or the handler).
/// - Return `false` to stop. The filter must already have written the
///   response; no later filter and no handler will run.
///
/// Closures `Fn(&mut RequestContext) -> bool` implement this trait directly.
/// Wrap them in [`FnFilter`] to give them a name for logs.
///
/// # Example
///
/// ```
/// use fastroute_core::RequestContext;
/// use fastroute_middleware::Filter;
/// use http::StatusCode;
///
/// struct RequireJson;
///
/// impl Filter for RequireJson {
///     fn name(&self) -> &'static str {
///         "require_json"
///     }
///
///     fn filter(&self, ctx: &mut RequestContext) -> bool {
///         if ctx.header("content-type") == Some("application/json") {
///             return true;
///         }
///         ctx.text(StatusCode::UNSUPPORTED_MEDIA_TYPE, "expected JSON");
///         false
///     }
/// }
/// ```
pub trait Filter: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str {
        "anonymous"
    }

    /// Inspects the request; `true` continues the chain.
    fn filter(&self, ctx: &mut RequestContext) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&mut RequestContext) -> bool + Send + Sync + 'static,
{
    fn filter(&self, ctx: &mut RequestContext) -> bool {
        self(ctx)
    }
}

/// A named closure filter.
pub struct FnFilter<F> {
    name: &'static str,
    func: F,
}

impl<F> FnFilter<F>
where
    F: Fn(&mut RequestContext) -> bool + Send + Sync + 'static,
{
    /// Creates a named filter from a closure.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Filter for FnFilter<F>
where
    F: Fn(&mut RequestContext) -> bool + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn filter(&self, ctx: &mut RequestContext) -> bool {
        (self.func)(ctx)
    }
}

impl<F> fmt::Debug for FnFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFilter").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_closure_filter_has_default_name() {
        let allow = |_: &mut RequestContext| true;
        assert_eq!(Filter::name(&allow), "anonymous");

        let mut ctx = RequestContext::new(Method::GET, "/");
        assert!(allow.filter(&mut ctx));
    }

    #[test]
    fn test_fn_filter_name_and_result() {
        let deny = FnFilter::new("deny", |_: &mut RequestContext| false);
        assert_eq!(deny.name(), "deny");

        let mut ctx = RequestContext::new(Method::GET, "/");
        assert!(!deny.filter(&mut ctx));
    }
}
