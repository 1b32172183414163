//! Terminal request handlers.
//!
//! A [`Handler`] is the last step of a dispatch: it runs after every filter
//! allowed the request through and writes the response into the
//! [`RequestContext`]. Any closure `Fn(&mut RequestContext)` is a handler.

use crate::RequestContext;
use std::sync::Arc;

/// A handler shared between routes (for example by `any`) and threads.
pub type SharedHandler = Arc<dyn Handler>;

/// Handles a matched request.
///
/// Handlers are synchronous and must not block on I/O; they run on the
/// host server's request thread. A panic inside a handler is caught by the
/// router's recovery policy.
///
/// # Example
///
/// ```
/// use fastroute_core::{Handler, RequestContext};
/// use http::{Method, StatusCode};
///
/// struct Health;
///
/// impl Handler for Health {
///     fn call(&self, ctx: &mut RequestContext) {
///         ctx.text(StatusCode::OK, "ok");
///     }
/// }
///
/// let mut ctx = RequestContext::new(Method::GET, "/health");
/// Health.call(&mut ctx);
/// assert_eq!(ctx.response().body(), "ok");
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Processes the request, writing the outcome into `ctx`.
    fn call(&self, ctx: &mut RequestContext);
}

impl<F> Handler for F
where
    F: Fn(&mut RequestContext) + Send + Sync + 'static,
{
    fn call(&self, ctx: &mut RequestContext) {
        self(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode};

    #[test]
    fn test_closure_is_handler() {
        let handler = |ctx: &mut RequestContext| {
            let name = ctx.param("name").unwrap_or("nobody").to_string();
            ctx.text(StatusCode::OK, format!("hello {name}"));
        };

        let mut ctx = RequestContext::new(Method::GET, "/user/gopher");
        ctx.params_mut().insert("name", "gopher");
        Handler::call(&handler, &mut ctx);

        assert_eq!(ctx.response().status(), StatusCode::OK);
        assert_eq!(ctx.response().body(), "hello gopher");
    }

    #[test]
    fn test_shared_handler_clones() {
        let shared: SharedHandler = Arc::new(|ctx: &mut RequestContext| {
            ctx.set_status(StatusCode::NO_CONTENT);
        });
        let other = Arc::clone(&shared);

        let mut ctx = RequestContext::new(Method::DELETE, "/x");
        other.call(&mut ctx);
        assert_eq!(ctx.response().status(), StatusCode::NO_CONTENT);
    }
}
