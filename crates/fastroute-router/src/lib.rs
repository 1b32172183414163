//! Prefix-indexed HTTP request router.
//!
//! Matches a request's method and path to one registered handler, binds
//! `:name` path variables, runs the filter chain and calls the handler.
//! The router does not accept connections or parse HTTP; the host server
//! builds a [`RequestContext`](fastroute_core::RequestContext) and calls
//! [`Router::dispatch`], or hands over an `http::Request` via
//! [`Router::handle`].
//!
//! # Example
//!
//! ```rust
//! use fastroute_core::RequestContext;
//! use fastroute_router::{RouteRegistrar, Router};
//! use http::{Method, StatusCode};
//!
//! let mut builder = Router::builder();
//! builder
//!     .get("/users/:id", |ctx: &mut RequestContext| {
//!         let id = ctx.param("id").unwrap_or_default().to_string();
//!         ctx.text(StatusCode::OK, id);
//!     })
//!     .unwrap()
//!     .mount("/static/", |ctx: &mut RequestContext| {
//!         let file = ctx.catch_all_tail().unwrap_or("/").to_string();
//!         ctx.text(StatusCode::OK, file);
//!     })
//!     .unwrap();
//! let router = builder.build().unwrap();
//!
//! let mut ctx = RequestContext::new(Method::GET, "/users/42");
//! router.dispatch(&mut ctx);
//! assert_eq!(ctx.response().body_str(), Some("42"));
//!
//! let mut ctx = RequestContext::new(Method::GET, "/static/css/site.css");
//! router.dispatch(&mut ctx);
//! assert_eq!(ctx.response().body_str(), Some("/css/site.css"));
//!
//! let mut ctx = RequestContext::new(Method::DELETE, "/users/42");
//! router.dispatch(&mut ctx);
//! assert_eq!(ctx.response().status(), StatusCode::METHOD_NOT_ALLOWED);
//! assert_eq!(ctx.response().header("allow"), Some("GET, OPTIONS"));
//! ```
//!
//! # Architecture
//!
//! Routes are filed under their static prefix, the literal segments before
//! the first variable:
//!
//! ```text
//!   "/users"   ─┬─ GET  /users
//!               ├─ POST /users
//!               └─ GET  /users/:id
//!   "/static/" ─── GET  /static/   (catch-all)
//!   "/"        ─── GET  /:slug
//! ```
//!
//! A request path equal to a prefix is tried against that bucket first.
//! Otherwise the longest matching catch-all, then the longest matching exact
//! route, get one attempt each. Fallback lookup is linear in the number of
//! routes.

#![doc(html_root_url = "https://docs.rs/fastroute-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod builder;
pub mod config;
pub mod path;
pub mod recovery;
mod registry;
mod route;
mod router;

pub use builder::{RouteRegistrar, RouteScope, RouterBuilder, ANY_METHODS};
pub use config::{RouterConfig, MAX_PATH_LEN};
pub use recovery::{default_recover, RecoverFn, RecoveryMode, RecoveryPolicy};
pub use registry::{PrefixWinners, RouteRegistry};
pub use route::{AllowedMethods, MatchKind, Route};
pub use router::{Outcome, RouteInfo, Router, NOT_FOUND_BODY};
