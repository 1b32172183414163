//! # fastroute
//!
//! A small, fast HTTP request router.
//!
//! - Routes are indexed by their static prefix; a path that names a prefix
//!   exactly is resolved with one map lookup.
//! - `:name` segments capture path variables; catch-all routes match any
//!   deeper path and expose the remainder.
//! - Method mismatches answer `405` with an `Allow` header listing the
//!   methods registered for that path shape.
//! - Filters (global or per route) can stop a request before its handler.
//! - Panics in filters, handlers or hooks are recovered into a `500`.
//!
//! ## Quick Start
//!
//! ```
//! use fastroute::prelude::*;
//! use http::{Method, StatusCode};
//!
//! let mut builder = Router::builder();
//! builder
//!     .get("/user/:name", |ctx: &mut RequestContext| {
//!         let body = format!("hello {}", ctx.param("name").unwrap_or_default());
//!         ctx.text(StatusCode::OK, body);
//!     })?
//!     .mount("/static/", |ctx: &mut RequestContext| {
//!         let file = ctx.catch_all_tail().unwrap_or("/").to_string();
//!         ctx.text(StatusCode::OK, file);
//!     })?;
//! builder.filter(Cors::new());
//! let router = builder.build()?;
//!
//! let mut ctx = RequestContext::new(Method::GET, "/user/gopher");
//! assert_eq!(router.dispatch(&mut ctx), Outcome::Matched);
//! assert_eq!(ctx.response().body_str(), Some("hello gopher"));
//! # Ok::<(), RouteError>(())
//! ```
//!
//! ## Serving with hyper
//!
//! With the `hyper` feature, [`RouterService`](service::RouterService) adapts
//! a [`Router`](router::Router) to `hyper::service::Service`.
//!
//! ## Crates
//!
//! | Module | Crate | Contents |
//! |--------|-------|----------|
//! | [`core`] | `fastroute-core` | request context, params, handler trait, errors |
//! | [`middleware`] | `fastroute-middleware` | filter chains, CORS, Basic auth |
//! | [`router`] | `fastroute-router` | builder, registry, dispatch |
//! | [`telemetry`] | `fastroute-telemetry` | logging setup |
//! | [`config`] | `fastroute-config` | layered configuration |

#![doc(html_root_url = "https://docs.rs/fastroute/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use fastroute_config as config;
pub use fastroute_core as core;
pub use fastroute_middleware as middleware;
pub use fastroute_router as router;
pub use fastroute_telemetry as telemetry;

#[cfg(feature = "hyper")]
pub mod service;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use fastroute_core::{Handler, Params, RequestContext, RouteError, RouteResult};
    pub use fastroute_middleware::stages::{BasicAuth, Cors};
    pub use fastroute_middleware::{Filter, FilterChain, FnFilter};
    pub use fastroute_router::{
        Outcome, RecoveryMode, RouteRegistrar, Router, RouterBuilder, RouterConfig,
    };

    #[cfg(feature = "hyper")]
    pub use crate::service::RouterService;
}
