//! # fastroute Middleware
//!
//! Filters run between route matching and the terminal handler.
//!
//! A [`Filter`] inspects the [`RequestContext`](fastroute_core::RequestContext)
//! and returns `true` to let the request through or `false` to stop it. A
//! stopping filter is expected to have written the response itself (an auth
//! rejection, a CORS preflight answer, ...).
//!
//! ## Execution Order
//!
//! ```text
//! matched route → global filters → route filters → handler
//!                      │                 │
//!                      └──── false ──────┴──→ response as written by the filter
//! ```
//!
//! ## Built-in Filters
//!
//! | Filter | Purpose |
//! |--------|---------|
//! | [`stages::Cors`] | Adds CORS headers, answers `OPTIONS` preflight |
//! | [`stages::BasicAuth`] | Enforces HTTP Basic credentials |
//!
//! ## Example
//!
//! ```
//! use fastroute_core::RequestContext;
//! use fastroute_middleware::{FilterChain, FnFilter};
//! use http::{Method, StatusCode};
//!
//! let chain = FilterChain::new()
//!     .with(FnFilter::new("tag", |ctx: &mut RequestContext| {
//!         ctx.set_extension("tagged");
//!         true
//!     }))
//!     .with(FnFilter::new("deny", |ctx: &mut RequestContext| {
//!         ctx.text(StatusCode::FORBIDDEN, "denied");
//!         false
//!     }));
//!
//! let mut ctx = RequestContext::new(Method::GET, "/");
//! assert!(!chain.run(&mut ctx));
//! assert_eq!(ctx.response().status(), StatusCode::FORBIDDEN);
//! ```

#![doc(html_root_url = "https://docs.rs/fastroute-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod filter;
pub mod stages;

pub use chain::FilterChain;
pub use filter::{Filter, FnFilter, SharedFilter};
