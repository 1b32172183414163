//! # fastroute Core
//!
//! Core types shared by every fastroute crate:
//!
//! - [`RequestContext`] - Per-request state: the incoming request, bound path
//!   variables and the response being written
//! - [`Params`] - Named path variables captured by a route match
//! - [`Handler`] - Terminal request handler trait
//! - [`RouteError`] - Route table configuration errors
//! - [`HandlerFailure`] - A caught handler or filter panic

#![doc(html_root_url = "https://docs.rs/fastroute-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod handler;
mod params;

pub use context::{RequestContext, ResponseState};
pub use error::{HandlerFailure, RouteError, RouteResult};
pub use handler::{Handler, SharedHandler};
pub use params::Params;
