//! In-memory testing for fastroute routers.
//!
//! [`TestClient`] wraps a built [`Router`](fastroute_router::Router) and sends
//! requests straight into [`Router::dispatch`](fastroute_router::Router::dispatch),
//! with no socket and no runtime.
//!
//! # Example
//!
//! ```
//! use fastroute_core::RequestContext;
//! use fastroute_router::{RouteRegistrar, Router};
//! use fastroute_test::TestClient;
//! use http::StatusCode;
//!
//! let mut builder = Router::builder();
//! builder
//!     .post("/users", |ctx: &mut RequestContext| ctx.text(StatusCode::CREATED, "created"))
//!     .unwrap();
//! let client = TestClient::new(builder.build().unwrap());
//!
//! client
//!     .post("/users")
//!     .send()
//!     .assert_status(StatusCode::CREATED)
//!     .assert_body_eq("created");
//!
//! client
//!     .get("/users")
//!     .send()
//!     .assert_status(StatusCode::METHOD_NOT_ALLOWED)
//!     .assert_allow(&["POST", "OPTIONS"]);
//! ```

#![doc(html_root_url = "https://docs.rs/fastroute-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::TestRequestBuilder;
pub use response::TestResponse;
