//! Built-in filters.
//!
//! - [`cors`] - CORS headers and `OPTIONS` preflight answers
//! - [`basic_auth`] - HTTP Basic authentication

pub mod basic_auth;
pub mod cors;

pub use basic_auth::BasicAuth;
pub use cors::{AllowedOrigins, Cors, CorsBuilder};
