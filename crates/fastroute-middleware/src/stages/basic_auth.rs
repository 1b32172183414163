//! HTTP Basic authentication filter.
//!
//! Checks `Authorization: Basic <base64(user:password)>` against a single
//! configured credential pair. A missing, malformed or wrong credential stops
//! the chain with `401 Unauthorized` and a `WWW-Authenticate` challenge.

use crate::filter::Filter;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use fastroute_core::RequestContext;
use http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use http::{HeaderValue, StatusCode};
use std::fmt;

const DEFAULT_REALM: &str = "Restricted";

/// Basic authentication filter.
///
/// # Example
///
/// ```
/// use fastroute_core::RequestContext;
/// use fastroute_middleware::Filter;
/// use fastroute_middleware::stages::BasicAuth;
/// use http::{HeaderValue, Method, StatusCode};
/// use http::header::AUTHORIZATION;
///
/// let auth = BasicAuth::new("foo", "bar");
///
/// // "foo:bar"
/// let mut ok = RequestContext::new(Method::GET, "/admin")
///     .with_header(AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));
/// assert!(auth.filter(&mut ok));
///
/// let mut denied = RequestContext::new(Method::GET, "/admin");
/// assert!(!auth.filter(&mut denied));
/// assert_eq!(denied.response().status(), StatusCode::UNAUTHORIZED);
/// ```
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
    challenge: HeaderValue,
}

impl BasicAuth {
    /// Creates a filter accepting exactly `username` / `password`.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            challenge: challenge(DEFAULT_REALM),
        }
    }

    /// Sets the realm announced in the `WWW-Authenticate` challenge.
    #[must_use]
    pub fn with_realm(mut self, realm: &str) -> Self {
        self.challenge = challenge(realm);
        self
    }

    fn credentials_match(&self, header: &str) -> bool {
        let Some((scheme, encoded)) = header.split_once(' ') else {
            return false;
        };
        if !scheme.eq_ignore_ascii_case("basic") {
            return false;
        }
        let Ok(decoded) = STANDARD.decode(encoded.trim()) else {
            return false;
        };
        let Ok(decoded) = String::from_utf8(decoded) else {
            return false;
        };
        decoded
            .split_once(':')
            .is_some_and(|(user, pass)| user == self.username && pass == self.password)
    }

    fn reject(&self, ctx: &mut RequestContext) {
        ctx.set_header(WWW_AUTHENTICATE, self.challenge.clone());
        ctx.error("Unauthorized", StatusCode::UNAUTHORIZED);
    }
}

fn challenge(realm: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Basic realm={realm}"))
        .unwrap_or(HeaderValue::from_static("Basic realm=Restricted"))
}

impl Filter for BasicAuth {
    fn name(&self) -> &'static str {
        "basic_auth"
    }

    fn filter(&self, ctx: &mut RequestContext) -> bool {
        let authorized = ctx
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| self.credentials_match(v));

        if !authorized {
            tracing::debug!(http.path = ctx.path(), "Basic auth rejected request");
            self.reject(ctx);
        }
        authorized
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("challenge", &self.challenge)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn request(authorization: Option<&str>) -> RequestContext {
        let ctx = RequestContext::new(Method::GET, "/admin");
        match authorization {
            Some(value) => ctx.with_header(AUTHORIZATION, HeaderValue::from_str(value).unwrap()),
            None => ctx,
        }
    }

    fn basic(user_pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(user_pass))
    }

    #[test]
    fn test_valid_credentials_continue() {
        let auth = BasicAuth::new("foo", "bar");
        let mut ctx = request(Some(&basic("foo:bar")));

        assert!(auth.filter(&mut ctx));
        assert!(!ctx.response().is_written());
    }

    #[test]
    fn test_missing_header_rejected() {
        let auth = BasicAuth::new("foo", "bar");
        let mut ctx = request(None);

        assert!(!auth.filter(&mut ctx));
        assert_eq!(ctx.response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ctx.response().header("www-authenticate"),
            Some("Basic realm=Restricted")
        );
    }

    #[test]
    fn test_wrong_password_rejected() {
        let auth = BasicAuth::new("foo", "bar");
        let mut ctx = request(Some(&basic("foo:baz")));
        assert!(!auth.filter(&mut ctx));
    }

    #[test]
    fn test_password_may_contain_colon() {
        let auth = BasicAuth::new("foo", "b:a:r");
        let mut ctx = request(Some(&basic("foo:b:a:r")));
        assert!(auth.filter(&mut ctx));
    }

    #[test]
    fn test_malformed_headers_rejected() {
        let auth = BasicAuth::new("foo", "bar");
        let no_colon = basic("foobar");
        for value in ["Basic", "Basic !!!notbase64", "Bearer Zm9vOmJhcg==", no_colon.as_str()] {
            let mut ctx = request(Some(value));
            assert!(!auth.filter(&mut ctx), "accepted {value:?}");
        }
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let auth = BasicAuth::new("foo", "bar");
        let mut ctx = request(Some("basic Zm9vOmJhcg=="));
        assert!(auth.filter(&mut ctx));
    }

    #[test]
    fn test_custom_realm() {
        let auth = BasicAuth::new("foo", "bar").with_realm("admin");
        let mut ctx = request(None);

        assert!(!auth.filter(&mut ctx));
        assert_eq!(
            ctx.response().header("www-authenticate"),
            Some("Basic realm=admin")
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let auth = BasicAuth::new("foo", "secret");
        assert!(!format!("{auth:?}").contains("secret"));
    }
}
