//! Test request building.

use crate::error::TestError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request};
use serde::Serialize;

/// Builder for requests sent through a [`TestClient`](crate::TestClient).
///
/// Invalid header names or values are remembered and reported by
/// [`build`](Self::build), so calls can be chained freely.
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Bytes,
    error: Option<TestError>,
}

impl TestRequestBuilder {
    /// Creates a builder for `method` and `uri` (path plus optional query).
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            error: None,
        }
    }

    /// Appends a header.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let name = name.as_ref();
        match (
            HeaderName::try_from(name),
            HeaderValue::try_from(value.as_ref()),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            (Err(e), _) => self.error = Some(TestError::InvalidHeader(format!("{name}: {e}"))),
            (_, Err(e)) => self.error = Some(TestError::InvalidHeader(format!("{name}: {e}"))),
        }
        self
    }

    /// Sets the `Content-Type` header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the `Origin` header.
    pub fn origin(self, origin: impl AsRef<str>) -> Self {
        self.header(header::ORIGIN.as_str(), origin)
    }

    /// Sets `Authorization: Basic <base64(user:password)>`.
    pub fn basic_auth(self, user: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        let credentials = STANDARD.encode(format!("{}:{}", user.as_ref(), password.as_ref()));
        self.header(header::AUTHORIZATION.as_str(), format!("Basic {credentials}"))
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Serializes `value` as the body and sets `Content-Type: application/json`.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.body = Bytes::from(bytes);
                self.content_type("application/json")
            }
            Err(e) => {
                self.error.get_or_insert(TestError::Json(e));
                self
            }
        }
    }

    /// Builds the request.
    pub fn build(self) -> Result<Request<Bytes>, TestError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut request = Request::builder()
            .method(self.method)
            .uri(self.uri)
            .body(self.body)
            .map_err(|e| TestError::RequestBuild(e.to_string()))?;
        *request.headers_mut() = self.headers;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_headers_and_query() {
        let request = TestRequestBuilder::new(Method::GET, "/search?q=rust")
            .header("X-Trace", "1")
            .header("X-Trace", "2")
            .origin("http://example.com")
            .build()
            .unwrap();

        assert_eq!(request.uri().path(), "/search");
        assert_eq!(request.uri().query(), Some("q=rust"));
        assert_eq!(request.headers().get_all("x-trace").iter().count(), 2);
        assert_eq!(request.headers()["origin"], "http://example.com");
    }

    #[test]
    fn test_basic_auth_header() {
        let request = TestRequestBuilder::new(Method::GET, "/")
            .basic_auth("foo", "bar")
            .build()
            .unwrap();
        assert_eq!(request.headers()["authorization"], "Basic Zm9vOmJhcg==");
    }

    #[test]
    fn test_json_body() {
        let request = TestRequestBuilder::new(Method::POST, "/users")
            .json(&serde_json::json!({ "name": "gopher" }))
            .build()
            .unwrap();
        assert_eq!(request.headers()["content-type"], "application/json");
        assert_eq!(request.body().as_ref(), br#"{"name":"gopher"}"#);
    }

    #[test]
    fn test_invalid_header_reported_on_build() {
        let result = TestRequestBuilder::new(Method::GET, "/")
            .header("bad header", "x")
            .header("X-Ok", "y")
            .build();
        assert!(matches!(result, Err(TestError::InvalidHeader(_))));

        let result = TestRequestBuilder::new(Method::GET, "/")
            .header("X-Bad", "line\nbreak")
            .build();
        assert!(matches!(result, Err(TestError::InvalidHeader(_))));
    }

    #[test]
    fn test_invalid_uri() {
        let result = TestRequestBuilder::new(Method::GET, "/a b").build();
        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }
}
