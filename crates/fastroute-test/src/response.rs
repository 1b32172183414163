//! Test response wrapper.

use crate::error::TestError;
use bytes::Bytes;
use fastroute_router::Outcome;
use http::header::{self, ALLOW};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

/// A dispatched response, plus what the router decided along the way.
#[derive(Debug, Clone)]
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    outcome: Outcome,
    params: Vec<(String, String)>,
    catch_all_tail: Option<String>,
}

impl TestResponse {
    pub(crate) fn new(
        response: http::Response<Bytes>,
        outcome: Outcome,
        params: Vec<(String, String)>,
        catch_all_tail: Option<String>,
    ) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
            outcome,
            params,
            catch_all_tail,
        }
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status code as a u16.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns true if the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// How dispatch ended.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Path variables bound by the matched route.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The path remainder of a matched catch-all route.
    #[must_use]
    pub fn catch_all_tail(&self) -> Option<&str> {
        self.catch_all_tail.as_deref()
    }

    /// Returns the headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Gets a header value as a string.
    #[must_use]
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// Returns the `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header_str(header::CONTENT_TYPE.as_str())
    }

    /// The `Allow` header split into methods, in header order.
    #[must_use]
    pub fn allow(&self) -> Vec<&str> {
        self.header_str(ALLOW.as_str())
            .map(|value| value.split(',').map(str::trim).collect())
            .unwrap_or_default()
    }

    /// Returns the raw body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as a string.
    pub fn text(&self) -> Result<String, TestError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| TestError::BodyRead(format!("Invalid UTF-8: {e}")))
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Asserts the status code.
    ///
    /// # Panics
    ///
    /// Panics if the status differs.
    #[track_caller]
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {expected}, got {} (body: {:?})",
            self.status, self.body
        );
        self
    }

    /// Asserts the dispatch outcome.
    ///
    /// # Panics
    ///
    /// Panics if the outcome differs.
    #[track_caller]
    pub fn assert_outcome(&self, expected: Outcome) -> &Self {
        assert_eq!(
            self.outcome, expected,
            "Expected outcome {expected:?}, got {:?}",
            self.outcome
        );
        self
    }

    /// Asserts a header value.
    ///
    /// # Panics
    ///
    /// Panics if the header is missing or differs.
    #[track_caller]
    pub fn assert_header(&self, name: impl AsRef<str>, expected: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        let expected = expected.as_ref();
        match self.header_str(name) {
            Some(actual) => assert_eq!(
                actual, expected,
                "Expected header {name}: {expected}, got {actual}"
            ),
            None => panic!("Expected header {name}: {expected}, but it is missing"),
        }
        self
    }

    /// Asserts a header is absent.
    ///
    /// # Panics
    ///
    /// Panics if the header is present.
    #[track_caller]
    pub fn assert_no_header(&self, name: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        assert!(
            self.headers.get(name).is_none(),
            "Expected no {name} header, got {:?}",
            self.headers.get(name)
        );
        self
    }

    /// Asserts the `Allow` header lists exactly `expected`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the methods differ.
    #[track_caller]
    pub fn assert_allow(&self, expected: &[&str]) -> &Self {
        assert_eq!(self.allow(), expected, "Unexpected Allow header");
        self
    }

    /// Asserts the body equals `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the body differs or is not UTF-8.
    #[track_caller]
    pub fn assert_body_eq(&self, expected: impl AsRef<str>) -> &Self {
        let expected = expected.as_ref();
        match std::str::from_utf8(&self.body) {
            Ok(actual) => assert_eq!(actual, expected, "Unexpected body"),
            Err(e) => panic!("Body is not valid UTF-8: {e}"),
        }
        self
    }

    /// Asserts the body contains `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the body does not contain it.
    #[track_caller]
    pub fn assert_body_contains(&self, expected: impl AsRef<str>) -> &Self {
        let expected = expected.as_ref();
        let body = String::from_utf8_lossy(&self.body);
        assert!(
            body.contains(expected),
            "Expected body to contain {expected:?}, got {body:?}"
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn response(status: StatusCode, allow: Option<&'static str>, body: &'static str) -> TestResponse {
        let mut response = http::Response::new(Bytes::from_static(body.as_bytes()));
        *response.status_mut() = status;
        if let Some(allow) = allow {
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static(allow));
        }
        TestResponse::new(
            response,
            Outcome::Matched,
            vec![("id".to_string(), "7".to_string())],
            Some("/css/app.css".to_string()),
        )
    }

    #[test]
    fn test_accessors() {
        let res = response(StatusCode::OK, Some("GET, POST, OPTIONS"), "hello");
        assert_eq!(res.status_code(), 200);
        assert!(res.is_success());
        assert_eq!(res.allow(), ["GET", "POST", "OPTIONS"]);
        assert_eq!(res.param("id"), Some("7"));
        assert_eq!(res.param("name"), None);
        assert_eq!(res.catch_all_tail(), Some("/css/app.css"));
        assert_eq!(res.text().unwrap(), "hello");
    }

    #[test]
    fn test_allow_missing() {
        let res = response(StatusCode::NOT_FOUND, None, "");
        assert!(res.allow().is_empty());
        res.assert_no_header("allow");
    }

    #[test]
    fn test_json() {
        let res = response(StatusCode::OK, None, r#"{"id":7}"#);
        let value: serde_json::Value = res.json().unwrap();
        assert_eq!(value["id"], 7);

        let res = response(StatusCode::OK, None, "not json");
        assert!(matches!(
            res.json::<serde_json::Value>(),
            Err(TestError::Json(_))
        ));
    }

    #[test]
    fn test_chained_assertions() {
        response(StatusCode::OK, Some("GET, OPTIONS"), "hello world")
            .assert_status(StatusCode::OK)
            .assert_outcome(Outcome::Matched)
            .assert_header("allow", "GET, OPTIONS")
            .assert_allow(&["GET", "OPTIONS"])
            .assert_body_contains("world")
            .assert_body_eq("hello world");
    }

    #[test]
    #[should_panic(expected = "Expected status")]
    fn test_assert_status_panics() {
        response(StatusCode::OK, None, "").assert_status(StatusCode::CREATED);
    }
}
