//! Request context types.
//!
//! The [`RequestContext`] is the only per-request state in fastroute. The host
//! server creates one for each request, hands it to the router, and turns it
//! back into an HTTP response afterwards. Nothing inside it is shared between
//! concurrent dispatches.

use crate::Params;
use bytes::{Bytes, BytesMut};
use http::header::{HeaderName, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// The response being written for a request.
///
/// Starts as an empty `200 OK`. Setting the status or writing body bytes
/// marks the response as written, which the recovery policy uses to tell
/// whether a custom recovery callback produced a response of its own.
#[derive(Debug, Clone)]
pub struct ResponseState {
    status: StatusCode,
    headers: HeaderMap,
    body: BytesMut,
    written: bool,
}

impl Default for ResponseState {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: BytesMut::new(),
            written: false,
        }
    }
}

impl ResponseState {
    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the status code.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
        self.written = true;
    }

    /// Returns the response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the response headers mutably.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Sets a header, replacing earlier values.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    /// Returns a header value as a string, if present and visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the body written so far.
    #[must_use]
    pub fn body(&self) -> &BytesMut {
        &self.body
    }

    /// Returns the body as UTF-8 text, if it is valid UTF-8.
    #[must_use]
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Appends bytes to the body.
    pub fn write(&mut self, data: impl AsRef<[u8]>) {
        self.body.extend_from_slice(data.as_ref());
        self.written = true;
    }

    /// Replaces the body.
    pub fn set_body(&mut self, data: impl AsRef<[u8]>) {
        self.body.clear();
        self.write(data);
    }

    /// Returns true once the status or body has been set.
    #[must_use]
    pub fn is_written(&self) -> bool {
        self.written
    }

    /// Discards everything written so far.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Converts into an [`http::Response`].
    #[must_use]
    pub fn into_http(self) -> Response<Bytes> {
        let mut response = Response::new(self.body.freeze());
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Per-request context passed to filters and handlers.
///
/// Carries the request line, headers and body, the path variables bound by
/// the matched route, and the [`ResponseState`] being written.
///
/// # Example
///
/// ```
/// use fastroute_core::RequestContext;
/// use http::{Method, StatusCode};
///
/// let mut ctx = RequestContext::new(Method::GET, "/users/42");
/// ctx.params_mut().insert("id", "42");
/// ctx.text(StatusCode::OK, "found");
///
/// assert_eq!(ctx.param("id"), Some("42"));
/// let response = ctx.into_response();
/// assert_eq!(response.status(), StatusCode::OK);
/// assert_eq!(response.body().as_ref(), b"found");
/// ```
pub struct RequestContext {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    params: Params,
    catch_all_tail: Option<String>,
    response: ResponseState,
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl RequestContext {
    /// Creates a context for a request without headers or body.
    ///
    /// `target` may carry a query string (`/search?q=x`); it is split off the
    /// path used for routing.
    #[must_use]
    pub fn new(method: Method, target: impl AsRef<str>) -> Self {
        let target = target.as_ref();
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (target.to_string(), None),
        };
        Self {
            method,
            path,
            query,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: Params::new(),
            catch_all_tail: None,
            response: ResponseState::default(),
            extensions: HashMap::new(),
        }
    }

    /// Creates a context from an [`http::Request`].
    #[must_use]
    pub fn from_request(request: Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        let mut ctx = Self::new(parts.method, parts.uri.path());
        ctx.query = parts.uri.query().map(str::to_string);
        ctx.headers = parts.headers;
        ctx.body = body;
        ctx
    }

    /// Adds a request header. Used by hosts and tests building a context.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the raw request path, as used for routing.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string, without the `?`.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a request header as a string, if present and visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns true for `OPTIONS` requests.
    #[must_use]
    pub fn is_options(&self) -> bool {
        self.method == Method::OPTIONS
    }

    /// Returns the path variables bound by the matched route.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Returns the path variables mutably. The router binds variables here.
    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Returns a single path variable.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// For catch-all routes, the part of the path after the route's static
    /// prefix. Always starts with `/`.
    #[must_use]
    pub fn catch_all_tail(&self) -> Option<&str> {
        self.catch_all_tail.as_deref()
    }

    /// Records the catch-all tail. Set by the router on a catch-all match.
    pub fn set_catch_all_tail(&mut self, tail: impl Into<String>) {
        self.catch_all_tail = Some(tail.into());
    }

    /// Returns the response being written.
    #[must_use]
    pub fn response(&self) -> &ResponseState {
        &self.response
    }

    /// Returns the response being written, mutably.
    pub fn response_mut(&mut self) -> &mut ResponseState {
        &mut self.response
    }

    /// Sets the response status.
    pub fn set_status(&mut self, status: StatusCode) {
        self.response.set_status(status);
    }

    /// Sets a response header.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.response.set_header(name, value);
    }

    /// Appends to the response body.
    pub fn write(&mut self, data: impl AsRef<[u8]>) {
        self.response.write(data);
    }

    /// Writes a complete plain-text response.
    pub fn text(&mut self, status: StatusCode, body: impl AsRef<str>) {
        self.response.set_status(status);
        self.response
            .set_header(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
        self.response.set_body(body.as_ref());
    }

    /// Writes a complete response with the given content type.
    ///
    /// Falls back to `application/octet-stream` when `content_type` is not a
    /// valid header value.
    pub fn success(&mut self, content_type: &str, body: impl AsRef<[u8]>) {
        let content_type = HeaderValue::from_str(content_type)
            .unwrap_or(HeaderValue::from_static("application/octet-stream"));
        self.response.set_status(StatusCode::OK);
        self.response.set_header(CONTENT_TYPE, content_type);
        self.response.set_body(body);
    }

    /// Writes an error response: the status plus a plain-text message.
    pub fn error(&mut self, message: impl AsRef<str>, status: StatusCode) {
        self.text(status, message);
    }

    /// Stores a typed value for later filters or the handler.
    ///
    /// # Example
    ///
    /// ```
    /// use fastroute_core::RequestContext;
    /// use http::Method;
    ///
    /// struct User(String);
    ///
    /// let mut ctx = RequestContext::new(Method::GET, "/");
    /// ctx.set_extension(User("gopher".to_string()));
    /// assert_eq!(ctx.get_extension::<User>().map(|u| u.0.as_str()), Some("gopher"));
    /// ```
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed value stored with [`set_extension`](Self::set_extension).
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Removes and returns a typed value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Consumes the context, producing the HTTP response.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        self.response.into_http()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("params", &self.params)
            .field("catch_all_tail", &self.catch_all_tail)
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}
