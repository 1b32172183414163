//! `hyper` integration.

use bytes::Bytes;
use fastroute_router::Router;
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::service::Service;
use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Serves a [`Router`] as a `hyper` service.
///
/// The request body is collected in full before dispatch. A body that fails
/// to arrive is answered with `400 Bad Request`.
///
/// ```no_run
/// # async fn run(router: fastroute::router::Router, stream: tokio::net::TcpStream) {
/// # use hyper_util::rt::TokioIo;
/// use fastroute::service::RouterService;
///
/// let service = RouterService::new(router);
/// hyper::server::conn::http1::Builder::new()
///     .serve_connection(TokioIo::new(stream), service)
///     .await
///     .ok();
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RouterService {
    router: Router,
}

impl RouterService {
    /// Wraps `router`.
    #[must_use]
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Returns the wrapped router.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }
}

impl From<Router> for RouterService {
    fn from(router: Router) -> Self {
        Self::new(router)
    }
}

impl<B> Service<Request<B>> for RouterService
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: fmt::Display,
{
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, request: Request<B>) -> Self::Future {
        let router = self.router.clone();
        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let body = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(err) => {
                    tracing::warn!(
                        http.method = %parts.method,
                        http.path = parts.uri.path(),
                        error = %err,
                        "Failed to read request body"
                    );
                    let mut response = Response::new(Full::new(Bytes::from_static(
                        b"Failed to read request body",
                    )));
                    *response.status_mut() = StatusCode::BAD_REQUEST;
                    return Ok(response);
                }
            };

            let response = router.handle(Request::from_parts(parts, body));
            Ok(response.map(Full::new))
        })
    }
}
