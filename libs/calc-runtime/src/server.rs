//! HTTP serving: configuration, middleware stack and the graceful serve loop.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use http::{HeaderName, HeaderValue, Request};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Listener and middleware settings of one HTTP service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpServerConfig {
    /// Socket address to bind, e.g. `0.0.0.0:5000`.
    pub bind_addr: String,
    /// Upper bound on handling one inbound request.
    pub request_timeout_ms: u64,
    pub body_limit_bytes: usize,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self::with_bind_addr("0.0.0.0:5000")
    }
}

impl HttpServerConfig {
    #[must_use]
    pub fn with_bind_addr(bind_addr: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            request_timeout_ms: 30_000,
            body_limit_bytes: 64 * 1024,
        }
    }

    /// Parse the configured bind address.
    ///
    /// # Errors
    /// Returns an error if `bind_addr` is not a valid socket address.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.bind_addr))
    }

    /// Replace the port of the bind address, keeping the host.
    ///
    /// # Errors
    /// Returns an error if the current bind address cannot be parsed.
    pub fn override_port(&mut self, port: u16) -> anyhow::Result<()> {
        let mut addr = self.socket_addr()?;
        addr.set_port(port);
        self.bind_addr = addr.to_string();
        Ok(())
    }
}

#[derive(Clone, Copy, Default)]
struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&uuid::Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Apply the common middleware stack to a service router.
///
/// Runtime order (outermost first): `SetRequestId` -> `PropagateRequestId` ->
/// Trace -> Timeout -> `BodyLimit` -> router.
pub fn apply_middleware_stack(
    mut router: Router,
    config: &HttpServerConfig,
    service: &'static str,
) -> Router {
    router = router.layer(RequestBodyLimitLayer::new(config.body_limit_bytes));
    router = router.layer(DefaultBodyLimit::max(config.body_limit_bytes));

    router = router.layer(TimeoutLayer::with_status_code(
        http::StatusCode::GATEWAY_TIMEOUT,
        Duration::from_millis(config.request_timeout_ms),
    ));

    router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(move |req: &Request<axum::body::Body>| {
                let rid = req
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");

                tracing::info_span!(
                    "http_request",
                    service,
                    method = %req.method(),
                    uri = %req.uri().path(),
                    request_id = %rid,
                    status = Empty,
                    latency_ms = Empty,
                )
            })
            .on_response(
                |res: &http::Response<axum::body::Body>,
                 latency: Duration,
                 span: &tracing::Span| {
                    span.record("status", res.status().as_u16());
                    span.record("latency_ms", latency.as_millis());
                    tracing::debug!(parent: span, "request completed");
                },
            ),
    );

    let header = HeaderName::from_static(REQUEST_ID_HEADER);
    router = router.layer(PropagateRequestIdLayer::new(header.clone()));
    router.layer(SetRequestIdLayer::new(header, MakeReqId))
}

/// Bind the listener and serve `router` until `cancel` fires.
///
/// # Errors
/// Returns an error if the address is invalid, binding fails or the server errors.
pub async fn serve(
    router: Router,
    config: &HttpServerConfig,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("HTTP server bound on {}", addr);

    let shutdown = async move {
        cancel.cancelled().await;
        tracing::info!("HTTP server shutting down gracefully (cancellation)");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
