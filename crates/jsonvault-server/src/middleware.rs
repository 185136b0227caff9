//! Middleware for the REST API server.

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;
use axum::body::Bytes;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Create CORS middleware.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Request logging middleware.
///
/// Buffers the response body to report its exact byte count. The remote
/// address is only available when the server is started with connect info;
/// it is logged as `-` otherwise (e.g. in tests).
pub async fn logging_middleware(
    addr: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let (parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(method = %method, uri = %uri, %err, "failed to collect response body");
            Bytes::new()
        }
    };

    let remote = addr
        .map(|ConnectInfo(a)| a.to_string())
        .unwrap_or_else(|| "-".to_string());

    info!(
        remote = %remote,
        status = %parts.status.as_u16(),
        duration_ms = %duration.as_millis(),
        bytes = %bytes.len(),
        method = %method,
        uri = %uri,
        "request completed"
    );

    Response::from_parts(parts, Body::from(bytes))
}
