//! Request logging middleware.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use insights_service::metrics::ServiceMetrics;
use std::time::Instant;
use tracing::info;

/// Logs every request and records it in the HTTP metrics.
///
/// Metrics are labelled with the route template rather than the raw path so
/// slugs do not create new series.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |path| path.as_str().to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    ServiceMetrics::http_request(method.as_str(), &route, status.as_u16(), duration);

    info!(
        target: "http",
        method = %method,
        uri = %uri,
        route = %route,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "HTTP request completed"
    );

    response
}
