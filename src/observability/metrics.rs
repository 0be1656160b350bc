//! Metrics collection and exposition.
//!
//! # Metrics
//! - `movies_http_requests_total` (counter): requests by method, route, status
//! - `movies_http_request_duration_seconds` (histogram): latency by method, route, status
//! - `movies_store_records` (gauge): records currently held
//! - `movies_origin_rejections_total` (counter): requests refused by the origin gate
//!
//! Recording goes through the `metrics` facade and is a no-op until
//! `init_metrics` installs the Prometheus exporter.

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a completed request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("movies_http_requests_total", &labels).increment(1);
    metrics::histogram!("movies_http_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_store_size(len: usize) {
    metrics::gauge!("movies_store_records").set(len as f64);
}

pub fn record_origin_rejection() {
    metrics::counter!("movies_origin_rejections_total").increment(1);
}

/// Middleware recording request count and latency per matched route.
///
/// Unmatched paths share one label so arbitrary URLs cannot blow up cardinality.
pub async fn track_requests(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
