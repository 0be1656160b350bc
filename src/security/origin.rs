//! Cross-origin access control.
//!
//! `origin_gate` rejects requests whose `Origin` header is not on the
//! allow-list before any handler runs. Requests that pass get the usual CORS
//! response headers from the `CorsLayer` built by `OriginPolicy::cors_layer`.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashSet;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::http::response::ApiError;
use crate::http::RequestIdExt;
use crate::observability::metrics;

/// Fixed set of origins allowed to call the API.
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    allowed: HashSet<String>,
}

impl OriginPolicy {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: origins.into_iter().map(Into::into).collect(),
        }
    }

    /// Requests without an `Origin` header are same-origin or non-browser
    /// clients and are always allowed.
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(origin) => self.allowed.contains(origin),
        }
    }

    /// CORS response headers for the allowed origins.
    pub fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .allowed
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::HEAD,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([header::CONTENT_TYPE])
    }
}

/// Middleware rejecting requests from origins outside the allow-list.
pub async fn origin_gate(
    State(policy): State<Arc<OriginPolicy>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = match req.headers().get(header::ORIGIN) {
        None => None,
        // A non-UTF-8 origin can never be on the list.
        Some(value) => Some(value.to_str().unwrap_or_default()),
    };

    if policy.is_allowed(origin) {
        return next.run(req).await;
    }

    tracing::warn!(
        request_id = req.request_id().unwrap_or("unknown"),
        origin = origin.unwrap_or_default(),
        method = %req.method(),
        path = %req.uri().path(),
        "Origin not allowed"
    );
    metrics::record_origin_rejection();
    ApiError::OriginRejected.into_response()
}
