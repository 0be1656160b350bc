//! Error responses.
//!
//! # Responsibilities
//! - Map domain failures to status codes
//! - Keep the exact body shape each endpoint promises to clients
//!
//! # Design Decisions
//! - One variant per response shape, so a handler picks the shape by picking the variant
//! - Shape errors render as `{field: [messages]}` under the endpoint's envelope key

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::movies::{ShapeError, StoreError};

pub const MOVIE_NOT_FOUND: &str = "Movie not found";
pub const MOVIE_DELETED: &str = "Movie deleted";
pub const ORIGIN_REJECTED: &str = "Not allowed by CORS";
pub const ROUTE_NOT_FOUND_HTML: &str = "<h1>Not found</h1>";

/// Error type returned by handlers and middleware.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Lookup miss, plain text body.
    #[error("movie not found")]
    NotFound,

    /// Lookup miss, `{"message": "Movie not found"}` with the given status.
    #[error("movie not found")]
    NotFoundMessage(StatusCode),

    /// Create payload rejected: 400 `{"error": {...}}`.
    #[error("invalid movie: {0}")]
    InvalidMovie(ShapeError),

    /// Update payload rejected: 400 `{"message": {...}}`.
    #[error("invalid movie update: {0}")]
    InvalidPatch(ShapeError),

    /// `Origin` header outside the allow-list.
    #[error("origin not allowed")]
    OriginRejected,

    /// No route matched.
    #[error("route not found")]
    RouteNotFound,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, MOVIE_NOT_FOUND).into_response(),
            ApiError::NotFoundMessage(status) => {
                (status, Json(json!({ "message": MOVIE_NOT_FOUND }))).into_response()
            }
            ApiError::InvalidMovie(error) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": error }))).into_response()
            }
            ApiError::InvalidPatch(error) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": error }))).into_response()
            }
            ApiError::OriginRejected => (
                StatusCode::FORBIDDEN,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                ORIGIN_REJECTED,
            )
                .into_response(),
            ApiError::RouteNotFound => {
                (StatusCode::NOT_FOUND, Html(ROUTE_NOT_FOUND_HTML)).into_response()
            }
            ApiError::Store(e) => {
                tracing::error!(error = %e, "Store rejected a validated record");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
