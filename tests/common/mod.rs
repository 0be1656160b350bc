//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use movies_api::config::ServiceConfig;
use movies_api::http::{AppState, HttpServer};
use movies_api::movies::seed::parse_seed;
use movies_api::movies::MovieSchema;

pub const SHAWSHANK_ID: &str = "dcdd0fad-a94c-4810-8acc-5f108d3b18c3";
pub const DARK_KNIGHT_ID: &str = "c8a7d63f-3b04-44d3-9d95-8782fd7dcfaf";
pub const MATRIX_ID: &str = "c906673b-3948-4402-ac7f-73ac3a9e3105";

pub const SEED: &str = r#"[
    {
        "id": "dcdd0fad-a94c-4810-8acc-5f108d3b18c3",
        "title": "The Shawshank Redemption",
        "year": 1994,
        "director": "Frank Darabont",
        "duration": 142,
        "poster": "https://example.com/shawshank.jpg",
        "genre": ["Drama"],
        "rate": 9.3
    },
    {
        "id": "c8a7d63f-3b04-44d3-9d95-8782fd7dcfaf",
        "title": "The Dark Knight",
        "year": 2008,
        "director": "Christopher Nolan",
        "duration": 152,
        "poster": "https://example.com/dark-knight.jpg",
        "genre": ["Action", "Crime", "Drama"],
        "rate": 9.0
    },
    {
        "id": "c906673b-3948-4402-ac7f-73ac3a9e3105",
        "title": "The Matrix",
        "year": 1999,
        "director": "Lana Wachowski",
        "duration": 136,
        "poster": "https://example.com/matrix.jpg",
        "genre": ["Action", "Sci-Fi"],
        "rate": 8.7
    }
]"#;

/// Router over a fresh copy of `SEED`, plus a handle on its state.
pub fn test_app() -> (Router, AppState) {
    let schema = MovieSchema::current();
    let store = parse_seed(SEED, &schema).expect("test seed is valid");
    let state = AppState::new(store, schema);
    let router = HttpServer::build_router(&ServiceConfig::default(), state.clone());
    (router, state)
}

/// Payload from the create scenario: valid, no `rate`.
pub fn new_movie() -> Value {
    json!({
        "title": "Foo",
        "year": 2020,
        "director": "X",
        "duration": 90,
        "poster": "http://x.com/a.png",
        "genre": ["Drama"]
    })
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.body).expect("response body is UTF-8")
    }

    pub fn header(&self, name: impl header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Drive one request through the router in-process.
pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    TestResponse { status, headers, body }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
