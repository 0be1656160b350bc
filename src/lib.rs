//! In-memory movie catalogue served over HTTP.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod movies;
pub mod observability;
pub mod security;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use movies::{Movie, MovieStore};
