//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, metrics, origin gate, CORS, limits)
//! - Bind server to listener
//! - Graceful shutdown on signal or internal trigger

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    routing::get,
    Router,
};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::lifecycle::signals::shutdown_signal;
use crate::movies::{MovieSchema, MovieStore};
use crate::observability::metrics;
use crate::security::{origin_gate, OriginPolicy};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<MovieStore>>,
    pub schema: MovieSchema,
}

impl AppState {
    pub fn new(store: MovieStore, schema: MovieSchema) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            schema,
        }
    }

    /// Shared access to the store.
    ///
    /// A panic while holding the lock cannot leave a half-applied mutation
    /// (every mutation is a single `Vec` operation), so poisoning is ignored.
    pub fn read_store(&self) -> RwLockReadGuard<'_, MovieStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access to the store.
    pub fn write_store(&self) -> RwLockWriteGuard<'_, MovieStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// HTTP server for the movies API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server serving `store`.
    pub fn new(config: ServiceConfig, store: MovieStore) -> Self {
        metrics::record_store_size(store.len());
        let state = AppState::new(store, MovieSchema::current());
        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run outermost first: request ID, tracing, metrics, origin gate,
    /// CORS, timeout, body limit.
    #[allow(deprecated)]
    pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let policy = Arc::new(OriginPolicy::new(config.cors.allowed_origins.iter().cloned()));

        Router::new()
            .route(
                "/movies",
                get(handlers::list_movies).post(handlers::create_movie),
            )
            .route(
                "/movies/{id}",
                get(handlers::get_movie)
                    .patch(handlers::update_movie)
                    .delete(handlers::delete_movie),
            )
            .fallback(handlers::not_found)
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.limits.request_timeout_secs)))
            .layer(policy.cors_layer())
            .layer(middleware::from_fn_with_state(policy, origin_gate))
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %req.method(),
                            path = %req.uri().path(),
                            request_id = req.request_id().unwrap_or("unknown"),
                        )
                    }))
                    .layer(propagate_request_id_layer()),
            )
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Stops on Ctrl+C / SIGTERM or when `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            movies = self.state.read_store().len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown requested");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The configured router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle to the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
