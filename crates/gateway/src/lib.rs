//! HTTP gateway of the Ditto headers workspace.
//!
//! Translates HTTP request headers into validated [`DittoHeaders`], accepts
//! thing events carrying them and exposes health and Prometheus metrics,
//! with structured logging (tracing).
//!
//! [`DittoHeaders`]: ditto_headers::DittoHeaders

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use ditto_headers::HeaderTranslator;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;

/// Shared application state accessible from all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    pub translator: HeaderTranslator,
}

impl AppState {
    /// State translating with all Ditto and message header definitions.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            translator: HeaderTranslator::ditto(),
        }
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/headers", post(routes::headers::translate))
        .route("/things/{thing_id}/events", post(routes::events::publish))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
