//! HTTP API server with observability for the seat command service.
//!
//! Provides REST endpoints for creating and reading seats, with structured
//! logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use domain::{CreateSeatHandler, EventPublisher};
use metrics_exporter_prometheus::PrometheusHandle;
use store::SeatStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::seats::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S, P>(state: Arc<AppState<S, P>>, metrics_handle: PrometheusHandle) -> Router
where
    S: SeatStore + 'static,
    P: EventPublisher + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check::<S, P>))
        .route("/seats", post(routes::seats::create::<S, P>))
        .route("/seats/{id}", get(routes::seats::get::<S, P>))
        .route("/seats/{id}/events", get(routes::seats::events::<S, P>))
        .route(
            "/flights/{id}/seats",
            get(routes::seats::list_for_flight::<S, P>),
        )
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

/// Creates the application state around a store and an event publisher.
pub fn create_default_state<S, P>(store: S, publisher: P) -> Arc<AppState<S, P>>
where
    S: SeatStore + 'static,
    P: EventPublisher + 'static,
{
    Arc::new(AppState {
        handler: CreateSeatHandler::new(store, publisher),
    })
}
