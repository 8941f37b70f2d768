//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common::SeatId;
use domain::EventPublisher;
use serde::Serialize;
use store::SeatStore;

use super::seats::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
}

/// GET /health: reports whether the seat store answers lookups.
pub async fn check<S: SeatStore + 'static, P: EventPublisher + 'static>(
    State(state): State<Arc<AppState<S, P>>>,
) -> (StatusCode, Json<HealthResponse>) {
    // Probe with an id no seat can have
    match state.handler.store().find_by_id(SeatId::from_uuid(uuid::Uuid::nil())).await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                store: "up",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check could not reach seat store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    store: "down",
                }),
            )
        }
    }
}
