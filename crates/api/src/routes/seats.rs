//! Seat command and query endpoints.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use common::{FlightId, Seat, SeatId};
use domain::{CreateSeatHandler, CreateSeatResult, EventPublisher};
use serde::Serialize;
use store::{EventEnvelope, SeatStore};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: SeatStore, P: EventPublisher> {
    pub handler: CreateSeatHandler<S, P>,
}

// -- Response types --

#[derive(Serialize)]
pub struct SeatResponse {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub seat_type: String,
    #[serde(rename = "class")]
    pub seat_class: String,
    pub flight_id: String,
    pub is_deleted: bool,
}

impl From<Seat> for SeatResponse {
    fn from(seat: Seat) -> Self {
        Self {
            id: seat.id.to_string(),
            label: seat.label,
            seat_type: seat.seat_type.to_string(),
            seat_class: seat.seat_class.to_string(),
            flight_id: seat.flight_id.to_string(),
            is_deleted: seat.is_deleted,
        }
    }
}

/// Response type for event envelope data.
#[derive(Serialize)]
pub struct EventResponse {
    pub event_id: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub dispatched_at: Option<DateTime<Utc>>,
    pub payload: serde_json::Value,
}

impl From<EventEnvelope> for EventResponse {
    fn from(e: EventEnvelope) -> Self {
        Self {
            event_id: e.event_id.to_string(),
            event_type: e.event_type,
            timestamp: e.timestamp,
            dispatched_at: e.dispatched_at,
            payload: e.payload,
        }
    }
}

// -- Handlers --

/// POST /seats: create a seat from a JSON command body.
///
/// The body is taken as raw bytes so that an empty or malformed body is
/// reported as a `NullCommand` rather than an extractor rejection.
#[tracing::instrument(skip(state, body))]
pub async fn create<S: SeatStore + 'static, P: EventPublisher + 'static>(
    State(state): State<Arc<AppState<S, P>>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let result: CreateSeatResult = state.handler.handle_json(&body).await?;
    let location = format!("/seats/{}", result.seat_id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(result),
    ))
}

/// GET /seats/:id: load a seat by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S: SeatStore + 'static, P: EventPublisher + 'static>(
    State(state): State<Arc<AppState<S, P>>>,
    Path(id): Path<String>,
) -> Result<Json<SeatResponse>, ApiError> {
    let seat_id = SeatId::from_uuid(parse_uuid(&id)?);
    let seat = state
        .handler
        .store()
        .find_by_id(seat_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Seat {id} not found")))?;

    Ok(Json(seat.into()))
}

/// GET /seats/:id/events: outbox envelopes recorded for a seat.
#[tracing::instrument(skip(state))]
pub async fn events<S: SeatStore + 'static, P: EventPublisher + 'static>(
    State(state): State<Arc<AppState<S, P>>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let seat_id = SeatId::from_uuid(parse_uuid(&id)?);
    let events = state.handler.store().events_for_seat(seat_id).await?;

    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

/// GET /flights/:id/seats: non-deleted seats of a flight, ordered by label.
#[tracing::instrument(skip(state))]
pub async fn list_for_flight<S: SeatStore + 'static, P: EventPublisher + 'static>(
    State(state): State<Arc<AppState<S, P>>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<SeatResponse>>, ApiError> {
    let flight_id = FlightId::from_uuid(parse_uuid(&id)?);
    let seats = state.handler.store().list_by_flight(flight_id).await?;

    Ok(Json(seats.into_iter().map(SeatResponse::from).collect()))
}

fn parse_uuid(id: &str) -> Result<uuid::Uuid, ApiError> {
    uuid::Uuid::parse_str(id).map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}
