//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::SeatId;
use domain::{CreateSeatError, ValidationErrors};
use serde::Serialize;
use store::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Rejected create-seat command.
    Command(CreateSeatError),
    /// Seat store failure on a read path.
    Store(StoreError),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<ValidationErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_id: Option<SeatId>,
}

impl ErrorBody {
    fn new(error: &'static str, message: String) -> Self {
        Self {
            error,
            message,
            violations: None,
            seat_id: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new("NotFound", msg)),
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorBody::new("BadRequest", msg))
            }
            ApiError::Command(err) => command_error_to_response(err),
            ApiError::Store(err) => {
                tracing::error!(error = %err, "seat store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorBody::new("PersistenceFailed", err.to_string()),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

fn command_error_to_response(err: CreateSeatError) -> (StatusCode, ErrorBody) {
    let kind = err.kind();
    let message = err.to_string();

    match err {
        CreateSeatError::NullCommand(_) => {
            (StatusCode::BAD_REQUEST, ErrorBody::new(kind, message))
        }
        CreateSeatError::ValidationFailed(violations) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorBody {
                violations: Some(violations),
                ..ErrorBody::new(kind, message)
            },
        ),
        CreateSeatError::AlreadyExists(seat_id) => (
            StatusCode::CONFLICT,
            ErrorBody {
                seat_id: Some(seat_id),
                ..ErrorBody::new(kind, message)
            },
        ),
        CreateSeatError::PersistenceFailed(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, ErrorBody::new(kind, message))
        }
    }
}

impl From<CreateSeatError> for ApiError {
    fn from(err: CreateSeatError) -> Self {
        ApiError::Command(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}
