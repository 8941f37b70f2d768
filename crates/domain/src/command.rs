//! The create-seat command and its result.

use common::{FlightId, SeatId, SeatType};
use serde::{Deserialize, Serialize};

use crate::error::CreateSeatError;

/// Command to create a new seat on a flight.
///
/// `seat_id` is optional: callers that want idempotent retries assign it
/// themselves, otherwise the handler generates one. Missing `label`, `class`
/// or `flight_id` fields decode to empty values so that validation, not
/// decoding, reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSeat {
    /// The seat ID to create, if the caller pre-assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat_id: Option<SeatId>,

    /// Seat label, e.g. "12A".
    #[serde(default)]
    pub label: String,

    /// Position of the seat in its row.
    #[serde(rename = "type")]
    pub seat_type: SeatType,

    /// Requested cabin class, validated against the accepted set.
    #[serde(rename = "class", default)]
    pub seat_class: String,

    /// The flight the seat belongs to.
    #[serde(default)]
    pub flight_id: FlightId,
}

impl CreateSeat {
    /// Creates a CreateSeat command that lets the handler assign the id.
    pub fn new(
        label: impl Into<String>,
        seat_type: SeatType,
        seat_class: impl Into<String>,
        flight_id: FlightId,
    ) -> Self {
        Self {
            seat_id: None,
            label: label.into(),
            seat_type,
            seat_class: seat_class.into(),
            flight_id,
        }
    }

    /// Pre-assigns the seat ID, making resubmission idempotent.
    pub fn with_seat_id(mut self, seat_id: SeatId) -> Self {
        self.seat_id = Some(seat_id);
        self
    }

    /// Decodes a command from a JSON request body.
    ///
    /// An empty body, a JSON `null` or anything that does not decode into a
    /// command is rejected with [`CreateSeatError::NullCommand`].
    pub fn from_json(payload: &[u8]) -> Result<Self, CreateSeatError> {
        if payload.iter().all(u8::is_ascii_whitespace) {
            return Err(CreateSeatError::NullCommand(
                "request body is empty".to_string(),
            ));
        }

        serde_json::from_slice(payload)
            .map_err(|e| CreateSeatError::NullCommand(format!("malformed command: {e}")))
    }
}

/// Result of a successful create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSeatResult {
    /// Identity of the created seat.
    pub seat_id: SeatId,
}
