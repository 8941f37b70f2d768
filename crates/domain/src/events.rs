//! Seat domain events.

use chrono::{DateTime, Utc};
use common::{FlightId, Seat, SeatClass, SeatId, SeatType};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use store::EventEnvelope;

/// Aggregate type recorded on every seat envelope.
pub const SEAT_AGGREGATE_TYPE: &str = "Seat";

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and should be named in past tense.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Returns the seat the event is about.
    fn seat_id(&self) -> SeatId;

    /// Returns when the event happened.
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Wraps the event in an outbox envelope stamped with [`occurred_at`](Self::occurred_at).
    fn to_envelope(&self) -> Result<EventEnvelope, serde_json::Error> {
        Ok(EventEnvelope::new(
            self.seat_id(),
            SEAT_AGGREGATE_TYPE,
            self.event_type(),
            self,
        )?
        .with_timestamp(self.occurred_at()))
    }
}

/// A seat was created.
///
/// Owns a copy of the seat's attributes at creation time; later changes to
/// the seat do not affect an already emitted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatCreated {
    /// The new seat's id.
    pub seat_id: SeatId,

    /// Seat label.
    pub label: String,

    /// Position of the seat in its row.
    #[serde(rename = "type")]
    pub seat_type: SeatType,

    /// Cabin class.
    #[serde(rename = "class")]
    pub seat_class: SeatClass,

    /// Soft-delete flag, always false at creation.
    pub is_deleted: bool,

    /// The flight the seat belongs to.
    pub flight_id: FlightId,

    /// When the seat was created.
    pub created_at: DateTime<Utc>,
}

impl SeatCreated {
    /// Snapshots a newly created seat.
    pub fn from_seat(seat: &Seat, created_at: DateTime<Utc>) -> Self {
        Self {
            seat_id: seat.id,
            label: seat.label.clone(),
            seat_type: seat.seat_type,
            seat_class: seat.seat_class,
            is_deleted: seat.is_deleted,
            flight_id: seat.flight_id,
            created_at,
        }
    }

    /// Returns true if the event describes exactly this seat record.
    pub fn matches(&self, seat: &Seat) -> bool {
        self.seat_id == seat.id
            && self.label == seat.label
            && self.seat_type == seat.seat_type
            && self.seat_class == seat.seat_class
            && self.is_deleted == seat.is_deleted
            && self.flight_id == seat.flight_id
    }
}

impl DomainEvent for SeatCreated {
    fn event_type(&self) -> &'static str {
        "SeatCreated"
    }

    fn seat_id(&self) -> SeatId {
        self.seat_id
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
