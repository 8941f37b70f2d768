use async_trait::async_trait;

use crate::{EventEnvelope, EventId, FlightId, Result, Seat, SeatId, StoreError};

/// Core trait for seat persistence.
///
/// Implementations must enforce uniqueness of the seat id themselves; the
/// command side relies on that constraint, not on any in-process lock, when
/// two creates for the same id race each other.
#[async_trait]
pub trait SeatStore: Send + Sync {
    /// Looks up a single seat by id.
    async fn find_by_id(&self, id: SeatId) -> Result<Option<Seat>>;

    /// Inserts a seat together with its staged outbox envelopes.
    ///
    /// The seat row and the envelopes are committed atomically - either all
    /// are visible afterwards or none are. Fails with
    /// [`StoreError::DuplicateSeat`] if a seat with the same id exists.
    async fn insert(&self, seat: Seat, events: Vec<EventEnvelope>) -> Result<Seat>;

    /// Lists the non-deleted seats of a flight, ordered by label.
    async fn list_by_flight(&self, flight_id: FlightId) -> Result<Vec<Seat>>;

    /// Returns undispatched envelopes in commit order, at most `limit`.
    async fn pending_events(&self, limit: usize) -> Result<Vec<EventEnvelope>>;

    /// Marks an envelope as dispatched. Marking twice is a no-op.
    async fn mark_dispatched(&self, event_id: EventId) -> Result<()>;

    /// Returns every envelope recorded for a seat, dispatched or not.
    async fn events_for_seat(&self, seat_id: SeatId) -> Result<Vec<EventEnvelope>>;
}

/// Extension trait providing convenience methods for seat stores.
#[async_trait]
pub trait SeatStoreExt: SeatStore {
    /// Checks whether a seat with this id has been persisted.
    async fn seat_exists(&self, id: SeatId) -> Result<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}

impl<T: SeatStore + ?Sized> SeatStoreExt for T {}

/// Checks that every staged envelope belongs to the seat being inserted.
pub fn validate_outbox(seat: &Seat, events: &[EventEnvelope]) -> Result<()> {
    if let Some(stray) = events.iter().find(|e| e.aggregate_id != seat.id) {
        return Err(StoreError::InvalidOutbox(format!(
            "event {} belongs to seat {}, not {}",
            stray.event_id, stray.aggregate_id, seat.id
        )));
    }
    if events.iter().any(|e| !e.is_pending()) {
        return Err(StoreError::InvalidOutbox(
            "staged events must not be dispatched yet".to_string(),
        ));
    }
    Ok(())
}
