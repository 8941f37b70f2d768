use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    EventEnvelope, EventId, FlightId, Result, Seat, SeatId, StoreError,
    store::{SeatStore, validate_outbox},
};

#[derive(Debug, Default)]
struct InMemoryState {
    seats: HashMap<SeatId, Seat>,
    outbox: Vec<EventEnvelope>,
    /// Outbox positions still awaiting dispatch, in commit order.
    pending: BTreeSet<usize>,
    positions: HashMap<EventId, usize>,
    fail_on_insert: bool,
}

/// In-memory seat store for tests and single-process deployments.
///
/// A single write lock covers the existence re-check, the seat insert and
/// the outbox append, which gives the same all-or-nothing behaviour as the
/// PostgreSQL transaction.
#[derive(Debug, Clone, Default)]
pub struct InMemorySeatStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemorySeatStore {
    /// Creates a new empty in-memory seat store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of seats stored.
    pub async fn seat_count(&self) -> usize {
        self.state.read().await.seats.len()
    }

    /// Returns the number of outbox envelopes, dispatched or not.
    pub async fn outbox_len(&self) -> usize {
        self.state.read().await.outbox.len()
    }

    /// Makes every following insert fail with [`StoreError::Unavailable`].
    pub async fn set_fail_on_insert(&self, fail: bool) {
        self.state.write().await.fail_on_insert = fail;
    }
}

#[async_trait]
impl SeatStore for InMemorySeatStore {
    async fn find_by_id(&self, id: SeatId) -> Result<Option<Seat>> {
        Ok(self.state.read().await.seats.get(&id).cloned())
    }

    async fn insert(&self, seat: Seat, events: Vec<EventEnvelope>) -> Result<Seat> {
        validate_outbox(&seat, &events)?;

        let mut state = self.state.write().await;

        if state.fail_on_insert {
            return Err(StoreError::Unavailable(
                "in-memory store is failing inserts".to_string(),
            ));
        }

        // Uniqueness constraint on the seat id
        if state.seats.contains_key(&seat.id) {
            return Err(StoreError::DuplicateSeat(seat.id));
        }

        state.seats.insert(seat.id, seat.clone());
        for event in events {
            let position = state.outbox.len();
            state.positions.insert(event.event_id, position);
            state.pending.insert(position);
            state.outbox.push(event);
        }

        Ok(seat)
    }

    async fn list_by_flight(&self, flight_id: FlightId) -> Result<Vec<Seat>> {
        let state = self.state.read().await;
        let mut seats: Vec<_> = state
            .seats
            .values()
            .filter(|s| s.flight_id == flight_id && !s.is_deleted)
            .cloned()
            .collect();
        seats.sort_by(|a, b| a.label.cmp(&b.label).then(a.id.cmp(&b.id)));
        Ok(seats)
    }

    async fn pending_events(&self, limit: usize) -> Result<Vec<EventEnvelope>> {
        let state = self.state.read().await;
        Ok(state
            .pending
            .iter()
            .take(limit)
            .map(|&position| state.outbox[position].clone())
            .collect())
    }

    async fn mark_dispatched(&self, event_id: EventId) -> Result<()> {
        let mut state = self.state.write().await;
        let Some(&position) = state.positions.get(&event_id) else {
            return Ok(());
        };
        if state.pending.remove(&position) {
            state.outbox[position].dispatched_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn events_for_seat(&self, seat_id: SeatId) -> Result<Vec<EventEnvelope>> {
        let state = self.state.read().await;
        Ok(state
            .outbox
            .iter()
            .filter(|e| e.aggregate_id == seat_id)
            .cloned()
            .collect())
    }
}
