//! Outbound event channel and the post-commit dispatch step.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use store::{EventEnvelope, EventId, SeatStore, StoreError};
use thiserror::Error;
use tokio::sync::broadcast;

/// Default capacity of the in-memory bus's broadcast buffer.
const DEFAULT_BUS_CAPACITY: usize = 1024;

/// Errors returned by an event publisher.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The transport rejected the event.
    #[error("event transport error: {0}")]
    Transport(String),
}

/// Hands committed events to subscribers.
///
/// Delivery is at-least-once: the same envelope may be published again if
/// marking it dispatched fails or the relay retries it.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes a single envelope.
    async fn publish(&self, event: &EventEnvelope) -> Result<(), PublishError>;
}

/// In-process event bus backed by a tokio broadcast channel.
///
/// Publishing with no subscribers succeeds; nobody listening is not a
/// delivery failure.
#[derive(Debug, Clone)]
pub struct InMemoryEventBus {
    sender: broadcast::Sender<EventEnvelope>,
    fail_on_publish: Arc<AtomicBool>,
}

impl InMemoryEventBus {
    /// Creates a bus with the default buffer capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUS_CAPACITY)
    }

    /// Creates a bus whose slowest subscriber may lag `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            fail_on_publish: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns a receiver for every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Returns the number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Makes every following publish fail with [`PublishError::Transport`].
    pub fn set_fail_on_publish(&self, fail: bool) {
        self.fail_on_publish.store(fail, Ordering::SeqCst);
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: &EventEnvelope) -> Result<(), PublishError> {
        if self.fail_on_publish.load(Ordering::SeqCst) {
            return Err(PublishError::Transport("event bus is failing publishes".to_string()));
        }

        // A send error only means there are no receivers right now
        let _ = self.sender.send(event.clone());
        Ok(())
    }
}

/// Errors that stop a dispatch pass early.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The publisher rejected an event; later events were not attempted.
    #[error("publishing event {event_id} failed after {dispatched} dispatched: {source}")]
    Publish {
        event_id: EventId,
        dispatched: usize,
        #[source]
        source: PublishError,
    },

    /// An event was published but could not be marked dispatched.
    #[error("event {event_id} was published but not marked dispatched: {source}")]
    MarkDispatched {
        event_id: EventId,
        #[source]
        source: StoreError,
    },
}

/// Publishes committed envelopes in order and marks each one dispatched.
///
/// Stops at the first failure, so within `events` a later envelope never
/// overtakes an earlier one; whatever is left stays pending in the outbox.
/// Returns the number of envelopes dispatched.
pub async fn dispatch<S, P>(
    store: &S,
    publisher: &P,
    events: &[EventEnvelope],
) -> Result<usize, DispatchError>
where
    S: SeatStore + ?Sized,
    P: EventPublisher + ?Sized,
{
    let mut dispatched = 0;

    for event in events {
        if let Err(source) = publisher.publish(event).await {
            metrics::counter!("seat_events_publish_failures_total").increment(1);
            return Err(DispatchError::Publish {
                event_id: event.event_id,
                dispatched,
                source,
            });
        }

        store
            .mark_dispatched(event.event_id)
            .await
            .map_err(|source| DispatchError::MarkDispatched {
                event_id: event.event_id,
                source,
            })?;

        metrics::counter!("seat_events_published_total").increment(1);
        dispatched += 1;
    }

    Ok(dispatched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{FlightId, SeatClass, SeatId, SeatType};
    use store::InMemorySeatStore;

    use crate::events::{DomainEvent, SeatCreated};
    use crate::factory::create_seat;

    async fn committed_event(store: &InMemorySeatStore) -> EventEnvelope {
        let seat = create_seat(
            SeatId::new(),
            "12A",
            SeatType::Window,
            SeatClass::Economy,
            FlightId::from_uuid(uuid::Uuid::new_v4()),
        );
        let envelope = SeatCreated::from_seat(&seat, chrono::Utc::now())
            .to_envelope()
            .unwrap();
        store.insert(seat, vec![envelope.clone()]).await.unwrap();
        envelope
    }

    #[tokio::test]
    async fn publish_without_subscribers_succeeds() {
        let bus = InMemoryEventBus::new();
        let store = InMemorySeatStore::new();
        let event = committed_event(&store).await;

        assert_eq!(bus.subscriber_count(), 0);
        assert!(bus.publish(&event).await.is_ok());
    }

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = InMemoryEventBus::new();
        let mut rx = bus.subscribe();
        let store = InMemorySeatStore::new();
        let event = committed_event(&store).await;

        bus.publish(&event).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn dispatch_publishes_and_marks_dispatched() {
        let bus = InMemoryEventBus::new();
        let mut rx = bus.subscribe();
        let store = InMemorySeatStore::new();
        let first = committed_event(&store).await;
        let second = committed_event(&store).await;

        let dispatched = dispatch(&store, &bus, &[first.clone(), second.clone()])
            .await
            .unwrap();

        assert_eq!(dispatched, 2);
        assert_eq!(rx.recv().await.unwrap().event_id, first.event_id);
        assert_eq!(rx.recv().await.unwrap().event_id, second.event_id);
        assert!(store.pending_events(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn dispatch_stops_at_first_failure_and_leaves_events_pending() {
        let bus = InMemoryEventBus::new();
        bus.set_fail_on_publish(true);
        let store = InMemorySeatStore::new();
        let first = committed_event(&store).await;
        let second = committed_event(&store).await;

        let err = dispatch(&store, &bus, &[first.clone(), second])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Publish { event_id, dispatched: 0, .. } if event_id == first.event_id
        ));
        assert_eq!(store.pending_events(10).await.unwrap().len(), 2);
    }
}
