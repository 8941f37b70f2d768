//! Polling relay from the outbox to the event publisher.

use std::time::Duration;

use domain::{DispatchError, EventPublisher, dispatch};
use store::SeatStore;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::Result;

/// Delivers outbox envelopes that the post-commit publish left pending.
///
/// Within a pass envelopes are published oldest first and the pass stops at
/// the first failure. Ordering is not global: the handler's post-commit
/// publish can deliver a newer event while an older one still waits here.
/// Delivery is at-least-once: an envelope published but not yet marked
/// dispatched will be published again on the next pass.
pub struct OutboxRelay<S: SeatStore, P: EventPublisher> {
    store: S,
    publisher: P,
}

impl<S: SeatStore, P: EventPublisher> OutboxRelay<S, P> {
    /// Creates a relay over the given store and publisher.
    pub fn new(store: S, publisher: P) -> Self {
        Self { store, publisher }
    }

    /// Runs a single pass over at most `batch` pending envelopes.
    ///
    /// Returns the number of envelopes dispatched.
    #[tracing::instrument(skip(self))]
    pub async fn run_once(&self, batch: usize) -> Result<usize> {
        let pending = self.store.pending_events(batch).await?;
        if pending.is_empty() {
            return Ok(0);
        }

        match dispatch(&self.store, &self.publisher, &pending).await {
            Ok(dispatched) => {
                metrics::counter!("outbox_relay_dispatched_total").increment(dispatched as u64);
                tracing::debug!(dispatched, "relay pass complete");
                Ok(dispatched)
            }
            Err(e) => {
                if let DispatchError::Publish { dispatched, .. } = &e {
                    metrics::counter!("outbox_relay_dispatched_total")
                        .increment(*dispatched as u64);
                }
                Err(e.into())
            }
        }
    }

    /// Runs passes until the outbox holds no pending envelopes.
    ///
    /// Returns the total number dispatched.
    pub async fn drain(&self, batch: usize) -> Result<usize> {
        let batch = batch.max(1);
        let mut total = 0;
        loop {
            let dispatched = self.run_once(batch).await?;
            total += dispatched;
            if dispatched < batch {
                return Ok(total);
            }
        }
    }

    /// Drains the outbox every `interval` until `shutdown` turns true or its
    /// sender is dropped.
    ///
    /// Failed passes are logged and retried on the next tick.
    pub async fn run(&self, interval: Duration, batch: usize, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval_ms = interval.as_millis() as u64, batch, "outbox relay started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.drain(batch).await {
                        Ok(0) => {}
                        Ok(dispatched) => tracing::info!(dispatched, "relayed pending events"),
                        Err(e) => tracing::warn!(error = %e, "outbox relay pass failed"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("outbox relay stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RelayError;
    use domain::{DomainEvent, InMemoryEventBus, SeatClass, SeatCreated, SeatId, SeatType};
    use domain::{FlightId, create_seat};
    use store::{EventEnvelope, InMemorySeatStore};

    async fn commit_seat(store: &InMemorySeatStore, label: &str) -> EventEnvelope {
        let seat = create_seat(
            SeatId::new(),
            label,
            SeatType::Aisle,
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
    async fn run_once_with_empty_outbox_does_nothing() {
        let relay = OutboxRelay::new(InMemorySeatStore::new(), InMemoryEventBus::new());
        assert_eq!(relay.run_once(10).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn run_once_delivers_in_commit_order() {
        let store = InMemorySeatStore::new();
        let bus = InMemoryEventBus::new();
        let mut rx = bus.subscribe();
        let first = commit_seat(&store, "1A").await;
        let second = commit_seat(&store, "1B").await;

        let relay = OutboxRelay::new(store.clone(), bus);
        assert_eq!(relay.run_once(10).await.unwrap(), 2);

        assert_eq!(rx.recv().await.unwrap().event_id, first.event_id);
        assert_eq!(rx.recv().await.unwrap().event_id, second.event_id);
        assert!(store.pending_events(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn run_once_respects_batch_size() {
        let store = InMemorySeatStore::new();
        for label in ["1A", "1B", "1C"] {
            commit_seat(&store, label).await;
        }

        let relay = OutboxRelay::new(store.clone(), InMemoryEventBus::new());
        assert_eq!(relay.run_once(2).await.unwrap(), 2);
        assert_eq!(store.pending_events(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn drain_empties_the_outbox() {
        let store = InMemorySeatStore::new();
        for label in ["1A", "1B", "1C", "1D", "1E"] {
            commit_seat(&store, label).await;
        }

        let relay = OutboxRelay::new(store.clone(), InMemoryEventBus::new());
        assert_eq!(relay.drain(2).await.unwrap(), 5);
        assert!(store.pending_events(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn publish_failure_keeps_events_pending() {
        let store = InMemorySeatStore::new();
        let bus = InMemoryEventBus::new();
        bus.set_fail_on_publish(true);
        commit_seat(&store, "1A").await;

        let relay = OutboxRelay::new(store.clone(), bus.clone());
        let err = relay.run_once(10).await.unwrap_err();
        assert!(matches!(err, RelayError::Dispatch(DispatchError::Publish { .. })));
        assert_eq!(store.pending_events(10).await.unwrap().len(), 1);

        bus.set_fail_on_publish(false);
        assert_eq!(relay.run_once(10).await.unwrap(), 1);
        assert!(store.pending_events(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_signal() {
        let relay = OutboxRelay::new(InMemorySeatStore::new(), InMemoryEventBus::new());
        let (tx, rx) = watch::channel(false);

        let stopper = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            tx.send(true).unwrap();
        };

        tokio::time::timeout(Duration::from_secs(5), async {
            tokio::join!(relay.run(Duration::from_millis(5), 10, rx), stopper);
        })
        .await
        .expect("relay should stop after shutdown");
    }
}
