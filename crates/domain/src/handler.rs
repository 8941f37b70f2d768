//! The create-seat command handler.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use common::Seat;
use store::{EventEnvelope, SeatStore, SeatStoreExt, StoreError};

use crate::command::{CreateSeat, CreateSeatResult};
use crate::error::CreateSeatError;
use crate::events::{DomainEvent, SeatCreated};
use crate::factory::create_seat;
use crate::identity::{IdGenerator, UuidV7Generator};
use crate::publisher::{EventPublisher, dispatch};
use crate::validation::validate;

/// Handles [`CreateSeat`] commands.
///
/// Each command runs through validate, existence check, construction,
/// persistence and emission in that order. The seat row and its
/// `SeatCreated` envelope are written in one store commit; the envelope is
/// only handed to the publisher once that commit has succeeded.
///
/// The commit and the publish run in a spawned task. Dropping the future
/// returned by [`handle`](Self::handle) before that point cancels the
/// command cleanly; dropping it afterwards neither rolls back the seat nor
/// suppresses its event.
pub struct CreateSeatHandler<S, P>
where
    S: SeatStore,
    P: EventPublisher,
{
    store: Arc<S>,
    publisher: Arc<P>,
    ids: Arc<dyn IdGenerator>,
}

impl<S, P> CreateSeatHandler<S, P>
where
    S: SeatStore + 'static,
    P: EventPublisher + 'static,
{
    /// Creates a handler that generates UUIDv7 ids for commands without one.
    pub fn new(store: S, publisher: P) -> Self {
        Self {
            store: Arc::new(store),
            publisher: Arc::new(publisher),
            ids: Arc::new(UuidV7Generator),
        }
    }

    /// Replaces the id generator.
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the event publisher.
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Decodes a JSON request body and handles the resulting command.
    pub async fn handle_json(&self, payload: &[u8]) -> Result<CreateSeatResult, CreateSeatError> {
        match CreateSeat::from_json(payload) {
            Ok(cmd) => self.handle(cmd).await,
            Err(e) => {
                record_outcome::<()>(&Err(&e), Instant::now());
                tracing::warn!(error = %e, "rejected create-seat command");
                Err(e)
            }
        }
    }

    /// Creates a seat, failing if one with the same id already exists.
    #[tracing::instrument(
        skip(self, cmd),
        fields(seat_id = tracing::field::Empty, flight_id = %cmd.flight_id)
    )]
    pub async fn handle(&self, cmd: CreateSeat) -> Result<CreateSeatResult, CreateSeatError> {
        let started = Instant::now();
        let outcome = self.create(cmd).await;
        record_outcome(&outcome.as_ref(), started);

        match &outcome {
            Ok(result) => tracing::info!(seat_id = %result.seat_id, "seat created"),
            Err(CreateSeatError::PersistenceFailed(e)) => {
                tracing::error!(error = %e, "seat could not be persisted");
            }
            Err(e) => tracing::warn!(kind = e.kind(), error = %e, "rejected create-seat command"),
        }

        outcome
    }

    async fn create(&self, cmd: CreateSeat) -> Result<CreateSeatResult, CreateSeatError> {
        // 1. Assign identity
        let id_source = if cmd.seat_id.is_some() { "caller" } else { "generated" };
        let seat_id = cmd.seat_id.unwrap_or_else(|| self.ids.next_id());
        tracing::Span::current().record("seat_id", tracing::field::display(seat_id));

        // 2. Validate
        let seat_class = validate(&cmd).map_err(CreateSeatError::ValidationFailed)?;

        // 3. Existence guard
        if self.store.seat_exists(seat_id).await? {
            return Err(CreateSeatError::AlreadyExists(seat_id));
        }

        // 4. Build the seat and stage its event
        let seat = create_seat(seat_id, cmd.label, cmd.seat_type, seat_class, cmd.flight_id);
        let staged = vec![
            SeatCreated::from_seat(&seat, Utc::now())
                .to_envelope()
                .map_err(|e| CreateSeatError::PersistenceFailed(StoreError::Serialization(e)))?
                .with_metadata("id_source", serde_json::json!(id_source)),
        ];

        // 5. Commit and flush outside the caller's future
        let task = tokio::spawn(commit_and_flush(
            Arc::clone(&self.store),
            Arc::clone(&self.publisher),
            seat,
            staged,
        ));
        task.await.map_err(|e| {
            CreateSeatError::PersistenceFailed(StoreError::Unavailable(format!(
                "write task aborted: {e}"
            )))
        })??;

        Ok(CreateSeatResult { seat_id })
    }
}

/// Inserts the seat with its staged envelopes, then releases the envelopes.
///
/// A publish failure after the commit is logged and left to the outbox
/// relay; it never turns a committed create into an error.
async fn commit_and_flush<S, P>(
    store: Arc<S>,
    publisher: Arc<P>,
    seat: Seat,
    staged: Vec<EventEnvelope>,
) -> Result<Seat, StoreError>
where
    S: SeatStore,
    P: EventPublisher,
{
    let seat = store.insert(seat, staged.clone()).await?;

    if let Err(e) = dispatch(store.as_ref(), publisher.as_ref(), &staged).await {
        tracing::warn!(seat_id = %seat.id, error = %e, "event left in outbox for relay");
    }

    Ok(seat)
}

fn record_outcome<T>(outcome: &Result<T, &CreateSeatError>, started: Instant) {
    let outcome_label = match outcome {
        Ok(_) => "Created",
        Err(e) => e.kind(),
    };
    metrics::counter!("seat_commands_total", "outcome" => outcome_label).increment(1);
    metrics::histogram!("seat_command_duration_seconds").record(started.elapsed().as_secs_f64());
}
