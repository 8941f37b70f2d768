use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    EventEnvelope, EventId, FlightId, Result, Seat, SeatClass, SeatId, SeatType, StoreError,
    store::{SeatStore, validate_outbox},
};

/// Primary-key constraint that enforces at most one seat per id.
const SEATS_PKEY: &str = "seats_pkey";

/// PostgreSQL-backed seat store.
#[derive(Clone)]
pub struct PostgresSeatStore {
    pool: PgPool,
}

impl PostgresSeatStore {
    /// Creates a new PostgreSQL seat store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_seat(row: PgRow) -> Result<Seat> {
        let seat_type: String = row.try_get("seat_type")?;
        let seat_class: String = row.try_get("seat_class")?;

        Ok(Seat {
            id: SeatId::from_uuid(row.try_get::<Uuid, _>("id")?),
            label: row.try_get("label")?,
            seat_type: seat_type
                .parse::<SeatType>()
                .map_err(|e| StoreError::InvalidRow(e.to_string()))?,
            seat_class: seat_class
                .parse::<SeatClass>()
                .map_err(|e| StoreError::InvalidRow(e.to_string()))?,
            flight_id: FlightId::from_uuid(row.try_get::<Uuid, _>("flight_id")?),
            is_deleted: row.try_get("is_deleted")?,
        })
    }

    fn row_to_event(row: PgRow) -> Result<EventEnvelope> {
        let metadata_json: serde_json::Value = row.try_get("metadata")?;
        let metadata: HashMap<String, serde_json::Value> = serde_json::from_value(metadata_json)?;

        Ok(EventEnvelope {
            event_id: EventId::from_uuid(row.try_get::<Uuid, _>("id")?),
            event_type: row.try_get("event_type")?,
            aggregate_id: SeatId::from_uuid(row.try_get::<Uuid, _>("aggregate_id")?),
            aggregate_type: row.try_get("aggregate_type")?,
            timestamp: row.try_get("timestamp")?,
            payload: row.try_get("payload")?,
            metadata,
            dispatched_at: row.try_get("dispatched_at")?,
        })
    }
}

#[async_trait]
impl SeatStore for PostgresSeatStore {
    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: SeatId) -> Result<Option<Seat>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, label, seat_type, seat_class, flight_id, is_deleted
            FROM seats
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_seat).transpose()
    }

    #[tracing::instrument(skip(self, seat, events), fields(seat_id = %seat.id, events = events.len()))]
    async fn insert(&self, seat: Seat, events: Vec<EventEnvelope>) -> Result<Seat> {
        validate_outbox(&seat, &events)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO seats (id, label, seat_type, seat_class, flight_id, is_deleted)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(seat.id.as_uuid())
        .bind(&seat.label)
        .bind(seat.seat_type.as_str())
        .bind(seat.seat_class.as_str())
        .bind(seat.flight_id.as_uuid())
        .bind(seat.is_deleted)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            // The loser of a concurrent create for the same id lands here
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some(SEATS_PKEY)
            {
                return StoreError::DuplicateSeat(seat.id);
            }
            StoreError::Database(e)
        })?;

        for event in &events {
            let metadata_json = serde_json::to_value(&event.metadata)?;

            sqlx::query(
                r#"
                INSERT INTO outbox (id, event_type, aggregate_id, aggregate_type, timestamp, payload, metadata)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(event.event_id.as_uuid())
            .bind(&event.event_type)
            .bind(event.aggregate_id.as_uuid())
            .bind(&event.aggregate_type)
            .bind(event.timestamp)
            .bind(&event.payload)
            .bind(metadata_json)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(seat)
    }

    async fn list_by_flight(&self, flight_id: FlightId) -> Result<Vec<Seat>> {
        let rows = sqlx::query(
            r#"
            SELECT id, label, seat_type, seat_class, flight_id, is_deleted
            FROM seats
            WHERE flight_id = $1 AND NOT is_deleted
            ORDER BY label ASC, id ASC
            "#,
        )
        .bind(flight_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_seat).collect()
    }

    async fn pending_events(&self, limit: usize) -> Result<Vec<EventEnvelope>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query(
            r#"
            SELECT id, event_type, aggregate_id, aggregate_type, timestamp, payload, metadata, dispatched_at
            FROM outbox
            WHERE dispatched_at IS NULL
            ORDER BY position ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_event).collect()
    }

    async fn mark_dispatched(&self, event_id: EventId) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE outbox
            SET dispatched_at = NOW()
            WHERE id = $1 AND dispatched_at IS NULL
            "#,
        )
        .bind(event_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn events_for_seat(&self, seat_id: SeatId) -> Result<Vec<EventEnvelope>> {
        let rows = sqlx::query(
            r#"
            SELECT id, event_type, aggregate_id, aggregate_type, timestamp, payload, metadata, dispatched_at
            FROM outbox
            WHERE aggregate_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(seat_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_event).collect()
    }
}
