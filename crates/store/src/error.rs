use thiserror::Error;

use crate::SeatId;

/// Errors that can occur when interacting with the seat store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A seat with this id is already persisted.
    /// Raised by the store's uniqueness constraint on the seat id.
    #[error("Seat already exists: {0}")]
    DuplicateSeat(SeatId),

    /// The envelopes staged with an insert do not belong to the seat being inserted.
    #[error("Invalid outbox batch: {0}")]
    InvalidOutbox(String),

    /// A stored row could not be mapped back to a seat.
    #[error("Invalid stored row: {0}")]
    InvalidRow(String),

    /// The store could not complete the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
