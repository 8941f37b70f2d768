//! Create-seat error types.

use common::SeatId;
use store::StoreError;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors returned by the create-seat command.
///
/// Every kind reaches the caller; none are swallowed inside the handler.
#[derive(Debug, Error)]
pub enum CreateSeatError {
    /// The command was missing or could not be decoded. Not retryable.
    #[error("Missing or malformed command: {0}")]
    NullCommand(String),

    /// One or more field rules failed. The caller must fix the command.
    #[error("Validation failed: {0}")]
    ValidationFailed(ValidationErrors),

    /// A seat with this id already exists. The create already happened.
    #[error("Seat already exists: {0}")]
    AlreadyExists(SeatId),

    /// The store failed. Safe to retry with the same seat id.
    #[error("Persistence failed: {0}")]
    PersistenceFailed(#[source] StoreError),
}

impl CreateSeatError {
    /// Returns the stable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CreateSeatError::NullCommand(_) => "NullCommand",
            CreateSeatError::ValidationFailed(_) => "ValidationFailed",
            CreateSeatError::AlreadyExists(_) => "AlreadyExists",
            CreateSeatError::PersistenceFailed(_) => "PersistenceFailed",
        }
    }
}

impl From<StoreError> for CreateSeatError {
    fn from(e: StoreError) -> Self {
        match e {
            // The loser of a same-id race surfaces exactly like a guarded duplicate
            StoreError::DuplicateSeat(id) => CreateSeatError::AlreadyExists(id),
            other => CreateSeatError::PersistenceFailed(other),
        }
    }
}
