//! Relay error types.

use domain::DispatchError;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur during a relay pass.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Reading pending envelopes from the store failed.
    #[error("Seat store error: {0}")]
    Store(#[from] StoreError),

    /// Publishing or acknowledging an envelope failed.
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Result type for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;
