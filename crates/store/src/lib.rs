//! Seat persistence for the seat command service.
//!
//! A [`SeatStore`] holds seat rows together with a transactional outbox:
//! the envelopes staged alongside an insert are committed in the same unit
//! of work as the seat itself and stay pending until they are dispatched.

pub mod error;
pub mod event;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::{FlightId, Seat, SeatClass, SeatId, SeatType};
pub use error::{Result, StoreError};
pub use event::{EventEnvelope, EventId};
pub use memory::InMemorySeatStore;
pub use postgres::PostgresSeatStore;
pub use store::{SeatStore, SeatStoreExt};
