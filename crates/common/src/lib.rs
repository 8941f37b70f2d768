//! Shared types for the seat command service.
//!
//! Identity newtypes and the seat record live here so that both the store
//! and the domain crates can name them without depending on each other.

mod seat;
mod types;

pub use seat::{ParseSeatClassError, ParseSeatTypeError, Seat, SeatClass, SeatType};
pub use types::{FlightId, SeatId};
