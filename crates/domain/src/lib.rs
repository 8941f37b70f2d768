//! Domain layer for seat management.
//!
//! This crate provides the create-seat command pipeline:
//! - `CreateSeat` command decoding and field validation
//! - Identity generation and seat construction
//! - `CreateSeatHandler`, which persists a seat and its `SeatCreated`
//!   event together and publishes the event after commit
//! - The event publisher seam and the dispatch step shared with the relay

pub mod command;
pub mod error;
pub mod events;
pub mod factory;
pub mod handler;
pub mod identity;
pub mod publisher;
pub mod validation;

pub use command::{CreateSeat, CreateSeatResult};
pub use error::CreateSeatError;
pub use events::{DomainEvent, SEAT_AGGREGATE_TYPE, SeatCreated};
pub use factory::create_seat;
pub use handler::CreateSeatHandler;
pub use identity::{IdGenerator, PresetIdGenerator, UuidV7Generator};
pub use publisher::{DispatchError, EventPublisher, InMemoryEventBus, PublishError, dispatch};
pub use validation::{ValidationErrors, Violation, validate};

pub use common::{FlightId, Seat, SeatClass, SeatId, SeatType};
