//! Outbox relay for seat events.
//!
//! Seats and their `SeatCreated` envelopes are committed together; the
//! command handler publishes right after commit. Anything that publish step
//! could not deliver stays pending in the outbox, and [`OutboxRelay`] picks it
//! up on a timer and delivers it in commit order.

pub mod error;
pub mod relay;

pub use error::{RelayError, Result};
pub use relay::OutboxRelay;
